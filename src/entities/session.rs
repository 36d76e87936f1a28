use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{UserProfile, Workflow};

/// One browsing session's route selection. Lives only in the session store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub user_id: i64,
    pub profile: UserProfile,
    pub workflow: Workflow,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(profile: UserProfile, workflow: Workflow, ttl: Duration) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_id: profile.id,
            profile,
            workflow,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }
}
