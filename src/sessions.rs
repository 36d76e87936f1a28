use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::Session;
use crate::error::Error;

#[async_trait]
pub trait SessionStore {
    async fn create_session(&self, session: Session) -> Result<Session, Error>;
    /// Expired sessions are never returned.
    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, Error>;
    async fn update_session(&self, session: Session) -> Result<Session, Error>;
    async fn remove_session(&self, token: Uuid) -> Result<(), Error>;
}

/// Process-local session store. Nothing survives a restart.
pub struct MemorySessions {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|session| !session.is_expired())
            .count()
    }

    async fn purge_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());

        if sessions.len() != before {
            tracing::debug!("purged {} expired sessions", before - sessions.len());
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessions {
    #[tracing::instrument(skip_all, fields(token = %session.token))]
    async fn create_session(&self, mut session: Session) -> Result<Session, Error> {
        self.purge_expired().await;

        session.touch(self.ttl);
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, Error> {
        let sessions = self.sessions.read().await;

        Ok(sessions
            .get(&token)
            .filter(|session| !session.is_expired())
            .cloned())
    }

    #[tracing::instrument(skip_all, fields(token = %session.token))]
    async fn update_session(&self, mut session: Session) -> Result<Session, Error> {
        session.touch(self.ttl);
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_session(&self, token: Uuid) -> Result<(), Error> {
        self.sessions.write().await.remove(&token);

        Ok(())
    }
}
