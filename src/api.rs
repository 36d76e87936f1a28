use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Action, Outcome};
use crate::error::Error;

#[async_trait]
pub trait WorkflowAPI {
    /// Runs the eligibility gate and the profile snapshot, then opens a
    /// session at Search, or at Confirm when `route_id` is given.
    async fn start_workflow(&self, user: User, route_id: Option<String>)
        -> Result<Outcome, Error>;

    async fn show_workflow(
        &self,
        user: User,
        token: Uuid,
        route_id: Option<String>,
    ) -> Result<Outcome, Error>;

    async fn apply_action(&self, user: User, token: Uuid, action: Action)
        -> Result<Outcome, Error>;

    async fn discard_workflow(&self, user: User, token: Uuid) -> Result<(), Error>;
}

pub trait API: WorkflowAPI {}
