use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::WorkflowAPI,
    auth::User,
    entities::{Action, Outcome, Session, WaiverContext, Workflow},
    error::Error,
};

#[async_trait]
impl WorkflowAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn start_workflow(
        &self,
        user: User,
        route_id: Option<String>,
    ) -> Result<Outcome, Error> {
        if let Some(redirect) = self.check_eligibility(&user).await? {
            return Ok(redirect);
        }

        let profile = self.snapshot_profile(&user).await?;
        let workflow = Workflow::start(route_id);

        tracing::info!(uid = user.id, step = %workflow.name(), "starting route selection");

        let session = self
            .sessions
            .create_session(Session::new(profile, workflow, self.config.session_ttl))
            .await?;
        let token = session.token;

        // the caller never sees the token of a start that failed
        match self.render(session, vec![]).await {
            Err(err) => {
                self.sessions.remove_session(token).await?;
                Err(err)
            }
            outcome => outcome,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn show_workflow(
        &self,
        user: User,
        token: Uuid,
        route_id: Option<String>,
    ) -> Result<Outcome, Error> {
        let session = self.load_session(&user, token).await?;

        match route_id {
            Some(route_id) => self.transition(session, Action::Enter { route_id }).await,
            None => self.render(session, vec![]).await,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn apply_action(
        &self,
        user: User,
        token: Uuid,
        action: Action,
    ) -> Result<Outcome, Error> {
        let session = self.load_session(&user, token).await?;

        self.transition(session, action).await
    }

    #[tracing::instrument(skip(self))]
    async fn discard_workflow(&self, user: User, token: Uuid) -> Result<(), Error> {
        self.load_session(&user, token).await?;

        self.sessions.remove_session(token).await
    }
}

impl Engine {
    async fn transition(&self, mut session: Session, action: Action) -> Result<Outcome, Error> {
        // the route shown at confirm may have been retired since, or never rendered
        let unavailable = match (&session.workflow, &action) {
            (Workflow::Confirm { route_id, .. }, Action::Submit) => {
                self.available_route(route_id).await?.is_none()
            }
            _ => false,
        };

        let transition = match unavailable {
            true => session.workflow.route_unavailable(),
            false => session.workflow.apply(
                action,
                &WaiverContext {
                    profile: &session.profile,
                    base: &self.config.waiver_url,
                },
            )?,
        };

        session.workflow = transition.workflow.clone();

        // stored before any lookup so a failed query leaves the new step in place
        let session = self.sessions.update_session(session).await?;

        if let Some(url) = transition.redirect() {
            return Ok(Outcome::Redirect {
                url: url.to_string(),
                notice: None,
            });
        }

        self.render(session, transition.notices()).await
    }
}
