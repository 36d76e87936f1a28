use super::Engine;

use uuid::Uuid;

use crate::{
    auth::User,
    entities::{
        Body, DistanceBand, Notice, Outcome, RouteSummary, Session, UserProfile, View, Workflow,
    },
    error::{
        invalid_state_error, not_eligible_error, session_not_found_error, unauthorized_error,
        Error,
    },
};

impl Engine {
    /// Registration gate. Runs once, before anything else is built.
    #[tracing::instrument(skip(self))]
    pub(super) async fn check_eligibility(&self, user: &User) -> Result<Option<Outcome>, Error> {
        if self.directory.is_registered(user.id).await? {
            return Ok(None);
        }

        tracing::warn!(uid = user.id, "user is not registered for the permanents program");

        Ok(Some(Outcome::Redirect {
            url: self.config.home_url.clone(),
            notice: Some(Notice::warning(not_eligible_error().message)),
        }))
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn snapshot_profile(&self, user: &User) -> Result<UserProfile, Error> {
        let record = self.directory.find_profile(user.id).await?;

        UserProfile::try_from(record).map_err(|err| {
            tracing::warn!(uid = user.id, "{}", err.message);
            err
        })
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn load_session(&self, user: &User, token: Uuid) -> Result<Session, Error> {
        let session = self
            .sessions
            .find_session(token)
            .await?
            .ok_or_else(|| session_not_found_error())?;

        if session.user_id != user.id {
            tracing::warn!(uid = user.id, "session belongs to another user");
            return Err(unauthorized_error());
        }

        Ok(session)
    }

    /// Fresh copy of a route the user may still confirm. Retired and Super
    /// Randonnée routes count as unavailable.
    pub(super) async fn available_route(
        &self,
        route_id: &str,
    ) -> Result<Option<RouteSummary>, Error> {
        match self.routes.find_route(route_id).await? {
            Some(record) if record.active && !record.sr => Ok(Some(record.into())),
            _ => {
                tracing::info!(route_id = %route_id, "route is no longer available");
                Ok(None)
            }
        }
    }

    /// Builds the view for the session's current step, running whatever
    /// lookups the step needs, and stores the session afterwards.
    #[tracing::instrument(skip_all, fields(token = %session.token, step = %session.workflow.name()))]
    pub(super) async fn render(
        &self,
        mut session: Session,
        mut notices: Vec<Notice>,
    ) -> Result<Outcome, Error> {
        // the confirm step always shows a fresh copy of the route
        let mut confirmed: Option<RouteSummary> = None;
        if let Workflow::Confirm { route_id, .. } = session.workflow.clone() {
            confirmed = self.available_route(&route_id).await?;
            if confirmed.is_none() {
                let transition = session.workflow.route_unavailable();
                notices.extend(transition.notices());
                session.workflow = transition.workflow;
            }
        }

        let body = match session.workflow.clone() {
            Workflow::Search => Body::Search {
                states: self.routes.find_states().await?,
                distance_bands: DistanceBand::BANDS.iter().map(|band| u32::from(*band)).collect(),
            },
            Workflow::Select {
                filter,
                routes,
                pending_route_id,
            } => {
                let routes = match routes {
                    Some(routes) => routes,
                    None => {
                        let records = self.routes.find_routes(filter.gateway_key()).await?;
                        let found = filter.apply(records);
                        tracing::info!("{} routes match the filter", found.len());

                        session.workflow = session.workflow.with_routes(found.clone());
                        found
                    }
                };

                Body::Select {
                    routes,
                    pending_route_id,
                }
            }
            Workflow::Confirm { filter, .. } => match confirmed {
                Some(route) => Body::Confirm {
                    route,
                    can_go_back: filter.is_some(),
                },
                None => return Err(invalid_state_error()),
            },
            Workflow::Completed { redirect, .. } => {
                return Ok(Outcome::Redirect {
                    url: redirect,
                    notice: None,
                });
            }
        };

        let session = self.sessions.update_session(session).await?;

        Ok(Outcome::View(View {
            token: session.token,
            notices,
            body,
        }))
    }
}
