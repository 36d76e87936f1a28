use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::entities::{build_waiver_url, DistanceBand, RouteFilter, RouteSummary, UserProfile};
use crate::error::{
    invalid_input_error, invalid_invocation_error, route_not_found_error, Error,
};

/// Route selection steps. The value is replaced, never mutated, on every
/// transition and lives in the session between requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Workflow {
    Search,
    Select {
        filter: RouteFilter,
        /// Filled in by the engine once the query has run.
        routes: Option<Vec<RouteSummary>>,
        pending_route_id: Option<String>,
    },
    Confirm {
        route_id: String,
        /// Present when the route was picked from a result list.
        filter: Option<RouteFilter>,
    },
    Completed {
        route_id: String,
        redirect: String,
    },
}

/// What the presentation layer sends back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Search {
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        distance: DistanceBand,
        #[serde(default)]
        name: Option<String>,
    },
    Choose {
        route_id: String,
    },
    Submit,
    Back,
    Cancel,
    /// A route id arriving as a request parameter.
    Enter {
        route_id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Status,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Redirect(String),
    Notice(Notice),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub workflow: Workflow,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(workflow: Workflow) -> Self {
        Self {
            workflow,
            effects: vec![],
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn redirect(&self) -> Option<&str> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Redirect(url) => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Everything the terminal transition needs to build the waiver link.
pub struct WaiverContext<'a> {
    pub profile: &'a UserProfile,
    pub base: &'a Url,
}

impl Workflow {
    pub fn start(route_id: Option<String>) -> Self {
        match route_id.filter(|id| !id.trim().is_empty()) {
            Some(route_id) => Self::Confirm {
                route_id: route_id.trim().to_string(),
                filter: None,
            },
            None => Self::Search,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Search => "search".into(),
            Self::Select { .. } => "select".into(),
            Self::Confirm { .. } => "confirm".into(),
            Self::Completed { .. } => "completed".into(),
        }
    }

    #[tracing::instrument(skip(self, waiver), fields(step = %self.name()))]
    pub fn apply(&self, action: Action, waiver: &WaiverContext) -> Result<Transition, Error> {
        match (self, action) {
            (_, Action::Enter { route_id }) => {
                let route_id = route_id.trim();
                if route_id.is_empty() {
                    return Err(invalid_input_error());
                }

                Ok(Transition::to(Self::Confirm {
                    route_id: route_id.to_string(),
                    filter: None,
                }))
            }

            (
                Self::Search,
                Action::Search {
                    state,
                    distance,
                    name,
                },
            ) => Ok(Transition::to(Self::Select {
                filter: RouteFilter::new(state, distance, name),
                routes: None,
                pending_route_id: None,
            })),

            (Self::Select { filter, routes, .. }, Action::Choose { route_id }) => {
                let listed = match routes {
                    Some(routes) => routes.iter().any(|route| route.id == route_id),
                    None => !route_id.trim().is_empty(),
                };
                if !listed {
                    return Err(invalid_input_error());
                }

                Ok(Transition::to(Self::Confirm {
                    route_id,
                    filter: Some(filter.clone()),
                }))
            }

            (
                Self::Select {
                    filter,
                    pending_route_id: Some(route_id),
                    ..
                },
                Action::Submit,
            ) => Ok(Transition::to(Self::Confirm {
                route_id: route_id.clone(),
                filter: Some(filter.clone()),
            })),

            (
                Self::Confirm {
                    route_id,
                    filter: Some(filter),
                },
                Action::Back,
            ) => Ok(Transition::to(Self::Select {
                filter: filter.clone(),
                routes: None,
                pending_route_id: Some(route_id.clone()),
            })),

            (Self::Search | Self::Select { .. } | Self::Confirm { .. }, Action::Cancel) => {
                Ok(Transition::to(Self::Search))
            }

            (Self::Confirm { route_id, .. }, Action::Submit) => {
                let redirect = build_waiver_url(waiver.base, waiver.profile, route_id).to_string();

                tracing::info!(route_id = %route_id, "route confirmed, redirecting to waiver");

                Ok(Transition::to(Self::Completed {
                    route_id: route_id.clone(),
                    redirect: redirect.clone(),
                })
                .with(Effect::Redirect(redirect)))
            }

            // a repeated submit gets the redirect that was already issued
            (Self::Completed { redirect, .. }, Action::Submit) => {
                tracing::info!("repeated submit on a completed workflow");

                Ok(Transition::to(self.clone()).with(Effect::Redirect(redirect.clone())))
            }

            (_, action) => {
                tracing::info!(?action, "action not allowed at this step");
                Err(invalid_invocation_error())
            }
        }
    }

    /// The confirm step could not resolve its route any more.
    pub fn route_unavailable(&self) -> Transition {
        Transition::to(Self::Search).with(Effect::Notice(Notice::warning(
            route_not_found_error().message,
        )))
    }

    pub fn with_routes(self, found: Vec<RouteSummary>) -> Self {
        match self {
            Self::Select {
                filter,
                pending_route_id,
                ..
            } => Self::Select {
                filter,
                routes: Some(found),
                pending_route_id,
            },
            other => other,
        }
    }
}
