mod profile;
mod route;
mod session;
mod view;
pub(crate) mod waiver;
mod workflow;

pub use profile::{normalize_birthdate, ProfileRecord, UserProfile};
pub use route::{DistanceBand, RouteFilter, RouteRecord, RouteSummary, StateOption};
pub use session::Session;
pub use view::{Body, Outcome, View};
pub use waiver::{build_waiver_url, waiver_tag};
pub use workflow::{Action, Effect, Level, Notice, Transition, WaiverContext, Workflow};

#[cfg(test)]
pub(crate) use route::record;
