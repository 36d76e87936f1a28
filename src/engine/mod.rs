mod helpers;
mod workflow_api;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use crate::{
    api::API, config::Config, db::MemberDirectory, external::RouteGateway,
    sessions::SessionStore,
};

type DynDirectory = Arc<dyn MemberDirectory + Send + Sync>;
type DynGateway = Arc<dyn RouteGateway + Send + Sync>;
type DynSessions = Arc<dyn SessionStore + Send + Sync>;

/// Hosts route selection workflows. Holds no per-user state of its own; all
/// of it lives in the session store.
pub struct Engine {
    config: Config,
    directory: DynDirectory,
    routes: DynGateway,
    sessions: DynSessions,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new<D, G, S>(config: Config, directory: D, routes: G, sessions: S) -> Self
    where
        D: MemberDirectory + Send + Sync + 'static,
        G: RouteGateway + Send + Sync + 'static,
        S: SessionStore + Send + Sync + 'static,
    {
        Self {
            config,
            directory: Arc::new(directory),
            routes: Arc::new(routes),
            sessions: Arc::new(sessions),
        }
    }
}

impl API for Engine {}
