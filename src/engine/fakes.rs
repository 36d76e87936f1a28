use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Url;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Engine;
use crate::{
    config::Config,
    db::MemberDirectory,
    entities::{ProfileRecord, RouteRecord, Session, StateOption, Workflow},
    error::{upstream_error, user_not_found_error, Error},
    external::RouteGateway,
    sessions::{MemorySessions, SessionStore},
};

pub struct FakeDirectory {
    pub registered: bool,
    pub record: ProfileRecord,
}

impl FakeDirectory {
    pub fn registered() -> Self {
        Self {
            registered: true,
            record: ProfileRecord {
                uid: 42,
                display_name: Some("jrider".into()),
                first_name: Some("Jo".into()),
                last_name: Some("Rider".into()),
                birthdate: Some("1970-04-01".into()),
                member_id: Some("12345".into()),
            },
        }
    }

    pub fn unregistered() -> Self {
        Self {
            registered: false,
            ..Self::registered()
        }
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn is_registered(&self, _uid: i64) -> Result<bool, Error> {
        Ok(self.registered)
    }

    async fn find_profile(&self, uid: i64) -> Result<ProfileRecord, Error> {
        if uid != self.record.uid {
            return Err(user_not_found_error());
        }

        Ok(self.record.clone())
    }
}

#[derive(Clone)]
pub struct FakeGateway {
    records: Arc<Mutex<Vec<RouteRecord>>>,
    failing: Arc<AtomicBool>,
    queries: Arc<Mutex<Vec<Option<(&'static str, String)>>>>,
}

impl FakeGateway {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            failing: Arc::new(AtomicBool::new(false)),
            queries: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Marks a route inactive, as the gateway reports retired routes.
    pub async fn retire(&self, pid: &str) {
        for record in self.records.lock().await.iter_mut() {
            if record.pid == pid {
                record.active = false;
            }
        }
    }

    pub async fn queries(&self) -> Vec<Option<(&'static str, String)>> {
        self.queries.lock().await.clone()
    }

    fn check(&self) -> Result<(), Error> {
        match self.failing.load(Ordering::SeqCst) {
            true => Err(upstream_error()),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl RouteGateway for FakeGateway {
    async fn find_routes(
        &self,
        key: Option<(&'static str, String)>,
    ) -> Result<Vec<RouteRecord>, Error> {
        self.check()?;
        self.queries.lock().await.push(key.clone());

        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| match &key {
                Some(("startstate", state)) => &record.startstate == state,
                Some(_) => false,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn find_route(&self, id: &str) -> Result<Option<RouteRecord>, Error> {
        self.check()?;

        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.pid == id)
            .cloned())
    }

    async fn find_states(&self) -> Result<Vec<StateOption>, Error> {
        self.check()?;

        Ok(vec![
            StateOption {
                code: "CA".into(),
                name: "California".into(),
            },
            StateOption {
                code: "OR".into(),
                name: "Oregon".into(),
            },
        ])
    }
}

/// Session store the test keeps a handle to.
#[derive(Clone)]
pub struct SharedSessions(Arc<MemorySessions>);

impl SharedSessions {
    pub async fn len(&self) -> usize {
        self.0.len().await
    }

    pub async fn workflow(&self, token: Uuid) -> Option<Workflow> {
        self.0
            .find_session(token)
            .await
            .ok()
            .flatten()
            .map(|session| session.workflow)
    }
}

#[async_trait]
impl SessionStore for SharedSessions {
    async fn create_session(&self, session: Session) -> Result<Session, Error> {
        self.0.create_session(session).await
    }

    async fn find_session(&self, token: Uuid) -> Result<Option<Session>, Error> {
        self.0.find_session(token).await
    }

    async fn update_session(&self, session: Session) -> Result<Session, Error> {
        self.0.update_session(session).await
    }

    async fn remove_session(&self, token: Uuid) -> Result<(), Error> {
        self.0.remove_session(token).await
    }
}

pub fn config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgresql://unused".into(),
        max_connections: 1,
        rusa_api_base: "http://unused".into(),
        waiver_url: Url::parse("https://waiver.example.com/w/abc/web/").unwrap(),
        home_url: "/home".into(),
        session_ttl: Duration::minutes(30),
    }
}

pub fn engine(directory: FakeDirectory, gateway: FakeGateway) -> (Engine, SharedSessions) {
    let sessions = SharedSessions(Arc::new(MemorySessions::new(Duration::minutes(30))));

    (
        Engine::new(config(), directory, gateway, sessions.clone()),
        sessions,
    )
}
