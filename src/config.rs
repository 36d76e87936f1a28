use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use reqwest::Url;

use crate::error::{config_error, Error};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_HOME_URL: &str = "/";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub rusa_api_base: String,
    pub waiver_url: Url,
    /// Where ineligible users are sent.
    pub home_url: String,
    pub session_ttl: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up a
    /// `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |name: &str| lookup(name).ok().filter(|v| !v.trim().is_empty());

        let listen_addr = optional("PERM_SELECT_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|_| config_error("PERM_SELECT_ADDR is not a socket address"))?;

        let max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .map_err(|_| config_error("DATABASE_MAX_CONNECTIONS is not a number"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let waiver_url = Url::parse(&lookup("WAIVER_URL")?)
            .map_err(|_| config_error("WAIVER_URL is not an absolute URL"))?;

        let session_ttl_minutes = match optional("SESSION_TTL_MINUTES") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| config_error("SESSION_TTL_MINUTES is not a number"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&session_ttl_minutes) {
            return Err(config_error(&format!(
                "SESSION_TTL_MINUTES must be between 1 and {}",
                MAX_SESSION_TTL_MINUTES
            )));
        }
        let session_ttl = Duration::minutes(session_ttl_minutes);

        Ok(Self {
            listen_addr,
            database_url: lookup("DATABASE_URL")?,
            max_connections,
            rusa_api_base: lookup("RUSA_API_BASE")?,
            waiver_url,
            home_url: optional("HOME_URL").unwrap_or_else(|| DEFAULT_HOME_URL.into()),
            session_ttl,
        })
    }
}
