use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    entities::{RouteRecord, StateOption},
    error::{invalid_input_error, upstream_error, Error},
};

/// Requests that take longer than this are treated as an upstream failure.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Permanent route data. Queries take at most one equality key.
#[async_trait]
pub trait RouteGateway {
    async fn find_routes(&self, key: Option<(&'static str, String)>)
        -> Result<Vec<RouteRecord>, Error>;
    async fn find_route(&self, id: &str) -> Result<Option<RouteRecord>, Error>;
    async fn find_states(&self) -> Result<Vec<StateOption>, Error>;
}

/// Client for the RUSA data API.
#[derive(Clone)]
pub struct RusaClient {
    client: Client,
    api_base: String,
}

impl RusaClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, path: &str, key: Option<(&str, &str)>) -> Result<Response, Error> {
        let url = format!("{}/{}", self.api_base, path);

        let mut request = self.client.get(url);
        if let Some((key, value)) = key {
            request = request.query(&[("key", key)]).query(&[("val", value)]);
        }

        request.send().await.map_err(|err| {
            tracing::warn!("route gateway unreachable: {}", err);
            upstream_error()
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        key: Option<(&str, &str)>,
    ) -> Result<T, Error> {
        let res = check_status(self.send(path, key).await?)?;

        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, Error> {
    res.json().await.map_err(|err| {
        tracing::warn!("route gateway returned malformed data: {}", err);
        upstream_error()
    })
}

fn check_status(res: Response) -> Result<Response, Error> {
    let status_code = res.status().as_u16();

    if (400..500).contains(&status_code) {
        tracing::warn!(status_code, "route gateway rejected the request");
        return Err(invalid_input_error());
    } else if status_code != 200 {
        tracing::warn!(status_code, "route gateway failed");
        return Err(upstream_error());
    }

    Ok(res)
}

#[async_trait]
impl RouteGateway for RusaClient {
    #[tracing::instrument(skip(self))]
    async fn find_routes(
        &self,
        key: Option<(&'static str, String)>,
    ) -> Result<Vec<RouteRecord>, Error> {
        let key = key.as_ref().map(|(k, v)| (*k, v.as_str()));
        let records: Vec<RouteRecord> = self.get("perms", key).await?;

        tracing::info!("fetched {} routes", records.len());

        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn find_route(&self, id: &str) -> Result<Option<RouteRecord>, Error> {
        let res = self.send("perms", Some(("pid", id))).await?;

        // an unknown pid is reported as 404 rather than an empty list
        if res.status() == StatusCode::NOT_FOUND {
            tracing::info!("route gateway has no route {}", id);
            return Ok(None);
        }

        let records: Vec<RouteRecord> = decode(check_status(res)?).await?;

        Ok(records.into_iter().find(|record| record.pid == id))
    }

    #[tracing::instrument(skip(self))]
    async fn find_states(&self) -> Result<Vec<StateOption>, Error> {
        self.get("states", None).await
    }
}
