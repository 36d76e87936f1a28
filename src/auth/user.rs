use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use serde::{Deserialize, Serialize};

use crate::error::{unauthorized_error, Error};

/// Set by the authenticating front end for every request it forwards.
pub const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
}

impl User {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    fn from_header(value: Option<&str>) -> Result<Self, Error> {
        value
            .map(str::trim)
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(Self::new)
            .ok_or_else(|| unauthorized_error())
    }
}

#[async_trait]
impl<B> FromRequest<B> for User
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let value = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok());

        Self::from_header(value)
    }
}

#[test]
fn parses_user_header() {
    assert_eq!(User::from_header(Some(" 42 ")).unwrap(), User::new(42));
}

#[test]
fn rejects_missing_or_anonymous_user() {
    use crate::error::UNAUTHORIZED_ERROR;

    assert_eq!(User::from_header(None).unwrap_err().code, UNAUTHORIZED_ERROR);
    assert_eq!(User::from_header(Some("0")).unwrap_err().code, UNAUTHORIZED_ERROR);
    assert_eq!(User::from_header(Some("abc")).unwrap_err().code, UNAUTHORIZED_ERROR);
}
