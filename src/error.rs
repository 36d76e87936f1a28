use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

pub const ENV_VAR_ERROR: i32 = 1;
pub const DATABASE_ERROR: i32 = 2;
pub const REQWEST_ERROR: i32 = 3;
pub const UPSTREAM_ERROR: i32 = 4;
pub const UNEXPECTED_ERROR: i32 = 5;
pub const CONFIG_ERROR: i32 = 6;

pub const INVALID_STATE_ERROR: i32 = 100;
pub const INVALID_INPUT_ERROR: i32 = 101;
pub const INVALID_INVOCATION_ERROR: i32 = 102;
pub const UNAUTHORIZED_ERROR: i32 = 103;
pub const NOT_ELIGIBLE_ERROR: i32 = 104;
pub const PROFILE_INCOMPLETE_ERROR: i32 = 105;
pub const ROUTE_NOT_FOUND_ERROR: i32 = 106;
pub const USER_NOT_FOUND_ERROR: i32 = 107;
pub const SESSION_NOT_FOUND_ERROR: i32 = 108;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self.code {
            UPSTREAM_ERROR => StatusCode::BAD_GATEWAY,
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            UNAUTHORIZED_ERROR => StatusCode::UNAUTHORIZED,
            NOT_ELIGIBLE_ERROR => StatusCode::FORBIDDEN,
            PROFILE_INCOMPLETE_ERROR => StatusCode::UNPROCESSABLE_ENTITY,
            ROUTE_NOT_FOUND_ERROR | USER_NOT_FOUND_ERROR | SESSION_NOT_FOUND_ERROR => {
                StatusCode::NOT_FOUND
            }
            INVALID_INVOCATION_ERROR => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Upstream failures are worth retrying by the user; everything else is not.
    pub fn is_retryable(&self) -> bool {
        self.code == UPSTREAM_ERROR
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => self.message.as_str(),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: INVALID_STATE_ERROR,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: INVALID_INPUT_ERROR,
        message: "invalid input".into(),
    }
}

pub fn invalid_invocation_error() -> Error {
    Error {
        code: INVALID_INVOCATION_ERROR,
        message: "action not allowed at this step".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: UNAUTHORIZED_ERROR,
        message: "unauthorized".into(),
    }
}

pub fn not_eligible_error() -> Error {
    Error {
        code: NOT_ELIGIBLE_ERROR,
        message: "you must be registered for the permanents program to ride a permanent".into(),
    }
}

pub fn profile_incomplete_error(field: &str) -> Error {
    Error {
        code: PROFILE_INCOMPLETE_ERROR,
        message: format!("your member profile is missing a {}", field),
    }
}

pub fn route_not_found_error() -> Error {
    Error {
        code: ROUTE_NOT_FOUND_ERROR,
        message: "the selected route is no longer available".into(),
    }
}

pub fn user_not_found_error() -> Error {
    Error {
        code: USER_NOT_FOUND_ERROR,
        message: "user not found".into(),
    }
}

pub fn session_not_found_error() -> Error {
    Error {
        code: SESSION_NOT_FOUND_ERROR,
        message: "route selection has expired, please start again".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: ENV_VAR_ERROR,
        message: "environment variable error".into(),
    }
}

pub fn config_error(message: &str) -> Error {
    Error {
        code: CONFIG_ERROR,
        message: format!("configuration error: {}", message),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!("database error: {:?}", err);

    Error {
        code: DATABASE_ERROR,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!("reqwest error: {}", err);

    Error {
        code: REQWEST_ERROR,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: UPSTREAM_ERROR,
        message: "the route service is unavailable, please try again".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: UNEXPECTED_ERROR,
        message: "unexpected error".into(),
    }
}

#[test]
fn internal_errors_hide_their_message() {
    let response = database_error("boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn upstream_errors_are_retryable_bad_gateway() {
    let err = upstream_error();
    assert!(err.is_retryable());
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert!(!route_not_found_error().is_retryable());
}

#[test]
fn client_errors_map_to_specific_statuses() {
    assert_eq!(not_eligible_error().status(), StatusCode::FORBIDDEN);
    assert_eq!(
        profile_incomplete_error("first name").status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(route_not_found_error().status(), StatusCode::NOT_FOUND);
    assert_eq!(invalid_input_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(invalid_invocation_error().status(), StatusCode::CONFLICT);
}
