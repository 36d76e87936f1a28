use axum::extract::{Extension, Json, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Action, Outcome};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct RouteParams {
    pid: Option<String>,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::View(view) => Json(view).into_response(),
            // the waiver service is a third-party site, so the target is not
            // checked against our own origin
            Outcome::Redirect { url, notice } => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, url)],
                Json(notice),
            )
                .into_response(),
        }
    }
}

pub async fn start(
    Extension(api): Extension<DynAPI>,
    user: User,
    Query(params): Query<RouteParams>,
) -> Result<Outcome, Error> {
    api.start_workflow(user, params.pid).await
}

pub async fn show(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(token): Path<Uuid>,
    Query(params): Query<RouteParams>,
) -> Result<Outcome, Error> {
    api.show_workflow(user, token, params.pid).await
}

pub async fn act(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(token): Path<Uuid>,
    Json(action): Json<Action>,
) -> Result<Outcome, Error> {
    api.apply_action(user, token, action).await
}

pub async fn discard(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(token): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.discard_workflow(user, token).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[test]
fn redirect_outcome_is_see_other_with_location() {
    use crate::entities::Notice;

    let response = Outcome::Redirect {
        url: "https://waiver.example.com/web/?wautofill_tag=12345%3AR77".into(),
        notice: Some(Notice::warning("heads up")),
    }
    .into_response();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://waiver.example.com/web/?wautofill_tag=12345%3AR77"
    );
}

#[test]
fn view_outcome_is_json() {
    use crate::entities::{Body, View};

    let response = Outcome::View(View {
        token: Uuid::nil(),
        notices: vec![],
        body: Body::Select {
            routes: vec![],
            pending_route_id: None,
        },
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}
