use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Notice, RouteSummary, StateOption};

/// What the presentation layer renders for the current step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub token: Uuid,
    pub notices: Vec<Notice>,
    #[serde(flatten)]
    pub body: Body,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Body {
    Search {
        states: Vec<StateOption>,
        distance_bands: Vec<u32>,
    },
    Select {
        routes: Vec<RouteSummary>,
        pending_route_id: Option<String>,
    },
    Confirm {
        route: RouteSummary,
        can_go_back: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    View(View),
    Redirect { url: String, notice: Option<Notice> },
}

impl Outcome {
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::Redirect { url, .. } => Some(url.as_str()),
            Self::View(_) => None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Self::View(view) => Some(view),
            Self::Redirect { .. } => None,
        }
    }
}
