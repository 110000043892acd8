use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{authorize, navigation, session};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/authorize", post(authorize))
        .route("/session", get(session))
        .route("/navigation", get(navigation))
}
