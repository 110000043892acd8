use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{delete_user, get_user, provision_user, update_user_role};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(provision_user))
        .route("/{subject_id}", get(get_user).delete(delete_user))
        .route("/{subject_id}/role", put(update_user_role))
}
