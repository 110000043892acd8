use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_company, get_company, list_companies, list_company_users};

pub fn init_companies_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/{id}", get(get_company))
        .route("/{id}/users", get(list_company_users))
}
