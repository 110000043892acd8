//! Edge interception for page routes.
//!
//! Any request whose path falls under some role's route prefix must come from
//! a caller whose own role reaches it. Everything else (API, docs, health,
//! login pages, static assets outside the prefixes) passes through untouched.
//!
//! Prefixes are matched against the normalized path, the same one the file
//! server resolves, so escapes and doubled slashes cannot sidestep the gate.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use stockpoint_rbac::{Destination, enforcement, route_path};

use crate::metrics::track_route_gate;
use crate::middleware::auth::extract_token;
use crate::state::AppState;

pub async fn route_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let access = &state.access_config;

    let path = match route_path::normalize(req.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            track_route_gate("malformed");
            tracing::debug!(path = %req.uri().path(), error = %e, "Page request rejected");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if path == access.login_path
        || path == access.unauthorized_path
        || !state.authorizer.policy().covers(&path)
    {
        return next.run(req).await;
    }

    let token = extract_token(req.headers(), &access.session_cookie);

    match enforcement::require_route(&state.authorizer, token.as_deref(), &path).await {
        Ok(grant) => {
            track_route_gate("allowed");
            req.extensions_mut().insert(grant);
            next.run(req).await
        }
        Err(denial) => {
            track_route_gate(denial.outcome());
            tracing::debug!(path = %path, outcome = denial.outcome(), "Page request redirected");

            let location = match denial.destination() {
                Destination::Login => {
                    let target = match req.uri().query() {
                        Some(query) => format!("{path}?{query}"),
                        None => path,
                    };
                    access.login_redirect(&target)
                }
                Destination::Unauthorized => access.unauthorized_path.clone(),
            };
            Redirect::to(&location).into_response()
        }
    }
}
