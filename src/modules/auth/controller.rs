use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use stockpoint_core::AppError;
use stockpoint_rbac::{Denial, Destination, enforcement, route_path};
use tracing::instrument;

use crate::metrics::track_authorization_decision;
use crate::middleware::auth::{AuthUser, authorize_error, extract_token};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    AuthorizeRequest, AuthorizeResponse, ErrorResponse, NavigationQuery, NavigationResponse,
    SessionResponse,
};

/// Decide whether a token's holder may perform any of the given actions
#[utoipa::path(
    post,
    path = "/api/auth/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Decision and the caller's full permission set", body = AuthorizeResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Role store unavailable", body = ErrorResponse)
    ),
    tag = "Authorization"
)]
#[instrument(skip_all)]
pub async fn authorize(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let result = match state
        .authorizer
        .authorize(&request.token, &request.permissions)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            track_authorization_decision(Denial::from(&e).outcome());
            return Err(authorize_error(&e));
        }
    };

    track_authorization_decision(if result.authorized {
        "authorized"
    } else {
        "denied"
    });

    Ok(Json(AuthorizeResponse {
        authorized: result.authorized,
        permissions: result.permissions.into_iter().collect(),
    }))
}

/// The caller's role, permissions and reachable routes
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Role store unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authorization"
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn session(auth_user: AuthUser) -> Json<SessionResponse> {
    let grant = &auth_user.0;
    let identity = grant.identity();

    Json(SessionResponse {
        subject: identity.subject.clone(),
        role: identity.role.clone(),
        company_id: identity.company_id,
        scope: identity.scope.as_str().to_string(),
        permissions: grant.permissions().iter().cloned().collect(),
        routes: grant.routes().iter().cloned().collect(),
    })
}

/// Whether the caller may navigate to a route, and where to go otherwise
#[utoipa::path(
    get,
    path = "/api/auth/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Navigation decision", body = NavigationResponse),
        (status = 400, description = "Missing or invalid path", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authorization"
)]
#[instrument(skip_all)]
pub async fn navigation(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<NavigationQuery>, QueryRejection>,
) -> Result<Json<NavigationResponse>, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let (raw_path, raw_query) = match query.path.split_once('?') {
        Some((path, rest)) => (path, Some(rest)),
        None => (query.path.as_str(), None),
    };
    let path = route_path::normalize(raw_path)
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid path: {}", e)))?;

    let access = &state.access_config;
    let token = extract_token(&headers, &access.session_cookie);

    let response =
        match enforcement::require_route(&state.authorizer, token.as_deref(), &path).await {
            Ok(_) => NavigationResponse {
                allowed: true,
                redirect: None,
            },
            Err(denial) => NavigationResponse {
                allowed: false,
                redirect: Some(match denial.destination() {
                    Destination::Login => match raw_query {
                        Some(q) => access.login_redirect(&format!("{path}?{q}")),
                        None => access.login_redirect(&path),
                    },
                    Destination::Unauthorized => access.unauthorized_path.clone(),
                }),
            },
        };

    Ok(Json(response))
}
