use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::rate_limit::{authorize_limiter, general_limiter};
use crate::middleware::route_gate::route_gate;
use crate::modules::auth::init_auth_router;
use crate::modules::companies::init_companies_router;
use crate::modules::health::init_health_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    let mut auth_router = init_auth_router();
    if let Some(limiter) = authorize_limiter(&state.rate_limit_config) {
        auth_router = auth_router.layer(limiter);
    }

    let mut admin_router = Router::new()
        .nest("/companies", init_companies_router())
        .nest("/users", init_users_router());
    if let Some(limiter) = general_limiter(&state.rate_limit_config) {
        admin_router = admin_router.layer(limiter);
    }

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api", Router::new().nest("/auth", auth_router).merge(admin_router))
        .fallback_service(ServeDir::new(&state.access_config.pages_dir))
        .layer(middleware::from_fn_with_state(state.clone(), route_gate))
        .with_state(state.clone())
        .layer({
            let cors_config = state.cors_config.clone();
            let allowed_origins = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                origin
                    .to_str()
                    .is_ok_and(|origin| cors_config.allows(origin))
            });

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
