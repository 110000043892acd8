use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};
use stockpoint_core::AppError;
use stockpoint_rbac::{AuthorizeError, Denial, Grant, enforcement};
use uuid::Uuid;

use crate::state::AppState;

/// Finds the identity token: the bearer header first, then the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(cookie_name).map(str::to_string))
        .filter(|token| !token.is_empty())
}

/// Turns an enforcement denial into an API error.
pub fn denial_error(denial: &Denial) -> AppError {
    match denial {
        Denial::Unauthenticated => {
            AppError::unauthorized("Missing or invalid identity token".to_string())
        }
        Denial::Forbidden => AppError::forbidden("Access denied".to_string()),
        Denial::UnknownSubject => AppError::not_found(anyhow::anyhow!("Unknown user")),
        Denial::Unavailable => {
            AppError::internal_error("Authorization service unavailable".to_string())
        }
    }
}

/// Error mapping for the authorization endpoint, which distinguishes an
/// empty token (malformed request) from a bad one.
pub fn authorize_error(err: &AuthorizeError) -> AppError {
    match err {
        AuthorizeError::MissingToken => {
            AppError::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("token must not be empty"))
        }
        AuthorizeError::InvalidToken => {
            AppError::unauthorized("Invalid or expired token".to_string())
        }
        AuthorizeError::UnknownSubject => AppError::not_found(anyhow::anyhow!("Unknown user")),
        AuthorizeError::Directory(_) => {
            AppError::internal_error("Authorization service unavailable".to_string())
        }
    }
}

/// Extractor for any caller with a resolvable identity.
///
/// Roles are resolved from the directory on every request; nothing about the
/// role is trusted from the token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Grant);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.identity().subject
    }

    pub fn role(&self) -> &str {
        &self.0.identity().role
    }

    /// The caller's company; `None` for platform users.
    pub fn company_id(&self) -> Option<Uuid> {
        self.0.identity().company_id
    }

    pub fn is_platform(&self) -> bool {
        self.0.identity().is_platform()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, &state.access_config.session_cookie);

        enforcement::admit(&state.authorizer, token.as_deref())
            .await
            .map(AuthUser)
            .map_err(|denial| denial_error(&denial))
    }
}

/// Generates an extractor that admits callers whose role holds `$permission`.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = stockpoint_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let token = $crate::middleware::auth::extract_token(
                    &parts.headers,
                    &state.access_config.session_cookie,
                );

                match stockpoint_rbac::enforcement::require_any(
                    &state.authorizer,
                    token.as_deref(),
                    &[$permission],
                )
                .await
                {
                    Ok(grant) => {
                        $crate::metrics::track_authorization_decision("authorized");
                        Ok($name($crate::middleware::auth::AuthUser(grant)))
                    }
                    Err(stockpoint_rbac::Denial::Forbidden) => {
                        $crate::metrics::track_authorization_decision("denied");
                        Err(stockpoint_core::AppError::forbidden(format!(
                            "Access denied. Missing required permission: {}",
                            $permission
                        )))
                    }
                    Err(denial) => {
                        $crate::metrics::track_authorization_decision(denial.outcome());
                        Err($crate::middleware::auth::denial_error(&denial))
                    }
                }
            }
        }
    };
}

use stockpoint_core::permissions;

require_permission!(RequireCreate, permissions::CREATE);
require_permission!(RequireRead, permissions::READ);
require_permission!(RequireUpdate, permissions::UPDATE);
require_permission!(RequireDelete, permissions::DELETE);
require_permission!(RequireCompanies, permissions::COMPANIES);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_bearer_token() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&map, "session").as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_cookie_token() {
        let map = headers(&[(header::COOKIE, "theme=dark; session=tok-1")]);
        assert_eq!(extract_token(&map, "session").as_deref(), Some("tok-1"));
        assert_eq!(extract_token(&map, "other"), None);
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "session=from-cookie"),
        ]);
        assert_eq!(extract_token(&map, "session").as_deref(), Some("from-header"));
    }

    #[test]
    fn test_no_token() {
        assert_eq!(extract_token(&HeaderMap::new(), "session"), None);
        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&map, "session"), None);
    }

    #[test]
    fn test_denial_statuses() {
        assert_eq!(
            denial_error(&Denial::Unauthenticated).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(denial_error(&Denial::Forbidden).status, StatusCode::FORBIDDEN);
        assert_eq!(
            denial_error(&Denial::UnknownSubject).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            denial_error(&Denial::Unavailable).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_authorize_error_statuses() {
        assert_eq!(
            authorize_error(&AuthorizeError::MissingToken).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            authorize_error(&AuthorizeError::InvalidToken).status,
            StatusCode::UNAUTHORIZED
        );
        let unknown = authorize_error(&AuthorizeError::UnknownSubject);
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);
        assert_eq!(unknown.message(), "Unknown user");
    }
}
