//! Bodies of the authorization, session and navigation endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /api/auth/authorize`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorizeRequest {
    /// Identity token issued by the identity provider
    #[validate(length(min = 1, message = "token must not be empty"))]
    pub token: String,
    /// Required actions; the caller is authorized if any one is permitted
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorizeResponse {
    pub authorized: bool,
    /// Full permission set of the caller's role, sorted
    pub permissions: Vec<String>,
}

/// What the UI needs to decide which screens and controls to render.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub subject: String,
    pub role: String,
    pub company_id: Option<Uuid>,
    /// `platform` or `tenant`
    pub scope: String,
    pub permissions: Vec<String>,
    /// Route prefixes the role may navigate to
    pub routes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Route the UI is about to navigate to
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NavigationResponse {
    pub allowed: bool,
    /// Where to send the user instead when `allowed` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
