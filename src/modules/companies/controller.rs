use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use stockpoint_core::AppError;
use uuid::Uuid;

use crate::middleware::auth::{RequireCompanies, RequireRead};
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::utils::tenancy::verify_company_access;
use crate::validator::ValidatedJson;

use super::model::{Company, CreateCompanyDto, UserRecord};
use super::service::CompanyService;

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyDto,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires the companies permission", body = ErrorResponse),
        (status = 409, description = "Company name already exists", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn create_company(
    State(state): State<AppState>,
    RequireCompanies(_auth_user): RequireCompanies,
    ValidatedJson(dto): ValidatedJson<CreateCompanyDto>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let company = CompanyService::create_company(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "All companies", body = Vec<Company>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - requires the companies permission", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn list_companies(
    State(state): State<AppState>,
    RequireCompanies(_auth_user): RequireCompanies,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = CompanyService::list_companies(&state.db).await?;
    Ok(Json(companies))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company", body = Company),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn get_company(
    State(state): State<AppState>,
    RequireRead(auth_user): RequireRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    verify_company_access(&auth_user, id)?;
    let company = CompanyService::get_company(&state.db, id).await?;
    Ok(Json(company))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/users",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Users of the company", body = Vec<UserRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    tag = "Companies",
    security(("bearer_auth" = []))
)]
pub async fn list_company_users(
    State(state): State<AppState>,
    RequireRead(auth_user): RequireRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    verify_company_access(&auth_user, id)?;
    let users = CompanyService::list_users(&state.db, id).await?;
    Ok(Json(users))
}
