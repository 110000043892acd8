use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use stockpoint_core::AppError;

use crate::middleware::auth::{RequireCreate, RequireDelete, RequireRead, RequireUpdate};
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{ProvisionUserDto, UpdateRoleDto, UserRecord};
use super::service::UserService;

/// Provision a user
///
/// `developer` accounts belong to no company and can only be provisioned by
/// platform users. Every other role needs a company: platform callers pass
/// `company_id`, company callers always provision into their own.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = ProvisionUserDto,
    responses(
        (status = 201, description = "User provisioned", body = UserRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn provision_user(
    State(state): State<AppState>,
    RequireCreate(auth_user): RequireCreate,
    ValidatedJson(dto): ValidatedJson<ProvisionUserDto>,
) -> Result<(StatusCode, Json<UserRecord>), AppError> {
    let user = UserService::provision_user(&state.db, &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{subject_id}",
    params(
        ("subject_id" = String, Path, description = "Subject identifier")
    ),
    responses(
        (status = 200, description = "User", body = UserRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    RequireRead(auth_user): RequireRead,
    Path(subject_id): Path<String>,
) -> Result<Json<UserRecord>, AppError> {
    let user = UserService::get_user(&state.db, &auth_user, &subject_id).await?;
    Ok(Json(user))
}

/// Change a user's role
///
/// Takes effect on the user's next request.
#[utoipa::path(
    put,
    path = "/api/users/{subject_id}/role",
    params(
        ("subject_id" = String, Path, description = "Subject identifier")
    ),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = UserRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireUpdate(auth_user): RequireUpdate,
    Path(subject_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<Json<UserRecord>, AppError> {
    let user = UserService::update_role(&state.db, &auth_user, &subject_id, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{subject_id}",
    params(
        ("subject_id" = String, Path, description = "Subject identifier")
    ),
    responses(
        (status = 204, description = "User deprovisioned"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireDelete(auth_user): RequireDelete,
    Path(subject_id): Path<String>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, &auth_user, &subject_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
