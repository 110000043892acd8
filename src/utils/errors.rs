use anyhow::anyhow;
use stockpoint_core::AppError;
use stockpoint_db::ProvisioningError;

pub fn provisioning_error(err: ProvisioningError) -> AppError {
    match err {
        ProvisioningError::Conflict(message) => AppError::conflict(anyhow!(message)),
        ProvisioningError::NotFound(message) => AppError::not_found(anyhow!(message)),
        ProvisioningError::Database(e) => {
            tracing::error!(error = %e, "Database error");
            AppError::internal_error("Database error".to_string())
        }
    }
}
