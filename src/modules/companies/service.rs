use sqlx::PgPool;
use stockpoint_core::AppError;
use stockpoint_db::provisioning;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::metrics;
use crate::utils::errors::provisioning_error;

use super::model::{Company, CreateCompanyDto, UserRecord};

pub struct CompanyService;

impl CompanyService {
    #[instrument(skip(db, dto), fields(company.name = %dto.name))]
    pub async fn create_company(db: &PgPool, dto: CreateCompanyDto) -> Result<Company, AppError> {
        let company = provisioning::insert_company(db, dto.name.trim())
            .await
            .map_err(provisioning_error)?;

        metrics::track_company_created();
        info!(company.id = %company.id, company.name = %company.name, "Company created");

        Ok(company)
    }

    #[instrument(skip(db))]
    pub async fn list_companies(db: &PgPool) -> Result<Vec<Company>, AppError> {
        let companies = provisioning::list_companies(db)
            .await
            .map_err(provisioning_error)?;
        debug!(count = companies.len(), "Companies fetched");
        Ok(companies)
    }

    #[instrument(skip(db), fields(company.id = %company_id))]
    pub async fn get_company(db: &PgPool, company_id: Uuid) -> Result<Company, AppError> {
        provisioning::find_company(db, company_id)
            .await
            .map_err(provisioning_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Company not found")))
    }

    #[instrument(skip(db), fields(company.id = %company_id))]
    pub async fn list_users(db: &PgPool, company_id: Uuid) -> Result<Vec<UserRecord>, AppError> {
        // Distinguish an empty company from a missing one
        Self::get_company(db, company_id).await?;

        provisioning::list_company_users(db, company_id)
            .await
            .map_err(provisioning_error)
    }
}
