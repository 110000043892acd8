use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    AuthorizeRequest, AuthorizeResponse, ErrorResponse, NavigationResponse, SessionResponse,
};
use crate::modules::companies::model::{Company, CreateCompanyDto};
use crate::modules::health::controller::HealthResponse;
use crate::modules::users::model::{ProvisionUserDto, Role, UpdateRoleDto, UserRecord};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health,
        crate::modules::auth::controller::authorize,
        crate::modules::auth::controller::session,
        crate::modules::auth::controller::navigation,
        crate::modules::companies::controller::create_company,
        crate::modules::companies::controller::list_companies,
        crate::modules::companies::controller::get_company,
        crate::modules::companies::controller::list_company_users,
        crate::modules::users::controller::provision_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user_role,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            HealthResponse,
            AuthorizeRequest,
            AuthorizeResponse,
            SessionResponse,
            NavigationResponse,
            ErrorResponse,
            Company,
            CreateCompanyDto,
            Role,
            UserRecord,
            ProvisionUserDto,
            UpdateRoleDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authorization", description = "Permission checks, session and navigation"),
        (name = "Companies", description = "Tenant management"),
        (name = "Users", description = "User provisioning and role changes"),
        (name = "Health", description = "Liveness")
    ),
    info(
        title = "Stockpoint Access API",
        version = "0.1.0",
        description = "Role-based access control for the Stockpoint inventory and point-of-sale platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
