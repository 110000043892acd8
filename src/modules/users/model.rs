pub use stockpoint_models::roles::Role;
pub use stockpoint_models::users::{ProvisionUserDto, UpdateRoleDto, UserRecord};
