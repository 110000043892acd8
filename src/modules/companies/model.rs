pub use stockpoint_models::companies::{Company, CreateCompanyDto};
pub use stockpoint_models::users::UserRecord;
