pub use stockpoint_models::authorization::{
    AuthorizeRequest, AuthorizeResponse, ErrorResponse, NavigationQuery, NavigationResponse,
    SessionResponse,
};
