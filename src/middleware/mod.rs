pub mod auth;
pub mod gate;
pub mod response;

pub use auth::AuthUser;
pub use response::{ApiResponse, ApiResult};
