pub mod auth;
pub mod response;

pub use auth::{require_admin, require_auth, CurrentUser};
pub use response::{ApiResponse, ApiResult};
