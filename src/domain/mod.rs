mod api_response;
mod credentials;
mod user;
mod username;

pub use api_response::{ApiResponse, EmptyResponse, ErrorKey};
pub use credentials::{BearerToken, Credentials, PasswordResetToken, Registration};
pub use user::{CurrentUser, RoleName, UserId};
pub use username::unique_username;
