pub mod admin;
pub mod auth;
pub mod security_headers;

pub use admin::AdminMiddleware;
pub use auth::AuthMiddleware;
pub use security_headers::SecurityHeaders;
