pub mod auth_service;
pub mod password_hasher;
pub mod token_service;
pub mod user_service;
pub mod validation;

pub use auth_service::AuthService;
pub use password_hasher::PasswordHasher;
pub use token_service::TokenService;
pub use user_service::UserService;
