// DTO layer - poem-openapi request/response objects
pub mod auth;
pub mod common;
pub mod user;
