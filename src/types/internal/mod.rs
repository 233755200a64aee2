// Internal types - never serialized to API responses directly
pub mod auth;
