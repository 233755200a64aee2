// Database entities (sea-orm)
pub mod user;
