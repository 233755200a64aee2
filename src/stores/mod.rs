// Storage layer - single source of truth for identity records
pub mod user_store;

pub use user_store::{NewUser, SqlUserStore, UserChanges, UserStore};
