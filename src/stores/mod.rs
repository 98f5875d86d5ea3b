// Stores layer - Data access and repository pattern
pub mod business_store;
pub mod catalog_store;
pub mod credential_store;

pub use business_store::BusinessStore;
pub use catalog_store::{CatalogEntry, CatalogStore};
pub use credential_store::{CredentialStore, NewUserRecord};
