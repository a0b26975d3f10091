pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SeaOrmStore;

pub const CART_KEY: &str = "cart";
pub const TOKEN_KEY: &str = "userToken";
pub const REMEMBERED_USERNAME_KEY: &str = "rememberedUsername";

/// Keyed string storage for session state that must survive restarts.
///
/// Writes are last-write-wins; there is no locking across processes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
