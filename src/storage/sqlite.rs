use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query::OnConflict, Database, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

use super::{KeyValueStore, StorageError};
use crate::entities::{
    session_entry::{self, Entity as SessionEntry},
    setup_schema,
};

/// Durable store backed by a single `session_entries` table.
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates the table when missing.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let db = Database::connect(database_url).await?;
        setup_schema(&db).await?;
        Ok(Self::new(Arc::new(db)))
    }
}

#[async_trait]
impl KeyValueStore for SeaOrmStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = SessionEntry::find_by_id(key.to_owned())
            .one(&*self.db)
            .await?;
        Ok(entry.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let entry = session_entry::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            updated_at: Set(Utc::now()),
        };

        SessionEntry::insert(entry)
            .on_conflict(
                OnConflict::column(session_entry::Column::Key)
                    .update_columns([
                        session_entry::Column::Value,
                        session_entry::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        SessionEntry::delete_by_id(key.to_owned())
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
