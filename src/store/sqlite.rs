// src/store/sqlite.rs
use async_trait::async_trait;

use super::KeyValueStore;
use crate::core::Database;
use crate::error::StoreError;

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_value(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.delete_value(key).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.delete_all().await
    }
}
