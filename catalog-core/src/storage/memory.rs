//! In-memory store (for testing and embedding)

use super::{sort_records, BookStore};
use crate::error::{Result, StorageError};
use crate::schema::BookSchema;
use crate::types::{Book, BookRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    schema: BookSchema,
    records: RwLock<HashMap<Uuid, BookRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose columns follow the given schema
    pub fn with_schema(schema: BookSchema) -> Self {
        Self {
            schema,
            records: RwLock::default(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, BookRecord>>> {
        self.records
            .read()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, BookRecord>>> {
        self.records
            .write()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()).into())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    fn schema(&self) -> &BookSchema {
        &self.schema
    }

    async fn insert(&self, book: Book) -> Result<BookRecord> {
        self.schema.check(&book)?;
        let record = BookRecord::new(book);
        self.write()?.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<BookRecord> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()).into())
    }

    async fn list(&self) -> Result<Vec<BookRecord>> {
        let mut records: Vec<BookRecord> = self.read()?.values().cloned().collect();
        sort_records(&mut records);
        Ok(records)
    }

    async fn remove(&self, id: Uuid) -> Result<BookRecord> {
        self.write()?
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()).into())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, Field};
    use crate::make_book;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();

        // Insert
        let circe = store
            .insert(make_book("Circe", "Madeline Miller", 2018, "Mythological Fiction").unwrap())
            .await
            .unwrap();
        let dispossessed = store
            .insert(make_book("The Dispossessed", "Ursula K. Le Guin", 1974, "Science Fiction").unwrap())
            .await
            .unwrap();
        assert_eq!(store.len().await.unwrap(), 2);

        // Get
        assert_eq!(store.get(circe.id).await.unwrap(), circe);

        // List is ordered by name
        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.book.name().to_string())
            .collect();
        assert_eq!(names, vec!["Circe", "The Dispossessed"]);

        // Search
        let hits = store.search("le guin").await.unwrap();
        assert_eq!(hits, vec![dispossessed.clone()]);

        // Remove
        store.remove(dispossessed.id).await.unwrap();
        assert!(matches!(
            store.get(dispossessed.id).await,
            Err(CatalogError::Storage(StorageError::NotFound(_)))
        ));
        assert!(store.remove(dispossessed.id).await.is_err());
        assert!(!store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_enforces_store_columns() {
        let mut schema = BookSchema::default();
        schema.book_type.max_length = 10;
        let store = MemoryStore::with_schema(schema);
        assert_eq!(store.schema().book_type.max_length, 10);

        let book = make_book("Circe", "Madeline Miller", 2018, "Mythological Fiction").unwrap();
        match store.insert(book).await {
            Err(CatalogError::Data(err)) => assert_eq!(err.fields(), vec![Field::BookType]),
            other => panic!("expected data error, got {:?}", other),
        }
        assert!(store.is_empty().await.unwrap());
    }
}
