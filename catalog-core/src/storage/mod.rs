//! Persistence boundary for book records
//!
//! Stores own a [`BookSchema`] that mirrors their column definitions and
//! re-check every book on insert, so a record that would violate a column
//! constraint is rejected here with a [`DataError`](crate::DataError) rather
//! than written.

mod json;
mod memory;

pub use json::JsonLibraryStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::schema::BookSchema;
use crate::types::{Book, BookRecord};
use async_trait::async_trait;
use uuid::Uuid;

/// Abstract book store
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Column constraints enforced on insert
    fn schema(&self) -> &BookSchema;

    /// Persist a book, assigning it a new id
    async fn insert(&self, book: Book) -> Result<BookRecord>;

    /// Fetch a single record
    async fn get(&self, id: Uuid) -> Result<BookRecord>;

    /// All records, ordered by name then id
    async fn list(&self) -> Result<Vec<BookRecord>>;

    /// Records whose name or author contains `query`, ignoring case
    async fn search(&self, query: &str) -> Result<Vec<BookRecord>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|record| record.matches(query))
            .collect())
    }

    /// Delete a record, returning what was removed
    async fn remove(&self, id: Uuid) -> Result<BookRecord>;

    /// Number of stored records
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Order records for listing
fn sort_records(records: &mut [BookRecord]) {
    records.sort_by(|a, b| {
        a.book
            .name()
            .cmp(b.book.name())
            .then_with(|| a.id.cmp(&b.id))
    });
}
