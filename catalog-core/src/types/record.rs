//! A persisted book with its store-assigned identity

use super::Book;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A book entry in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Unique identifier assigned on insert
    pub id: Uuid,

    /// The stored book
    pub book: Book,

    /// When the book was added
    pub added_at: DateTime<Utc>,
}

impl BookRecord {
    pub fn new(book: Book) -> Self {
        Self {
            id: Uuid::new_v4(),
            book,
            added_at: Utc::now(),
        }
    }

    /// Case-insensitive match on name or author
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.book.name().to_lowercase().contains(&query)
            || self.book.author().to_lowercase().contains(&query)
    }
}
