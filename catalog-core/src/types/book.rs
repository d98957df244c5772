//! The Book record and its raw, unvalidated counterpart

use crate::error::DataError;
use crate::validator::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate field values as they arrive from a loosely-typed boundary
/// (form data, JSON documents). Missing fields are `Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookDraft {
    pub name: Value,
    pub author: Value,
    pub year_published: Value,
    pub book_type: Value,
}

impl BookDraft {
    pub fn new(
        name: impl Into<Value>,
        author: impl Into<Value>,
        year_published: impl Into<Value>,
        book_type: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            year_published: year_published.into(),
            book_type: book_type.into(),
        }
    }
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self::new(book.name, book.author, book.year_published, book.book_type)
    }
}

/// A validated book.
///
/// The fields are private: every `Book` in existence went through
/// [`Validator::validate`], including ones produced by deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BookDraft")]
pub struct Book {
    name: String,
    author: String,
    year_published: i64,
    book_type: String,
}

impl Book {
    /// Only the validator assembles books
    pub(crate) fn from_parts(
        name: String,
        author: String,
        year_published: i64,
        book_type: String,
    ) -> Self {
        Self {
            name,
            author,
            year_published,
            book_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year_published(&self) -> i64 {
        self.year_published
    }

    pub fn book_type(&self) -> &str {
        &self.book_type
    }
}

impl TryFrom<BookDraft> for Book {
    type Error = DataError;

    fn try_from(draft: BookDraft) -> Result<Self, Self::Error> {
        Validator::default().validate(&draft)
    }
}

/// Construct a book from four raw values using the default schema.
///
/// Absent values are `Null` (`None` converts to it). Text fields must be
/// strings and the year must be an integer; nothing is coerced.
pub fn make_book(
    name: impl Into<Value>,
    author: impl Into<Value>,
    year_published: impl Into<Value>,
    book_type: impl Into<Value>,
) -> Result<Book, DataError> {
    Validator::default().validate(&BookDraft::new(name, author, year_published, book_type))
}
