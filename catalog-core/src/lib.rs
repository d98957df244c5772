//! Catalog Core Library
//!
//! Validation for the library catalog's `Book` records. A [`Book`] can only
//! be obtained through the [`Validator`] (directly, via [`make_book`], or by
//! deserializing), so holding one means every field constraint in the active
//! [`BookSchema`] was met. Anything else is a [`DataError`].

pub mod error;
pub mod schema;
pub mod storage;
pub mod types;
pub mod validator;

pub use error::{CatalogError, DataError, Field, Result, StorageError, Violation, ViolationKind};
pub use schema::{BookSchema, FieldConstraint, FieldKind, YearBounds};
pub use types::{make_book, Book, BookDraft, BookRecord};
pub use validator::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_creation() {
        let book = make_book("The Goblin Emperor", "Katherine Addison", 2014, "Fantasy").unwrap();
        assert_eq!(book.name(), "The Goblin Emperor");
        assert_eq!(book.author(), "Katherine Addison");
    }
}
