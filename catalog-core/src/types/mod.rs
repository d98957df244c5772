//! Core record types for the catalog

mod book;
mod record;

pub use book::{make_book, Book, BookDraft};
pub use record::BookRecord;
