//! Error types for Catalog Core

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Top-level error type for all catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four fields of a book record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Author,
    YearPublished,
    BookType,
}

impl Field {
    /// All fields, in declaration order
    pub const ALL: [Field; 4] = [
        Field::Name,
        Field::Author,
        Field::YearPublished,
        Field::BookType,
    ];

    /// Column name as used by the persistence layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Author => "author",
            Field::YearPublished => "year_published",
            Field::BookType => "book_type",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("is required")]
    Missing,

    #[error("expected {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("must not be empty")]
    Empty,

    #[error("length {actual} is below minimum {min}")]
    TooShort { min: usize, actual: usize },

    #[error("length {actual} exceeds maximum {max}")]
    TooLong { max: usize, actual: usize },

    #[error("{actual} is outside {min}..={max}")]
    OutOfRange { min: i64, max: i64, actual: i64 },
}

/// A rule violation on one field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {kind}")]
pub struct Violation {
    pub field: Field,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(field: Field, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

/// Supplied field values violate the book validation contract.
///
/// This is the only rejection outcome of book construction. It always carries
/// at least one violation; callers that only care about accept/reject can
/// ignore the details.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid book data: {}", join_violations(.violations))]
pub struct DataError {
    violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl DataError {
    /// Build an error from collected violations, `None` if there are none
    pub(crate) fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// Wrap violations already known to be non-empty
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// Every violation found, in field order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Distinct fields that failed
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for v in &self.violations {
            if !fields.contains(&v.field) {
                fields.push(v.field);
            }
        }
        fields
    }

    /// Whether the given field has at least one violation
    pub fn has_violation(&self, field: Field) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_display_joins_violations() {
        let err = DataError::from_violations(vec![
            Violation::new(Field::Name, ViolationKind::Empty),
            Violation::new(
                Field::YearPublished,
                ViolationKind::OutOfRange {
                    min: 1,
                    max: 2100,
                    actual: 0,
                },
            ),
        ])
        .unwrap();

        assert_eq!(
            err.to_string(),
            "invalid book data: name: must not be empty; year_published: 0 is outside 1..=2100"
        );
        assert_eq!(err.fields(), vec![Field::Name, Field::YearPublished]);
        assert!(!err.has_violation(Field::Author));
    }

    #[test]
    fn test_empty_violations_is_not_an_error() {
        assert!(DataError::from_violations(Vec::new()).is_none());
    }

    #[test]
    fn test_catalog_error_wraps_data_error_transparently() {
        let err: CatalogError = 
            DataError::new(vec![Violation::new(Field::Author, ViolationKind::Missing)]).into();
        assert_eq!(err.to_string(), "invalid book data: author: is required");
    }
}
