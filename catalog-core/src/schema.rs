//! Field bounds for book records
//!
//! These mirror the column definitions of the `books` table so that a record
//! accepted here is never rejected by the store, and vice versa.

use crate::error::{CatalogError, DataError, Field, Result, Violation, ViolationKind};
use crate::types::Book;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Width of the `name` column
pub const NAME_MAX_LENGTH: usize = 64;

/// Width of the `author` column
pub const AUTHOR_MAX_LENGTH: usize = 64;

/// Width of the `book_type` column
pub const BOOK_TYPE_MAX_LENGTH: usize = 32;

/// Minimum length of any text field after trimming
pub const MIN_TEXT_LENGTH: usize = 1;

/// Earliest accepted publication year
pub const MIN_YEAR_PUBLISHED: i64 = 1;

/// Latest accepted publication year
pub const MAX_YEAR_PUBLISHED: i64 = 2100;

/// Value type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
        }
    }
}

/// Constraint on a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldConstraint {
    /// Null is rejected when set
    pub required: bool,

    /// Minimum length of the trimmed value, in characters
    pub min_length: usize,

    /// Maximum length of the stored value, in characters
    pub max_length: usize,
}

impl FieldConstraint {
    /// A required text column of the given width
    pub const fn text(max_length: usize) -> Self {
        Self {
            required: true,
            min_length: MIN_TEXT_LENGTH,
            max_length,
        }
    }

    /// Check a present text value against this constraint
    pub(crate) fn check_text(&self, field: Field, value: &str, out: &mut Vec<Violation>) {
        if value.trim().is_empty() {
            out.push(Violation::new(field, ViolationKind::Empty));
            return;
        }

        let trimmed = value.trim().chars().count();
        if trimmed < self.min_length {
            out.push(Violation::new(
                field,
                ViolationKind::TooShort {
                    min: self.min_length,
                    actual: trimmed,
                },
            ));
        }

        let actual = value.chars().count();
        if actual > self.max_length {
            out.push(Violation::new(
                field,
                ViolationKind::TooLong {
                    max: self.max_length,
                    actual,
                },
            ));
        }
    }
}

/// Inclusive range for `year_published`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBounds {
    pub min: i64,
    pub max: i64,
}

impl YearBounds {
    pub fn contains(&self, year: i64) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub(crate) fn check(&self, year: i64, out: &mut Vec<Violation>) {
        if !self.contains(year) {
            out.push(Violation::new(
                Field::YearPublished,
                ViolationKind::OutOfRange {
                    min: self.min,
                    max: self.max,
                    actual: year,
                },
            ));
        }
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: MIN_YEAR_PUBLISHED,
            max: MAX_YEAR_PUBLISHED,
        }
    }
}

/// Constraints for every field of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SchemaOverrides")]
pub struct BookSchema {
    pub name: FieldConstraint,
    pub author: FieldConstraint,
    pub year_published: YearBounds,
    pub book_type: FieldConstraint,
}

impl Default for BookSchema {
    fn default() -> Self {
        Self {
            name: FieldConstraint::text(NAME_MAX_LENGTH),
            author: FieldConstraint::text(AUTHOR_MAX_LENGTH),
            year_published: YearBounds::default(),
            book_type: FieldConstraint::text(BOOK_TYPE_MAX_LENGTH),
        }
    }
}

/// Schema document as written: every key is optional and unknown keys are
/// rejected, so a typo cannot silently leave a default in place
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaOverrides {
    name: Option<ConstraintOverrides>,
    author: Option<ConstraintOverrides>,
    year_published: Option<YearOverrides>,
    book_type: Option<ConstraintOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstraintOverrides {
    required: Option<bool>,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct YearOverrides {
    min: Option<i64>,
    max: Option<i64>,
}

impl ConstraintOverrides {
    fn apply(self, base: FieldConstraint) -> FieldConstraint {
        FieldConstraint {
            required: self.required.unwrap_or(base.required),
            min_length: self.min_length.unwrap_or(base.min_length),
            max_length: self.max_length.unwrap_or(base.max_length),
        }
    }
}

impl YearOverrides {
    fn apply(self, base: YearBounds) -> YearBounds {
        YearBounds {
            min: self.min.unwrap_or(base.min),
            max: self.max.unwrap_or(base.max),
        }
    }
}

impl From<SchemaOverrides> for BookSchema {
    fn from(overrides: SchemaOverrides) -> Self {
        let base = BookSchema::default();
        let text = |o: Option<ConstraintOverrides>, base: FieldConstraint| match o {
            Some(o) => o.apply(base),
            None => base,
        };

        Self {
            name: text(overrides.name, base.name),
            author: text(overrides.author, base.author),
            year_published: match overrides.year_published {
                Some(o) => o.apply(base.year_published),
                None => base.year_published,
            },
            book_type: text(overrides.book_type, base.book_type),
        }
    }
}

impl BookSchema {
    /// Constraint for a text field, `None` for `year_published`
    pub fn text_constraint(&self, field: Field) -> Option<&FieldConstraint> {
        match field {
            Field::Name => Some(&self.name),
            Field::Author => Some(&self.author),
            Field::BookType => Some(&self.book_type),
            Field::YearPublished => None,
        }
    }

    /// Declared value type of a field
    pub fn kind(&self, field: Field) -> FieldKind {
        match field {
            Field::YearPublished => FieldKind::Integer,
            _ => FieldKind::Text,
        }
    }

    /// Parse a schema document; omitted keys, at any level, keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate_self()?;
        Ok(schema)
    }

    /// Load a schema document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let schema = Self::from_json_str(&data)?;
        tracing::debug!("Loaded book schema from {}", path.display());
        Ok(schema)
    }

    /// Reject bounds that no value could ever satisfy
    pub fn validate_self(&self) -> Result<()> {
        for field in [Field::Name, Field::Author, Field::BookType] {
            if let Some(c) = self.text_constraint(field) {
                // Book columns are all NOT NULL
                if !c.required {
                    return Err(CatalogError::Schema(format!(
                        "{}: optional columns are not supported",
                        field
                    )));
                }
                if c.min_length > c.max_length {
                    return Err(CatalogError::Schema(format!(
                        "{}: min_length {} exceeds max_length {}",
                        field, c.min_length, c.max_length
                    )));
                }
                if c.max_length == 0 {
                    return Err(CatalogError::Schema(format!(
                        "{}: max_length must be positive",
                        field
                    )));
                }
            }
        }

        let years = &self.year_published;
        if years.min < 1 {
            return Err(CatalogError::Schema(format!(
                "year_published: min {} must be at least 1",
                years.min
            )));
        }
        if years.min > years.max {
            return Err(CatalogError::Schema(format!(
                "year_published: min {} exceeds max {}",
                years.min, years.max
            )));
        }
        Ok(())
    }

    /// Re-check an existing book against these bounds.
    ///
    /// A `Book` is valid under the schema it was built with; a store with
    /// narrower columns still has to reject it.
    pub fn check(&self, book: &Book) -> std::result::Result<(), DataError> {
        let mut violations = Vec::new();
        self.name.check_text(Field::Name, book.name(), &mut violations);
        self.author
            .check_text(Field::Author, book.author(), &mut violations);
        self.year_published
            .check(book.year_published(), &mut violations);
        self.book_type
            .check_text(Field::BookType, book.book_type(), &mut violations);

        match DataError::from_violations(violations) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_mirrors_constants() {
        let schema = BookSchema::default();
        assert_eq!(schema.name.max_length, NAME_MAX_LENGTH);
        assert_eq!(schema.author.max_length, AUTHOR_MAX_LENGTH);
        assert_eq!(schema.book_type.max_length, BOOK_TYPE_MAX_LENGTH);
        assert_eq!(schema.year_published.min, MIN_YEAR_PUBLISHED);
        assert_eq!(schema.year_published.max, MAX_YEAR_PUBLISHED);
        assert!(schema.name.required);
        assert!(schema.validate_self().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let schema =
            BookSchema::from_json_str(r#"{ "book_type": { "max_length": 10 } }"#).unwrap();
        assert_eq!(schema.book_type.max_length, 10);
        assert_eq!(schema.book_type.min_length, MIN_TEXT_LENGTH);
        assert!(schema.book_type.required);
        assert_eq!(schema.name, BookSchema::default().name);
        assert_eq!(schema.year_published, YearBounds::default());
    }

    #[test]
    fn test_partial_field_object_keeps_other_bounds() {
        let schema = BookSchema::from_json_str(r#"{ "name": { "min_length": 2 } }"#).unwrap();
        assert_eq!(schema.name.min_length, 2);
        assert_eq!(schema.name.max_length, NAME_MAX_LENGTH);
        assert!(schema.name.required);

        let schema =
            BookSchema::from_json_str(r#"{ "year_published": { "max": 2030 } }"#).unwrap();
        assert_eq!(schema.year_published.min, MIN_YEAR_PUBLISHED);
        assert_eq!(schema.year_published.max, 2030);
        assert_eq!(schema.author, BookSchema::default().author);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = BookSchema::from_json_str(r#"{ "name": { "max_lenght": 10 } }"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));

        let err = BookSchema::from_json_str(r#"{ "title": { "max_length": 10 } }"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(BookSchema::from_json_str("{}").unwrap(), BookSchema::default());
    }

    #[test]
    fn test_schema_serializes_back_to_loadable_document() {
        let mut schema = BookSchema::default();
        schema.book_type.max_length = 12;
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(BookSchema::from_json_str(&json).unwrap(), schema);
    }

    #[test]
    fn test_zero_width_column_rejected() {
        let err = BookSchema::from_json_str(
            r#"{ "author": { "min_length": 0, "max_length": 0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Schema(_)));
        assert!(err.to_string().contains("max_length must be positive"));
    }

    #[test]
    fn test_field_kinds() {
        let schema = BookSchema::default();
        assert_eq!(schema.kind(Field::Name), FieldKind::Text);
        assert_eq!(schema.kind(Field::Author), FieldKind::Text);
        assert_eq!(schema.kind(Field::BookType), FieldKind::Text);
        assert_eq!(schema.kind(Field::YearPublished), FieldKind::Integer);
        assert_eq!(FieldKind::Integer.as_str(), "integer");
    }

    #[test]
    fn test_inconsistent_bounds_rejected() {
        let err = BookSchema::from_json_str(
            r#"{ "name": { "min_length": 10, "max_length": 5 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Schema(_)));

        let err =
            BookSchema::from_json_str(r#"{ "year_published": { "min": 0, "max": 2000 } }"#)
                .unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let err =
            BookSchema::from_json_str(r#"{ "year_published": { "min": 2000, "max": 1900 } }"#)
                .unwrap_err();
        assert!(err.to_string().contains("exceeds max"));
    }

    #[test]
    fn test_optional_column_rejected() {
        let err = BookSchema::from_json_str(
            r#"{ "author": { "required": false, "max_length": 64 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("optional columns"));
    }

    #[test]
    fn test_malformed_document_is_json_error() {
        let err = BookSchema::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let constraint = FieldConstraint::text(5);
        let mut out = Vec::new();
        constraint.check_text(Field::Author, "Zafón", &mut out);
        assert!(out.is_empty());

        constraint.check_text(Field::Author, "Miéville", &mut out);
        assert_eq!(
            out,
            vec![Violation::new(
                Field::Author,
                ViolationKind::TooLong { max: 5, actual: 8 }
            )]
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let mut out = Vec::new();
        FieldConstraint::text(10).check_text(Field::Name, "\n\t\r", &mut out);
        assert_eq!(out, vec![Violation::new(Field::Name, ViolationKind::Empty)]);
    }

    #[test]
    fn test_year_bounds_inclusive() {
        let bounds = YearBounds::default();
        assert!(bounds.contains(1));
        assert!(bounds.contains(2100));
        assert!(!bounds.contains(0));
        assert!(!bounds.contains(2101));
    }
}
