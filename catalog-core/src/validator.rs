//! Book validation
//!
//! Every rule for every field is evaluated, so a rejected draft reports all
//! of its problems at once. Values are never coerced: a year given as the
//! string `"1969"` is a type violation, not a year.

use crate::error::{DataError, Field, Violation, ViolationKind};
use crate::schema::{BookSchema, FieldKind};
use crate::types::{Book, BookDraft};
use serde_json::Value;

/// Validates drafts against a [`BookSchema`]
#[derive(Debug, Clone, Default)]
pub struct Validator {
    schema: BookSchema,
}

impl Validator {
    pub fn new(schema: BookSchema) -> Self {
        Self { schema }
    }

    /// Bounds this validator enforces
    pub fn schema(&self) -> &BookSchema {
        &self.schema
    }

    /// Build a book from a draft, or explain why it cannot exist
    pub fn validate(&self, draft: &BookDraft) -> Result<Book, DataError> {
        let name = self.text_field(Field::Name, &draft.name);
        let author = self.text_field(Field::Author, &draft.author);
        let year_published = self.year_field(&draft.year_published);
        let book_type = self.text_field(Field::BookType, &draft.book_type);

        match (name, author, year_published, book_type) {
            (Ok(name), Ok(author), Ok(year), Ok(book_type)) => Ok(Book::from_parts(
                name.to_owned(),
                author.to_owned(),
                year,
                book_type.to_owned(),
            )),
            (name, author, year_published, book_type) => {
                let violations: Vec<Violation> = [
                    name.err(),
                    author.err(),
                    year_published.err(),
                    book_type.err(),
                ]
                .into_iter()
                .flatten()
                .flatten()
                .collect();

                let err = DataError::new(violations);
                tracing::debug!(
                    "Rejected book record with {} violation(s): {}",
                    err.violations().len(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Violation for a value whose JSON type does not match the field's
    /// declared kind
    fn wrong_type(&self, field: Field, found: &'static str) -> Violation {
        Violation::new(
            field,
            ViolationKind::WrongType {
                expected: self.schema.kind(field).as_str(),
                found,
            },
        )
    }

    fn text_field<'a>(&self, field: Field, value: &'a Value) -> FieldResult<&'a str> {
        let text = match value {
            Value::Null => return Err(vec![Violation::new(field, ViolationKind::Missing)]),
            Value::String(text) if self.schema.kind(field) == FieldKind::Text => text,
            other => return Err(vec![self.wrong_type(field, type_name(other))]),
        };

        let mut violations = Vec::new();
        if let Some(constraint) = self.schema.text_constraint(field) {
            constraint.check_text(field, text, &mut violations);
        }

        if violations.is_empty() {
            Ok(text.as_str())
        } else {
            Err(violations)
        }
    }

    fn year_field(&self, value: &Value) -> FieldResult<i64> {
        let field = Field::YearPublished;
        let year = match value {
            Value::Null => return Err(vec![Violation::new(field, ViolationKind::Missing)]),
            Value::Number(n) if self.schema.kind(field) == FieldKind::Integer => match n.as_i64() {
                Some(year) => year,
                None if n.is_u64() => return Err(vec![self.wrong_type(field, "oversized integer")]),
                None => return Err(vec![self.wrong_type(field, "float")]),
            },
            other => return Err(vec![self.wrong_type(field, type_name(other))]),
        };

        let mut violations = Vec::new();
        self.schema.year_published.check(year, &mut violations);

        if violations.is_empty() {
            Ok(year)
        } else {
            Err(violations)
        }
    }
}

/// Outcome of checking one field: its typed value or every rule it broke
type FieldResult<T> = Result<T, Vec<Violation>>;

/// Short JSON type name for diagnostics
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
