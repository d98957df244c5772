//! CLI command implementations

mod batch;
mod library;
mod schema;
mod validate;

pub use batch::batch;
pub use library::{add, list, remove};
pub use schema::schema;
pub use validate::validate;

use anyhow::{Context, Result};
use catalog_core::{BookDraft, BookSchema};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Environment variable naming the default library file
pub const LIBRARY_PATH_ENV: &str = "CATALOG_LIBRARY_PATH";

const DEFAULT_LIBRARY_PATH: &str = "./catalog_data/library.json";

/// Resolve the library file: flag, then environment, then default
pub fn library_path(flag: Option<String>) -> PathBuf {
    flag.or_else(|| std::env::var(LIBRARY_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_LIBRARY_PATH.to_string())
        .into()
}

/// Default bounds, or the ones in the given schema file
pub fn load_schema(path: Option<&str>) -> Result<BookSchema> {
    match path {
        Some(path) => BookSchema::load(Path::new(path))
            .with_context(|| format!("Failed to load schema: {}", path)),
        None => Ok(BookSchema::default()),
    }
}

/// Read the drafts in a record file: one object or an array of objects
pub(crate) fn read_drafts(path: &Path) -> Result<Vec<BookDraft>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;

    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<BookDraft>(item)
                .with_context(|| format!("Record {} in {} is not an object", i + 1, path.display()))
        })
        .collect()
}
