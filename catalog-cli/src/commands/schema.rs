//! Schema command implementation

use anyhow::Result;
use catalog_core::BookSchema;

/// Print the effective field bounds as JSON
pub fn schema(schema: BookSchema) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
