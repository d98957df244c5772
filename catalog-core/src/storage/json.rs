//! Library store persisted as a single JSON file

use super::{sort_records, BookStore};
use crate::error::{Result, StorageError};
use crate::schema::BookSchema;
use crate::types::{Book, BookDraft, BookRecord};
use crate::validator::Validator;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// On-disk library index
#[derive(Debug, Default, Serialize)]
struct Library {
    books: HashMap<Uuid, BookRecord>,
}

/// Library as read back from disk, before validation
#[derive(Deserialize)]
struct StoredLibrary {
    #[serde(default)]
    books: HashMap<Uuid, StoredRecord>,
}

#[derive(Deserialize)]
struct StoredRecord {
    id: Uuid,
    book: BookDraft,
    added_at: DateTime<Utc>,
}

impl Library {
    /// Load library from a JSON file, validating every record
    async fn load(path: &Path, validator: &Validator) -> Result<Self> {
        // Read file directly, handle NotFound as empty library
        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredLibrary = serde_json::from_str(&data)?;
        let mut books = HashMap::with_capacity(stored.books.len());
        for (key, record) in stored.books {
            if key != record.id {
                return Err(StorageError::BackendError(format!(
                    "record stored under {} carries id {}",
                    key, record.id
                ))
                .into());
            }
            let book = validator.validate(&record.book)?;
            books.insert(
                record.id,
                BookRecord {
                    id: record.id,
                    book,
                    added_at: record.added_at,
                },
            );
        }
        Ok(Self { books })
    }

    /// Save library to a JSON file atomically
    /// Writes to a temp file then renames to avoid partial writes
    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to temp file in same directory (ensures same filesystem for rename)
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Book store backed by a JSON library file
pub struct JsonLibraryStore {
    path: PathBuf,
    validator: Validator,
    library: RwLock<Library>,
}

impl JsonLibraryStore {
    /// Open the library at `path` with default column bounds
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_schema(path, BookSchema::default()).await
    }

    /// Open the library at `path`; a missing file is an empty library
    pub async fn open_with_schema(path: impl Into<PathBuf>, schema: BookSchema) -> Result<Self> {
        let path = path.into();
        let validator = Validator::new(schema);
        let library = Library::load(&path, &validator).await?;
        tracing::debug!(
            "Opened library {} with {} book(s)",
            path.display(),
            library.books.len()
        );

        Ok(Self {
            path,
            validator,
            library: RwLock::new(library),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BookStore for JsonLibraryStore {
    fn schema(&self) -> &BookSchema {
        self.validator.schema()
    }

    async fn insert(&self, book: Book) -> Result<BookRecord> {
        self.schema().check(&book)?;
        let record = BookRecord::new(book);

        let mut library = self.library.write().await;
        library.books.insert(record.id, record.clone());
        if let Err(e) = library.save(&self.path).await {
            library.books.remove(&record.id);
            return Err(e);
        }

        tracing::info!("Added {} ({})", record.book.name(), record.id);
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<BookRecord> {
        self.library
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()).into())
    }

    async fn list(&self) -> Result<Vec<BookRecord>> {
        let mut records: Vec<BookRecord> =
            self.library.read().await.books.values().cloned().collect();
        sort_records(&mut records);
        Ok(records)
    }

    async fn remove(&self, id: Uuid) -> Result<BookRecord> {
        let mut library = self.library.write().await;
        let record = library
            .books
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        if let Err(e) = library.save(&self.path).await {
            library.books.insert(id, record);
            return Err(e);
        }

        tracing::info!("Removed {} ({})", record.book.name(), id);
        Ok(record)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.library.read().await.books.len())
    }
}
