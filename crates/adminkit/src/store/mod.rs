//! # Storage Layer
//!
//! Records are persisted per model. The split follows two concerns:
//!
//! 1. [`backend::StorageBackend`]: the "how" (filesystem vs memory), moving whole
//!    record lists in and out.
//! 2. [`RecordStore`]: the "what", looking records up by id, conforming loaded
//!    values to the current schema and refusing to persist invalid records.
//!
//! ## Implementations
//!
//! - [`FileStore`]: [`fs_backend::FsBackend`], production.
//! - [`MemoryStore`]: [`mem_backend::MemBackend`], for testing logic without
//!   filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── adminkit.toml          # Project configuration
//! ├── ForumSettings.json     # [Record] with the single "default" record
//! └── ForumAdminUser.json    # [Record]
//! ```

use std::path::PathBuf;
use tracing::debug;

use crate::error::{AdminError, Result};
use crate::record::{Record, SETTINGS_ID};
use crate::schema::ModelSchema;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;

pub type FileStore = RecordStore<fs_backend::FsBackend>;
pub type MemoryStore = RecordStore<mem_backend::MemBackend>;

pub struct RecordStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Every record of the model, conformed to `schema`.
    pub fn list(&self, schema: &ModelSchema) -> Result<Vec<Record>> {
        let mut records = self.backend.load(schema.name())?;
        for record in &mut records {
            record.conform(schema);
        }
        Ok(records)
    }

    pub fn find(&self, schema: &ModelSchema, id: &str) -> Result<Option<Record>> {
        Ok(self.list(schema)?.into_iter().find(|r| r.id == id))
    }

    pub fn get(&self, schema: &ModelSchema, id: &str) -> Result<Record> {
        self.find(schema, id)?
            .ok_or_else(|| AdminError::RecordNotFound {
                model: schema.name().to_string(),
                id: id.to_string(),
            })
    }

    /// The settings record, or a default one when none was saved.
    pub fn settings(&self, schema: &ModelSchema) -> Result<Record> {
        Ok(self
            .find(schema, SETTINGS_ID)?
            .unwrap_or_else(|| Record::settings(schema)))
    }

    /// Validates and stores `record`, replacing any record with the same id.
    pub fn upsert(&self, schema: &ModelSchema, mut record: Record) -> Result<Record> {
        if record.model != schema.name() {
            return Err(AdminError::Store(format!(
                "Record belongs to {}, not {}",
                record.model,
                schema.name()
            )));
        }
        record.validate(schema)?;
        record.touch();

        let mut records = self.list(schema)?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.backend.save(schema.name(), &records)?;
        debug!(model = schema.name(), id = %record.id, "stored record");
        Ok(record)
    }

    /// Deletes and returns the record with `id`.
    pub fn remove(&self, schema: &ModelSchema, id: &str) -> Result<Record> {
        let mut records = self.list(schema)?;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AdminError::RecordNotFound {
                model: schema.name().to_string(),
                id: id.to_string(),
            })?;
        let removed = records.remove(pos);
        self.backend.save(schema.name(), &records)?;
        Ok(removed)
    }

    pub fn location(&self, schema: &ModelSchema) -> PathBuf {
        self.backend.location(schema.name())
    }
}

impl MemoryStore {
    pub fn in_memory() -> Self {
        Self::new(mem_backend::MemBackend::new())
    }
}

impl FileStore {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(fs_backend::FsBackend::new(root))
    }
}
