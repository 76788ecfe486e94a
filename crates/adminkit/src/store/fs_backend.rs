use super::backend::StorageBackend;
use crate::error::{AdminError, Result};
use crate::record::Record;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// One pretty-printed JSON file per model under `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(AdminError::Io)?;
        }
        Ok(())
    }
}

fn file_name(model: &str) -> Result<String> {
    let valid = !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(AdminError::Store(format!("Invalid model name: {:?}", model)));
    }
    Ok(format!("{}.json", model))
}

impl StorageBackend for FsBackend {
    fn load(&self, model: &str) -> Result<Vec<Record>> {
        let path = self.root.join(file_name(model)?);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(AdminError::Io)?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(AdminError::Serialization)?;
        Ok(records)
    }

    fn save(&self, model: &str, records: &[Record]) -> Result<()> {
        let target = self.root.join(file_name(model)?);
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(records).map_err(AdminError::Serialization)?;

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", model, Uuid::new_v4()));
        fs::write(&tmp, content).map_err(AdminError::Io)?;
        fs::rename(&tmp, &target).map_err(AdminError::Io)?;

        debug!(model, records = records.len(), path = %target.display(), "saved records");
        Ok(())
    }

    fn location(&self, model: &str) -> PathBuf {
        self.root.join(format!("{}.json", model))
    }
}
