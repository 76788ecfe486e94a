use super::backend::StorageBackend;
use crate::error::{AdminError, Result};
use crate::record::Record;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the admin shell is
/// single-threaded.
#[derive(Default)]
pub struct MemBackend {
    models: RefCell<HashMap<String, Vec<Record>>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl StorageBackend for MemBackend {
    fn load(&self, model: &str) -> Result<Vec<Record>> {
        let models = self.models.borrow();
        Ok(models.get(model).cloned().unwrap_or_default())
    }

    fn save(&self, model: &str, records: &[Record]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(AdminError::Store("Simulated write error".to_string()));
        }
        self.models
            .borrow_mut()
            .insert(model.to_string(), records.to_vec());
        Ok(())
    }

    fn location(&self, model: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", model))
    }
}
