use crate::error::Result;
use crate::record::Record;
use std::path::PathBuf;

/// Raw persistence of a model's records.
///
/// Backends only move records in and out; conforming values to the schema and
/// enforcing ids is [`super::RecordStore`]'s job. Methods take `&self`: the
/// admin shell is single-threaded and backends use interior mutability where
/// they need it.
pub trait StorageBackend {
    /// All stored records of `model`, empty when nothing was saved yet.
    fn load(&self, model: &str) -> Result<Vec<Record>>;

    /// Replaces the stored records of `model`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, model: &str, records: &[Record]) -> Result<()>;

    /// Where `model`'s records live. A virtual path for non-file backends.
    fn location(&self, model: &str) -> PathBuf;
}
