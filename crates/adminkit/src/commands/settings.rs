use crate::commands::{apply_updates, CmdMessage, CmdResult, FieldUpdate};
use crate::error::Result;
use crate::mapper::Mapper;
use crate::schema::SchemaRegistry;
use crate::store::{RecordStore, StorageBackend};

/// The settings record of `model`, defaults included when nothing was saved.
pub fn show<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let record = store.settings(&schema)?;
    Ok(CmdResult::default()
        .with_schema(&schema)
        .with_records(vec![record]))
}

/// Applies `updates` to the settings record and persists it.
///
/// Nothing is written unless every update is valid.
pub fn save<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
    updates: &[FieldUpdate],
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let mut record = store.settings(&schema)?;
    apply_updates(&mut record, &schema, updates)?;
    let saved = store.upsert(&schema, record)?;

    let mut result = CmdResult::default()
        .with_schema(&schema)
        .with_records(vec![saved]);
    let changed: Vec<_> = updates.iter().map(|u| u.field.as_str()).collect();
    result.add_message(if changed.is_empty() {
        CmdMessage::info("Settings saved")
    } else {
        CmdMessage::success(format!("Settings saved: {}", changed.join(", ")))
    });
    Ok(result)
}

/// Projects the settings record into the `destination` shape.
pub fn project<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    mapper: &Mapper,
    model: &str,
    destination: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let record = store.settings(&schema)?;
    let projected = mapper.map(model, destination, &record.to_json())?;
    Ok(CmdResult::default().with_projections(vec![projected]))
}
