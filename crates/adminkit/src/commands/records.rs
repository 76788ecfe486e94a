//! CRUD for multi-record models.
//!
//! Record ids are UUIDs. Wherever an id is taken, a unique prefix of it works
//! too, so `show ForumAdminUser 3f2a` finds `3f2a9c…`.

use crate::commands::{apply_updates, CmdMessage, CmdResult, FieldUpdate};
use crate::error::{AdminError, Result};
use crate::mapper::Mapper;
use crate::record::Record;
use crate::schema::{ModelSchema, SchemaRegistry};
use crate::store::{RecordStore, StorageBackend};

/// Finds the record whose id equals `selector`, or failing that, the only record
/// whose id starts with it.
fn resolve<B: StorageBackend>(
    store: &RecordStore<B>,
    schema: &ModelSchema,
    selector: &str,
) -> Result<Record> {
    let records = store.list(schema)?;
    if let Some(exact) = records.iter().find(|r| r.id == selector) {
        return Ok(exact.clone());
    }
    let mut matches = records
        .into_iter()
        .filter(|r| !selector.is_empty() && r.id.starts_with(selector));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record),
        (Some(_), Some(_)) => Err(AdminError::Api(format!(
            "Id prefix '{}' matches more than one {} record",
            selector,
            schema.name()
        ))),
        (None, _) => Err(AdminError::RecordNotFound {
            model: schema.name().to_string(),
            id: selector.to_string(),
        }),
    }
}

pub fn list<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let records = store.list(&schema)?;
    let mut result = CmdResult::default().with_schema(&schema);
    if records.is_empty() {
        result.add_message(CmdMessage::info(format!("No {} records", schema.title())));
    }
    Ok(result.with_records(records))
}

pub fn get<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
    id: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let record = resolve(store, &schema, id)?;
    Ok(CmdResult::default()
        .with_schema(&schema)
        .with_records(vec![record]))
}

pub fn create<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
    updates: &[FieldUpdate],
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let mut record = Record::new(&schema);
    apply_updates(&mut record, &schema, updates)?;
    let saved = store.upsert(&schema, record)?;

    let mut result = CmdResult::default().with_schema(&schema);
    result.add_message(CmdMessage::success(format!(
        "Created {} {}",
        schema.title(),
        saved.id
    )));
    Ok(result.with_records(vec![saved]))
}

pub fn update<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
    id: &str,
    updates: &[FieldUpdate],
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let mut record = resolve(store, &schema, id)?;
    apply_updates(&mut record, &schema, updates)?;
    let saved = store.upsert(&schema, record)?;

    let mut result = CmdResult::default().with_schema(&schema);
    if updates.is_empty() {
        result.add_message(CmdMessage::warning("Nothing to update"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Updated {} {}",
            schema.title(),
            saved.id
        )));
    }
    Ok(result.with_records(vec![saved]))
}

pub fn delete<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    model: &str,
    id: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let target = resolve(store, &schema, id)?;
    let removed = store.remove(&schema, &target.id)?;

    let mut result = CmdResult::default().with_schema(&schema);
    result.add_message(CmdMessage::success(format!(
        "Deleted {} {}",
        schema.title(),
        removed.id
    )));
    Ok(result.with_records(vec![removed]))
}

/// Projects every record of `model` into the `destination` shape.
pub fn project<B: StorageBackend>(
    registry: &SchemaRegistry,
    store: &RecordStore<B>,
    mapper: &Mapper,
    model: &str,
    destination: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let records = store.list(&schema)?;
    let projections = records
        .iter()
        .map(|r| mapper.map(model, destination, &r.to_json()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CmdResult::default().with_projections(projections))
}
