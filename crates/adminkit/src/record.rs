//! Runtime values for one model instance.
//!
//! A [`Record`] is the untyped bag behind every admin screen: the settings page
//! edits the single settings record, list pages show many admin-user records.
//! Records carry no schema of their own; every operation that interprets values
//! takes the model's [`ModelSchema`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use uuid::Uuid;

use crate::equality::case_insensitive;
use crate::error::ValidationError;
use crate::schema::{FieldValue, ModelSchema};

/// Id of the one record a settings model holds.
pub const SETTINGS_ID: &str = "default";

static NULL: FieldValue = FieldValue::Null;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub model: String,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// A new record with a fresh id and every field at its default.
    pub fn new(schema: &ModelSchema) -> Self {
        Self::with_id(schema, Uuid::new_v4().to_string())
    }

    /// The settings record for a settings model.
    pub fn settings(schema: &ModelSchema) -> Self {
        Self::with_id(schema, SETTINGS_ID)
    }

    pub fn with_id(schema: &ModelSchema, id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            model: schema.name().to_string(),
            id: id.into(),
            created_at: now,
            updated_at: now,
            values: schema
                .fields()
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        }
    }

    /// The stored value, `Null` when the field was never set.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&NULL)
    }

    /// Validates `value` against the field's descriptor and stores the coerced
    /// result.
    ///
    /// Lists are sets: repeated entries collapse, compared case-insensitively,
    /// and the first spelling is kept.
    pub fn set(
        &mut self,
        schema: &ModelSchema,
        field: &str,
        value: FieldValue,
    ) -> Result<(), ValidationError> {
        let descriptor = schema
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField {
                model: schema.name().to_string(),
                field: field.to_string(),
            })?;
        let value = match descriptor.validate(value)? {
            FieldValue::List(items) => FieldValue::List(case_insensitive().dedup(items)),
            other => other,
        };
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    /// Parses textual input (`field=value` on the command line) and stores it.
    pub fn set_input(
        &mut self,
        schema: &ModelSchema,
        field: &str,
        input: &str,
    ) -> Result<(), ValidationError> {
        let descriptor = schema
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField {
                model: schema.name().to_string(),
                field: field.to_string(),
            })?;
        let value = FieldValue::parse(descriptor.value_kind, input).ok_or_else(|| {
            ValidationError::Parse {
                field: field.to_string(),
                input: input.to_string(),
                kind: descriptor.value_kind.to_string(),
            }
        })?;
        self.set(schema, field, value)
    }

    /// Checks every field, including required fields that were never set.
    pub fn validate(&self, schema: &ModelSchema) -> Result<(), ValidationError> {
        for field in schema.fields() {
            field.validate(self.get(&field.name).clone())?;
        }
        Ok(())
    }

    /// Brings loaded values in line with the schema.
    ///
    /// Stored JSON loses the datetime kind and may predate fields added since;
    /// this coerces what it can and fills new fields with their defaults. Values
    /// that no longer fit are kept as-is and reported by [`Record::validate`].
    pub fn conform(&mut self, schema: &ModelSchema) {
        for field in schema.fields() {
            match self.values.remove(&field.name) {
                None => {
                    self.values.insert(field.name.clone(), field.default.clone());
                }
                Some(value) => {
                    let conformed = value.clone().coerce(field.value_kind).unwrap_or_else(|| {
                        warn!(
                            model = schema.name(),
                            id = %self.id,
                            field = %field.name,
                            kind = value.kind_name(),
                            "stored value does not match field kind"
                        );
                        value
                    });
                    self.values.insert(field.name.clone(), conformed);
                }
            }
        }
    }

    /// Values of the list-visible fields, in column order.
    pub fn list_row<'a>(&'a self, schema: &'a ModelSchema) -> Vec<(&'a str, &'a FieldValue)> {
        schema
            .list_fields()
            .map(|f| (f.label.as_str(), self.get(&f.name)))
            .collect()
    }

    /// The values as a JSON object, the input shape for mapper projections.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
