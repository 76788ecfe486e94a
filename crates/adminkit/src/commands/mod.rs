//! # Command Layer
//!
//! This module contains the **core logic** of the admin panel. Each command lives
//! in its own submodule as plain functions over the registry, the record store
//! and the other runtime pieces.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Look up schemas and records
//! - Apply and validate edits
//! - Return structured [`CmdResult`]s with the data to show and messages
//! - Are completely UI-agnostic
//!
//! Commands never print, never parse command lines and never exit. The UI layer
//! decides how a `CmdResult` is rendered.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests run
//! against [`crate::store::MemoryStore`] and the bundled forum models.
//!
//! ## Command Modules
//!
//! - [`schema`]: Registered models and their field metadata
//! - [`settings`]: Show and save the settings record
//! - [`records`]: CRUD for multi-record models, plus mapped projections
//! - [`layout`]: Parsed detail-page layouts
//! - [`paths`]: Logical path resolution
//! - [`config`]: Effective configuration

use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::layout::Layout;
use crate::record::Record;
use crate::schema::ModelSchema;

pub mod config;
pub mod layout;
pub mod paths;
pub mod records;
pub mod schema;
pub mod settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One row of the model index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    pub fields: usize,
    pub columns: Vec<String>,
}

impl ModelSummary {
    pub fn of(schema: &ModelSchema) -> Self {
        Self {
            name: schema.name().to_string(),
            title: schema.title().to_string(),
            base: schema.base().map(String::from),
            fields: schema.len(),
            columns: schema.list_fields().map(|f| f.label.clone()).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ModelSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Record>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projections: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<AdminConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_models(mut self, models: Vec<ModelSummary>) -> Self {
        self.models = models;
        self
    }

    pub fn with_schema(mut self, schema: &ModelSchema) -> Self {
        self.schema = Some(schema.clone());
        self
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_projections(mut self, projections: Vec<serde_json::Value>) -> Self {
        self.projections = projections;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_config(mut self, config: AdminConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A `field=value` edit as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl FromStr for FieldUpdate {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok(Self::new(field.trim(), value))
            }
            _ => Err(AdminError::Api(format!(
                "Expected field=value, got '{}'",
                s
            ))),
        }
    }
}

/// Applies edits in order, stopping at the first invalid one.
pub(crate) fn apply_updates(
    record: &mut Record,
    schema: &ModelSchema,
    updates: &[FieldUpdate],
) -> Result<()> {
    for update in updates {
        record.set_input(schema, &update.field, &update.value)?;
    }
    Ok(())
}
