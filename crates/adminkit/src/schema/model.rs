//! Model schemas and the builder that declares them.
//!
//! A schema is an ordered list of [`FieldDescriptor`]s. Deployments do not subclass
//! models; they call [`ModelSchema::extend`] on a base schema and append their own
//! fields. Extension only adds: redeclaring an inherited name fails the build.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::error::SchemaError;
use super::field::FieldDescriptor;

/// Ordered collection of field descriptors for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSchema {
    name: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<String>,
    /// Number of leading fields inherited from `base`
    inherited: usize,
    fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the schema this one extends.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields inherited from the base schema, in the base's order.
    pub fn inherited_fields(&self) -> &[FieldDescriptor] {
        &self.fields[..self.inherited]
    }

    /// Fields declared by this schema itself.
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.fields[self.inherited..]
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields shown as columns in list views, in declaration order.
    pub fn list_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.list_visible)
    }

    /// Distinct group names in first-use order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.fields.iter().filter_map(|f| f.group.as_deref()) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Starts a new schema that inherits every field of this one.
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder {
        let name = name.into();
        SchemaBuilder {
            title: super::field::humanize(&name),
            name,
            base: Some(self.name.clone()),
            inherited: self.fields.len(),
            fields: self.fields.clone(),
        }
    }
}

/// Declares a [`ModelSchema`] one field at a time.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    title: String,
    base: Option<String>,
    inherited: usize,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: super::field::humanize(&name),
            name,
            base: None,
            inherited: 0,
            fields: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates every descriptor and freezes the schema.
    pub fn build(self) -> Result<ModelSchema, SchemaError> {
        let model = self.name.as_str();
        let mut names: HashSet<&str> = HashSet::with_capacity(self.fields.len());
        let mut labels: HashMap<&str, &str> = HashMap::with_capacity(self.fields.len());

        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName {
                    model: model.to_string(),
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    model: model.to_string(),
                    field: field.name.clone(),
                });
            }
            if let Some(first) = labels.insert(field.label.as_str(), field.name.as_str()) {
                return Err(SchemaError::DuplicateLabel {
                    model: model.to_string(),
                    label: field.label.clone(),
                    first: first.to_string(),
                    second: field.name.clone(),
                });
            }
            check_field(model, field)?;
        }

        debug!(
            model,
            base = ?self.base,
            fields = self.fields.len(),
            inherited = self.inherited,
            "built model schema"
        );

        Ok(ModelSchema {
            name: self.name,
            title: self.title,
            base: self.base,
            inherited: self.inherited,
            fields: self.fields,
        })
    }
}

fn check_field(model: &str, field: &FieldDescriptor) -> Result<(), SchemaError> {
    let kind = field.value_kind;

    if !field.widget.accepts(kind) {
        return Err(SchemaError::WidgetMismatch {
            model: model.to_string(),
            field: field.name.clone(),
            widget: field.widget.to_string(),
            kind: kind.to_string(),
        });
    }

    if field.widget.needs_choices() && field.choices.is_empty() {
        return Err(SchemaError::EmptyChoices {
            model: model.to_string(),
            field: field.name.clone(),
            widget: field.widget.to_string(),
        });
    }

    for rule in &field.rules {
        if !rule.applies_to(kind) {
            return Err(SchemaError::InvalidRule {
                model: model.to_string(),
                field: field.name.clone(),
                message: format!("rule {} does not apply to {} values", rule.name(), kind),
            });
        }
        if let super::field::ValidationRule::Pattern { pattern } = rule {
            pattern.regex().map_err(|e| SchemaError::InvalidPattern {
                model: model.to_string(),
                field: field.name.clone(),
                message: e.to_string(),
            })?;
        }
    }

    // Required fields may start out null; anything else must already be valid.
    if !field.default.is_null() {
        field
            .validate(field.default.clone())
            .map_err(|e| SchemaError::InvalidRule {
                model: model.to_string(),
                field: field.name.clone(),
                message: format!("invalid default: {}", e),
            })?;
    }

    Ok(())
}
