//! Widget and value kinds.
//!
//! The value kind is the semantic type stored for a field; the widget kind is the
//! control the admin shell uses to render and edit it. Every widget accepts a fixed
//! set of value kinds, which is what keeps `checkbox ⇒ bool` and friends honest.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Bool,
    Text,
    Integer,
    Float,
    #[serde(rename = "datetime")]
    DateTime,
    /// List of strings (roles, permissions, multi-select choices)
    List,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::DateTime => "datetime",
            ValueKind::List => "list",
        }
    }

    /// Whether length rules (`min_length`, `max_length`) make sense for this kind.
    pub fn has_length(&self) -> bool {
        matches!(self, ValueKind::Text | ValueKind::List)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The UI control used to render and edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Checkbox,
    Text,
    TextArea,
    Password,
    Email,
    Url,
    Number,
    Date,
    DateTime,
    Select,
    MultiSelect,
    Upload,
    Color,
}

impl WidgetKind {
    /// The widget used when a field does not pick one explicitly.
    pub fn default_for(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => WidgetKind::Checkbox,
            ValueKind::Text => WidgetKind::Text,
            ValueKind::Integer | ValueKind::Float => WidgetKind::Number,
            ValueKind::DateTime => WidgetKind::DateTime,
            ValueKind::List => WidgetKind::MultiSelect,
        }
    }

    /// Whether this widget can render and edit a value of `kind`.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            WidgetKind::Checkbox => kind == ValueKind::Bool,
            WidgetKind::Text => matches!(
                kind,
                ValueKind::Text | ValueKind::Integer | ValueKind::Float
            ),
            WidgetKind::TextArea
            | WidgetKind::Password
            | WidgetKind::Email
            | WidgetKind::Url
            | WidgetKind::Upload
            | WidgetKind::Color => kind == ValueKind::Text,
            WidgetKind::Number => kind.is_numeric(),
            WidgetKind::Date | WidgetKind::DateTime => kind == ValueKind::DateTime,
            WidgetKind::Select => kind == ValueKind::Text,
            WidgetKind::MultiSelect => kind == ValueKind::List,
        }
    }

    /// Select-style widgets need a declared set of options.
    pub fn needs_choices(&self) -> bool {
        matches!(self, WidgetKind::Select | WidgetKind::MultiSelect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Text => "text",
            WidgetKind::TextArea => "text-area",
            WidgetKind::Password => "password",
            WidgetKind::Email => "email",
            WidgetKind::Url => "url",
            WidgetKind::Number => "number",
            WidgetKind::Date => "date",
            WidgetKind::DateTime => "date-time",
            WidgetKind::Select => "select",
            WidgetKind::MultiSelect => "multi-select",
            WidgetKind::Upload => "upload",
            WidgetKind::Color => "color",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
