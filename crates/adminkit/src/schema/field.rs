//! Field descriptors and validation rules.
//!
//! A [`FieldDescriptor`] describes how one model field is labeled, rendered and
//! validated. Descriptors are declared with a builder chain, the explicit
//! registration that stands in for attribute reflection:
//!
//! ```
//! use adminkit::schema::{FieldDescriptor, ValueKind, WidgetKind};
//!
//! let field = FieldDescriptor::new("IsSiteLocked", ValueKind::Bool)
//!     .tooltip("Only administrators can sign in while the site is locked")
//!     .widget(WidgetKind::Checkbox)
//!     .list_visible();
//!
//! assert_eq!(field.label, "Is Site Locked");
//! assert!(field.list_visible);
//! ```

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use super::value::FieldValue;
use super::widget::{ValueKind, WidgetKind};
use crate::error::ValidationError;

/// A validation rule attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum ValidationRule {
    Required,
    MinLength { min: usize },
    MaxLength { max: usize },
    Range { min: f64, max: f64 },
    Pattern { pattern: Pattern },
}

/// A regular expression rule. The expression is compiled on first use (schema
/// build) and the compiled form travels with the descriptor.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: OnceCell<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceCell::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, regex::Error> {
        self.compiled
            .get_or_init(|| Regex::new(&self.source))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl ValidationRule {
    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::Required => "required",
            ValidationRule::MinLength { .. } => "min-length",
            ValidationRule::MaxLength { .. } => "max-length",
            ValidationRule::Range { .. } => "range",
            ValidationRule::Pattern { .. } => "pattern",
        }
    }

    /// Whether the rule can be evaluated against values of `kind`.
    pub fn applies_to(&self, kind: ValueKind) -> bool {
        match self {
            ValidationRule::Required => true,
            ValidationRule::MinLength { .. } | ValidationRule::MaxLength { .. } => {
                kind.has_length()
            }
            ValidationRule::Range { .. } => kind.is_numeric(),
            ValidationRule::Pattern { .. } => kind == ValueKind::Text,
        }
    }

    /// Checks a non-null value. `Required` is enforced by the descriptor.
    fn check(&self, field: &str, value: &FieldValue) -> Result<(), ValidationError> {
        let fail = |message: String| {
            Err(ValidationError::Rule {
                field: field.to_string(),
                message,
            })
        };

        match self {
            ValidationRule::Required => Ok(()),
            ValidationRule::MinLength { min } => match length_of(value) {
                Some(len) if len < *min => fail(format!("must have at least {} characters or items", min)),
                _ => Ok(()),
            },
            ValidationRule::MaxLength { max } => match length_of(value) {
                Some(len) if len > *max => fail(format!("must have at most {} characters or items", max)),
                _ => Ok(()),
            },
            ValidationRule::Range { min, max } => match value.as_f64() {
                Some(n) if !n.is_finite() => fail("must be a finite number".to_string()),
                Some(n) if n < *min || n > *max => {
                    fail(format!("must be between {} and {}", min, max))
                }
                _ => Ok(()),
            },
            ValidationRule::Pattern { pattern } => {
                let Some(text) = value.as_text() else {
                    return Ok(());
                };
                // Schema build already rejected patterns that do not compile.
                match pattern.regex() {
                    Ok(re) if re.is_match(text) => Ok(()),
                    Ok(_) => fail(format!("must match pattern {}", pattern)),
                    Err(e) => fail(format!("invalid pattern: {}", e)),
                }
            }
        }
    }
}

fn length_of(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::Text(s) => Some(s.chars().count()),
        FieldValue::List(v) => Some(v.len()),
        _ => None,
    }
}

/// Metadata describing how one model field is labeled, rendered and validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field identity within the model (e.g. "IsSiteLocked")
    pub name: String,

    /// Human readable label; defaults to the name split into words
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    /// The semantic type of the stored value
    pub value_kind: ValueKind,

    /// The control used to render and edit the value
    pub widget: WidgetKind,

    /// Whether the field appears as a column in list/grid views
    pub list_visible: bool,

    /// Optional group name used by generated layouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Value a new record starts with
    pub default: FieldValue,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,

    /// Allowed values for select widgets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor with the default label and widget for `kind`.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        let name = name.into();
        Self {
            label: humanize(&name),
            name,
            tooltip: None,
            value_kind: kind,
            widget: WidgetKind::default_for(kind),
            list_visible: false,
            group: None,
            default: FieldValue::Null,
            rules: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn widget(mut self, widget: WidgetKind) -> Self {
        self.widget = widget;
        self
    }

    /// Show the field as a column in list views.
    pub fn list_visible(mut self) -> Self {
        self.list_visible = true;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn required(self) -> Self {
        self.rule(ValidationRule::Required)
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(ValidationRule::MinLength { min })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(ValidationRule::MaxLength { max })
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.rule(ValidationRule::Range { min, max })
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.rule(ValidationRule::Pattern {
            pattern: Pattern::new(pattern),
        })
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Declares the allowed options for a select or multi-select widget.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&ValidationRule::Required)
    }

    /// Coerces `value` to this field's kind and checks every rule.
    ///
    /// Returns the coerced value on success. `Null` passes unless the field is
    /// required.
    pub fn validate(&self, value: FieldValue) -> Result<FieldValue, ValidationError> {
        let actual = value.kind_name();
        let value = value
            .coerce(self.value_kind)
            .ok_or_else(|| ValidationError::KindMismatch {
                field: self.name.clone(),
                expected: self.value_kind.to_string(),
                actual: actual.to_string(),
            })?;

        if value.is_null() {
            if self.is_required() {
                return Err(ValidationError::Required {
                    field: self.name.clone(),
                });
            }
            return Ok(value);
        }

        if self.is_required() && value.as_text().is_some_and(|s| s.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: self.name.clone(),
            });
        }

        for rule in &self.rules {
            rule.check(&self.name, &value)?;
        }

        if !self.choices.is_empty() {
            let offending = match &value {
                FieldValue::Text(s) => (!self.choices.contains(s)).then(|| s.clone()),
                FieldValue::List(items) => items.iter().find(|i| !self.choices.contains(i)).cloned(),
                _ => None,
            };
            if let Some(bad) = offending {
                return Err(ValidationError::Rule {
                    field: self.name.clone(),
                    message: format!("'{}' is not one of: {}", bad, self.choices.join(", ")),
                });
            }
        }

        Ok(value)
    }
}

/// Splits an identifier into words: "IsSiteLocked" → "Is Site Locked",
/// "posts_per_page" → "Posts per page".
pub fn humanize(name: &str) -> String {
    if name.contains('_') {
        let spaced = name.replace('_', " ");
        let mut chars = spaced.trim().chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }

    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // Break before an uppercase that follows a lowercase ("SiteName") or that
            // ends an acronym run ("CDNUrl" → "CDN Url").
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}
