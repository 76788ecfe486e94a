use thiserror::Error;

/// Schema construction failures.
///
/// Raised when a model's schema is built and cached alongside it, so a broken
/// model stays unusable until its declaration is fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("model {model} declares a field with an empty name")]
    EmptyName { model: String },

    #[error("duplicate field name '{field}' in model {model}")]
    DuplicateName { model: String, field: String },

    #[error("duplicate display label '{label}' in model {model} (fields '{first}' and '{second}')")]
    DuplicateLabel {
        model: String,
        label: String,
        first: String,
        second: String,
    },

    #[error("field '{field}' in model {model}: widget {widget} cannot edit {kind} values")]
    WidgetMismatch {
        model: String,
        field: String,
        widget: String,
        kind: String,
    },

    #[error("field '{field}' in model {model}: invalid pattern: {message}")]
    InvalidPattern {
        model: String,
        field: String,
        message: String,
    },

    #[error("field '{field}' in model {model}: {message}")]
    InvalidRule {
        model: String,
        field: String,
        message: String,
    },

    #[error("field '{field}' in model {model}: {widget} widget declares no choices")]
    EmptyChoices {
        model: String,
        field: String,
        widget: String,
    },

    #[error("model registered as '{registered}' builds a schema named '{built}'")]
    NameMismatch { registered: String, built: String },
}
