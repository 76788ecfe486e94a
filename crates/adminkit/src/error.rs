use thiserror::Error;

use crate::layout::LayoutError;
use crate::mapper::MappingError;
use crate::schema::SchemaError;

/// Save-time failures for a single field value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown field '{field}' on model {model}")]
    UnknownField { model: String, field: String },

    #[error("field '{field}' expects a {expected} value, got {actual}")]
    KindMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("field '{field}' is required")]
    Required { field: String },

    #[error("field '{field}': {message}")]
    Rule { field: String, message: String },

    #[error("field '{field}': cannot parse '{input}' as {kind}")]
    Parse {
        field: String,
        input: String,
        kind: String,
    },
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Record not found: {model}/{id}")]
    RecordNotFound { model: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Config error: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::Required {
            field: "SiteName".into(),
        };
        assert_eq!(err.to_string(), "field 'SiteName' is required");
    }

    #[test]
    fn record_not_found_display() {
        let err = AdminError::RecordNotFound {
            model: "AdminUser".into(),
            id: "42".into(),
        };
        assert_eq!(err.to_string(), "Record not found: AdminUser/42");
    }

    #[test]
    fn schema_error_is_transparent() {
        let err: AdminError = SchemaError::DuplicateName {
            model: "Settings".into(),
            field: "SiteName".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "duplicate field name 'SiteName' in model Settings"
        );
    }
}
