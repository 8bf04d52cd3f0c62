use thiserror::Error;

use super::field::ExclusionReason;

/// Errors that can occur while reading, writing or describing fragment fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The field is declared but excluded from the schema, so it takes no part
    /// in cloning, persistence, sync or property editing
    #[error("Field '{field}' of {type_name} is not eligible for copy/persist ({reason})")]
    SchemaIneligible {
        type_name: &'static str,
        field: String,
        reason: ExclusionReason,
    },

    /// No field with this name is declared on the fragment type
    #[error("{type_name} declares no field named '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// The value handed to a field does not fit the field's kind
    #[error("Field '{field}' of {type_name} expects {expected}, got {actual}")]
    KindMismatch {
        type_name: &'static str,
        field: String,
        expected: String,
        actual: &'static str,
    },

    /// A property map entry could not be parsed as the field's kind
    #[error("Cannot parse '{text}' for field '{field}' of {type_name}")]
    ParseFailed {
        type_name: &'static str,
        field: String,
        text: String,
    },

    /// The fragment refused the value (custom validation in `set_field`)
    #[error("Field '{field}' of {type_name} rejected value: {reason}")]
    Rejected {
        type_name: &'static str,
        field: String,
        reason: String,
    },
}

impl SchemaError {
    pub fn unknown_field(type_name: &'static str, field: &str) -> Self {
        SchemaError::UnknownField {
            type_name,
            field: field.to_string(),
        }
    }

    pub fn rejected(type_name: &'static str, field: &str, reason: impl Into<String>) -> Self {
        SchemaError::Rejected {
            type_name,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while turning a `StateBlob` into bytes and back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateBlobError {
    #[error("Failed to encode state blob: {0}")]
    Encode(String),

    #[error("Failed to decode state blob: {0}")]
    Decode(String),
}
