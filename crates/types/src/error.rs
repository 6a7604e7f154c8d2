//! Error types for the cfgbind system

use thiserror::Error;

/// Main error type for configuration binding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// A token handed to `add_tokens` lacks the `--` prefix
    #[error("Malformed argument '{argument}': expected --key or --key=value")]
    MalformedArgument { argument: String },

    /// Converting the raw entry behind an accessor failed
    #[error("Conversion error for '{key}': {source}")]
    Conversion {
        key: String,
        #[source]
        source: ConversionError,
    },

    /// Name-based lookup of an accessor the contract does not declare
    #[error("Contract {contract} has no accessor named '{accessor}'")]
    UnknownAccessor { contract: String, accessor: String },

    /// An external configuration source could not be loaded
    #[error("Configuration source error: {source_name}: {message}")]
    Source { source_name: String, message: String },
}

impl BindError {
    /// Wrap a converter failure with the lookup key it happened on
    pub fn conversion(key: impl Into<String>, source: ConversionError) -> Self {
        BindError::Conversion {
            key: key.into(),
            source,
        }
    }

    /// The converter failure behind this error, if any
    pub fn conversion_error(&self) -> Option<&ConversionError> {
        match self {
            BindError::Conversion { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, BindError>;

/// Type conversion specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Target type has no conversion rule
    #[error("Unsupported conversion to {target}")]
    UnsupportedConversion { target: String },

    /// Raw string does not parse as the numeric or enum target
    #[error("Invalid {target} literal: '{literal}'")]
    InvalidLiteral { target: String, literal: String },

    /// Character target with an input that is not exactly one character
    #[error("Character conversion needs exactly one character, got '{literal}'")]
    AmbiguousCharacter { literal: String },

    /// Non-string raw value that cannot stand in for the target type
    #[error("Cannot convert {found} to {expected}")]
    TypeMismatch { expected: String, found: String },
}
