//! Shared types for the cfgbind system
//!
//! This crate contains the value, descriptor and error types shared between
//! the binding engine and its consumers.

pub mod descriptor;
pub mod error;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use descriptor::{EnumSchema, TypeDescriptor};
pub use error::{BindError, ConversionError, Result};
pub use value::{EnumLiteral, RawValue, Value};
