//! Type converter from raw entries to typed values

use std::str::FromStr;
use types::{utils, ConversionError, EnumLiteral, RawValue, TypeDescriptor, Value};

const FLOAT_EXACT_INTEGER: u64 = 1 << 24;
const DOUBLE_EXACT_INTEGER: u64 = 1 << 53;

/// Converts raw entry values into typed values, dispatched on the target type
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeConverter;

impl TypeConverter {
    /// Convert a raw value to the target type.
    ///
    /// Strings are parsed; accumulated lists are converted element-wise into
    /// arrays; flags and pre-typed values only pass if they are structurally
    /// representable as the target.
    pub fn convert(target: &TypeDescriptor, raw: &RawValue) -> Result<Value, ConversionError> {
        match raw {
            RawValue::Text(text) => Self::convert_str(target, text),
            RawValue::List(values) => match target {
                TypeDescriptor::Array(element) => values
                    .iter()
                    .map(|value| Self::convert_str(element, value))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                _ => Err(mismatch(target, raw.kind())),
            },
            RawValue::Flag(flag) => Self::coerce(target, &Value::Boolean(*flag)),
            RawValue::Typed(Value::String(text)) => Self::convert_str(target, text),
            RawValue::Typed(value) => Self::coerce(target, value),
        }
    }

    /// Parse a string according to the target type's rule
    pub fn convert_str(target: &TypeDescriptor, source: &str) -> Result<Value, ConversionError> {
        match target {
            TypeDescriptor::String => Ok(Value::String(source.to_string())),
            TypeDescriptor::Byte => parse(target, source).map(Value::Byte),
            TypeDescriptor::Short => parse(target, source).map(Value::Short),
            TypeDescriptor::Int => parse(target, source).map(Value::Int),
            TypeDescriptor::Long => parse(target, source).map(Value::Long),
            TypeDescriptor::Float => parse_decimal(target, source).map(Value::Float),
            TypeDescriptor::Double => parse_decimal(target, source).map(Value::Double),
            TypeDescriptor::Boolean => Ok(Value::Boolean(utils::parse_bool(source))),
            TypeDescriptor::Char => {
                let mut chars = source.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(ConversionError::AmbiguousCharacter {
                        literal: source.to_string(),
                    }),
                }
            }
            TypeDescriptor::Enum(schema) => schema
                .variants
                .iter()
                .copied()
                .find(|variant| *variant == source)
                .map(|literal| {
                    Value::Enum(EnumLiteral {
                        enum_name: schema.name,
                        literal,
                    })
                })
                .ok_or_else(|| invalid_literal(target, source)),
            TypeDescriptor::Array(element) => utils::split_list(source)
                .into_iter()
                .map(|piece| Self::convert_str(element, piece))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            TypeDescriptor::Opaque(_) => Err(ConversionError::UnsupportedConversion {
                target: target.to_string(),
            }),
        }
    }

    /// Accept an already typed value if it is representable as the target
    pub fn coerce(target: &TypeDescriptor, value: &Value) -> Result<Value, ConversionError> {
        if value.has_type(target) {
            return Ok(value.clone());
        }

        if let (TypeDescriptor::Array(element), Value::Array(items)) = (target, value) {
            return items
                .iter()
                .map(|item| Self::coerce(element, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }

        let coerced = match target {
            TypeDescriptor::Byte => value.as_i64().and_then(|n| i8::try_from(n).ok()).map(Value::Byte),
            TypeDescriptor::Short => value.as_i64().and_then(|n| i16::try_from(n).ok()).map(Value::Short),
            TypeDescriptor::Int => value.as_i64().and_then(|n| i32::try_from(n).ok()).map(Value::Int),
            TypeDescriptor::Long => value.as_i64().map(Value::Long),
            TypeDescriptor::Float => match value {
                Value::Double(d) if d.is_finite() && d.abs() <= f64::from(f32::MAX) => {
                    Some(Value::Float(*d as f32))
                }
                _ => value
                    .as_i64()
                    .filter(|n| n.unsigned_abs() <= FLOAT_EXACT_INTEGER)
                    .map(|n| Value::Float(n as f32)),
            },
            TypeDescriptor::Double => match value {
                Value::Float(f) => Some(Value::Double(f64::from(*f))),
                _ => value
                    .as_i64()
                    .filter(|n| n.unsigned_abs() <= DOUBLE_EXACT_INTEGER)
                    .map(|n| Value::Double(n as f64)),
            },
            _ => None,
        };

        coerced.ok_or_else(|| mismatch(target, value.kind()))
    }
}

fn parse<T: FromStr>(target: &TypeDescriptor, source: &str) -> Result<T, ConversionError> {
    source.parse().map_err(|_| invalid_literal(target, source))
}

/// Floating literals ignore surrounding whitespace and must contain a digit,
/// so `inf` and `NaN` are rejected
fn parse_decimal<T: FromStr>(target: &TypeDescriptor, source: &str) -> Result<T, ConversionError> {
    let trimmed = source.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Err(invalid_literal(target, source));
    }
    trimmed.parse().map_err(|_| invalid_literal(target, source))
}

fn invalid_literal(target: &TypeDescriptor, source: &str) -> ConversionError {
    ConversionError::InvalidLiteral {
        target: target.to_string(),
        literal: source.to_string(),
    }
}

fn mismatch(target: &TypeDescriptor, found: &str) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: target.to_string(),
        found: found.to_string(),
    }
}
