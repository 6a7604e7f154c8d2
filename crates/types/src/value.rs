//! Raw and typed configuration values

use crate::descriptor::TypeDescriptor;
use serde::Serialize;

/// A resolved enum literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumLiteral {
    /// Enum type name
    pub enum_name: &'static str,
    /// Matched literal name
    pub literal: &'static str,
}

/// A typed value produced by conversion or supplied pre-typed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    Enum(EnumLiteral),
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::Char(_) => "char",
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
        }
    }

    /// Whether the value already has exactly the described type
    pub fn has_type(&self, target: &TypeDescriptor) -> bool {
        match (self, target) {
            (Value::String(_), TypeDescriptor::String)
            | (Value::Byte(_), TypeDescriptor::Byte)
            | (Value::Short(_), TypeDescriptor::Short)
            | (Value::Int(_), TypeDescriptor::Int)
            | (Value::Long(_), TypeDescriptor::Long)
            | (Value::Float(_), TypeDescriptor::Float)
            | (Value::Double(_), TypeDescriptor::Double)
            | (Value::Boolean(_), TypeDescriptor::Boolean)
            | (Value::Char(_), TypeDescriptor::Char) => true,
            (Value::Enum(literal), TypeDescriptor::Enum(schema)) => {
                literal.enum_name == schema.name && schema.position(literal.literal).is_some()
            }
            (Value::Array(items), TypeDescriptor::Array(element)) => {
                items.iter().all(|item| item.has_type(element))
            }
            _ => false,
        }
    }

    /// Integer payload widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }
}

/// An unconverted entry value as held by the entry store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Scalar string, e.g. from `--key=value` or a property
    Text(String),
    /// Bare flag, e.g. from `--key`
    Flag(bool),
    /// Values accumulated from repeated `--key=value` tokens
    List(Vec<String>),
    /// A pre-typed value merged from a mapping
    Typed(Value),
}

impl RawValue {
    /// Short name of the raw value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "string",
            RawValue::Flag(_) => "flag",
            RawValue::List(_) => "list",
            RawValue::Typed(value) => value.kind(),
        }
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Flag(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::List(values)
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::Typed(value)
    }
}

macro_rules! typed_raw_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::Typed(Value::$variant(value))
                }
            }
        )*
    };
}

typed_raw_value! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
}
