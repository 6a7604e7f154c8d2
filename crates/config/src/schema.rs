//! Schema contract definitions

use crate::binder::View;
use std::any::TypeId;
use types::{ConversionError, TypeDescriptor, Value};

/// Stable identity of a contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId(TypeId);

impl ContractId {
    /// Identity derived from a marker type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// Lazily resolved schema of a nested contract
pub type SchemaFn = fn() -> &'static ContractSchema;

/// What an accessor returns
#[derive(Debug, Clone)]
pub enum AccessorKind {
    /// A convertible value with its default
    Value { ty: TypeDescriptor, default: Value },
    /// A nested contract bound over the same entries
    Contract(SchemaFn),
}

/// One named, typed field of a contract
#[derive(Debug, Clone)]
pub struct Accessor {
    name: &'static str,
    rename: Option<&'static str>,
    kind: AccessorKind,
}

impl Accessor {
    /// Value accessor with an explicit descriptor
    pub fn value(name: &'static str, ty: TypeDescriptor, default: Value) -> Self {
        Self {
            name,
            rename: None,
            kind: AccessorKind::Value { ty, default },
        }
    }

    /// Value accessor whose descriptor and default come from a Rust type
    pub fn typed<T: ConfigType>(name: &'static str, default: T) -> Self {
        Self::value(name, T::descriptor(), default.into_value())
    }

    /// Nested contract accessor
    pub fn contract(name: &'static str, schema: SchemaFn) -> Self {
        Self {
            name,
            rename: None,
            kind: AccessorKind::Contract(schema),
        }
    }

    /// Read the entry under `key` instead of the accessor name
    pub fn renamed(mut self, key: &'static str) -> Self {
        self.rename = Some(key);
        self
    }

    /// Accessor name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key looked up in the entry store
    pub fn lookup_key(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }

    /// Declared return kind
    pub fn kind(&self) -> &AccessorKind {
        &self.kind
    }
}

/// Immutable description of a configuration shape
#[derive(Debug, Clone)]
pub struct ContractSchema {
    id: ContractId,
    name: &'static str,
    accessors: Vec<Accessor>,
}

impl ContractSchema {
    /// Create a new contract schema
    pub fn new(id: ContractId, name: &'static str, accessors: Vec<Accessor>) -> Self {
        Self {
            id,
            name,
            accessors,
        }
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Index and definition of the accessor called `name`
    pub fn find(&self, name: &str) -> Option<(usize, &Accessor)> {
        self.accessors
            .iter()
            .enumerate()
            .find(|(_, accessor)| accessor.name == name)
    }
}

/// A typed view type generated for one contract
pub trait Contract<'a>: Sized {
    /// The contract's schema, built once
    fn schema() -> &'static ContractSchema;

    /// Wrap an untyped view bound to [`Contract::schema`]
    fn from_view(view: View<'a>) -> Self;
}

/// Rust types that can be the return type of a value accessor
pub trait ConfigType: Sized {
    /// Descriptor the converter dispatches on
    fn descriptor() -> TypeDescriptor;

    /// Extract from a converted value
    fn from_value(value: Value) -> Result<Self, ConversionError>;

    /// Wrap as a value, used for defaults
    fn into_value(self) -> Value;
}

fn type_mismatch<T: ConfigType>(found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: T::descriptor().to_string(),
        found: found.kind().to_string(),
    }
}

macro_rules! primitive_config_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ConfigType for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(type_mismatch::<Self>(&other)),
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

primitive_config_type! {
    String => String,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    char => Char,
}

impl<T: ConfigType> ConfigType for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::descriptor())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(type_mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(T::into_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_accessor_lookup_key() {
        let plain = Accessor::typed("intArg", 1i32);
        assert_eq!(plain.lookup_key(), "intArg");

        let renamed = Accessor::typed("userHome", String::new()).renamed("user.home");
        assert_eq!(renamed.name(), "userHome");
        assert_eq!(renamed.lookup_key(), "user.home");
    }

    #[test]
    fn test_typed_accessor_descriptor_and_default() {
        let accessor = Accessor::typed("ids", vec![1i64, 2]);
        match accessor.kind() {
            AccessorKind::Value { ty, default } => {
                assert_eq!(*ty, TypeDescriptor::array_of(TypeDescriptor::Long));
                assert_eq!(*default, Value::Array(vec![Value::Long(1), Value::Long(2)]));
            }
            AccessorKind::Contract(_) => panic!("expected a value accessor"),
        }
    }

    #[test]
    fn test_schema_find() {
        let schema = ContractSchema::new(
            ContractId::of::<Marker>(),
            "Marker",
            vec![Accessor::typed("a", 1i32), Accessor::typed("b", false)],
        );

        assert_eq!(schema.find("b").map(|(index, _)| index), Some(1));
        assert!(schema.find("c").is_none());
    }

    #[test]
    fn test_from_value_mismatch() {
        assert_eq!(i32::from_value(Value::Int(3)), Ok(3));
        assert_eq!(
            i32::from_value(Value::Long(3)),
            Err(ConversionError::TypeMismatch {
                expected: "int".to_string(),
                found: "long".to_string()
            })
        );
        assert_eq!(
            Vec::<String>::from_value(Value::Array(vec![Value::String("a".to_string())])),
            Ok(vec!["a".to_string()])
        );
    }
}
