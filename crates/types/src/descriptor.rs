//! Type descriptors that drive conversion

use std::fmt;

/// Literal names of a configuration enum, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumSchema {
    /// Enum type name
    pub name: &'static str,
    /// Accepted literal names
    pub variants: &'static [&'static str],
}

impl EnumSchema {
    /// Create a new enum schema
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    /// Position of an exact-match literal name
    pub fn position(&self, literal: &str) -> Option<usize> {
        self.variants.iter().position(|variant| *variant == literal)
    }
}

/// Declared return type of a value accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    Enum(EnumSchema),
    Array(Box<TypeDescriptor>),
    /// A declared type with no conversion rule
    Opaque(&'static str),
}

impl TypeDescriptor {
    /// Array of the given element type
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::String => write!(f, "string"),
            TypeDescriptor::Byte => write!(f, "byte"),
            TypeDescriptor::Short => write!(f, "short"),
            TypeDescriptor::Int => write!(f, "int"),
            TypeDescriptor::Long => write!(f, "long"),
            TypeDescriptor::Float => write!(f, "float"),
            TypeDescriptor::Double => write!(f, "double"),
            TypeDescriptor::Boolean => write!(f, "boolean"),
            TypeDescriptor::Char => write!(f, "char"),
            TypeDescriptor::Enum(schema) => write!(f, "enum {}", schema.name),
            TypeDescriptor::Array(element) => write!(f, "{}[]", element),
            TypeDescriptor::Opaque(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODE: EnumSchema = EnumSchema::new("Mode", &["FAST", "SLOW"]);

    #[test]
    fn test_enum_position_is_exact_match() {
        assert_eq!(MODE.position("SLOW"), Some(1));
        assert_eq!(MODE.position("slow"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeDescriptor::array_of(TypeDescriptor::Long).to_string(), "long[]");
        assert_eq!(TypeDescriptor::Enum(MODE).to_string(), "enum Mode");
        assert_eq!(TypeDescriptor::Opaque("Duration").to_string(), "Duration");
    }
}
