//! Semantic categories used to select marshaling rules.

use std::fmt;

/// Built-in value types that cross the boundary by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 11] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// The managed keyword for this primitive.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "sbyte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Uint8 => "byte",
            PrimitiveKind::Uint16 => "ushort",
            PrimitiveKind::Uint32 => "uint",
            PrimitiveKind::Uint64 => "ulong",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// The runtime type name (`System.Int32` without the namespace), lowercased.
    pub const fn runtime_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Int8 => "sbyte",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "byte",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "single",
            PrimitiveKind::Double => "double",
        }
    }

    /// The C type used in thunk declarations.
    pub const fn c_type(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8_t",
            PrimitiveKind::Int16 => "int16_t",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "int64_t",
            PrimitiveKind::Uint8 => "uint8_t",
            PrimitiveKind::Uint16 => "uint16_t",
            PrimitiveKind::Uint32 => "uint32_t",
            PrimitiveKind::Uint64 => "uint64_t",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classification of a parameter's type for marshaling.
///
/// `Struct` exists so classification is total; it never has a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticCategory {
    Primitive(PrimitiveKind),
    String,
    Array,
    Object,
    Interface,
    Struct,
}

impl SemanticCategory {
    /// Category name as used in rule tables and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            SemanticCategory::Primitive(kind) => kind.name(),
            SemanticCategory::String => "string",
            SemanticCategory::Array => "array",
            SemanticCategory::Object => "object",
            SemanticCategory::Interface => "interface",
            SemanticCategory::Struct => "struct",
        }
    }

    pub const fn is_primitive(self) -> bool {
        matches!(self, SemanticCategory::Primitive(_))
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(PrimitiveKind::Int32.name(), "int");
        assert_eq!(PrimitiveKind::Int32.runtime_name(), "int32");
        assert_eq!(PrimitiveKind::Int32.c_type(), "int");
        assert_eq!(PrimitiveKind::Float.runtime_name(), "single");
    }

    #[test]
    fn category_names() {
        assert_eq!(
            SemanticCategory::Primitive(PrimitiveKind::Bool).to_string(),
            "bool"
        );
        assert_eq!(SemanticCategory::Array.name(), "array");
        assert!(!SemanticCategory::Object.is_primitive());
    }

    #[test]
    fn all_primitives_have_distinct_runtime_names() {
        let mut names: Vec<_> = PrimitiveKind::ALL.iter().map(|k| k.runtime_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PrimitiveKind::ALL.len());
    }
}
