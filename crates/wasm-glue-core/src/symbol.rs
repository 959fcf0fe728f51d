//! Collector input contract.
//!
//! These records are what the external static-analysis pass hands over for
//! every method it visits. They carry no behavior beyond small queries; the
//! collector decides which of them become descriptors.

use bitflags::bitflags;

use crate::MethodIdentity;

bitflags! {
    /// Declaration modifiers of a method symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        /// No implicit receiver.
        const STATIC = 1 << 0;
        /// Declared `extern`; the implementation is supplied elsewhere.
        const EXTERN = 1 << 1;
        /// The declaration has a body.
        const HAS_BODY = 1 << 2;
    }
}

/// Structural kind of a declared type, as reported by the analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Void,
    /// Built-in value types (int, bool, ...).
    Primitive,
    Class,
    Interface,
    Array,
    Struct,
    Enum,
    Pointer,
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Type name as declared (e.g., "String", "Int32", "Vector2").
    pub name: String,
    pub shape: TypeShape,
    /// Element type for arrays.
    pub element: Option<Box<TypeRef>>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            element: None,
        }
    }

    pub fn void() -> Self {
        Self::new("Void", TypeShape::Void)
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, TypeShape::Primitive)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeShape::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeShape::Interface)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeShape::Struct)
    }

    /// The managed `string` type, which is a class under the hood.
    pub fn string() -> Self {
        Self::class("String")
    }

    /// An array of `element`, named the way the analysis pass names them (`Int32[]`).
    pub fn array_of(element: TypeRef) -> Self {
        Self {
            name: format!("{}[]", element.name),
            shape: TypeShape::Array,
            element: Some(Box::new(element)),
        }
    }

    pub fn is_void(&self) -> bool {
        self.shape == TypeShape::Void
    }
}

/// A positional attribute argument list entry. `None` is a null literal.
pub type AttributeArgument = Option<String>;

/// An attribute attached to a method symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeData {
    /// Attribute class name, with or without the `Attribute` suffix.
    pub name: String,
    /// Positional constructor arguments, in declaration order.
    pub arguments: Vec<AttributeArgument>,
}

impl AttributeData {
    pub fn new<I, S>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(|a| Some(a.into())).collect(),
        }
    }

    /// Attribute name without the conventional `Attribute` suffix.
    pub fn short_name(&self) -> &str {
        self.name.strip_suffix("Attribute").unwrap_or(&self.name)
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeRef,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One method as visited by the analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub assembly: String,
    pub namespace: String,
    pub containing_type: String,
    pub name: String,
    pub flags: MethodFlags,
    pub attributes: Vec<AttributeData>,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeRef,
}

impl MethodSymbol {
    /// A method with a body, no attributes, no parameters and a void return.
    pub fn new(
        assembly: impl Into<String>,
        namespace: impl Into<String>,
        containing_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            assembly: assembly.into(),
            namespace: namespace.into(),
            containing_type: containing_type.into(),
            name: name.into(),
            flags: MethodFlags::HAS_BODY,
            attributes: Vec::new(),
            parameters: Vec::new(),
            return_type: TypeRef::void(),
        }
    }

    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(ParameterSymbol::new(name, ty));
        self
    }

    pub fn with_return(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    pub fn identity(&self) -> MethodIdentity {
        MethodIdentity::new(
            self.assembly.as_str(),
            self.namespace.as_str(),
            self.containing_type.as_str(),
            self.name.as_str(),
        )
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_short_name() {
        assert_eq!(
            AttributeData::new("WasmExportAttribute", ["x"]).short_name(),
            "WasmExport"
        );
        assert_eq!(
            AttributeData::new("WasmExport", ["x"]).short_name(),
            "WasmExport"
        );
    }

    #[test]
    fn array_type_names_follow_element() {
        let ty = TypeRef::array_of(TypeRef::primitive("Int32"));
        assert_eq!(ty.name, "Int32[]");
        assert_eq!(ty.shape, TypeShape::Array);
        assert_eq!(ty.element.as_deref(), Some(&TypeRef::primitive("Int32")));
    }

    #[test]
    fn builder_defaults() {
        let symbol = MethodSymbol::new("Guest", "App", "Program", "Main");
        assert!(symbol.flags.contains(MethodFlags::HAS_BODY));
        assert!(!symbol.is_static());
        assert!(symbol.return_type.is_void());
        assert_eq!(symbol.identity().to_string(), "App.Program::Main");
    }
}
