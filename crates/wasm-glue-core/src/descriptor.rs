//! Normalized descriptions of annotated methods.
//!
//! Descriptors are built once per generation pass by the collector and read
//! by everything downstream. They are never mutated after construction.

use std::fmt;

use crate::{MethodIdentity, TypeRef, c_identifier};

/// Which side of the boundary implements the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Implemented in the managed program, callable from outside.
    Export,
    /// Declared in the managed program, implemented outside.
    Import,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Export => write!(f, "export"),
            Direction::Import => write!(f, "import"),
        }
    }
}

/// The external-facing identity of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ForeignBinding {
    /// Foreign namespace; empty when the attribute form has none.
    pub namespace: String,
    /// Foreign module; empty for exports.
    pub module: String,
    /// Foreign function name; never blank.
    pub function: String,
}

impl ForeignBinding {
    pub fn export(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Self::default()
        }
    }

    pub fn import(
        namespace: impl Into<String>,
        module: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            module: module.into(),
            function: function.into(),
        }
    }
}

/// One parameter of an annotated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Name as declared.
    pub identifier: String,
    /// Code-safe, lowercase, word-separated form of `identifier`.
    pub c_identifier: String,
    pub declared_type: TypeRef,
}

impl ParameterDescriptor {
    pub fn new(identifier: impl Into<String>, declared_type: TypeRef) -> Self {
        let identifier = identifier.into();
        Self {
            c_identifier: c_identifier(&identifier),
            identifier,
            declared_type,
        }
    }
}

/// One annotated method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub identity: MethodIdentity,
    pub direction: Direction,
    pub foreign: ForeignBinding,
    pub is_static: bool,
    /// Declaration order; call sites depend on it.
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
}

impl MethodDescriptor {
    /// Whether the call result has to be handed back across the boundary.
    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }

    /// Whether an implicit receiver is threaded through the thunk.
    ///
    /// Non-static exports take a leading receiver; static exports and all
    /// imports do not.
    pub fn takes_receiver(&self) -> bool {
        self.direction == Direction::Export && !self.is_static
    }

    pub fn is_export(&self) -> bool {
        self.direction == Direction::Export
    }

    pub fn is_import(&self) -> bool {
        self.direction == Direction::Import
    }
}
