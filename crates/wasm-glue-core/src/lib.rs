//! Core types for wasm-glue.
//!
//! This crate holds everything the generation passes share:
//!
//! - [`symbol`]: the collector input contract supplied by the analysis pass
//! - [`descriptor`]: normalized method and parameter descriptors
//! - [`category`]: semantic categories and primitive kinds
//! - [`naming`]: identifier normalization and C literal escaping
//! - [`error`]: the error taxonomy

pub mod category;
pub mod descriptor;
pub mod error;
mod identity;
pub mod naming;
pub mod symbol;

pub use category::{PrimitiveKind, SemanticCategory};
pub use descriptor::{Direction, ForeignBinding, MethodDescriptor, ParameterDescriptor};
pub use error::{
    ConfigurationError, ConfigurationErrorKind, GenerationError, RuleError, RuntimeFault,
    UnsupportedReason, UnsupportedTypeError,
};
pub use identity::MethodIdentity;
pub use naming::{c_identifier, c_string_literal, to_lower_snake_case};
pub use symbol::{
    AttributeArgument, AttributeData, MethodFlags, MethodSymbol, ParameterSymbol, TypeRef,
    TypeShape,
};
