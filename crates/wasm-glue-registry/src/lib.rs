//! Marshaling rule registry.
//!
//! Decides, per parameter type, which native declaration, transform, call
//! argument and cleanup the glue emitter writes.

mod registry;
mod rule;

pub use registry::{MarshalingRules, MarshalingRulesBuilder, normalize_type_name};
pub use rule::{Declaration, MarshalingRule, Ownership, PLACEHOLDER, Template, Transform};
