//! Unified error types for glue generation.
//!
//! Every generation-time failure aborts the whole batch: no partial artifact is
//! ever produced. The runtime failures that can only happen inside generated
//! code are modeled by [`RuntimeFault`], which renders the assertion the
//! emitter bakes into each thunk.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GenerationError (top-level wrapper)
//! ├── ConfigurationError   - missing/blank/misplaced annotation arguments
//! ├── UnsupportedTypeError - a parameter type with no marshaling rule
//! ├── DuplicateSymbol      - two methods mapping to the same C symbol
//! ├── IdentifierClash      - two names inside one thunk mapping to the same C identifier
//! └── RuleError            - an inconsistent marshaling rule set
//! ```

use std::fmt;

use thiserror::Error;

use crate::MethodIdentity;

// ============================================================================
// Configuration Errors
// ============================================================================

/// What exactly was wrong with an annotated method's declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationErrorKind {
    /// A positional attribute argument was not supplied at all.
    MissingArgument {
        attribute: String,
        position: usize,
        parameter: &'static str,
    },
    /// An attribute argument was supplied but is empty, whitespace or null.
    BlankArgument {
        attribute: String,
        parameter: &'static str,
    },
    /// The attribute was given an argument count it has no constructor for.
    ArgumentCount {
        attribute: String,
        expected: &'static str,
        found: usize,
    },
    /// The method carries both the export and the import annotation.
    ConflictingAnnotations,
    /// Imports are bound to free functions and cannot take a receiver.
    ImportNotStatic,
    /// Imports are implemented across the boundary and must not have a body.
    ImportHasBody,
}

impl fmt::Display for ConfigurationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationErrorKind::MissingArgument {
                attribute,
                position,
                parameter,
            } => write!(
                f,
                "attribute '{attribute}' is missing argument #{position} ({parameter})"
            ),
            ConfigurationErrorKind::BlankArgument {
                attribute,
                parameter,
            } => write!(f, "attribute '{attribute}' has a blank '{parameter}'"),
            ConfigurationErrorKind::ArgumentCount {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "attribute '{attribute}' expects {expected} argument(s), found {found}"
            ),
            ConfigurationErrorKind::ConflictingAnnotations => {
                write!(f, "method is annotated as both export and import")
            }
            ConfigurationErrorKind::ImportNotStatic => write!(f, "imported method must be static"),
            ConfigurationErrorKind::ImportHasBody => {
                write!(f, "imported method must be extern and have no body")
            }
        }
    }
}

/// A required annotation argument is missing or blank, or the annotated
/// method violates the shape its direction requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid annotation on {method}: {kind}")]
pub struct ConfigurationError {
    /// Fully qualified identity of the offending method.
    pub method: MethodIdentity,
    /// The specific problem.
    pub kind: ConfigurationErrorKind,
}

impl ConfigurationError {
    pub fn new(method: MethodIdentity, kind: ConfigurationErrorKind) -> Self {
        Self { method, kind }
    }
}

// ============================================================================
// Unsupported Types
// ============================================================================

/// Why a type could not be marshaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedReason {
    /// Structs have neither a handle representation nor a stable ABI here.
    StructParameter,
    /// No exact or structural rule matched.
    NoRule,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::StructParameter => {
                write!(f, "struct types cannot cross the boundary")
            }
            UnsupportedReason::NoRule => write!(f, "no marshaling rule matches"),
        }
    }
}

/// A parameter whose declared type has no resolvable marshaling rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type '{type_name}' for parameter '{parameter}' of {method}: {reason}")]
pub struct UnsupportedTypeError {
    pub method: MethodIdentity,
    pub parameter: String,
    /// The type as it was declared in the managed program.
    pub type_name: String,
    pub reason: UnsupportedReason,
}

// ============================================================================
// Marshaling Rule Errors
// ============================================================================

/// A marshaling rule set that would generate unbalanced code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The transform allocates a transient native value that nothing frees.
    #[error("rule for '{category}' allocates in its transform but has no cleanup")]
    UnpairedTransform { category: String },

    /// A cleanup with no transform has nothing of its own to release.
    #[error("rule for '{category}' has a cleanup but no transform")]
    UnpairedCleanup { category: String },

    /// Structs never cross the boundary, so no rule or alias may produce one.
    #[error("'{name}' cannot be mapped to the struct category")]
    ForbiddenCategory { name: String },

    /// Templates must reference the parameter identifier.
    #[error("template '{template}' for '{category}' does not reference the parameter")]
    UnboundTemplate { category: String, template: String },
}

// ============================================================================
// Runtime Faults
// ============================================================================

/// Failures that can only happen when generated code runs.
///
/// These are never recovered: the generated thunk asserts they do not occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeFault {
    /// The managed method handle could not be resolved at call time.
    UnresolvedHandle,
    /// The invoked managed method raised an exception.
    ForeignCallFault,
}

impl RuntimeFault {
    /// Render the C assertion guarding against this fault.
    ///
    /// `subject` is the handle-cache variable for [`RuntimeFault::UnresolvedHandle`]
    /// and the exception slot for [`RuntimeFault::ForeignCallFault`].
    pub fn assertion(self, subject: &str) -> String {
        match self {
            RuntimeFault::UnresolvedHandle => format!("assert({subject});"),
            RuntimeFault::ForeignCallFault => format!("assert(!{subject});"),
        }
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any failure that aborts a generation batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// Two methods would emit the same symbol into the artifact.
    #[error("{kind} '{symbol}' is produced by both {first} and {second}")]
    DuplicateSymbol {
        kind: &'static str,
        symbol: String,
        first: MethodIdentity,
        second: MethodIdentity,
    },

    /// Two parameters of one method, or a parameter and the method's handle
    /// cache, render to the same C identifier inside the thunk.
    #[error("identifier '{identifier}' is declared more than once in the glue for {method}")]
    IdentifierClash {
        method: MethodIdentity,
        identifier: String,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl GenerationError {
    /// The method the error is attributed to, if any.
    pub fn method(&self) -> Option<&MethodIdentity> {
        match self {
            GenerationError::Configuration(e) => Some(&e.method),
            GenerationError::UnsupportedType(e) => Some(&e.method),
            GenerationError::DuplicateSymbol { second, .. } => Some(second),
            GenerationError::IdentifierClash { method, .. } => Some(method),
            GenerationError::Rule(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> MethodIdentity {
        MethodIdentity::new("Guest", "Guest.App", "Program", "ArrayParam")
    }

    #[test]
    fn configuration_error_names_method() {
        let err = ConfigurationError::new(
            identity(),
            ConfigurationErrorKind::BlankArgument {
                attribute: "WasmExport".into(),
                parameter: "functionName",
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("Guest.App.Program::ArrayParam"), "{msg}");
        assert!(msg.contains("functionName"), "{msg}");
    }

    #[test]
    fn unsupported_type_names_type_and_parameter() {
        let err = UnsupportedTypeError {
            method: identity(),
            parameter: "point".into(),
            type_name: "Vector2".into(),
            reason: UnsupportedReason::StructParameter,
        };
        let msg = GenerationError::from(err).to_string();
        assert!(msg.contains("Vector2"));
        assert!(msg.contains("point"));
        assert!(msg.contains("struct"));
    }

    #[test]
    fn runtime_fault_assertions() {
        assert_eq!(
            RuntimeFault::UnresolvedHandle.assertion("method_hello"),
            "assert(method_hello);"
        );
        assert_eq!(
            RuntimeFault::ForeignCallFault.assertion("exception"),
            "assert(!exception);"
        );
    }

    #[test]
    fn identifier_clash_names_method_and_identifier() {
        let err = GenerationError::IdentifierClash {
            method: identity(),
            identifier: "nrs_ptr".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("nrs_ptr"), "{msg}");
        assert_eq!(err.method(), Some(&identity()));
    }

    #[test]
    fn rule_errors_have_no_method() {
        let err = GenerationError::from(RuleError::UnpairedCleanup {
            category: "string".into(),
        });
        assert!(err.method().is_none());
    }
}
