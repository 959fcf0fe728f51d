use std::fmt;

/// Identity of a managed method.
///
/// Used to re-locate the method inside the managed program at call time and
/// to name the method in diagnostics.
///
/// # Examples
///
/// ```
/// use wasm_glue_core::MethodIdentity;
///
/// let id = MethodIdentity::new("Guest", "Guest.App", "Program", "HelloFrom");
/// assert_eq!(id.to_string(), "Guest.App.Program::HelloFrom");
/// assert_eq!(id.internal_call_name(), "Guest.App.Program::HelloFrom");
///
/// // Global namespace
/// let global = MethodIdentity::new("Guest", "", "Interop", "Hello");
/// assert_eq!(global.to_string(), "Interop::Hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodIdentity {
    /// Containing assembly name, without extension (e.g., "Guest")
    pub assembly: String,
    /// Dotted namespace (e.g., "Guest.App"); empty for the global namespace
    pub namespace: String,
    /// Simple name of the containing type (e.g., "Program")
    pub containing_type: String,
    /// Simple method name (e.g., "HelloFrom")
    pub name: String,
}

impl MethodIdentity {
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
        }
    }

    /// Check if the containing type lives in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// `Namespace.Type`, or just `Type` in the global namespace.
    pub fn type_path(&self) -> String {
        if self.is_global() {
            self.containing_type.clone()
        } else {
            format!("{}.{}", self.namespace, self.containing_type)
        }
    }

    /// The name the managed runtime binds internal calls under
    /// (`Namespace.Type::Method`).
    pub fn internal_call_name(&self) -> String {
        format!("{}::{}", self.type_path(), self.name)
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_path(), self.name)
    }
}
