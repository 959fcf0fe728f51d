//! Generator configuration.
//!
//! [`GeneratorConfig`] is built once and shared read-only by every pass.

use wasm_glue_core::AttributeData;

/// Conventional file name for the generated artifact.
pub const ARTIFACT_FILE_NAME: &str = "interop.gen.c";

/// Attribute names the collector recognizes, stored without the `Attribute` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationNames {
    pub export: Vec<String>,
    pub import: Vec<String>,
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            export: vec!["WasmExport".into(), "WasiExport".into()],
            import: vec!["WasmImport".into(), "WasiImport".into()],
        }
    }
}

impl AnnotationNames {
    pub fn is_export(&self, attribute: &AttributeData) -> bool {
        Self::matches(&self.export, attribute)
    }

    pub fn is_import(&self, attribute: &AttributeData) -> bool {
        Self::matches(&self.import, attribute)
    }

    fn matches(names: &[String], attribute: &AttributeData) -> bool {
        let short = attribute.short_name();
        names
            .iter()
            .any(|n| n.strip_suffix("Attribute").unwrap_or(n) == short)
    }
}

/// Settings that shape the generated artifact.
///
/// ```
/// use wasm_glue_compiler::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_init_function("register_imports")
///     .with_timer_stub(false);
/// assert_eq!(config.init_function, "register_imports");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Header declaring the managed runtime's embedding API.
    pub runtime_header: String,
    /// Appended to the assembly name when looking methods up.
    pub assembly_extension: String,
    /// Name of the initialization entry point the host calls once.
    pub init_function: String,
    /// Register a no-op `TimerQueue::SetTimeout` internal call.
    pub timer_stub: bool,
    pub annotations: AnnotationNames,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_header: "mono-wasi/driver.h".into(),
            assembly_extension: ".dll".into(),
            init_function: "attach_internal_calls".into(),
            timer_stub: true,
            annotations: AnnotationNames::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_runtime_header(mut self, header: impl Into<String>) -> Self {
        self.runtime_header = header.into();
        self
    }

    pub fn with_assembly_extension(mut self, extension: impl Into<String>) -> Self {
        self.assembly_extension = extension.into();
        self
    }

    pub fn with_init_function(mut self, name: impl Into<String>) -> Self {
        self.init_function = name.into();
        self
    }

    pub fn with_timer_stub(mut self, enabled: bool) -> Self {
        self.timer_stub = enabled;
        self
    }

    pub fn with_annotations(mut self, annotations: AnnotationNames) -> Self {
        self.annotations = annotations;
        self
    }
}
