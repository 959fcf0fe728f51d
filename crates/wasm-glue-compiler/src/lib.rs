//! Glue generator
//!
//! Turns annotated managed methods into a single C artifact that bridges them
//! across the WebAssembly module boundary.
//!
//! ## Architecture
//!
//! - **Pass 1 (Collection)**: Filter annotated methods and validate their annotations
//! - **Pass 2 (Binding)**: Resolve every parameter against the marshaling rules
//! - **Emission**: Turn bound methods into typed C fragments
//! - **Assembly**: Place fragments into fixed sections and render the artifact
//!
//! Every failure surfaces before emission starts, so a batch either produces a
//! complete artifact or nothing.
//!
//! ## Modules
//!
//! - [`assembly`]: Section-ordered artifact writer
//! - [`config`]: Generator settings and recognized annotation names
//! - [`emit`]: Export thunk, import extern and helper emission
//! - [`passes`]: Collection and binding passes

pub mod assembly;
pub mod config;
pub mod emit;
pub mod passes;

pub use assembly::{
    Artifact, AssemblyWriter, ExportThunk, HandleCache, HelperDefinition, ImportDeclaration,
    Registration,
};
pub use config::{ARTIFACT_FILE_NAME, AnnotationNames, GeneratorConfig};
pub use emit::GlueEmitter;
pub use passes::{
    BoundMethod, BoundParameter, DescriptorCollector, ExportSymbols, ImportSymbols, MethodSymbols,
    bind,
};

// Re-export GenerationError from core for convenience
pub use wasm_glue_core::GenerationError;

use wasm_glue_core::{ConfigurationError, MethodDescriptor, MethodSymbol};
use wasm_glue_registry::MarshalingRules;

/// The main generator entry point.
///
/// Owns the configuration and the marshaling rules; both are read-only once
/// generation starts, so one generator can serve any number of batches.
#[derive(Debug, Default)]
pub struct Generator {
    config: GeneratorConfig,
    rules: MarshalingRules,
}

impl Generator {
    pub fn new(config: GeneratorConfig, rules: MarshalingRules) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn rules(&self) -> &MarshalingRules {
        &self.rules
    }

    /// Run only the collection pass.
    pub fn collect<I>(&self, symbols: I) -> Result<Vec<MethodDescriptor>, ConfigurationError>
    where
        I: IntoIterator<Item = MethodSymbol>,
    {
        DescriptorCollector::new(&self.config.annotations).collect(symbols)
    }

    /// Generate the artifact for a stream of method symbols.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate<I>(&self, symbols: I) -> Result<Artifact, GenerationError>
    where
        I: IntoIterator<Item = MethodSymbol>,
    {
        let methods = self.collect(symbols)?;
        self.generate_from_descriptors(&methods)
    }

    /// Generate the artifact for already-collected descriptors.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate_from_descriptors(
        &self,
        methods: &[MethodDescriptor],
    ) -> Result<Artifact, GenerationError> {
        let bound = bind(methods, &self.rules)?;

        let emitter = GlueEmitter::new(&self.config);
        let mut writer = AssemblyWriter::new(&self.config.init_function);

        for helper in emitter.helpers() {
            writer.push_helper(helper);
        }
        for registration in emitter.builtin_registrations() {
            writer.push_registration(registration);
        }

        for method in &bound {
            match &method.symbols {
                MethodSymbols::Export(symbols) => {
                    let (cache, thunk) = emitter.emit_export(method, symbols);
                    writer.push_handle_cache(cache);
                    writer.push_thunk(thunk);
                }
                MethodSymbols::Import(symbols) => {
                    let (declaration, registration) = emitter.emit_import(method, symbols);
                    writer.push_import(declaration);
                    writer.push_registration(registration);
                }
            }
        }

        let artifact = writer.finish();
        log::info!(
            "generated {} export(s) and {} import(s), fingerprint {:016x}",
            artifact.export_count(),
            artifact.import_count(),
            artifact.fingerprint()
        );
        Ok(artifact)
    }
}
