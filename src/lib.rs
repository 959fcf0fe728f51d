//! wasm-glue
//!
//! Generates the C glue that connects annotated managed methods to a
//! WebAssembly module boundary. Exports become callable thunks that forward
//! into the managed runtime; imports become foreign-declared externs that are
//! registered as internal calls.
//!
//! ```
//! use wasm_glue::prelude::*;
//!
//! let symbols = vec![
//!     MethodSymbol::new("Guest", "App", "Program", "HelloFrom")
//!         .with_flags(MethodFlags::STATIC | MethodFlags::HAS_BODY)
//!         .with_attribute(AttributeData::new("WasmExport", ["hello_from"]))
//!         .with_parameter("name", TypeRef::string())
//!         .with_return(TypeRef::string()),
//! ];
//! let artifact = wasm_glue::generate(symbols).unwrap();
//! assert!(artifact.as_str().contains("__attribute__((export_name(\"hello_from\")))"));
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub use wasm_glue_compiler as compiler;
pub use wasm_glue_core as core;
pub use wasm_glue_registry as registry;

pub use wasm_glue_compiler::{
    ARTIFACT_FILE_NAME, Artifact, GenerationError, Generator, GeneratorConfig,
};

pub mod prelude {
    pub use wasm_glue_compiler::{
        AnnotationNames, Artifact, GenerationError, Generator, GeneratorConfig,
    };
    pub use wasm_glue_core::{
        AttributeData, MethodDescriptor, MethodFlags, MethodSymbol, SemanticCategory, TypeRef,
        TypeShape,
    };
    pub use wasm_glue_registry::{MarshalingRules, MarshalingRulesBuilder};
}

/// Errors from [`generate_into`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Generate with the default configuration and the built-in rules.
pub fn generate<I>(symbols: I) -> Result<Artifact, GenerationError>
where
    I: IntoIterator<Item = core::MethodSymbol>,
{
    Generator::default().generate(symbols)
}

/// Generate and write the artifact as [`ARTIFACT_FILE_NAME`] inside `dir`.
///
/// Nothing is written when generation fails.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate_into<I>(generator: &Generator, symbols: I, dir: &Path) -> Result<PathBuf, Error>
where
    I: IntoIterator<Item = core::MethodSymbol>,
{
    let artifact = generator.generate(symbols)?;
    let path = dir.join(ARTIFACT_FILE_NAME);
    std::fs::File::create(&path)
        .and_then(|file| artifact.write_to(io::BufWriter::new(file)))
        .map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
    log::info!("wrote {} ({:016x})", path.display(), artifact.fingerprint());
    Ok(path)
}
