//! Glue emitter.
//!
//! The [`GlueEmitter`] turns bound methods into typed fragments:
//!
//! - exports become a [`HandleCache`] and an [`ExportThunk`]
//! - imports become an [`ImportDeclaration`] and a [`Registration`]
//!
//! plus the fixed [`HelperDefinition`]s every artifact starts with.
//!
//! # Example
//!
//! ```ignore
//! let emitter = GlueEmitter::new(&config);
//! let (cache, thunk) = emitter.emit_export(&bound_method, &symbols);
//! writer.push_handle_cache(cache);
//! writer.push_thunk(thunk);
//! ```

mod export;
mod helpers;
mod import;

use crate::assembly::{ExportThunk, HandleCache, HelperDefinition, ImportDeclaration, Registration};
use crate::config::GeneratorConfig;
use crate::passes::{BoundMethod, ExportSymbols, ImportSymbols};

/// Emits C fragments for bound methods.
pub struct GlueEmitter<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> GlueEmitter<'c> {
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// Fragments that open every artifact.
    pub fn helpers(&self) -> Vec<HelperDefinition> {
        helpers::definitions(self.config)
    }

    /// Registrations performed before any import is attached.
    pub fn builtin_registrations(&self) -> Vec<Registration> {
        helpers::builtin_registrations(self.config)
    }

    /// Emit the handle cache and thunk for an export.
    pub fn emit_export(
        &self,
        method: &BoundMethod<'_>,
        symbols: &ExportSymbols,
    ) -> (HandleCache, ExportThunk) {
        export::emit(self.config, method, symbols)
    }

    /// Emit the extern declaration and its registration for an import.
    pub fn emit_import(
        &self,
        method: &BoundMethod<'_>,
        symbols: &ImportSymbols,
    ) -> (ImportDeclaration, Registration) {
        import::emit(method, symbols)
    }
}

/// Line-oriented C source buffer with four-space indentation.
#[derive(Debug, Default)]
struct CodeBuffer {
    out: String,
    depth: usize,
}

impl CodeBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Write `header` followed by ` {` and indent.
    fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}
