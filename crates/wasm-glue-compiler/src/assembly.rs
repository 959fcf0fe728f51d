//! Assembly of emitted fragments into the output artifact.
//!
//! Each fragment kind is a distinct type that the [`AssemblyWriter`] only
//! accepts into its own section, so the section order of the artifact is
//! fixed regardless of the order fragments are produced in:
//!
//! ```text
//! helpers            (banner, includes, runtime prototypes, helper functions)
//! import externs     (collector order)
//! handle caches      (collector order)
//! export thunks      (collector order)
//! init function      (builtin registrations, then imports in collector order)
//! ```

use std::fmt;
use std::io;

use xxhash_rust::xxh64::xxh64;

macro_rules! fragment {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub(crate) fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            pub fn code(&self) -> &str {
                &self.0
            }
        }
    };
}

fragment!(
    /// Top-of-file definitions: banner, includes, helper functions.
    HelperDefinition
);
fragment!(
    /// A foreign-declared extern function for one import.
    ImportDeclaration
);
fragment!(
    /// The lazily-initialized method handle for one export.
    HandleCache
);
fragment!(
    /// The boundary-crossing function for one export.
    ExportThunk
);
fragment!(
    /// One statement of the initialization function.
    Registration
);

/// Collects fragments into their sections and renders them in order.
#[derive(Debug, Default)]
pub struct AssemblyWriter {
    init_function: String,
    helpers: Vec<HelperDefinition>,
    imports: Vec<ImportDeclaration>,
    caches: Vec<HandleCache>,
    thunks: Vec<ExportThunk>,
    registrations: Vec<Registration>,
}

impl AssemblyWriter {
    pub fn new(init_function: impl Into<String>) -> Self {
        Self {
            init_function: init_function.into(),
            ..Self::default()
        }
    }

    pub fn push_helper(&mut self, fragment: HelperDefinition) {
        self.helpers.push(fragment);
    }

    pub fn push_import(&mut self, fragment: ImportDeclaration) {
        self.imports.push(fragment);
    }

    pub fn push_handle_cache(&mut self, fragment: HandleCache) {
        self.caches.push(fragment);
    }

    pub fn push_thunk(&mut self, fragment: ExportThunk) {
        self.thunks.push(fragment);
    }

    pub fn push_registration(&mut self, fragment: Registration) {
        self.registrations.push(fragment);
    }

    /// Render all sections into the final artifact.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finish(self) -> Artifact {
        let mut out: Vec<String> = Vec::with_capacity(5);

        push_section(&mut out, &self.helpers, "\n\n", HelperDefinition::code);
        push_section(&mut out, &self.imports, "\n\n", ImportDeclaration::code);
        push_section(&mut out, &self.caches, "\n", HandleCache::code);
        push_section(&mut out, &self.thunks, "\n\n", ExportThunk::code);

        let mut init = format!("void {}(void) {{\n", self.init_function);
        for registration in &self.registrations {
            init.push_str("    ");
            init.push_str(registration.code());
            init.push('\n');
        }
        init.push('}');
        out.push(init);

        let mut text = out.join("\n\n");
        text.push('\n');

        Artifact {
            fingerprint: xxh64(text.as_bytes(), 0),
            exports: self.thunks.len(),
            imports: self.imports.len(),
            text,
        }
    }
}

fn push_section<T>(
    sections: &mut Vec<String>,
    fragments: &[T],
    separator: &str,
    code: fn(&T) -> &str,
) {
    if fragments.is_empty() {
        return;
    }
    let parts: Vec<&str> = fragments.iter().map(code).collect();
    sections.push(parts.join(separator));
}

/// The generated C source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    text: String,
    fingerprint: u64,
    exports: usize,
    imports: usize,
}

impl Artifact {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// XXHash64 of the artifact text; equal artifacts have equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn export_count(&self) -> usize {
        self.exports
    }

    pub fn import_count(&self) -> usize {
        self.imports
    }

    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.text.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
