//! Pass 2: Parameter binding.
//!
//! Resolves every parameter of every descriptor against the marshaling rules
//! and assigns each method its C symbols. The whole batch is bound before any
//! code is emitted, so an unsupported type or a symbol clash anywhere aborts
//! generation without producing a partial artifact.
//!
//! Clashes are checked at two levels: C symbols and export names across the
//! batch, and the identifiers each export thunk declares (parameters, derived
//! locals, the handle cache it refers to).

use rustc_hash::{FxHashMap, FxHashSet};

use wasm_glue_core::{
    GenerationError, MethodDescriptor, MethodIdentity, ParameterDescriptor, SemanticCategory,
    UnsupportedTypeError, to_lower_snake_case,
};
use wasm_glue_registry::{MarshalingRule, MarshalingRules};

/// A parameter together with the rule that marshals it.
#[derive(Debug, Clone, Copy)]
pub struct BoundParameter<'a> {
    pub descriptor: &'a ParameterDescriptor,
    pub category: SemanticCategory,
    pub rule: &'a MarshalingRule,
}

impl BoundParameter<'_> {
    pub fn requires_transform(&self) -> bool {
        self.rule.requires_transform()
    }

    pub fn requires_cleanup(&self) -> bool {
        self.rule.requires_cleanup()
    }

    fn ident(&self) -> &str {
        &self.descriptor.c_identifier
    }

    /// Native parameter declarations, two for arrays.
    pub fn declarations(&self) -> Vec<String> {
        self.rule.declaration.render(self.ident())
    }

    pub fn transform(&self) -> Option<String> {
        self.rule
            .transform
            .as_ref()
            .map(|t| t.statement.render(self.ident()))
    }

    /// The expression handed to the runtime invoke.
    pub fn argument(&self) -> String {
        self.rule.argument.render(self.ident())
    }

    pub fn cleanup(&self) -> Option<String> {
        self.rule.cleanup.as_ref().map(|c| c.render(self.ident()))
    }

    /// C identifiers this parameter introduces into a thunk.
    pub fn locals(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .declarations()
            .iter()
            .map(|d| declared_name(d).to_string())
            .collect();
        if let Some(transform) = &self.rule.transform {
            names.push(transform.binding.render(self.ident()));
        }
        names
    }
}

/// The identifier of a rendered declaration such as `char* name`.
fn declared_name(declaration: &str) -> &str {
    let start = declaration.rfind([' ', '*']).map_or(0, |i| i + 1);
    &declaration[start..]
}

/// C symbols of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSymbols {
    /// Name of the thunk function.
    pub thunk: String,
    /// Name of the handle-cache variable.
    pub cache: String,
}

/// C symbols of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSymbols {
    /// Name of the foreign-declared extern function.
    pub external: String,
}

/// C symbols a method contributes to the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSymbols {
    Export(ExportSymbols),
    Import(ImportSymbols),
}

impl MethodSymbols {
    pub fn for_method(method: &MethodDescriptor) -> Self {
        let name = to_lower_snake_case(&method.identity.name);
        if method.is_export() {
            MethodSymbols::Export(ExportSymbols {
                thunk: format!("__wasm_export_{name}"),
                cache: format!("method_{name}"),
            })
        } else {
            MethodSymbols::Import(ImportSymbols {
                external: format!(
                    "__wasm_import_{}_{name}",
                    to_lower_snake_case(&method.foreign.module)
                ),
            })
        }
    }

    fn c_names(&self) -> Vec<&str> {
        match self {
            MethodSymbols::Export(s) => vec![s.thunk.as_str(), s.cache.as_str()],
            MethodSymbols::Import(s) => vec![s.external.as_str()],
        }
    }
}

/// A descriptor with all of its parameters resolved.
#[derive(Debug, Clone)]
pub struct BoundMethod<'a> {
    pub descriptor: &'a MethodDescriptor,
    pub parameters: Vec<BoundParameter<'a>>,
    pub symbols: MethodSymbols,
}

/// Bind a batch of descriptors.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn bind<'a>(
    methods: &'a [MethodDescriptor],
    rules: &'a MarshalingRules,
) -> Result<Vec<BoundMethod<'a>>, GenerationError> {
    let mut c_symbols: FxHashMap<String, &MethodIdentity> = FxHashMap::default();
    let mut export_names: FxHashMap<&str, &MethodIdentity> = FxHashMap::default();
    let mut bound = Vec::with_capacity(methods.len());

    for method in methods {
        let parameters = method
            .parameters
            .iter()
            .map(|p| bind_parameter(method, p, rules))
            .collect::<Result<Vec<_>, _>>()?;

        let symbols = MethodSymbols::for_method(method);
        if let MethodSymbols::Export(export) = &symbols {
            check_locals(method, &parameters, &export.cache)?;
        }
        for name in symbols.c_names() {
            if let Some(first) = c_symbols.insert(name.to_string(), &method.identity) {
                return Err(duplicate("C symbol", name, first, &method.identity));
            }
        }
        if method.is_export() {
            if let Some(first) = export_names.insert(&method.foreign.function, &method.identity) {
                return Err(duplicate(
                    "export name",
                    &method.foreign.function,
                    first,
                    &method.identity,
                ));
            }
        }

        bound.push(BoundMethod {
            descriptor: method,
            parameters,
            symbols,
        });
    }

    Ok(bound)
}

fn bind_parameter<'a>(
    method: &MethodDescriptor,
    parameter: &'a ParameterDescriptor,
    rules: &'a MarshalingRules,
) -> Result<BoundParameter<'a>, UnsupportedTypeError> {
    rules
        .resolve(&parameter.declared_type)
        .map(|(category, rule)| BoundParameter {
            descriptor: parameter,
            category,
            rule,
        })
        .map_err(|reason| UnsupportedTypeError {
            method: method.identity.clone(),
            parameter: parameter.identifier.clone(),
            type_name: parameter.declared_type.name.clone(),
            reason,
        })
}

/// Reject two identical identifiers inside one thunk.
///
/// The cache is a global the thunk reads and assigns, so a parameter of the
/// same name would shadow it.
fn check_locals(
    method: &MethodDescriptor,
    parameters: &[BoundParameter<'_>],
    cache: &str,
) -> Result<(), GenerationError> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(cache.to_string());
    for name in parameters.iter().flat_map(BoundParameter::locals) {
        if seen.contains(&name) {
            return Err(GenerationError::IdentifierClash {
                method: method.identity.clone(),
                identifier: name,
            });
        }
        seen.insert(name);
    }
    Ok(())
}

fn duplicate(
    kind: &'static str,
    symbol: &str,
    first: &MethodIdentity,
    second: &MethodIdentity,
) -> GenerationError {
    GenerationError::DuplicateSymbol {
        kind,
        symbol: symbol.to_string(),
        first: first.clone(),
        second: second.clone(),
    }
}
