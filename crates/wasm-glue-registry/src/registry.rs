//! MarshalingRules - the type-directed rule lookup.
//!
//! [`MarshalingRules`] maps a parameter's declared type to a
//! [`SemanticCategory`] and that category to a [`MarshalingRule`].
//!
//! # Lookup Order
//!
//! 1. Exact match on the normalized type name (`string`, `int`, `int32`, `object`, ...)
//! 2. Array types fall back to [`SemanticCategory::Array`]
//! 3. Class and interface types fall back to [`SemanticCategory::Object`] /
//!    [`SemanticCategory::Interface`] (same default rule)
//! 4. Structs are rejected with [`UnsupportedReason::StructParameter`]
//! 5. Anything else is rejected with [`UnsupportedReason::NoRule`]
//!
//! The exact match comes first because several built-in types are classes
//! (`string`) or structs (`int`) underneath.
//!
//! # Immutability
//!
//! A rule set is assembled once through [`MarshalingRulesBuilder`], validated
//! in [`MarshalingRulesBuilder::build`], and is read-only afterwards. Each
//! generator owns its own instance; there is no global table.
//!
//! # Example
//!
//! ```
//! use wasm_glue_core::{SemanticCategory, TypeRef};
//! use wasm_glue_registry::MarshalingRules;
//!
//! let rules = MarshalingRules::standard();
//! let (category, rule) = rules.resolve(&TypeRef::string()).unwrap();
//! assert_eq!(category, SemanticCategory::String);
//! assert!(rule.requires_transform() && rule.requires_cleanup());
//! ```

use rustc_hash::FxHashMap;

use wasm_glue_core::{
    PrimitiveKind, RuleError, SemanticCategory, TypeRef, TypeShape, UnsupportedReason,
};

use crate::rule::{Declaration, MarshalingRule, Ownership, Template, Transform};

/// Immutable, validated set of marshaling rules.
#[derive(Debug, Clone)]
pub struct MarshalingRules {
    /// Normalized type name -> category (exact matches).
    names: FxHashMap<String, SemanticCategory>,
    /// Category -> rule.
    rules: FxHashMap<SemanticCategory, MarshalingRule>,
}

impl Default for MarshalingRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl MarshalingRules {
    /// The built-in rule set.
    pub fn standard() -> Self {
        let (names, rules) = standard_tables();
        Self { names, rules }
    }

    /// Start from the built-in rule set.
    pub fn builder() -> MarshalingRulesBuilder {
        MarshalingRulesBuilder::standard()
    }

    /// Number of categories with a rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Get the rule for a category.
    pub fn rule(&self, category: SemanticCategory) -> Option<&MarshalingRule> {
        self.rules.get(&category)
    }

    /// Derive the semantic category of a declared type.
    pub fn classify(&self, ty: &TypeRef) -> Result<SemanticCategory, UnsupportedReason> {
        if let Some(category) = self.names.get(&normalize_type_name(&ty.name)) {
            return Ok(*category);
        }

        match ty.shape {
            TypeShape::Array => Ok(SemanticCategory::Array),
            TypeShape::Class => Ok(SemanticCategory::Object),
            TypeShape::Interface => Ok(SemanticCategory::Interface),
            TypeShape::Struct => Err(UnsupportedReason::StructParameter),
            TypeShape::Void
            | TypeShape::Primitive
            | TypeShape::Enum
            | TypeShape::Pointer => Err(UnsupportedReason::NoRule),
        }
    }

    /// Classify a type and look up its rule.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(
        &self,
        ty: &TypeRef,
    ) -> Result<(SemanticCategory, &MarshalingRule), UnsupportedReason> {
        let category = self.classify(ty)?;
        match self.rules.get(&category) {
            Some(rule) => Ok((category, rule)),
            None => {
                log::trace!("category '{}' of '{}' has no rule", category, ty.name);
                Err(UnsupportedReason::NoRule)
            }
        }
    }
}

/// Lowercase the name and drop a leading `System.` namespace.
pub fn normalize_type_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_prefix("system.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Builder for [`MarshalingRules`].
///
/// ```
/// use wasm_glue_core::{PrimitiveKind, SemanticCategory, TypeRef};
/// use wasm_glue_registry::MarshalingRules;
///
/// let rules = MarshalingRules::builder()
///     .primitive_alias("nint", PrimitiveKind::Int32)
///     .build()
///     .unwrap();
/// assert_eq!(
///     rules.classify(&TypeRef::primitive("nint")),
///     Ok(SemanticCategory::Primitive(PrimitiveKind::Int32))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarshalingRulesBuilder {
    names: FxHashMap<String, SemanticCategory>,
    rules: FxHashMap<SemanticCategory, MarshalingRule>,
}

impl MarshalingRulesBuilder {
    /// An empty builder with no names and no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the built-in rule set.
    pub fn standard() -> Self {
        let (names, rules) = standard_tables();
        Self { names, rules }
    }

    /// Map an exact type name to a category.
    pub fn alias(mut self, name: &str, category: SemanticCategory) -> Self {
        self.names.insert(normalize_type_name(name), category);
        self
    }

    /// Map an exact type name to a primitive kind.
    pub fn primitive_alias(self, name: &str, kind: PrimitiveKind) -> Self {
        self.alias(name, SemanticCategory::Primitive(kind))
    }

    /// Add or replace the rule for a category.
    pub fn rule(mut self, category: SemanticCategory, rule: MarshalingRule) -> Self {
        self.rules.insert(category, rule);
        self
    }

    /// Remove the rule for a category; types in it become unsupported.
    pub fn without_rule(mut self, category: SemanticCategory) -> Self {
        self.rules.remove(&category);
        self
    }

    /// Validate every rule and freeze the set.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(self) -> Result<MarshalingRules, RuleError> {
        let mut names: Vec<_> = self.names.iter().collect();
        names.sort();
        if let Some((name, _)) = names
            .iter()
            .find(|(_, category)| **category == SemanticCategory::Struct)
        {
            return Err(RuleError::ForbiddenCategory {
                name: (*name).clone(),
            });
        }

        let mut categories: Vec<_> = self.rules.keys().copied().collect();
        categories.sort();
        for category in categories {
            if category == SemanticCategory::Struct {
                return Err(RuleError::ForbiddenCategory {
                    name: category.to_string(),
                });
            }
            if let Some(rule) = self.rules.get(&category) {
                rule.validate(category.name())?;
            }
        }

        log::debug!(
            "built marshaling rules: {} names, {} categories",
            self.names.len(),
            self.rules.len()
        );

        Ok(MarshalingRules {
            names: self.names,
            rules: self.rules,
        })
    }
}

type Tables = (
    FxHashMap<String, SemanticCategory>,
    FxHashMap<SemanticCategory, MarshalingRule>,
);

fn standard_tables() -> Tables {
    let mut names = FxHashMap::default();
    let mut rules = FxHashMap::default();

    for kind in PrimitiveKind::ALL {
        let category = SemanticCategory::Primitive(kind);
        names.insert(kind.name().to_string(), category);
        names.insert(kind.runtime_name().to_string(), category);
        rules.insert(
            category,
            MarshalingRule::direct(
                Template::owned(format!("{} {{0}}", kind.c_type())),
                Template::new("&{0}"),
            ),
        );
    }

    names.insert("string".to_string(), SemanticCategory::String);
    names.insert("object".to_string(), SemanticCategory::Object);

    rules.insert(
        SemanticCategory::String,
        MarshalingRule {
            declaration: Declaration::Single(Template::new("char* {0}")),
            transform: Some(Transform {
                statement: Template::new("MonoString* {0}_trans = mono_wasm_string_from_js({0});"),
                binding: Template::new("{0}_trans"),
                ownership: Ownership::Transient,
            }),
            argument: Template::new("{0}_trans"),
            cleanup: Some(Template::new("free({0});")),
        },
    );
    rules.insert(
        SemanticCategory::Array,
        MarshalingRule {
            declaration: Declaration::Pair {
                pointer: Template::new("void* {0}_ptr"),
                length: Template::new("int {0}_len"),
            },
            transform: Some(Transform {
                statement: Template::new(
                    "MonoArray* {0}_array = {0}_ptr ? mono_wasm_typed_array_new({0}_ptr, {0}_len) : NULL;",
                ),
                binding: Template::new("{0}_array"),
                ownership: Ownership::Managed,
            }),
            argument: Template::new("{0}_array"),
            cleanup: None,
        },
    );

    let object = MarshalingRule::direct(Template::new("MonoObject* {0}"), Template::new("{0}"));
    rules.insert(SemanticCategory::Interface, object.clone());
    rules.insert(SemanticCategory::Object, object);

    (names, rules)
}
