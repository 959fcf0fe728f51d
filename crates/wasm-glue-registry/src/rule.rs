//! A single marshaling rule and its code templates.

use std::borrow::Cow;
use std::fmt;

use wasm_glue_core::RuleError;

/// Placeholder substituted with the parameter's C identifier.
pub const PLACEHOLDER: &str = "{0}";

/// A code template with a single `{0}` placeholder for the parameter identifier.
///
/// ```
/// use wasm_glue_registry::Template;
///
/// let t = Template::new("char* {0}");
/// assert_eq!(t.render("name"), "char* name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(Cow<'static, str>);

impl Template {
    pub const fn new(text: &'static str) -> Self {
        Template(Cow::Borrowed(text))
    }

    pub fn owned(text: impl Into<String>) -> Self {
        Template(Cow::Owned(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, ident: &str) -> String {
        self.0.replace(PLACEHOLDER, ident)
    }

    pub fn references_parameter(&self) -> bool {
        self.0.contains(PLACEHOLDER)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a parameter appears in the thunk's native parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    /// One native parameter.
    Single(Template),
    /// Two native parameters: a buffer pointer followed by its length.
    Pair { pointer: Template, length: Template },
}

impl Declaration {
    /// Render the native parameter declarations for `ident`, in order.
    pub fn render(&self, ident: &str) -> Vec<String> {
        match self {
            Declaration::Single(t) => vec![t.render(ident)],
            Declaration::Pair { pointer, length } => {
                vec![pointer.render(ident), length.render(ident)]
            }
        }
    }

    /// Number of native parameters this declaration expands to.
    pub fn arity(&self) -> usize {
        match self {
            Declaration::Single(_) => 1,
            Declaration::Pair { .. } => 2,
        }
    }

    fn templates(&self) -> Vec<&Template> {
        match self {
            Declaration::Single(t) => vec![t],
            Declaration::Pair { pointer, length } => vec![pointer, length],
        }
    }
}

/// Who owns the value a transform produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The managed runtime's collector owns the result.
    Managed,
    /// The transform leaves a transient native value that a cleanup must release.
    Transient,
}

/// A pre-call conversion into the managed runtime's representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform {
    /// The C statement performing the conversion.
    pub statement: Template,
    /// The name of the converted value, referenced by the call.
    pub binding: Template,
    pub ownership: Ownership,
}

/// Declaration, transform, argument and cleanup templates for one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarshalingRule {
    pub declaration: Declaration,
    pub transform: Option<Transform>,
    /// How the (possibly transformed) value is passed to the runtime invoke.
    pub argument: Template,
    pub cleanup: Option<Template>,
}

impl MarshalingRule {
    /// A rule that passes the native value straight through.
    pub fn direct(declaration: Template, argument: Template) -> Self {
        Self {
            declaration: Declaration::Single(declaration),
            transform: None,
            argument,
            cleanup: None,
        }
    }

    pub fn requires_transform(&self) -> bool {
        self.transform.is_some()
    }

    pub fn requires_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Reject rules that would emit unbalanced or unbound code.
    pub fn validate(&self, category: &str) -> Result<(), RuleError> {
        match (&self.transform, &self.cleanup) {
            (Some(t), None) if t.ownership == Ownership::Transient => {
                return Err(RuleError::UnpairedTransform {
                    category: category.to_string(),
                });
            }
            (None, Some(_)) => {
                return Err(RuleError::UnpairedCleanup {
                    category: category.to_string(),
                });
            }
            _ => {}
        }

        let mut templates = self.declaration.templates();
        templates.push(&self.argument);
        if let Some(t) = &self.transform {
            templates.push(&t.statement);
            templates.push(&t.binding);
        }
        if let Some(c) = &self.cleanup {
            templates.push(c);
        }

        match templates.into_iter().find(|t| !t.references_parameter()) {
            Some(t) => Err(RuleError::UnboundTemplate {
                category: category.to_string(),
                template: t.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transient_rule() -> MarshalingRule {
        MarshalingRule {
            declaration: Declaration::Single(Template::new("char* {0}")),
            transform: Some(Transform {
                statement: Template::new("MonoString* {0}_trans = convert({0});"),
                binding: Template::new("{0}_trans"),
                ownership: Ownership::Transient,
            }),
            argument: Template::new("{0}_trans"),
            cleanup: Some(Template::new("free({0});")),
        }
    }

    #[test]
    fn pair_declaration_fans_out() {
        let decl = Declaration::Pair {
            pointer: Template::new("void* {0}_ptr"),
            length: Template::new("int {0}_len"),
        };
        assert_eq!(decl.arity(), 2);
        assert_eq!(decl.render("nrs"), vec!["void* nrs_ptr", "int nrs_len"]);
    }

    #[test]
    fn balanced_rule_validates() {
        assert_eq!(transient_rule().validate("string"), Ok(()));
    }

    #[test]
    fn transient_transform_requires_cleanup() {
        let mut rule = transient_rule();
        rule.cleanup = None;
        assert!(matches!(
            rule.validate("string"),
            Err(RuleError::UnpairedTransform { .. })
        ));
    }

    #[test]
    fn cleanup_requires_transform() {
        let mut rule = transient_rule();
        rule.transform = None;
        assert!(matches!(
            rule.validate("string"),
            Err(RuleError::UnpairedCleanup { .. })
        ));
    }

    #[test]
    fn templates_must_reference_parameter() {
        let rule = MarshalingRule::direct(Template::new("int x"), Template::new("&{0}"));
        assert!(matches!(
            rule.validate("int"),
            Err(RuleError::UnboundTemplate { template, .. }) if template == "int x"
        ));
    }
}
