//! Pass 1: Descriptor collection.
//!
//! Consumes the symbol stream from the analysis pass and produces one
//! [`MethodDescriptor`] per annotated method, in stream order. Annotation
//! arguments are validated here so that nothing is emitted for a batch that
//! contains a malformed declaration.

use wasm_glue_core::{
    AttributeArgument, AttributeData, ConfigurationError, ConfigurationErrorKind, Direction,
    ForeignBinding, MethodDescriptor, MethodFlags, MethodSymbol, ParameterDescriptor,
};

use crate::config::AnnotationNames;

const EXPORT_PARAMS: [&str; 1] = ["functionName"];
const IMPORT_PARAMS: [&str; 3] = ["namespace", "module", "functionName"];

/// Filters annotated methods out of a symbol stream and describes them.
pub struct DescriptorCollector<'a> {
    annotations: &'a AnnotationNames,
}

impl<'a> DescriptorCollector<'a> {
    pub fn new(annotations: &'a AnnotationNames) -> Self {
        Self { annotations }
    }

    /// Describe every annotated method in `symbols`.
    ///
    /// Fails on the first malformed declaration; descriptors collected before
    /// it are discarded.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn collect<I>(&self, symbols: I) -> Result<Vec<MethodDescriptor>, ConfigurationError>
    where
        I: IntoIterator<Item = MethodSymbol>,
    {
        let mut methods = Vec::new();
        for symbol in symbols {
            if let Some(method) = self.describe(symbol)? {
                methods.push(method);
            }
        }
        Ok(methods)
    }

    /// Describe a single symbol, or `None` when it carries no annotation.
    pub fn describe(
        &self,
        symbol: MethodSymbol,
    ) -> Result<Option<MethodDescriptor>, ConfigurationError> {
        let export = symbol
            .attributes
            .iter()
            .find(|a| self.annotations.is_export(a));
        let import = symbol
            .attributes
            .iter()
            .find(|a| self.annotations.is_import(a));

        let (direction, foreign) = match (export, import) {
            (None, None) => {
                log::trace!("skipping unannotated method {}", symbol.identity());
                return Ok(None);
            }
            (Some(_), Some(_)) => {
                return Err(error(&symbol, ConfigurationErrorKind::ConflictingAnnotations));
            }
            (Some(attribute), None) => (Direction::Export, export_binding(&symbol, attribute)?),
            (None, Some(attribute)) => {
                let foreign = import_binding(&symbol, attribute)?;
                check_import_shape(&symbol)?;
                (Direction::Import, foreign)
            }
        };

        let is_static = symbol.is_static();
        let identity = symbol.identity();
        let parameters = symbol
            .parameters
            .into_iter()
            .map(|p| ParameterDescriptor::new(p.name, p.ty))
            .collect();

        log::debug!("collected {direction} {identity} as '{}'", foreign.function);

        Ok(Some(MethodDescriptor {
            identity,
            direction,
            foreign,
            is_static,
            parameters,
            return_type: symbol.return_type,
        }))
    }
}

fn error(symbol: &MethodSymbol, kind: ConfigurationErrorKind) -> ConfigurationError {
    ConfigurationError::new(symbol.identity(), kind)
}

fn export_binding(
    symbol: &MethodSymbol,
    attribute: &AttributeData,
) -> Result<ForeignBinding, ConfigurationError> {
    match attribute.arguments.as_slice() {
        [function] => {
            let function = required(symbol, attribute, function, EXPORT_PARAMS[0])?;
            Ok(ForeignBinding::export(function))
        }
        [] => Err(missing(symbol, attribute, 0, EXPORT_PARAMS[0])),
        args => Err(error(
            symbol,
            ConfigurationErrorKind::ArgumentCount {
                attribute: attribute.name.clone(),
                expected: "1",
                found: args.len(),
            },
        )),
    }
}

fn import_binding(
    symbol: &MethodSymbol,
    attribute: &AttributeData,
) -> Result<ForeignBinding, ConfigurationError> {
    let (namespace, module, function) = match attribute.arguments.as_slice() {
        [namespace, module, function] => {
            let namespace = namespace.clone().unwrap_or_default();
            (namespace, module, function)
        }
        // (module, function) form without a foreign namespace
        [module, function] => (String::new(), module, function),
        args if args.len() < 2 => {
            let position = args.len();
            return Err(missing(symbol, attribute, position, IMPORT_PARAMS[position]));
        }
        args => {
            return Err(error(
                symbol,
                ConfigurationErrorKind::ArgumentCount {
                    attribute: attribute.name.clone(),
                    expected: "2 or 3",
                    found: args.len(),
                },
            ));
        }
    };

    let module = required(symbol, attribute, module, IMPORT_PARAMS[1])?;
    let function = required(symbol, attribute, function, IMPORT_PARAMS[2])?;
    Ok(ForeignBinding::import(namespace, module, function))
}

fn check_import_shape(symbol: &MethodSymbol) -> Result<(), ConfigurationError> {
    if !symbol.is_static() {
        return Err(error(symbol, ConfigurationErrorKind::ImportNotStatic));
    }
    let flags = symbol.flags;
    if flags.contains(MethodFlags::HAS_BODY) || !flags.contains(MethodFlags::EXTERN) {
        return Err(error(symbol, ConfigurationErrorKind::ImportHasBody));
    }
    Ok(())
}

/// Reject null, empty and whitespace-only arguments.
fn required(
    symbol: &MethodSymbol,
    attribute: &AttributeData,
    argument: &AttributeArgument,
    parameter: &'static str,
) -> Result<String, ConfigurationError> {
    match argument {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(error(
            symbol,
            ConfigurationErrorKind::BlankArgument {
                attribute: attribute.name.clone(),
                parameter,
            },
        )),
    }
}

fn missing(
    symbol: &MethodSymbol,
    attribute: &AttributeData,
    position: usize,
    parameter: &'static str,
) -> ConfigurationError {
    error(
        symbol,
        ConfigurationErrorKind::MissingArgument {
            attribute: attribute.name.clone(),
            position,
            parameter,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_glue_core::TypeRef;

    fn export(name: &str, function: &str) -> MethodSymbol {
        MethodSymbol::new("Guest", "App", "Program", name)
            .with_flags(MethodFlags::STATIC | MethodFlags::HAS_BODY)
            .with_attribute(AttributeData::new("WasmExportAttribute", [function]))
    }

    fn import(args: &[&str]) -> MethodSymbol {
        MethodSymbol::new("Guest", "App", "Interop", "Hello")
            .with_flags(MethodFlags::STATIC | MethodFlags::EXTERN)
            .with_attribute(AttributeData::new("WasmImport", args.iter().copied()))
    }

    fn collect(symbols: Vec<MethodSymbol>) -> Result<Vec<MethodDescriptor>, ConfigurationError> {
        let names = AnnotationNames::default();
        DescriptorCollector::new(&names).collect(symbols)
    }

    #[test]
    fn skips_unannotated_methods() {
        let symbols = vec![
            MethodSymbol::new("Guest", "App", "Program", "Main"),
            MethodSymbol::new("Guest", "App", "Program", "Old")
                .with_attribute(AttributeData::new("Obsolete", ["use New"])),
            export("HelloFrom", "hello_from"),
        ];
        let methods = collect(symbols).unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].identity.name, "HelloFrom");
        assert_eq!(methods[0].direction, Direction::Export);
        assert_eq!(methods[0].foreign.function, "hello_from");
    }

    #[test]
    fn preserves_stream_and_parameter_order() {
        let symbols = vec![
            export("B", "b")
                .with_parameter("second", TypeRef::primitive("int"))
                .with_parameter("first", TypeRef::string()),
            export("A", "a"),
        ];
        let methods = collect(symbols).unwrap();
        let names: Vec<_> = methods.iter().map(|m| m.identity.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        let params: Vec<_> = methods[0]
            .parameters
            .iter()
            .map(|p| p.identifier.as_str())
            .collect();
        assert_eq!(params, ["second", "first"]);
    }

    #[test]
    fn blank_export_name_is_rejected() {
        let err = collect(vec![export("HelloFrom", "   ")]).unwrap_err();
        assert_eq!(err.method.name, "HelloFrom");
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::BlankArgument {
                parameter: "functionName",
                ..
            }
        ));
    }

    #[test]
    fn null_export_name_is_blank() {
        let mut symbol = export("HelloFrom", "x");
        symbol.attributes[0].arguments = vec![None];
        let err = collect(vec![symbol]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::BlankArgument { .. }
        ));
    }

    #[test]
    fn export_argument_count_is_checked() {
        let mut symbol = export("HelloFrom", "x");
        symbol.attributes[0].arguments.clear();
        let err = collect(vec![symbol]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::MissingArgument { position: 0, .. }
        ));

        let attribute = AttributeData::new("WasiExport", ["", "dotnet", "hello_from"]);
        let symbol = MethodSymbol::new("Guest", "App", "Program", "HelloFrom")
            .with_attribute(attribute);
        let err = collect(vec![symbol]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::ArgumentCount { found: 3, .. }
        ));
    }

    #[test]
    fn import_positional_arguments() {
        let methods = collect(vec![import(&["bla", "env", "hello"])]).unwrap();
        assert_eq!(methods[0].direction, Direction::Import);
        assert_eq!(
            methods[0].foreign,
            ForeignBinding::import("bla", "env", "hello")
        );

        let methods = collect(vec![import(&["env", "hello"])]).unwrap();
        assert_eq!(
            methods[0].foreign,
            ForeignBinding::import("", "env", "hello")
        );
    }

    #[test]
    fn import_module_and_function_must_not_be_blank() {
        let err = collect(vec![import(&["bla", "", "hello"])]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::BlankArgument {
                parameter: "module",
                ..
            }
        ));

        let err = collect(vec![import(&["env", " "])]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::BlankArgument {
                parameter: "functionName",
                ..
            }
        ));

        // the namespace may be blank
        assert!(collect(vec![import(&["", "env", "hello"])]).is_ok());
    }

    #[test]
    fn import_missing_arguments() {
        let err = collect(vec![import(&["env"])]).unwrap_err();
        assert!(matches!(
            err.kind,
            ConfigurationErrorKind::MissingArgument {
                position: 1,
                parameter: "module",
                ..
            }
        ));
    }

    #[test]
    fn import_must_be_static_extern() {
        let instance = import(&["env", "hello"]).with_flags(MethodFlags::EXTERN);
        let err = collect(vec![instance]).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::ImportNotStatic);

        let flags = MethodFlags::STATIC | MethodFlags::HAS_BODY;
        let with_body = import(&["env", "hello"]).with_flags(flags);
        let err = collect(vec![with_body]).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::ImportHasBody);
    }

    #[test]
    fn conflicting_annotations() {
        let import = AttributeData::new("WasmImport", ["env", "both"]);
        let symbol = export("Both", "both").with_attribute(import);
        let err = collect(vec![symbol]).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::ConflictingAnnotations);
    }

    #[test]
    fn instance_exports_are_allowed() {
        let symbol = export("Greet", "greet").with_flags(MethodFlags::HAS_BODY);
        let methods = collect(vec![symbol]).unwrap();
        assert!(!methods[0].is_static);
        assert!(methods[0].takes_receiver());
    }
}
