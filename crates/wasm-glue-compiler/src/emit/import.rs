//! Import externs and their internal-call registrations.

use wasm_glue_core::c_string_literal;

use crate::assembly::{ImportDeclaration, Registration};
use crate::passes::{BoundMethod, ImportSymbols};

pub(super) fn emit(
    method: &BoundMethod<'_>,
    symbols: &ImportSymbols,
) -> (ImportDeclaration, Registration) {
    let descriptor = method.descriptor;
    let return_type = if descriptor.returns_value() {
        "MonoObject*"
    } else {
        "void"
    };

    let declaration = format!(
        "__attribute__((__import_module__({}), __import_name__({})))\nextern {return_type} {}();",
        c_string_literal(&descriptor.foreign.module),
        c_string_literal(&descriptor.foreign.function),
        symbols.external,
    );
    let registration = format!(
        "mono_add_internal_call({}, {});",
        c_string_literal(&descriptor.identity.internal_call_name()),
        symbols.external,
    );

    log::debug!(
        "emitted import {} for {}",
        symbols.external,
        descriptor.identity
    );

    (
        ImportDeclaration::new(declaration),
        Registration::new(registration),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{MethodSymbols, bind};
    use wasm_glue_core::{
        Direction, ForeignBinding, MethodDescriptor, MethodIdentity, ParameterDescriptor, TypeRef,
    };
    use wasm_glue_registry::MarshalingRules;

    fn import(return_type: TypeRef) -> MethodDescriptor {
        MethodDescriptor {
            identity: MethodIdentity::new("Guest", "App", "Interop", "Hello"),
            direction: Direction::Import,
            foreign: ForeignBinding::import("bla", "env", "hello"),
            is_static: true,
            parameters: vec![ParameterDescriptor::new("count", TypeRef::primitive("int"))],
            return_type,
        }
    }

    fn render(method: MethodDescriptor) -> (String, String) {
        let rules = MarshalingRules::standard();
        let methods = [method];
        let bound = bind(&methods, &rules).unwrap();
        let MethodSymbols::Import(symbols) = &bound[0].symbols else {
            panic!("expected import symbols");
        };
        let (declaration, registration) = emit(&bound[0], symbols);
        (
            declaration.code().to_string(),
            registration.code().to_string(),
        )
    }

    #[test]
    fn void_import() {
        let (declaration, registration) = render(import(TypeRef::void()));
        assert_eq!(
            declaration,
            "__attribute__((__import_module__(\"env\"), __import_name__(\"hello\")))\n\
             extern void __wasm_import_env_hello();"
        );
        assert_eq!(
            registration,
            "mono_add_internal_call(\"App.Interop::Hello\", __wasm_import_env_hello);"
        );
    }

    #[test]
    fn value_returning_import() {
        let (declaration, _) = render(import(TypeRef::string()));
        assert!(declaration.ends_with("extern MonoObject* __wasm_import_env_hello();"));
    }
}
