//! Export thunks.
//!
//! Thunk body order: resolve the cached handle, apply transforms, invoke,
//! assert no exception, apply cleanups, return the result.

use wasm_glue_core::{RuntimeFault, c_string_literal};

use super::CodeBuffer;
use crate::assembly::{ExportThunk, HandleCache};
use crate::config::GeneratorConfig;
use crate::passes::{BoundMethod, ExportSymbols};

const RECEIVER_DECL: &str = "MonoObject* dotnet_target_instance";
const RECEIVER: &str = "dotnet_target_instance";
const EXCEPTION: &str = "exception";

pub(super) fn emit(
    config: &GeneratorConfig,
    method: &BoundMethod<'_>,
    symbols: &ExportSymbols,
) -> (HandleCache, ExportThunk) {
    let descriptor = method.descriptor;
    let identity = &descriptor.identity;
    let cache = &symbols.cache;

    let mut declarations = Vec::new();
    if descriptor.takes_receiver() {
        declarations.push(RECEIVER_DECL.to_string());
    }
    for parameter in &method.parameters {
        declarations.extend(parameter.declarations());
    }
    let parameter_list = if declarations.is_empty() {
        "void".to_string()
    } else {
        declarations.join(", ")
    };
    let return_type = if descriptor.returns_value() {
        "MonoObject*"
    } else {
        "void"
    };

    let mut code = CodeBuffer::new();
    code.line(&format!(
        "__attribute__((export_name({})))",
        c_string_literal(&descriptor.foreign.function)
    ));
    let thunk = &symbols.thunk;
    code.open(&format!("{return_type} {thunk}({parameter_list})"));

    let assembly = format!("{}{}", identity.assembly, config.assembly_extension);
    code.open(&format!("if (!{cache})"));
    code.line(&format!(
        "{cache} = lookup_dotnet_method({}, {}, {}, {}, -1);",
        c_string_literal(&assembly),
        c_string_literal(&identity.namespace),
        c_string_literal(&identity.containing_type),
        c_string_literal(&identity.name),
    ));
    code.line(&RuntimeFault::UnresolvedHandle.assertion(cache));
    code.close();

    for transform in method.parameters.iter().filter_map(|p| p.transform()) {
        code.line(&transform);
    }

    let arguments: Vec<String> = method.parameters.iter().map(|p| p.argument()).collect();
    if arguments.is_empty() {
        code.line("void** method_params = NULL;");
    } else {
        code.line(&format!(
            "void* method_params[] = {{ {} }};",
            arguments.join(", ")
        ));
    }
    code.line(&format!("MonoObject* {EXCEPTION} = NULL;"));

    let receiver = if descriptor.takes_receiver() {
        RECEIVER
    } else {
        "NULL"
    };
    let call =
        format!("mono_wasm_invoke_method({cache}, {receiver}, method_params, &{EXCEPTION});");
    if descriptor.returns_value() {
        code.line(&format!("MonoObject* res = {call}"));
    } else {
        code.line(&call);
    }
    code.line(&RuntimeFault::ForeignCallFault.assertion(EXCEPTION));

    for cleanup in method.parameters.iter().filter_map(|p| p.cleanup()) {
        code.line(&cleanup);
    }
    if descriptor.returns_value() {
        code.line("return res;");
    }
    code.close();

    log::debug!(
        "emitted export thunk {} for {} ({} native parameter(s))",
        thunk,
        identity,
        declarations.len()
    );

    (
        HandleCache::new(format!("static MonoMethod* {cache};")),
        ExportThunk::new(code.finish()),
    )
}
