//! Fixed fragments at the top of every artifact.

use wasm_glue_core::c_string_literal;

use crate::assembly::{HelperDefinition, Registration};
use crate::config::GeneratorConfig;

const BANNER: &str = "// <auto-generated>\n\
// This file was generated by wasm-glue. Do not edit.\n\
// </auto-generated>";

const RUNTIME_PROTOTYPES: &str = "MonoClass* mono_get_byte_class(void);\n\
MonoDomain* mono_get_root_domain(void);";

const TYPED_ARRAY_NEW: &str = "MonoArray* mono_wasm_typed_array_new(void* arr, int length) {
    MonoClass* typeClass = mono_get_byte_class();
    MonoArray* buffer = mono_array_new(mono_get_root_domain(), typeClass, length);
    char* dst = mono_array_addr_with_size(buffer, 1, 0);
    memcpy(dst, arr, length);
    return buffer;
}";

const TIMER_STUB: &str = "void fake_settimeout(int timeout) {\n}";
const TIMER_INTERNAL_CALL: &str = "System.Threading.TimerQueue::SetTimeout";

pub(super) fn definitions(config: &GeneratorConfig) -> Vec<HelperDefinition> {
    let includes = [
        config.runtime_header.as_str(),
        "assert.h",
        "stdbool.h",
        "stdint.h",
        "stdlib.h",
        "string.h",
    ]
    .iter()
    .map(|header| format!("#include <{header}>"))
    .collect::<Vec<_>>()
    .join("\n");

    let mut helpers = vec![
        HelperDefinition::new(BANNER),
        HelperDefinition::new(includes),
        HelperDefinition::new(RUNTIME_PROTOTYPES),
        HelperDefinition::new(TYPED_ARRAY_NEW),
    ];
    if config.timer_stub {
        helpers.push(HelperDefinition::new(TIMER_STUB));
    }
    helpers
}

pub(super) fn builtin_registrations(config: &GeneratorConfig) -> Vec<Registration> {
    if !config.timer_stub {
        return Vec::new();
    }
    vec![Registration::new(format!(
        "mono_add_internal_call({}, fake_settimeout);",
        c_string_literal(TIMER_INTERNAL_CALL)
    ))]
}
