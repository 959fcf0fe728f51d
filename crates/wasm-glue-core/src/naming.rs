//! Identifier normalization and C literal escaping.

use std::fmt::Write as _;

/// Names that the generated C either reserves as keywords or declares as
/// locals inside every thunk.
const RESERVED: &[&str] = &[
    "auto", "bool", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
    // thunk locals
    "exception", "res", "method_params", "dotnet_target_instance",
];

/// Convert a managed identifier to lowercase, word-separated form.
///
/// Word boundaries are lower→upper transitions, the last capital of an
/// acronym followed by a lowercase letter, and any non-alphanumeric run.
///
/// ```
/// use wasm_glue_core::to_lower_snake_case;
///
/// assert_eq!(to_lower_snake_case("HelloFrom"), "hello_from");
/// assert_eq!(to_lower_snake_case("HTTPServer"), "http_server");
/// assert_eq!(to_lower_snake_case("nrs"), "nrs");
/// ```
pub fn to_lower_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.extend(ch.to_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Normalize a parameter name into a C identifier that cannot collide with
/// C keywords or thunk locals.
pub fn c_identifier(name: &str) -> String {
    let mut ident = to_lower_snake_case(name);
    if ident.is_empty() {
        ident.push_str("arg");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Render `s` as a double-quoted C string literal.
pub fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_words() {
        assert_eq!(to_lower_snake_case("StringParam"), "string_param");
        assert_eq!(to_lower_snake_case("stringParam"), "string_param");
        assert_eq!(to_lower_snake_case("already_snake"), "already_snake");
        assert_eq!(to_lower_snake_case("Item2Count"), "item2_count");
        assert_eq!(to_lower_snake_case("IOStream"), "io_stream");
        assert_eq!(to_lower_snake_case("_leading"), "leading");
        assert_eq!(to_lower_snake_case("a--b"), "a_b");
    }

    #[test]
    fn c_identifier_escapes_reserved() {
        assert_eq!(c_identifier("name"), "name");
        assert_eq!(c_identifier("Exception"), "exception_");
        assert_eq!(c_identifier("@int"), "int_");
        assert_eq!(c_identifier("_"), "arg");
    }

    #[test]
    fn string_literals_are_escaped() {
        assert_eq!(c_string_literal("env"), "\"env\"");
        assert_eq!(c_string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(c_string_literal("é"), "\"\\303\\251\"");
    }
}
