//! Common utilities for TypeScript code generation.
//!
//! Helpers shared by identifier synthesis, code generation and printing.

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a single-quoted TypeScript string literal.
pub fn escape_ts_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Quote a string if needed for use as a property key or enum member.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("'{}'", escape_ts_string(name))
    } else {
        name.to_string()
    }
}

/// Format a parameter access expression (e.g., `pathParams.id` or `queryParams?.["page-size"]`).
///
/// # Arguments
/// * `obj` - The object name (e.g., "pathParams")
/// * `prop` - The property name
/// * `required` - Whether the object is always present (affects optional chaining)
pub fn format_param_access(obj: &str, prop: &str, required: bool) -> String {
    if needs_bracket_notation(prop) {
        if required {
            format!("{}['{}']", obj, escape_ts_string(prop))
        } else {
            format!("{}?.['{}']", obj, escape_ts_string(prop))
        }
    } else if required {
        format!("{obj}.{prop}")
    } else {
        format!("{obj}?.{prop}")
    }
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Camel-case a dash/underscore separated word: every `-x` or `_x` with a
/// lowercase ASCII `x` becomes `X`. Other characters are left untouched.
pub fn camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if (c == '-' || c == '_')
            && let Some(next) = chars.peek().copied()
            && next.is_ascii_lowercase()
        {
            result.push(next.to_ascii_uppercase());
            chars.next();
            continue;
        }
        result.push(c);
    }
    result
}

/// Strip one trailing `s`, the pluralization heuristic used for resource names.
pub fn singularize(s: &str) -> &str {
    s.strip_suffix('s').unwrap_or(s)
}

/// Derive an enum member key from its value: upper-cased, dashes become
/// underscores, a leading digit gets a `_` prefix, and anything else that is
/// not a valid member name is quoted.
pub fn enum_member_key(value: &str) -> String {
    let key = value.to_uppercase().replace('-', "_");
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return quote_if_needed(&format!("_{key}"));
    }
    quote_if_needed(&key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));

        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_escape_ts_string() {
        assert_eq!(escape_ts_string("hello"), "hello");
        assert_eq!(escape_ts_string("it's"), "it\\'s");
        assert_eq!(escape_ts_string("a\\b"), "a\\\\b");
        assert_eq!(escape_ts_string("line\nbreak\r"), "line\\nbreak\\r");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "'foo-bar'");
        assert_eq!(quote_if_needed("123"), "'123'");
    }

    #[test]
    fn test_format_param_access() {
        assert_eq!(format_param_access("pathParams", "id", true), "pathParams.id");
        assert_eq!(format_param_access("queryParams", "page", false), "queryParams?.page");
        assert_eq!(
            format_param_access("pathParams", "todo-id", true),
            "pathParams['todo-id']"
        );
        assert_eq!(
            format_param_access("queryParams", "page-size", false),
            "queryParams?.['page-size']"
        );
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("foo"), "Foo");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("ABC"), "ABC");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("todo-items"), "todoItems");
        assert_eq!(camel_case("user_profile"), "userProfile");
        assert_eq!(camel_case("admin-Users"), "admin-Users");
        assert_eq!(camel_case("plain"), "plain");
        assert_eq!(camel_case("trailing-"), "trailing-");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("todos"), "todo");
        assert_eq!(singularize("todo"), "todo");
    }

    #[test]
    fn test_enum_member_key() {
        assert_eq!(enum_member_key("active"), "ACTIVE");
        assert_eq!(enum_member_key("in-progress"), "IN_PROGRESS");
        assert_eq!(enum_member_key("on hold"), "'ON HOLD'");
        assert_eq!(enum_member_key("1st"), "_1ST");
        assert_eq!(enum_member_key("1st place"), "'_1ST PLACE'");
        // Upper-cased keys never collide with the lowercase keywords.
        assert_eq!(enum_member_key("delete"), "DELETE");
        assert_eq!(enum_member_key("default"), "DEFAULT");
    }
}
