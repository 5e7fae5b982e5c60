//! Identifier synthesis for generated functions, hooks and per-operation types.
//!
//! Names derive from the operation id when present, otherwise from the path
//! segments and HTTP method. A [`NameRegistry`] tracks the names one emission
//! phase has handed out; each phase owns a fresh registry.

use std::collections::HashSet;

use crate::openapi::ir::utils::{camel_case, capitalize_first, singularize};
use crate::openapi::spec::HttpMethod;

/// Function names claimed by one emission phase.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Claim `base`, or the first of `base1`, `base2`, ... that is still free.
    pub fn claim(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut counter = 1;
        while self.used.contains(&name) {
            name = format!("{base}{counter}");
            counter += 1;
        }
        self.used.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }
}

/// Derive the bare function name for an operation.
///
/// The registry is only consulted: a name that is already taken gets a
/// method-specific suffix (`Detail`, `Create`, `Update`, `Delete`), but
/// nothing is claimed here.
pub fn derive_function_name(
    path: &str,
    method: HttpMethod,
    operation_id: Option<&str>,
    registry: &NameRegistry,
) -> String {
    if let Some(id) = operation_id {
        return id.to_string();
    }

    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != "api" && !s.starts_with('{'))
        .collect();
    if segments.is_empty() {
        return method.as_str().to_lowercase();
    }

    let several = segments.len() > 1;
    if several {
        segments[0] = singularize(segments[0]);
    }

    let mut resource = camel_case(&segments.join("-"));
    if several && method != HttpMethod::Get {
        resource = singularize(&resource).to_string();
    }

    if !registry.contains(&resource) {
        return resource;
    }

    let suffix = match method {
        HttpMethod::Get => "Detail",
        HttpMethod::Post => "Create",
        HttpMethod::Put => "Update",
        HttpMethod::Delete => "Delete",
        HttpMethod::Patch => "",
    };
    let stem = if method == HttpMethod::Get {
        singularize(&resource)
    } else {
        resource.as_str()
    };
    camel_case(&format!("{stem}{suffix}"))
}

/// Every identifier generated for one operation within one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIdentifier {
    pub function_name: String,
    pub hook_name: String,
    pub path_params_type_name: String,
    pub query_params_type_name: String,
    pub dto_type_name: String,
    pub response_type_name: String,
}

impl GeneratedIdentifier {
    /// Derive the companion names for a claimed function name.
    pub fn from_function_name(function_name: &str) -> Self {
        let base = capitalize_first(function_name);
        Self {
            function_name: function_name.to_string(),
            hook_name: format!("use{base}"),
            path_params_type_name: format!("{base}PathParams"),
            query_params_type_name: format!("{base}QueryParams"),
            dto_type_name: format!("{base}DTO"),
            response_type_name: format!("{}Response", base.replacen('-', "", 1)),
        }
    }
}

/// Derive, claim and expand the identifiers for one operation.
pub fn assign_identifier(
    path: &str,
    method: HttpMethod,
    operation_id: Option<&str>,
    registry: &mut NameRegistry,
) -> GeneratedIdentifier {
    let base = derive_function_name(path, method, operation_id, registry);
    let name = registry.claim(&base);
    GeneratedIdentifier::from_function_name(&name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn derive(path: &str, method: HttpMethod) -> String {
        derive_function_name(path, method, None, &NameRegistry::new())
    }

    #[test]
    fn test_operation_id_wins() {
        let name = derive_function_name("/api/todos", HttpMethod::Get, Some("listTodos"), &NameRegistry::new());
        assert_eq!(name, "listTodos");
    }

    #[test]
    fn test_names_from_path() {
        assert_eq!(derive("/api/todos", HttpMethod::Get), "todos");
        assert_eq!(derive("/api/todos", HttpMethod::Post), "todos");
        assert_eq!(derive("/api/todos/{id}", HttpMethod::Get), "todos");
        assert_eq!(derive("/api/todos/{id}/comments", HttpMethod::Get), "todoComments");
        assert_eq!(derive("/api/todos/{id}/comments", HttpMethod::Post), "todoComment");
        assert_eq!(derive("/api/admin-users/{id}/roles", HttpMethod::Delete), "adminUserRole");
        assert_eq!(derive("/api/user_profile", HttpMethod::Get), "userProfile");
    }

    #[test]
    fn test_empty_path_uses_method() {
        assert_eq!(derive("/api", HttpMethod::Get), "get");
        assert_eq!(derive("/{id}", HttpMethod::Delete), "delete");
    }

    #[test]
    fn test_taken_names_get_method_suffixes() {
        let mut registry = NameRegistry::new();
        registry.claim("todos");

        let name = |method| derive_function_name("/api/todos/{id}", method, None, &registry);
        assert_eq!(name(HttpMethod::Get), "todoDetail");
        assert_eq!(name(HttpMethod::Post), "todosCreate");
        assert_eq!(name(HttpMethod::Put), "todosUpdate");
        assert_eq!(name(HttpMethod::Delete), "todosDelete");
        assert_eq!(name(HttpMethod::Patch), "todos");
    }

    #[test]
    fn test_claim_appends_counters() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim("todos"), "todos");
        assert_eq!(registry.claim("todos"), "todos1");
        assert_eq!(registry.claim("todos"), "todos2");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_crud_sequence_within_one_phase() {
        let mut registry = NameRegistry::new();
        let ops = [
            ("/api/todos", HttpMethod::Get),
            ("/api/todos", HttpMethod::Post),
            ("/api/todos/{id}", HttpMethod::Get),
            ("/api/todos/{id}", HttpMethod::Put),
            ("/api/todos/{id}", HttpMethod::Patch),
            ("/api/todos/{id}", HttpMethod::Delete),
        ];
        let names: Vec<_> = ops
            .iter()
            .map(|(path, method)| assign_identifier(path, *method, None, &mut registry).function_name)
            .collect();
        assert_eq!(
            names,
            vec!["todos", "todosCreate", "todoDetail", "todosUpdate", "todos1", "todosDelete"]
        );

        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_companion_names() {
        let ident = GeneratedIdentifier::from_function_name("getTodos");
        assert_eq!(ident.hook_name, "useGetTodos");
        assert_eq!(ident.path_params_type_name, "GetTodosPathParams");
        assert_eq!(ident.query_params_type_name, "GetTodosQueryParams");
        assert_eq!(ident.dto_type_name, "GetTodosDTO");
        assert_eq!(ident.response_type_name, "GetTodosResponse");

        let dashed = GeneratedIdentifier::from_function_name("todo-items-Export");
        assert_eq!(dashed.response_type_name, "Todoitems-ExportResponse");
    }
}
