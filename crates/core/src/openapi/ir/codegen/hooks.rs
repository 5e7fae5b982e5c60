//! React Query bindings: `useQuery` wrappers for GET, `useMutation` wrappers
//! for everything else.

use crate::error::GenError;
use crate::openapi::ir::types::{
    ArrowBody, ObjectMember, TsExpr, TsFunction, TsParam, TsStmt, TsType,
};
use crate::openapi::ir::utils::format_param_access;
use crate::openapi::naming::GeneratedIdentifier;
use crate::openapi::resolve::TypeResolver;
use crate::openapi::spec::HttpMethod;

use super::{PreparedOperation, body_type, http_response, payload_type};

/// Build the hook for one operation.
pub fn codegen_hook(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<TsFunction, GenError> {
    let payload = payload_type(op, ident, resolver)?;
    let mut params = Vec::new();
    if op.shape.has_path_params() {
        params.push(TsParam::new(
            "pathParams",
            TsType::Ref(ident.path_params_type_name.clone()),
        ));
    }

    let body = if op.descriptor.method == HttpMethod::Get {
        query_hook(op, ident, payload, &mut params)
    } else {
        mutation_hook(op, ident, resolver, payload, &mut params)?
    };

    Ok(TsFunction {
        name: ident.hook_name.clone(),
        doc: Some(format!("{} Hook", op.descriptor.title(&ident.hook_name))),
        params,
        return_type: None,
        body,
        is_async: false,
        is_export: true,
    })
}

fn query_hook(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    payload: TsType,
    params: &mut Vec<TsParam>,
) -> Vec<TsStmt> {
    let shape = &op.shape;
    if shape.has_query_params {
        params.push(TsParam::optional(
            "queryParams",
            TsType::Ref(ident.query_params_type_name.clone()),
        ));
    }
    params.push(TsParam::optional(
        "options",
        TsType::generic(
            "UseQueryOptions",
            vec![http_response(payload), TsType::Ref("Error".to_string())],
        ),
    ));

    let mut key = vec![
        TsExpr::string(&op.descriptor.primary_tag().to_lowercase()),
        TsExpr::string(&op.descriptor.cache_label()),
    ];
    key.extend(
        shape
            .path_params
            .iter()
            .map(|name| TsExpr::Raw(format_param_access("pathParams", name, true))),
    );
    if shape.has_query_params {
        key.extend(
            op.descriptor
                .query_params()
                .map(|param| TsExpr::Raw(format_param_access("queryParams", &param.name, false))),
        );
    }

    let mut call_args = Vec::new();
    if shape.has_path_params() {
        call_args.push(TsExpr::ident("pathParams"));
    }
    if shape.has_query_params {
        call_args.push(TsExpr::ident("queryParams"));
    }

    let options = TsExpr::Object {
        members: vec![
            ObjectMember::Prop("queryKey".to_string(), TsExpr::Array(key)),
            ObjectMember::Prop(
                "queryFn".to_string(),
                TsExpr::Arrow {
                    params: Vec::new(),
                    body: ArrowBody::Expr(Box::new(TsExpr::call(&ident.function_name, call_args))),
                },
            ),
            ObjectMember::Spread(TsExpr::ident("options")),
        ],
        multiline: true,
    };

    vec![TsStmt::Return(TsExpr::call("useQuery", vec![options]))]
}

fn mutation_hook(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
    payload: TsType,
    params: &mut Vec<TsParam>,
) -> Result<Vec<TsStmt>, GenError> {
    let data = body_type(op, ident, resolver)?;
    params.push(TsParam::optional(
        "options",
        TsType::generic(
            "UseMutationOptions",
            vec![
                http_response(payload),
                TsType::Ref("Error".to_string()),
                data.clone().unwrap_or_else(TsType::any),
            ],
        ),
    ));

    let mut fn_params = Vec::new();
    let mut call_args = Vec::new();
    if op.shape.has_path_params() {
        call_args.push(TsExpr::ident("pathParams"));
    }
    if data.is_some() {
        fn_params.push(TsParam {
            name: "data".to_string(),
            ty: None,
            optional: false,
        });
        call_args.push(TsExpr::ident("data"));
    }

    let mut members = vec![ObjectMember::Prop(
        "mutationFn".to_string(),
        TsExpr::Arrow {
            params: fn_params,
            body: ArrowBody::Expr(Box::new(TsExpr::call(&ident.function_name, call_args))),
        },
    )];

    if !op.descriptor.tags.is_empty() {
        let mut on_success = vec![TsStmt::Comment("Invalidate related cache".to_string())];
        on_success.extend(op.descriptor.tags.iter().map(|tag| {
            TsStmt::Expr(TsExpr::Void(Box::new(TsExpr::call(
                "queryClient.invalidateQueries",
                vec![TsExpr::Object {
                    members: vec![ObjectMember::Prop(
                        "queryKey".to_string(),
                        TsExpr::Array(vec![TsExpr::string(&tag.to_lowercase())]),
                    )],
                    multiline: false,
                }],
            ))))
        }));
        members.push(ObjectMember::Prop(
            "onSuccess".to_string(),
            TsExpr::Arrow {
                params: Vec::new(),
                body: ArrowBody::Block(on_success),
            },
        ));
    }

    members.push(ObjectMember::Prop(
        "onError".to_string(),
        TsExpr::Arrow {
            params: vec![TsParam::new("error", TsType::any())],
            body: ArrowBody::Block(vec![TsStmt::Expr(TsExpr::call(
                "console.error",
                vec![TsExpr::string("Mutation failed:"), TsExpr::ident("error")],
            ))]),
        },
    ));
    members.push(ObjectMember::Spread(TsExpr::ident("options")));

    Ok(vec![
        TsStmt::Const {
            name: "queryClient".to_string(),
            init: TsExpr::call("useQueryClient", Vec::new()),
        },
        TsStmt::Blank,
        TsStmt::Return(TsExpr::call(
            "useMutation",
            vec![TsExpr::Object {
                members,
                multiline: true,
            }],
        )),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::classify::{OperationDescriptor, OperationEntry, classify};
    use crate::openapi::enums::EnumRegistry;
    use crate::openapi::ir::Emit;
    use crate::openapi::resolve::Qualifier;
    use crate::openapi::schema::SchemaArena;
    use crate::openapi::spec::ApiDocument;

    const DOC: &str = r##"{
        "paths": {
            "/api/todos": {
                "get": {
                    "tags": ["Todos"],
                    "summary": "List  todos",
                    "parameters": [
                        {"name": "page", "in": "query", "schema": {"type": "integer"}},
                        {"name": "page-size", "in": "query", "schema": {"type": "integer"}}
                    ],
                    "responses": {"200": {"content": {"application/json": {"schema": {
                        "type": "object",
                        "properties": {"data": {"type": "array", "items": {"$ref": "#/components/schemas/Todo"}}}
                    }}}}}
                },
                "post": {
                    "tags": ["Todos", "App"],
                    "summary": "Create todo",
                    "requestBody": {"content": {"application/json": {"schema": {"type": "object", "properties": {"title": {"type": "string"}}}}}},
                    "responses": {"201": {"content": {"application/json": {"schema": {
                        "type": "object", "properties": {"data": {"$ref": "#/components/schemas/Todo"}}
                    }}}}}
                }
            },
            "/api/todos/{id}": {
                "get": {
                    "tags": ["Todos"],
                    "operationId": "getTodo",
                    "responses": {"200": {"content": {"application/json": {"schema": {
                        "type": "object", "properties": {"data": {"$ref": "#/components/schemas/Todo"}}
                    }}}}}
                },
                "delete": {
                    "tags": ["Todos"],
                    "responses": {"204": {}}
                }
            }
        },
        "components": {"schemas": {
            "Todo": {"type": "object", "properties": {"id": {"type": "string"}}}
        }}
    }"##;

    fn emit_all(names: &[&str]) -> Vec<String> {
        let doc = ApiDocument::from_json(DOC).unwrap();
        let arena = SchemaArena::build(&doc.schemas).unwrap();
        let enums = EnumRegistry::build(&arena);
        let resolver = TypeResolver::new(&arena, &enums, Qualifier::Namespaced);

        doc.operations()
            .zip(names)
            .map(|((path, method, operation), name)| {
                let entry = OperationEntry {
                    path,
                    method,
                    operation,
                };
                let descriptor = OperationDescriptor::lower(&entry, &arena).unwrap();
                let (shape, _) = classify(&descriptor);
                let op = PreparedOperation { descriptor, shape };
                let ident = GeneratedIdentifier::from_function_name(name);
                codegen_hook(&op, &ident, &resolver).unwrap().emit()
            })
            .collect()
    }

    #[test]
    fn test_query_hook() {
        let out = emit_all(&["todos", "todosCreate", "getTodo", "todosDelete"]);

        assert_eq!(
            out[0],
            "/**\n * List  todos Hook\n */\n\
             export function useTodos(\n\
             \x20 queryParams?: TodosQueryParams,\n\
             \x20 options?: UseQueryOptions<HTTPResponse<Types.Todo[]>, Error>\n) {\n\
             \x20 return useQuery({\n\
             \x20   queryKey: ['todos', 'list_todos', queryParams?.page, queryParams?.['page-size']],\n\
             \x20   queryFn: () => todos(queryParams),\n\
             \x20   ...options,\n\
             \x20 });\n}\n"
        );

        assert!(out[2].starts_with("/**\n * getTodo Hook\n */\nexport function useGetTodo(\n  pathParams: GetTodoPathParams,\n"));
        assert!(out[2].contains("    queryKey: ['todos', 'gettodo', pathParams.id],\n    queryFn: () => getTodo(pathParams),\n"));
    }

    #[test]
    fn test_mutation_hook() {
        let out = emit_all(&["todos", "todosCreate", "getTodo", "todosDelete"]);

        assert_eq!(
            out[1],
            "/**\n * Create todo Hook\n */\n\
             export function useTodosCreate(\n\
             \x20 options?: UseMutationOptions<HTTPResponse<Types.Todo>, Error, TodosCreateDTO>\n) {\n\
             \x20 const queryClient = useQueryClient();\n\n\
             \x20 return useMutation({\n\
             \x20   mutationFn: (data) => todosCreate(data),\n\
             \x20   onSuccess: () => {\n\
             \x20     // Invalidate related cache\n\
             \x20     void queryClient.invalidateQueries({ queryKey: ['todos'] });\n\
             \x20     void queryClient.invalidateQueries({ queryKey: ['app'] });\n\
             \x20   },\n\
             \x20   onError: (error: any) => {\n\
             \x20     console.error('Mutation failed:', error);\n\
             \x20   },\n\
             \x20   ...options,\n\
             \x20 });\n}\n"
        );
    }

    #[test]
    fn test_mutation_without_body() {
        let out = emit_all(&["todos", "todosCreate", "getTodo", "todosDelete"]);

        assert!(out[3].contains("  pathParams: TodosDeletePathParams,\n  options?: UseMutationOptions<HTTPResponse<any>, Error, any>\n"));
        assert!(out[3].contains("    mutationFn: () => todosDelete(pathParams),\n"));
        assert!(out[3].contains("void queryClient.invalidateQueries({ queryKey: ['todos'] });\n    },\n"));
    }
}
