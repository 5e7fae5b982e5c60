//! Request functions calling the transport layer's `apiRequest`.

use crate::error::GenError;
use crate::openapi::classify::BodyContentKind;
use crate::openapi::ir::types::{
    ObjectMember, TemplatePart, TsExpr, TsFunction, TsLiteral, TsParam, TsPrimitive, TsStmt, TsType,
};
use crate::openapi::ir::utils::format_param_access;
use crate::openapi::naming::GeneratedIdentifier;
use crate::openapi::resolve::TypeResolver;

use super::{PreparedOperation, body_type, http_response, payload_type};

/// Build the request function for one operation.
///
/// Parameters come in a fixed order: path params, body, query params,
/// `noAuthorize`.
pub fn codegen_fetch_function(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<TsFunction, GenError> {
    let shape = &op.shape;
    let payload = payload_type(op, ident, resolver)?;

    let mut params = Vec::new();
    if shape.has_path_params() {
        params.push(TsParam::new(
            "pathParams",
            TsType::Ref(ident.path_params_type_name.clone()),
        ));
    }
    if let Some(ty) = body_type(op, ident, resolver)? {
        params.push(TsParam::new("data", ty));
    }
    if shape.has_query_params {
        params.push(TsParam::optional(
            "queryParams",
            TsType::Ref(ident.query_params_type_name.clone()),
        ));
    }
    params.push(TsParam::optional(
        "noAuthorize",
        TsType::Primitive(TsPrimitive::Boolean),
    ));

    let mut options = vec![ObjectMember::Prop(
        "method".to_string(),
        TsExpr::string(op.descriptor.method.as_str()),
    )];
    if let Some(body) = &shape.body {
        match body.content {
            BodyContentKind::Multipart => {
                options.push(ObjectMember::Prop(
                    "body".to_string(),
                    TsExpr::call("jsonToFormData", vec![TsExpr::ident("data")]),
                ));
                options.push(ObjectMember::Prop(
                    "headers".to_string(),
                    TsExpr::Object {
                        members: vec![ObjectMember::Prop(
                            "\"Content-Type\"".to_string(),
                            TsExpr::Literal(TsLiteral::Null),
                        )],
                        multiline: false,
                    },
                ));
            }
            BodyContentKind::Json => {
                options.push(ObjectMember::Prop(
                    "body".to_string(),
                    TsExpr::call("JSON.stringify", vec![TsExpr::ident("data")]),
                ));
            }
        }
    }
    options.push(ObjectMember::Prop(
        "noAuthorize".to_string(),
        TsExpr::ident("noAuthorize"),
    ));
    if shape.has_query_params {
        options.push(ObjectMember::Prop(
            "params".to_string(),
            TsExpr::ident("queryParams"),
        ));
    }

    let request = TsExpr::Call {
        callee: Box::new(TsExpr::ident("apiRequest")),
        type_args: vec![payload.clone()],
        args: vec![
            request_url(&op.descriptor.path, shape.has_path_params()),
            TsExpr::Object {
                members: options,
                multiline: true,
            },
        ],
    };

    Ok(TsFunction {
        name: ident.function_name.clone(),
        doc: Some(op.descriptor.title(&ident.function_name).to_string()),
        params,
        return_type: Some(TsType::generic("Promise", vec![http_response(payload)])),
        body: vec![TsStmt::Return(TsExpr::Await(Box::new(request)))],
        is_async: true,
        is_export: true,
    })
}

/// The request URL: a template literal filling `{param}` segments from
/// `pathParams`, or a plain string when there are none.
fn request_url(path: &str, has_path_params: bool) -> TsExpr {
    if !has_path_params {
        return TsExpr::string(path);
    }

    let mut parts = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        if start > 0 {
            parts.push(TemplatePart::Static(rest[..start].to_string()));
        }
        let name = &rest[start + 1..start + len];
        parts.push(TemplatePart::Dynamic(TsExpr::Raw(format_param_access(
            "pathParams",
            name,
            true,
        ))));
        rest = &rest[start + len + 1..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Static(rest.to_string()));
    }
    TsExpr::Template(parts)
}
