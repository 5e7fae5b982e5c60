//! Type declarations: the shared `types.ts` module and the per-operation
//! parameter, DTO and response types of a group module.

use crate::error::GenError;
use crate::openapi::classify::{BodyPayload, ResponsePayload};
use crate::openapi::enums::EnumRegistry;
use crate::openapi::ir::types::{TsField, TsModule, TsType, TsTypeDef, TypeDefKind, Validator};
use crate::openapi::ir::utils::enum_member_key;
use crate::openapi::naming::GeneratedIdentifier;
use crate::openapi::resolve::TypeResolver;
use crate::openapi::schema::SchemaNode;

use super::{PreparedOperation, class_decl, composed_decl, payload_type, shared_module_prelude};

/// Build the shared type module: every canonical enum, then one declaration
/// per named schema in document order. `resolver` must be unqualified.
pub fn codegen_shared_types(
    enums: &EnumRegistry,
    resolver: &TypeResolver<'_>,
) -> Result<TsModule, GenError> {
    let mut module = shared_module_prelude();

    for descriptor in enums.iter() {
        module.types.push(TsTypeDef {
            name: descriptor.name.clone(),
            kind: TypeDefKind::Enum {
                members: descriptor
                    .values
                    .iter()
                    .map(|value| (enum_member_key(value), value.clone()))
                    .collect(),
            },
        });
    }

    for (name, node) in resolver.arena().iter() {
        module.types.push(named_decl(name, node, resolver)?);
    }

    Ok(module)
}

fn named_decl(
    name: &str,
    node: &SchemaNode,
    resolver: &TypeResolver<'_>,
) -> Result<TsTypeDef, GenError> {
    match node {
        SchemaNode::Object(object) => class_decl(name, object, Vec::new(), resolver),
        SchemaNode::Composed(parts) => composed_decl(name, parts, resolver),
        other => Ok(TsTypeDef {
            name: name.to_string(),
            kind: TypeDefKind::TypeAlias {
                ty: resolver.resolve(other)?.ty,
            },
        }),
    }
}

/// Declarations one operation contributes to its group module.
pub fn codegen_operation_types(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<Vec<TsTypeDef>, GenError> {
    let mut types = Vec::new();

    if op.shape.has_path_params() {
        types.push(TsTypeDef {
            name: ident.path_params_type_name.clone(),
            kind: TypeDefKind::Class {
                supertypes: Vec::new(),
                fields: op
                    .shape
                    .path_params
                    .iter()
                    .map(|param| TsField {
                        name: param.clone(),
                        ty: TsType::string(),
                        optional: false,
                        validators: vec![Validator::IsString],
                    })
                    .collect(),
            },
        });
    }

    if op.shape.has_query_params {
        let mut fields = Vec::new();
        for param in op.descriptor.query_params() {
            let resolved = resolver.resolve(&param.schema)?;
            let mut validators = vec![resolved.validator];
            if !param.required {
                validators.push(Validator::IsOptional);
            }
            fields.push(TsField {
                name: param.name.clone(),
                ty: resolved.ty,
                optional: !param.required,
                validators,
            });
        }
        types.push(TsTypeDef {
            name: ident.query_params_type_name.clone(),
            kind: TypeDefKind::Class {
                supertypes: Vec::new(),
                fields,
            },
        });
    }

    if let Some(body) = &op.shape.body {
        match &body.payload {
            BodyPayload::Declared(object) => {
                types.push(class_decl(&ident.dto_type_name, object, Vec::new(), resolver)?);
            }
            BodyPayload::DeclaredComposed(parts) => {
                types.push(composed_decl(&ident.dto_type_name, parts, resolver)?);
            }
            BodyPayload::Direct(_) => {}
        }
    }

    types.push(response_decl(op, ident, resolver)?);
    Ok(types)
}

/// `XResponse` is declared for every operation so hooks and functions can
/// always name it.
fn response_decl(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<TsTypeDef, GenError> {
    let name = &ident.response_type_name;
    match &op.shape.response {
        ResponsePayload::Declared(object) | ResponsePayload::DeclaredSequence(object) => {
            class_decl(name, object, Vec::new(), resolver)
        }
        ResponsePayload::DeclaredComposed(parts) => composed_decl(name, parts, resolver),
        ResponsePayload::Alias(target) => Ok(alias(name, TsType::Ref(resolver.shared_name(target)))),
        ResponsePayload::Direct(_) => Ok(alias(name, payload_type(op, ident, resolver)?)),
        ResponsePayload::Passthrough => Ok(alias(name, TsType::any())),
    }
}

fn alias(name: &str, ty: TsType) -> TsTypeDef {
    TsTypeDef {
        name: name.to_string(),
        kind: TypeDefKind::TypeAlias { ty },
    }
}
