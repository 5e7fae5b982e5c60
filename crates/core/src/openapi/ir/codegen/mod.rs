//! Code generation from classified operations to TypeScript AST.
//!
//! Each tag group module is built in three phases, types, then request
//! functions, then React Query hooks. Every phase walks the group's
//! operations in document order with its own [`NameRegistry`]; since the
//! derivation is deterministic, an operation gets the same names in all three
//! phases and cross-references between them line up.

pub mod fetch;
pub mod hooks;
pub mod types;

use crate::error::GenError;
use crate::openapi::classify::{BodyPayload, OperationDescriptor, OperationShape, ResponsePayload};
use crate::openapi::naming::{GeneratedIdentifier, NameRegistry, assign_identifier};
use crate::openapi::resolve::{TYPES_NAMESPACE, TypeResolver};
use crate::openapi::schema::{ObjectNode, SchemaNode};

use super::types::{ImportClause, TsField, TsImport, TsModule, TsType, TsTypeDef, TypeDefKind, Validator};

/// Module the generated code imports its transport helpers from.
pub const TRANSPORT_MODULE: &str = "@aipt/utils";

const ESLINT_NO_UNUSED_VARS: &str = "/* eslint-disable @typescript-eslint/no-unused-vars */";
const ESLINT_NO_EXPLICIT_ANY: &str = "/* eslint-disable @typescript-eslint/no-explicit-any */";

const VALIDATOR_IMPORTS: [&str; 8] = [
    "IsString",
    "IsNumber",
    "IsBoolean",
    "IsArray",
    "IsObject",
    "IsOptional",
    "IsEnum",
    "ValidateNested",
];

/// A lowered operation together with its classification.
#[derive(Debug, Clone)]
pub struct PreparedOperation {
    pub descriptor: OperationDescriptor,
    pub shape: OperationShape,
}

fn named_import(items: &[&str], from: &str) -> TsImport {
    TsImport {
        clause: ImportClause::Named(items.iter().map(ToString::to_string).collect()),
        from: from.to_string(),
    }
}

/// Header and imports of the shared `types.ts` module.
pub fn shared_module_prelude() -> TsModule {
    TsModule {
        header: vec![ESLINT_NO_UNUSED_VARS.to_string()],
        imports: vec![
            named_import(&VALIDATOR_IMPORTS, "class-validator"),
            named_import(&["Type"], "class-transformer"),
        ],
        ..TsModule::default()
    }
}

/// Header and imports of a tag group module.
pub fn group_module_prelude() -> TsModule {
    TsModule {
        header: vec![
            ESLINT_NO_UNUSED_VARS.to_string(),
            ESLINT_NO_EXPLICIT_ANY.to_string(),
        ],
        imports: vec![
            named_import(
                &[
                    "useQuery",
                    "useMutation",
                    "useQueryClient",
                    "UseQueryOptions",
                    "UseMutationOptions",
                ],
                "@tanstack/react-query",
            ),
            named_import(&["apiRequest", "HTTPResponse", "jsonToFormData"], TRANSPORT_MODULE),
            TsImport {
                clause: ImportClause::Namespace(TYPES_NAMESPACE.to_string()),
                from: "./types".to_string(),
            },
            named_import(&VALIDATOR_IMPORTS, "class-validator"),
        ],
        ..TsModule::default()
    }
}

/// Build one tag group module: types, then functions, then hooks.
pub fn codegen_group_module(
    operations: &[PreparedOperation],
    resolver: &TypeResolver<'_>,
) -> Result<TsModule, GenError> {
    let mut module = group_module_prelude();

    let mut registry = NameRegistry::new();
    for op in operations {
        let ident = claim(op, &mut registry);
        module
            .types
            .extend(types::codegen_operation_types(op, &ident, resolver)?);
    }
    tracing::debug!(names = registry.len(), "type phase complete");

    let mut registry = NameRegistry::new();
    for op in operations {
        let ident = claim(op, &mut registry);
        module
            .functions
            .push(fetch::codegen_fetch_function(op, &ident, resolver)?);
    }

    let mut registry = NameRegistry::new();
    for op in operations {
        let ident = claim(op, &mut registry);
        module.functions.push(hooks::codegen_hook(op, &ident, resolver)?);
    }

    Ok(module)
}

fn claim(op: &PreparedOperation, registry: &mut NameRegistry) -> GeneratedIdentifier {
    let d = &op.descriptor;
    assign_identifier(&d.path, d.method, d.operation_id.as_deref(), registry)
}

/// The `index.ts` module re-exporting the shared types and every group.
///
/// Group modules name their bindings independently, so two groups can export
/// the same identifier; TypeScript leaves such a name ambiguous through the
/// index and it has to be imported from its group module.
pub fn codegen_index_module<S: AsRef<str>>(group_modules: &[S]) -> TsModule {
    let mut reexports = vec!["./types".to_string()];
    reexports.extend(group_modules.iter().map(|m| format!("./{}", m.as_ref())));
    TsModule {
        header: vec!["// Auto-generated API code".to_string()],
        reexports,
        ..TsModule::default()
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Build a decorated class from an object schema.
fn class_decl(
    name: &str,
    object: &ObjectNode,
    supertypes: Vec<String>,
    resolver: &TypeResolver<'_>,
) -> Result<TsTypeDef, GenError> {
    let mut fields = Vec::with_capacity(object.properties.len());
    for (prop, node) in &object.properties {
        let resolved = resolver.resolve(node)?;
        let optional = !object.is_required(prop);
        let mut validators = vec![resolved.validator];
        if optional {
            validators.push(Validator::IsOptional);
        }
        fields.push(TsField {
            name: prop.clone(),
            ty: resolved.ty,
            optional,
            validators,
        });
    }
    Ok(TsTypeDef {
        name: name.to_string(),
        kind: TypeDefKind::Class { supertypes, fields },
    })
}

/// Build a class from `allOf` parts: referenced parts become supertypes and
/// the last inline object part supplies the fields.
fn composed_decl(
    name: &str,
    parts: &[SchemaNode],
    resolver: &TypeResolver<'_>,
) -> Result<TsTypeDef, GenError> {
    let supertypes = parts
        .iter()
        .filter_map(|part| match part {
            SchemaNode::Reference(target) => Some(resolver.shared_name(target)),
            _ => None,
        })
        .collect();
    let empty = ObjectNode::default();
    let fields_from = parts
        .iter()
        .rev()
        .find_map(|part| match part {
            SchemaNode::Object(object) => Some(object),
            _ => None,
        })
        .unwrap_or(&empty);
    class_decl(name, fields_from, supertypes, resolver)
}

/// `T` in `HTTPResponse<T>` for an operation.
fn payload_type(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<TsType, GenError> {
    let declared = || TsType::Ref(ident.response_type_name.clone());
    Ok(match &op.shape.response {
        ResponsePayload::Passthrough => TsType::any(),
        ResponsePayload::Declared(_)
        | ResponsePayload::DeclaredComposed(_)
        | ResponsePayload::Alias(_) => declared(),
        ResponsePayload::DeclaredSequence(_) => TsType::Array(Box::new(declared())),
        ResponsePayload::Direct(node) => resolver.resolve(node)?.ty,
    })
}

/// Type of the `data` argument, if the operation sends a body.
fn body_type(
    op: &PreparedOperation,
    ident: &GeneratedIdentifier,
    resolver: &TypeResolver<'_>,
) -> Result<Option<TsType>, GenError> {
    let Some(body) = &op.shape.body else {
        return Ok(None);
    };
    Ok(Some(match &body.payload {
        BodyPayload::Declared(_) | BodyPayload::DeclaredComposed(_) => {
            TsType::Ref(ident.dto_type_name.clone())
        }
        BodyPayload::Direct(node) => resolver.resolve(node)?.ty,
    }))
}

/// `HTTPResponse<T>`
fn http_response(payload: TsType) -> TsType {
    TsType::generic("HTTPResponse", vec![payload])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::ir::Emit;

    #[test]
    fn test_group_prelude() {
        let text = group_module_prelude().emit();
        assert_eq!(
            text,
            "/* eslint-disable @typescript-eslint/no-unused-vars */\n\
             /* eslint-disable @typescript-eslint/no-explicit-any */\n\
             import { useQuery, useMutation, useQueryClient, UseQueryOptions, UseMutationOptions } from '@tanstack/react-query';\n\
             import { apiRequest, HTTPResponse, jsonToFormData } from '@aipt/utils';\n\
             import * as Types from './types';\n\
             import { IsString, IsNumber, IsBoolean, IsArray, IsObject, IsOptional, IsEnum, ValidateNested } from 'class-validator';\n"
        );
    }

    #[test]
    fn test_shared_prelude() {
        let text = shared_module_prelude().emit();
        assert!(text.starts_with("/* eslint-disable @typescript-eslint/no-unused-vars */\nimport { IsString,"));
        assert!(text.ends_with("import { Type } from 'class-transformer';\n"));
    }

    #[test]
    fn test_index_module() {
        let text = codegen_index_module(&["todos", "adminusers"]).emit();
        assert_eq!(
            text,
            "// Auto-generated API code\n\nexport * from './types';\nexport * from './todos';\nexport * from './adminusers';\n"
        );
    }
}
