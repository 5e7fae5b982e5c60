//! Schema type resolution.
//!
//! Maps one [`SchemaNode`] to the TypeScript type it renders as, plus the
//! class-validator decorator used when it appears as a class field.

use crate::error::GenError;
use crate::openapi::enums::EnumRegistry;
use crate::openapi::ir::types::{EnumTarget, TsLiteral, TsPrimitive, TsType, Validator};
use crate::openapi::schema::{PrimitiveKind, SchemaArena, SchemaNode};

/// Namespace the shared type module is imported under by group modules.
pub const TYPES_NAMESPACE: &str = "Types";

/// How references to shared declarations are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// Inside the shared type module: `Todo`.
    Bare,
    /// Inside a group module: `Types.Todo`.
    Namespaced,
}

/// A rendered type and its field validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    pub ty: TsType,
    pub validator: Validator,
}

impl ResolvedType {
    fn new(ty: TsType, validator: Validator) -> Self {
        Self { ty, validator }
    }
}

/// Resolves schema nodes against one run's arena and enum registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    arena: &'a SchemaArena,
    enums: &'a EnumRegistry,
    qualifier: Qualifier,
}

impl<'a> TypeResolver<'a> {
    pub fn new(arena: &'a SchemaArena, enums: &'a EnumRegistry, qualifier: Qualifier) -> Self {
        Self {
            arena,
            enums,
            qualifier,
        }
    }

    pub fn arena(&self) -> &'a SchemaArena {
        self.arena
    }

    /// Name of a shared declaration as seen from this resolver's module.
    pub fn shared_name(&self, name: &str) -> String {
        match self.qualifier {
            Qualifier::Bare => name.to_string(),
            Qualifier::Namespaced => format!("{TYPES_NAMESPACE}.{name}"),
        }
    }

    pub fn resolve(&self, node: &SchemaNode) -> Result<ResolvedType, GenError> {
        match node {
            SchemaNode::Any => Ok(ResolvedType::new(TsType::any(), Validator::IsString)),
            SchemaNode::Primitive { kind, format } => Ok(resolve_primitive(*kind, format.as_deref())),
            SchemaNode::Reference(name) => {
                if !self.arena.contains(name) {
                    return Err(GenError::UnresolvedReference {
                        reference: name.clone(),
                        location: "type resolution".to_string(),
                    });
                }
                Ok(ResolvedType::new(
                    TsType::Ref(self.shared_name(name)),
                    Validator::ValidateNested,
                ))
            }
            SchemaNode::Array(items) => {
                let item_ty = match items {
                    Some(item) => self.resolve(item)?.ty,
                    None => TsType::any(),
                };
                Ok(ResolvedType::new(TsType::Array(Box::new(item_ty)), Validator::IsArray))
            }
            SchemaNode::Enum(values) => Ok(match self.enums.lookup(values) {
                Some(descriptor) => {
                    let name = self.shared_name(&descriptor.name);
                    ResolvedType::new(
                        TsType::Ref(name.clone()),
                        Validator::IsEnum(EnumTarget::Named(name)),
                    )
                }
                None => ResolvedType::new(
                    TsType::Union(
                        values
                            .iter()
                            .map(|v| TsType::Literal(TsLiteral::String(v.clone())))
                            .collect(),
                    ),
                    Validator::IsEnum(EnumTarget::Values(values.clone())),
                ),
            }),
            SchemaNode::Object(_) | SchemaNode::Composed(_) => {
                Ok(ResolvedType::new(TsType::any(), Validator::IsObject))
            }
        }
    }
}

fn resolve_primitive(kind: PrimitiveKind, format: Option<&str>) -> ResolvedType {
    match (kind, format) {
        (PrimitiveKind::String, Some("binary")) => {
            ResolvedType::new(TsType::Ref("File".to_string()), Validator::IsObject)
        }
        (PrimitiveKind::String, _) => {
            ResolvedType::new(TsType::Primitive(TsPrimitive::String), Validator::IsString)
        }
        (PrimitiveKind::Integer | PrimitiveKind::Number, _) => {
            ResolvedType::new(TsType::Primitive(TsPrimitive::Number), Validator::IsNumber)
        }
        (PrimitiveKind::Boolean, _) => {
            ResolvedType::new(TsType::Primitive(TsPrimitive::Boolean), Validator::IsBoolean)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::ir::Emit;
    use crate::openapi::spec::Schema;
    use indexmap::IndexMap;

    const SCHEMAS: &str = r##"{
        "Todo": {"type": "object", "properties": {
            "status": {"type": "string", "enum": ["open", "done"]}
        }},
        "Tag": {"type": "string"}
    }"##;

    fn fixture() -> (SchemaArena, EnumRegistry) {
        let schemas: IndexMap<String, Schema> = serde_json::from_str(SCHEMAS).unwrap();
        let arena = SchemaArena::build(&schemas).unwrap();
        let enums = EnumRegistry::build(&arena);
        (arena, enums)
    }

    fn resolve_json(resolver: &TypeResolver<'_>, json: &str) -> (String, String) {
        let schema: Schema = serde_json::from_str(json).unwrap();
        let node = resolver.arena().lower(&schema, "test").unwrap();
        let resolved = resolver.resolve(&node).unwrap();
        (resolved.ty.emit(), resolved.validator.emit())
    }

    #[test]
    fn test_primitives_and_formats() {
        let (arena, enums) = fixture();
        let resolver = TypeResolver::new(&arena, &enums, Qualifier::Bare);

        let cases = [
            (r#"{"type": "string"}"#, "string", "@IsString()"),
            (r#"{"type": "integer"}"#, "number", "@IsNumber()"),
            (r#"{"type": "number"}"#, "number", "@IsNumber()"),
            (r#"{"type": "boolean"}"#, "boolean", "@IsBoolean()"),
            (r#"{"type": "object"}"#, "any", "@IsObject()"),
            (r#"{}"#, "any", "@IsString()"),
            (r#"{"type": "string", "format": "date-time"}"#, "string", "@IsString()"),
            (r#"{"type": "string", "format": "binary"}"#, "File", "@IsObject()"),
            (r#"{"type": "array"}"#, "any[]", "@IsArray()"),
        ];
        for (json, ty, validator) in cases {
            assert_eq!(resolve_json(&resolver, json), (ty.to_string(), validator.to_string()), "{json}");
        }
    }

    #[test]
    fn test_references_are_qualified_outside_the_type_module() {
        let (arena, enums) = fixture();
        let bare = TypeResolver::new(&arena, &enums, Qualifier::Bare);
        let namespaced = TypeResolver::new(&arena, &enums, Qualifier::Namespaced);
        let json = r##"{"type": "array", "items": {"$ref": "#/components/schemas/Todo"}}"##;

        assert_eq!(resolve_json(&bare, json).0, "Todo[]");
        assert_eq!(resolve_json(&namespaced, json).0, "Types.Todo[]");
        assert_eq!(
            resolve_json(&namespaced, r##"{"$ref": "#/components/schemas/Tag"}"##),
            ("Types.Tag".to_string(), "@ValidateNested()".to_string())
        );
    }

    #[test]
    fn test_enums() {
        let (arena, enums) = fixture();
        let resolver = TypeResolver::new(&arena, &enums, Qualifier::Namespaced);

        assert_eq!(
            resolve_json(&resolver, r#"{"type": "string", "enum": ["open", "done"]}"#),
            ("Types.TodoStatus".to_string(), "@IsEnum(Types.TodoStatus)".to_string())
        );
        assert_eq!(
            resolve_json(&resolver, r#"{"type": "string", "enum": ["low", "high"]}"#),
            ("'low' | 'high'".to_string(), "@IsEnum(['low', 'high'])".to_string())
        );
    }

    #[test]
    fn test_dangling_reference_is_an_error() {
        let (arena, enums) = fixture();
        let resolver = TypeResolver::new(&arena, &enums, Qualifier::Bare);
        let err = resolver
            .resolve(&SchemaNode::Reference("Missing".into()))
            .unwrap_err();
        assert!(matches!(err, GenError::UnresolvedReference { .. }));
    }
}
