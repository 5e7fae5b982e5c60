//! Lowered schema model.
//!
//! Raw [`Schema`] values are lowered once into [`SchemaNode`] trees. Named
//! component schemas live in a [`SchemaArena`] keyed by name; references are
//! plain names resolved through the arena, and every reference is checked
//! while lowering.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::GenError;
use crate::openapi::spec::{EnumValue, Schema};

/// Scalar kinds a primitive schema can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// A lowered schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// No type information.
    Any,
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
    },
    /// Name of a schema in the arena.
    Reference(String),
    /// Array, with its item schema when one is declared.
    Array(Option<Box<SchemaNode>>),
    /// Ordered enum values, stringified.
    Enum(Vec<String>),
    Object(ObjectNode),
    /// `allOf` parts, each an object or a reference acting as a supertype.
    Composed(Vec<SchemaNode>),
}

/// Properties of an object schema in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
}

impl ObjectNode {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }
}

impl SchemaNode {
    /// Names this node aliases or extends. These are the edges that must not
    /// form a cycle between named schemas.
    fn declaration_edges(&self) -> Vec<&str> {
        match self {
            Self::Reference(name) => vec![name.as_str()],
            Self::Composed(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Self::Reference(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Last segment of a `$ref` pointer: `#/components/schemas/Todo` -> `Todo`.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

/// The named component schemas of one document, lowered and validated.
#[derive(Debug, Default)]
pub struct SchemaArena {
    entries: IndexMap<String, SchemaNode>,
}

#[derive(Clone, Copy)]
enum Visit {
    Active,
    Done,
}

impl SchemaArena {
    /// Lower every component schema, rejecting unresolved references,
    /// unsupported kinds and alias/supertype cycles.
    pub fn build(schemas: &IndexMap<String, Schema>) -> Result<Self, GenError> {
        let names: HashSet<&str> = schemas.keys().map(String::as_str).collect();
        let known = |name: &str| names.contains(name);

        let mut entries = IndexMap::with_capacity(schemas.len());
        for (name, schema) in schemas {
            let location = format!("#/components/schemas/{name}");
            entries.insert(name.clone(), lower(schema, &location, &known)?);
        }

        let arena = Self { entries };
        arena.check_cycles()?;
        tracing::debug!(schemas = arena.len(), "built schema arena");
        Ok(arena)
    }

    /// Lower a schema found outside the component dictionary (parameters,
    /// bodies, responses). `location` is used in error messages.
    pub fn lower(&self, schema: &Schema, location: &str) -> Result<SchemaNode, GenError> {
        lower(schema, location, &|name| self.entries.contains_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Named schemas in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn check_cycles(&self) -> Result<(), GenError> {
        let mut state = HashMap::new();
        let mut stack = Vec::new();
        for name in self.entries.keys() {
            self.visit(name, &mut state, &mut stack)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        state: &mut HashMap<&'a str, Visit>,
        stack: &mut Vec<&'a str>,
    ) -> Result<(), GenError> {
        match state.get(name) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::Active) => {
                let start = stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut chain: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
                chain.push(name.to_string());
                return Err(GenError::ReferenceCycle { chain });
            }
            None => {}
        }

        state.insert(name, Visit::Active);
        stack.push(name);
        if let Some(node) = self.entries.get(name) {
            for target in node.declaration_edges() {
                self.visit(target, state, stack)?;
            }
        }
        stack.pop();
        state.insert(name, Visit::Done);
        Ok(())
    }
}

fn lower(
    schema: &Schema,
    location: &str,
    known: &dyn Fn(&str) -> bool,
) -> Result<SchemaNode, GenError> {
    if let Some(ref_path) = &schema.ref_path {
        let name = ref_name(ref_path);
        if !known(name) {
            return Err(GenError::UnresolvedReference {
                reference: ref_path.clone(),
                location: location.to_string(),
            });
        }
        return Ok(SchemaNode::Reference(name.to_string()));
    }

    if let Some(parts) = &schema.all_of {
        let lowered = parts
            .iter()
            .enumerate()
            .map(|(i, part)| lower(part, &format!("{location}/allOf/{i}"), known))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(SchemaNode::Composed(lowered));
    }

    let kind = schema.schema_type.as_ref().map(|t| t.primary());

    if kind == Some("array") {
        let items = match &schema.items {
            Some(items) => Some(Box::new(lower(items, &format!("{location}/items"), known)?)),
            None => None,
        };
        return Ok(SchemaNode::Array(items));
    }

    if let Some(values) = &schema.enum_values {
        return Ok(SchemaNode::Enum(values.iter().map(EnumValue::as_text).collect()));
    }

    if let Some(properties) = &schema.properties {
        let mut lowered = IndexMap::with_capacity(properties.len());
        for (name, prop) in properties {
            let node = lower(prop, &format!("{location}/properties/{name}"), known)?;
            lowered.insert(name.clone(), node);
        }
        return Ok(SchemaNode::Object(ObjectNode {
            properties: lowered,
            required: schema.required.clone().unwrap_or_default(),
        }));
    }

    let primitive = |kind| SchemaNode::Primitive {
        kind,
        format: schema.format.clone(),
    };
    match kind {
        Some("string") => Ok(primitive(PrimitiveKind::String)),
        Some("integer") => Ok(primitive(PrimitiveKind::Integer)),
        Some("number") => Ok(primitive(PrimitiveKind::Number)),
        Some("boolean") => Ok(primitive(PrimitiveKind::Boolean)),
        Some("object") => Ok(SchemaNode::Object(ObjectNode::default())),
        Some("null") => Ok(SchemaNode::Any),
        Some(other) => Err(GenError::UnsupportedSchemaKind {
            kind: other.to_string(),
            location: location.to_string(),
        }),
        // A bare format (`{"format": "binary"}`) still names a string payload.
        None if schema.format.is_some() => Ok(primitive(PrimitiveKind::String)),
        None => Ok(SchemaNode::Any),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn schemas(json: &str) -> IndexMap<String, Schema> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lowering() {
        let arena = SchemaArena::build(&schemas(
            r##"{
                "Todo": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": {"type": "string"},
                        "done": {"type": "boolean"},
                        "due": {"type": "string", "format": "date-time"},
                        "status": {"type": "string", "enum": ["open", "done"]},
                        "tags": {"type": "array", "items": {"$ref": "#/components/schemas/Tag"}},
                        "extra": {"type": "array"},
                        "meta": {}
                    }
                },
                "Tag": {"type": "string"}
            }"##,
        ))
        .unwrap();

        assert_eq!(arena.len(), 2);
        let Some((_, SchemaNode::Object(todo))) = arena.iter().find(|(name, _)| *name == "Todo") else {
            panic!("Todo should lower to an object");
        };
        assert!(todo.is_required("id"));
        assert!(!todo.is_required("done"));
        assert_eq!(
            todo.property("due"),
            Some(&SchemaNode::Primitive {
                kind: PrimitiveKind::String,
                format: Some("date-time".into()),
            })
        );
        assert_eq!(
            todo.property("status"),
            Some(&SchemaNode::Enum(vec!["open".into(), "done".into()]))
        );
        assert_eq!(
            todo.property("tags"),
            Some(&SchemaNode::Array(Some(Box::new(SchemaNode::Reference("Tag".into())))))
        );
        assert_eq!(todo.property("extra"), Some(&SchemaNode::Array(None)));
        assert_eq!(todo.property("meta"), Some(&SchemaNode::Any));
    }

    #[test]
    fn test_unresolved_reference() {
        let err = SchemaArena::build(&schemas(
            r##"{"Todo": {"type": "object", "properties": {"owner": {"$ref": "#/components/schemas/User"}}}}"##,
        ))
        .unwrap_err();
        match err {
            GenError::UnresolvedReference { reference, location } => {
                assert_eq!(reference, "#/components/schemas/User");
                assert_eq!(location, "#/components/schemas/Todo/properties/owner");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_kind() {
        let err = SchemaArena::build(&schemas(r##"{"Blob": {"type": "bytes"}}"##)).unwrap_err();
        assert!(
            matches!(err, GenError::UnsupportedSchemaKind { ref kind, .. } if kind == "bytes"),
            "got {err}"
        );
    }

    #[test]
    fn test_alias_cycle() {
        let err = SchemaArena::build(&schemas(
            r##"{
                "A": {"$ref": "#/components/schemas/B"},
                "B": {"allOf": [{"$ref": "#/components/schemas/A"}, {"type": "object", "properties": {}}]}
            }"##,
        ))
        .unwrap_err();
        match err {
            GenError::ReferenceCycle { chain } => assert_eq!(chain, vec!["A", "B", "A"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_recursive_property_is_not_a_cycle() {
        let arena = SchemaArena::build(&schemas(
            r##"{"Node": {"type": "object", "properties": {"children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}}}}"##,
        ))
        .unwrap();
        assert!(arena.contains("Node"));
    }

    #[test]
    fn test_lower_outside_components() {
        let arena = SchemaArena::build(&schemas(r##"{"Todo": {"type": "object"}}"##)).unwrap();
        let schema: Schema =
            serde_json::from_str(r##"{"allOf": [{"$ref": "#/components/schemas/Todo"}]}"##).unwrap();
        assert_eq!(
            arena.lower(&schema, "GET /api/todos").unwrap(),
            SchemaNode::Composed(vec![SchemaNode::Reference("Todo".into())])
        );

        let missing: Schema = serde_json::from_str(r##"{"$ref": "#/components/schemas/Nope"}"##).unwrap();
        assert!(matches!(
            arena.lower(&missing, "GET /api/todos"),
            Err(GenError::UnresolvedReference { .. })
        ));
    }
}
