//! Canonical enum names.
//!
//! Enum-valued properties of named schemas are deduplicated by their ordered
//! value list. The first property to declare a list names the enum
//! (`<Schema><Property>`); later properties with the same list reuse it.

use std::collections::{HashMap, HashSet};

use crate::openapi::ir::utils::{camel_case, capitalize_first};
use crate::openapi::schema::{ObjectNode, SchemaArena, SchemaNode};

/// A named enum shared across the generated type module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<String>,
}

/// Enum descriptors for one generation run, keyed by ordered value list.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    descriptors: Vec<EnumDescriptor>,
    by_values: HashMap<Vec<String>, usize>,
}

impl EnumRegistry {
    /// Scan every named schema (including the inline object parts of
    /// composed schemas) in document order.
    pub fn build(arena: &SchemaArena) -> Self {
        let mut registry = Self::default();
        let mut taken: HashSet<String> = arena.iter().map(|(name, _)| name.to_string()).collect();

        for (schema_name, node) in arena.iter() {
            for object in object_parts(node) {
                for (prop_name, prop) in &object.properties {
                    if let SchemaNode::Enum(values) = prop {
                        registry.register(schema_name, prop_name, values, &mut taken);
                    }
                }
            }
        }

        tracing::debug!(enums = registry.len(), "built enum registry");
        registry
    }

    fn register(
        &mut self,
        schema_name: &str,
        prop_name: &str,
        values: &[String],
        taken: &mut HashSet<String>,
    ) {
        if self.by_values.contains_key(values) {
            return;
        }

        let base = format!("{schema_name}{}", capitalize_first(&camel_case(prop_name)));
        let mut name = base.clone();
        let mut suffix = 2;
        while taken.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }

        taken.insert(name.clone());
        self.by_values.insert(values.to_vec(), self.descriptors.len());
        self.descriptors.push(EnumDescriptor {
            name,
            values: values.to_vec(),
        });
    }

    /// The descriptor for this exact ordered value list, if any.
    pub fn lookup(&self, values: &[String]) -> Option<&EnumDescriptor> {
        self.by_values.get(values).map(|&i| &self.descriptors[i])
    }

    /// Descriptors in the order they were first declared.
    pub fn iter(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
}

fn object_parts(node: &SchemaNode) -> Vec<&ObjectNode> {
    match node {
        SchemaNode::Object(object) => vec![object],
        SchemaNode::Composed(parts) => parts
            .iter()
            .filter_map(|part| match part {
                SchemaNode::Object(object) => Some(object),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
