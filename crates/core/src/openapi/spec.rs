//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset the generator reads is modelled. Every mapping is an
//! [`IndexMap`] so that document key order drives the order of everything
//! emitted.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::GenError;

/// HTTP methods the generator emits bindings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a path-item key. Non-method keys (`parameters`, `summary`, ...)
    /// and methods without bindings (`head`, `options`) yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "patch" => Some(Self::Patch),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Upper-case method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Methods that may carry a request body.
    pub fn accepts_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root of an API document as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    paths: IndexMap<String, IndexMap<String, serde_json::Value>>,
    components: Option<Components>,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}

/// A parsed API document.
#[derive(Debug, Default)]
pub struct ApiDocument {
    /// Paths in document order, each with its operations in document order.
    pub paths: IndexMap<String, PathItem>,
    /// Named component schemas in document order.
    pub schemas: IndexMap<String, Schema>,
}

/// The operations declared under one path template.
#[derive(Debug, Default)]
pub struct PathItem {
    pub operations: Vec<(HttpMethod, Operation)>,
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A parameter (query, path, header or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values (can be strings, integers, floats, booleans, or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Intersection type (all of these schemas combined).
    pub all_of: Option<Vec<Schema>>,

    /// Format hint (e.g., date-time, binary).
    pub format: Option<String>,
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl EnumValue {
    /// The value as it appears in a generated enum or literal union.
    pub fn as_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The first non-`null` type name, or `null` when that is all there is.
    pub fn primary(&self) -> &str {
        match self {
            Self::Single(t) => t,
            Self::Multiple(types) => types
                .iter()
                .find(|t| *t != "null")
                .or_else(|| types.first())
                .map_or("null", String::as_str),
        }
    }
}

impl ApiDocument {
    /// Parse an API document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, GenError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|source| GenError::InvalidDocument { source })?;
        Self::from_value(value)
    }

    /// Build an API document from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, GenError> {
        let raw: RawDocument =
            serde_json::from_value(value).map_err(|source| GenError::InvalidDocument { source })?;

        let mut paths = IndexMap::with_capacity(raw.paths.len());
        for (path, entries) in raw.paths {
            let mut item = PathItem::default();
            for (key, value) in entries {
                let Some(method) = HttpMethod::from_key(&key) else {
                    continue;
                };
                let operation: Operation = serde_json::from_value(value)
                    .map_err(|source| GenError::InvalidDocument { source })?;
                item.operations.push((method, operation));
            }
            paths.insert(path, item);
        }

        Ok(Self {
            paths,
            schemas: raw.components.map(|c| c.schemas).unwrap_or_default(),
        })
    }

    /// Iterate every operation as `(path, method, operation)` in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), *method, op))
        })
    }
}
