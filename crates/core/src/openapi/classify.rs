//! Operation lowering, classification and grouping.
//!
//! Operations are grouped by their primary tag under a [`Profile`]'s tag
//! policy, lowered into [`OperationDescriptor`]s against the schema arena,
//! and classified into the [`OperationShape`] the emitters consume.

use indexmap::IndexMap;

use crate::error::{Diagnostic, GenError};
use crate::openapi::ir::utils::capitalize_first;
use crate::openapi::schema::{ObjectNode, SchemaArena, SchemaNode};
use crate::openapi::spec::{ApiDocument, HttpMethod, MediaType, Operation};

/// Tag used for operations that declare none.
pub const DEFAULT_TAG: &str = "default";

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

// =============================================================================
// Profiles and grouping
// =============================================================================

/// A named generation target with an optional tag allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile name; its capitalized form is the owner tag it admits.
    pub name: String,
    /// `None` keeps every operation.
    pub allowed_tags: Option<Vec<String>>,
}

impl Profile {
    /// A profile that keeps every operation.
    pub fn unfiltered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_tags: None,
        }
    }

    /// A profile restricted to `tags` (plus operations marked as owned by it).
    pub fn with_tags<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            allowed_tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether an operation with these tags belongs to this profile.
    ///
    /// With an allow-list, the primary tag must be listed or the second tag
    /// must name this profile (`App` for `app`).
    pub fn admits(&self, tags: &[String]) -> bool {
        let Some(allowed) = &self.allowed_tags else {
            return true;
        };
        let primary = tags.first().map_or(DEFAULT_TAG, String::as_str);
        if allowed.iter().any(|t| t == primary) {
            return true;
        }
        tags.get(1)
            .is_some_and(|owner| *owner == capitalize_first(&self.name))
    }
}

/// One operation as it appears in the document.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
}

impl OperationEntry<'_> {
    pub fn primary_tag(&self) -> &str {
        self.operation.tags.first().map_or(DEFAULT_TAG, String::as_str)
    }
}

/// Operations sharing a primary tag, in document order.
#[derive(Debug, Clone)]
pub struct TagGroup<'a> {
    pub tag: String,
    pub operations: Vec<OperationEntry<'a>>,
}

impl TagGroup<'_> {
    /// Module name for this group: the tag, lower-cased.
    pub fn module_name(&self) -> String {
        self.tag.to_lowercase()
    }
}

/// Partition the document's operations by primary tag, dropping those the
/// profile does not admit. Groups appear in order of first occurrence.
pub fn group_operations<'a>(document: &'a ApiDocument, profile: &Profile) -> Vec<TagGroup<'a>> {
    let mut groups: IndexMap<String, Vec<OperationEntry<'a>>> = IndexMap::new();

    for (path, method, operation) in document.operations() {
        if !profile.admits(&operation.tags) {
            tracing::debug!(%method, path, "skipping operation outside profile");
            continue;
        }
        let entry = OperationEntry {
            path,
            method,
            operation,
        };
        groups
            .entry(entry.primary_tag().to_string())
            .or_default()
            .push(entry);
    }

    groups
        .into_iter()
        .map(|(tag, operations)| TagGroup { tag, operations })
        .collect()
}

// =============================================================================
// Lowered operations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

/// How a request body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyContentKind {
    Json,
    Multipart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyDescriptor {
    pub content: BodyContentKind,
    pub schema: Option<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    /// The `application/json` schema, if declared.
    pub schema: Option<SchemaNode>,
}

/// An operation with every schema lowered against the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub request_body: Option<RequestBodyDescriptor>,
    pub responses: IndexMap<String, ResponseDescriptor>,
}

impl OperationDescriptor {
    /// Lower an operation. Header and cookie parameters are dropped.
    pub fn lower(entry: &OperationEntry<'_>, arena: &SchemaArena) -> Result<Self, GenError> {
        let op = entry.operation;
        let site = format!("{} {}", entry.method, entry.path);

        let mut parameters = Vec::new();
        for param in &op.parameters {
            let location = match param.location.as_str() {
                "path" => ParameterLocation::Path,
                "query" => ParameterLocation::Query,
                _ => continue,
            };
            let schema = match &param.schema {
                Some(schema) => arena.lower(schema, &format!("{site} parameter {}", param.name))?,
                None => SchemaNode::Any,
            };
            parameters.push(ParameterDescriptor {
                name: param.name.clone(),
                location,
                required: param.required,
                schema,
            });
        }

        let request_body = match &op.request_body {
            Some(body) => {
                let json = body.content.get(JSON);
                let multipart = body.content.get(MULTIPART);
                match json.or(multipart) {
                    Some(media) => Some(RequestBodyDescriptor {
                        content: if multipart.is_some() {
                            BodyContentKind::Multipart
                        } else {
                            BodyContentKind::Json
                        },
                        schema: lower_media(media, arena, &format!("{site} request body"))?,
                    }),
                    None => None,
                }
            }
            None => None,
        };

        let mut responses = IndexMap::with_capacity(op.responses.len());
        for (status, response) in &op.responses {
            let schema = match response.content.get(JSON) {
                Some(media) => lower_media(media, arena, &format!("{site} response {status}"))?,
                None => None,
            };
            responses.insert(status.clone(), ResponseDescriptor { schema });
        }

        let tags = if op.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            op.tags.clone()
        };

        Ok(Self {
            path: entry.path.to_string(),
            method: entry.method,
            tags,
            operation_id: op.operation_id.clone(),
            summary: op.summary.clone(),
            parameters,
            request_body,
            responses,
        })
    }

    pub fn primary_tag(&self) -> &str {
        self.tags.first().map_or(DEFAULT_TAG, String::as_str)
    }

    /// Query parameters in declaration order.
    pub fn query_params(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Query)
    }

    /// Summary, else operation id, else `fallback`.
    pub fn title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.summary
            .as_deref()
            .or(self.operation_id.as_deref())
            .unwrap_or(fallback)
    }

    /// Second cache-key component: the title lower-cased with whitespace runs
    /// collapsed to `_`.
    pub fn cache_label(&self) -> String {
        self.title("unknown")
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The success response: `200`, else `201`, else the first `2xx`.
    pub fn success_response(&self) -> Option<(&str, &ResponseDescriptor)> {
        ["200", "201"]
            .iter()
            .find_map(|code| self.responses.get_key_value(*code))
            .or_else(|| self.responses.iter().find(|(code, _)| code.starts_with('2')))
            .map(|(code, response)| (code.as_str(), response))
    }
}

fn lower_media(
    media: &MediaType,
    arena: &SchemaArena,
    location: &str,
) -> Result<Option<SchemaNode>, GenError> {
    media
        .schema
        .as_ref()
        .map(|schema| arena.lower(schema, location))
        .transpose()
}

/// Names of the `{param}` placeholders in a path template, in order.
pub fn path_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        if end > 0 {
            params.push(after[..end].to_string());
        }
        rest = &after[end + 1..];
    }
    params
}

// =============================================================================
// Classification
// =============================================================================

/// What the success response hands back to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// No typed payload: `any`.
    Passthrough,
    /// An inline object declared as `XResponse`.
    Declared(ObjectNode),
    /// A composed schema declared as `XResponse` extending its supertypes.
    DeclaredComposed(Vec<SchemaNode>),
    /// A sequence of inline objects; the item is declared as `XResponse`.
    DeclaredSequence(ObjectNode),
    /// A `...Response` schema aliased as `XResponse`.
    Alias(String),
    /// Any other schema, used as rendered.
    Direct(SchemaNode),
}

/// What the request body carries.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyPayload {
    /// An inline object declared as `XDTO`.
    Declared(ObjectNode),
    /// A composed schema declared as `XDTO`.
    DeclaredComposed(Vec<SchemaNode>),
    /// Any other schema, used as rendered.
    Direct(SchemaNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyShape {
    pub content: BodyContentKind,
    pub payload: BodyPayload,
}

/// Per-operation facts the emitters branch on.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationShape {
    pub path_params: Vec<String>,
    /// Query parameters are only bound for GET.
    pub has_query_params: bool,
    pub body: Option<BodyShape>,
    pub response: ResponsePayload,
}

impl OperationShape {
    pub fn has_path_params(&self) -> bool {
        !self.path_params.is_empty()
    }
}

/// Classify a lowered operation. A missing success response is reported as
/// a diagnostic and yields a passthrough payload.
pub fn classify(op: &OperationDescriptor) -> (OperationShape, Option<Diagnostic>) {
    let has_query_params = op.method == HttpMethod::Get && op.query_params().next().is_some();

    let body = op
        .request_body
        .as_ref()
        .filter(|_| op.method.accepts_body())
        .and_then(|body| {
            body.schema.as_ref().map(|schema| BodyShape {
                content: body.content,
                payload: body_payload(schema),
            })
        });

    let mut diagnostic = None;
    let response = match op.success_response() {
        Some((_, ResponseDescriptor { schema: Some(schema) })) => response_payload(schema),
        Some((status, ResponseDescriptor { schema: None })) => {
            tracing::debug!(method = %op.method, path = %op.path, status, "success response has no JSON schema");
            ResponsePayload::Passthrough
        }
        None => {
            tracing::warn!(method = %op.method, path = %op.path, "no success response declared");
            diagnostic = Some(Diagnostic::NoSuccessResponse {
                method: op.method.to_string(),
                path: op.path.clone(),
            });
            ResponsePayload::Passthrough
        }
    };

    let shape = OperationShape {
        path_params: path_params(&op.path),
        has_query_params,
        body,
        response,
    };
    (shape, diagnostic)
}

fn body_payload(schema: &SchemaNode) -> BodyPayload {
    match schema {
        SchemaNode::Object(object) => BodyPayload::Declared(object.clone()),
        SchemaNode::Composed(parts) => BodyPayload::DeclaredComposed(parts.clone()),
        other => BodyPayload::Direct(other.clone()),
    }
}

fn response_payload(schema: &SchemaNode) -> ResponsePayload {
    match schema {
        SchemaNode::Object(object) => match object.property("data") {
            Some(data) => data_payload(data),
            None => ResponsePayload::Declared(object.clone()),
        },
        // The last part carrying `data` decides.
        SchemaNode::Composed(parts) => parts
            .iter()
            .rev()
            .find_map(|part| match part {
                SchemaNode::Object(object) => object.property("data"),
                _ => None,
            })
            .map_or(ResponsePayload::Passthrough, data_payload),
        SchemaNode::Reference(name) if name.ends_with("Response") => {
            ResponsePayload::Alias(name.clone())
        }
        other => ResponsePayload::Direct(other.clone()),
    }
}

fn data_payload(data: &SchemaNode) -> ResponsePayload {
    match data {
        SchemaNode::Object(object) => ResponsePayload::Declared(object.clone()),
        SchemaNode::Composed(parts) => ResponsePayload::DeclaredComposed(parts.clone()),
        SchemaNode::Array(Some(item)) => match item.as_ref() {
            SchemaNode::Object(object) => ResponsePayload::DeclaredSequence(object.clone()),
            _ => ResponsePayload::Direct(data.clone()),
        },
        other => ResponsePayload::Direct(other.clone()),
    }
}
