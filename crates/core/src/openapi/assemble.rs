//! Output assembly: turns a parsed document into named text artifacts and
//! hands each one to an [`ArtifactSink`] as soon as it is complete.
//!
//! The run order is fixed: the shared `types.ts` first, then one module per
//! tag group, then `index.ts`. A fatal error in a later group leaves the
//! artifacts already written in place.

use crate::error::{Diagnostic, GenError};
use crate::openapi::classify::{
    OperationDescriptor, Profile, TagGroup, classify, group_operations,
};
use crate::openapi::enums::EnumRegistry;
use crate::openapi::ir::codegen::{
    PreparedOperation, codegen_group_module, codegen_index_module, types::codegen_shared_types,
};
use crate::openapi::ir::Emit;
use crate::openapi::resolve::{Qualifier, TypeResolver};
use crate::openapi::schema::SchemaArena;
use crate::openapi::spec::ApiDocument;

/// File name of the shared type module.
pub const TYPES_FILE: &str = "types.ts";
/// File name of the re-exporting index module.
pub const INDEX_FILE: &str = "index.ts";

/// What an artifact holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The shared `types.ts`.
    Types,
    /// Request functions and hooks for one tag.
    Group {
        /// The tag as written in the document.
        tag: String,
    },
    /// The `index.ts` re-exporting every other module.
    Index,
}

/// One generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: String,
    /// Full TypeScript source.
    pub contents: String,
    /// What the file holds.
    pub kind: ArtifactKind,
}

/// Destination for generated artifacts.
pub trait ArtifactSink {
    /// Persist one artifact. An error aborts the run.
    fn write(&mut self, artifact: &Artifact) -> Result<(), GenError>;
}

/// Collects artifacts in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Everything written so far.
    pub artifacts: Vec<Artifact>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the artifact named `file_name`, if it was written.
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.file_name == file_name)
            .map(|a| a.contents.as_str())
    }

    /// File names in write order.
    pub fn file_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, artifact: &Artifact) -> Result<(), GenError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// File names in write order.
    pub written: Vec<String>,
    /// Tags of the generated group modules.
    pub groups: Vec<String>,
    /// Non-fatal conditions, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

/// A document with its schema model resolved, ready to emit artifacts.
#[derive(Debug)]
pub struct Generator<'a> {
    document: &'a ApiDocument,
    arena: SchemaArena,
    enums: EnumRegistry,
}

impl<'a> Generator<'a> {
    /// Resolve the schema dictionary and collect its enums. Broken references
    /// and cycles among named schemas fail here, before anything is emitted.
    pub fn new(document: &'a ApiDocument) -> Result<Self, GenError> {
        let arena = SchemaArena::build(&document.schemas)?;
        let enums = EnumRegistry::build(&arena);
        tracing::debug!(schemas = arena.len(), enums = enums.len(), "schema model resolved");
        Ok(Self {
            document,
            arena,
            enums,
        })
    }

    pub fn groups(&self, profile: &Profile) -> Vec<TagGroup<'a>> {
        group_operations(self.document, profile)
    }

    /// The shared `types.ts` module.
    pub fn types_artifact(&self) -> Result<Artifact, GenError> {
        let resolver = TypeResolver::new(&self.arena, &self.enums, Qualifier::Bare);
        let module = codegen_shared_types(&self.enums, &resolver)?;
        Ok(Artifact {
            file_name: TYPES_FILE.to_string(),
            contents: module.emit(),
            kind: ArtifactKind::Types,
        })
    }

    /// The module for one tag group, plus diagnostics raised while
    /// classifying its operations.
    pub fn group_artifact(
        &self,
        group: &TagGroup<'_>,
    ) -> Result<(Artifact, Vec<Diagnostic>), GenError> {
        let mut diagnostics = Vec::new();
        let mut operations = Vec::with_capacity(group.operations.len());
        for entry in &group.operations {
            let descriptor = OperationDescriptor::lower(entry, &self.arena)?;
            let (shape, diagnostic) = classify(&descriptor);
            diagnostics.extend(diagnostic);
            operations.push(PreparedOperation { descriptor, shape });
        }

        let resolver = TypeResolver::new(&self.arena, &self.enums, Qualifier::Namespaced);
        let module = codegen_group_module(&operations, &resolver)?;
        tracing::debug!(tag = %group.tag, operations = operations.len(), "group module built");

        let artifact = Artifact {
            file_name: format!("{}.ts", group.module_name()),
            contents: module.emit(),
            kind: ArtifactKind::Group {
                tag: group.tag.clone(),
            },
        };
        Ok((artifact, diagnostics))
    }

    /// `index.ts` re-exporting the shared types and the given group modules.
    pub fn index_artifact<S: AsRef<str>>(&self, group_modules: &[S]) -> Artifact {
        Artifact {
            file_name: INDEX_FILE.to_string(),
            contents: codegen_index_module(group_modules).emit(),
            kind: ArtifactKind::Index,
        }
    }
}

fn write(
    sink: &mut dyn ArtifactSink,
    artifact: &Artifact,
    report: &mut GenerationReport,
) -> Result<(), GenError> {
    sink.write(artifact)?;
    tracing::info!(file = %artifact.file_name, bytes = artifact.contents.len(), "wrote artifact");
    report.written.push(artifact.file_name.clone());
    Ok(())
}

/// Run the generator over a parsed document.
pub fn generate_document(
    document: &ApiDocument,
    profile: &Profile,
    sink: &mut dyn ArtifactSink,
) -> Result<GenerationReport, GenError> {
    let generator = Generator::new(document)?;
    let mut report = GenerationReport::default();

    write(sink, &generator.types_artifact()?, &mut report)?;

    let groups = generator.groups(profile);
    if groups.is_empty() {
        tracing::warn!(profile = %profile.name, "no operations matched the profile");
        report.diagnostics.push(Diagnostic::EmptyProfile {
            profile: profile.name.clone(),
        });
        return Ok(report);
    }

    let mut modules = Vec::with_capacity(groups.len());
    for group in &groups {
        let (artifact, diagnostics) = generator.group_artifact(group)?;
        write(sink, &artifact, &mut report)?;
        report.diagnostics.extend(diagnostics);
        report.groups.push(group.tag.clone());
        modules.push(group.module_name());
    }

    write(sink, &generator.index_artifact(&modules), &mut report)?;
    Ok(report)
}

/// Parse `json` as an API document and generate every artifact for `profile`.
pub fn generate(
    json: &str,
    profile: &Profile,
    sink: &mut dyn ArtifactSink,
) -> Result<GenerationReport, GenError> {
    let document = ApiDocument::from_json(json)?;
    generate_document(&document, profile, sink)
}

/// Like [`generate`], for a document that is already a JSON value.
pub fn generate_from_value(
    value: serde_json::Value,
    profile: &Profile,
    sink: &mut dyn ArtifactSink,
) -> Result<GenerationReport, GenError> {
    let document = ApiDocument::from_value(value)?;
    generate_document(&document, profile, sink)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const DOC: &str = r##"{
        "paths": {
            "/api/todos": {
                "get": {"tags": ["Todos"], "responses": {"200": {}}}
            },
            "/api/auth/login": {
                "post": {"tags": ["Auth"]}
            }
        },
        "components": {"schemas": {
            "Todo": {"type": "object", "properties": {"id": {"type": "string"}}}
        }}
    }"##;

    #[test]
    fn test_write_order_and_report() {
        let mut sink = MemorySink::new();
        let report = generate(DOC, &Profile::unfiltered("all"), &mut sink).unwrap();

        assert_eq!(sink.file_names(), vec!["types.ts", "todos.ts", "auth.ts", "index.ts"]);
        assert_eq!(report.written, vec!["types.ts", "todos.ts", "auth.ts", "index.ts"]);
        assert_eq!(report.groups, vec!["Todos", "Auth"]);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::NoSuccessResponse {
                method: "POST".into(),
                path: "/api/auth/login".into(),
            }]
        );
        assert_eq!(sink.artifacts[1].kind, ArtifactKind::Group { tag: "Todos".into() });
        assert_eq!(
            sink.get("index.ts").unwrap(),
            "// Auto-generated API code\n\nexport * from './types';\nexport * from './todos';\nexport * from './auth';\n"
        );
    }

    #[test]
    fn test_empty_profile_writes_types_only() {
        let mut sink = MemorySink::new();
        let profile = Profile::with_tags("app", ["Orders"]);
        let report = generate(DOC, &profile, &mut sink).unwrap();

        assert_eq!(sink.file_names(), vec!["types.ts"]);
        assert!(report.groups.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::EmptyProfile { profile: "app".into() }]
        );
    }

    #[test]
    fn test_invalid_document() {
        let mut sink = MemorySink::new();
        let err = generate("{not json", &Profile::unfiltered("all"), &mut sink).unwrap_err();
        assert!(matches!(err, GenError::InvalidDocument { .. }));
        assert_eq!(err.exit_code(), 2);
        assert!(sink.artifacts.is_empty());
    }

    #[test]
    fn test_generate_from_value() {
        let value: serde_json::Value = serde_json::from_str(DOC).unwrap();
        let mut sink = MemorySink::new();
        let report = generate_from_value(value, &Profile::with_tags("x", ["Auth"]), &mut sink).unwrap();
        assert_eq!(report.written, vec!["types.ts", "auth.ts", "index.ts"]);
    }
}
