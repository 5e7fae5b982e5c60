//! Typed TypeScript client generation from OpenAPI documents.
//!
//! The pipeline reads an API description, resolves its schema dictionary into
//! a named type model and emits a shared `types.ts` module, one request and
//! React Query binding module per API tag, and an `index.ts` re-exporting them.

pub mod error;
mod openapi;

pub use error::{Diagnostic, GenError};
pub use openapi::{
    Artifact, ArtifactKind, ArtifactSink, GenerationReport, INDEX_FILE, MemorySink, Profile,
    TYPES_FILE, generate, generate_from_value,
};
