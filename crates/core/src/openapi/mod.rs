//! OpenAPI to TypeScript client generator.
//!
//! This module parses an API document and generates:
//! - A shared `types.ts` with enums and decorated classes for every named schema
//! - One module per API tag with request functions calling `apiRequest`
//! - React Query hooks (useQuery, useMutation) in the same modules
//! - An `index.ts` re-exporting everything

mod assemble;
mod classify;
mod enums;
mod ir;
mod naming;
mod resolve;
mod schema;
mod spec;

pub use assemble::{
    Artifact, ArtifactKind, ArtifactSink, GenerationReport, INDEX_FILE, MemorySink, TYPES_FILE,
    generate, generate_from_value,
};
pub use classify::Profile;
