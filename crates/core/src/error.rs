//! Error and diagnostic types for client generation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a generation run.
#[derive(Debug, Error)]
pub enum GenError {
    /// The input text is not a well-formed API document.
    #[error("invalid API document: {source}")]
    InvalidDocument {
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A `$ref` names a schema that is not in the schema dictionary.
    #[error("unresolved reference '{reference}' at {location}")]
    UnresolvedReference {
        /// The reference as written, e.g. `#/components/schemas/Todo`.
        reference: String,
        /// Where the reference appears.
        location: String,
    },

    /// A schema declares a `type` the generator does not understand.
    #[error("unsupported schema kind '{kind}' at {location}")]
    UnsupportedSchemaKind {
        /// The offending `type` value.
        kind: String,
        /// Where the schema appears.
        location: String,
    },

    /// Named schemas alias or extend each other in a loop.
    #[error("reference cycle: {}", chain.join(" -> "))]
    ReferenceCycle {
        /// Schema names along the cycle, ending where it started.
        chain: Vec<String>,
    },

    /// Writing an artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDocument { .. }
            | Self::UnresolvedReference { .. }
            | Self::UnsupportedSchemaKind { .. }
            | Self::ReferenceCycle { .. } => 2,
            Self::Write { .. } => 3,
        }
    }
}

/// Non-fatal conditions recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An operation declares no 2xx response; its payload is untyped.
    NoSuccessResponse {
        /// Upper-case HTTP method.
        method: String,
        /// Path template of the operation.
        path: String,
    },
    /// The profile's tag policy kept no operations; only the type module was written.
    EmptyProfile {
        /// Name of the profile.
        profile: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuccessResponse { method, path } => {
                write!(f, "{method} {path} has no success response, payload left untyped")
            }
            Self::EmptyProfile { profile } => {
                write!(f, "profile '{profile}' matched no operations")
            }
        }
    }
}
