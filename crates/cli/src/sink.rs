//! Writes artifacts into an output directory.

use std::fs;
use std::path::PathBuf;

use apigen_core::{Artifact, ArtifactSink, GenError};
use tracing::debug;

/// An [`ArtifactSink`] that writes each artifact to `<root>/<file_name>`,
/// creating `root` on first write.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, artifact: &Artifact) -> Result<(), GenError> {
        fs::create_dir_all(&self.root).map_err(|source| GenError::Write {
            path: self.root.clone(),
            source,
        })?;

        let path = self.root.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(|source| GenError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "artifact written");

        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use apigen_core::ArtifactKind;
    use tempfile::TempDir;

    fn artifact(name: &str, contents: &str) -> Artifact {
        Artifact {
            file_name: name.to_string(),
            contents: contents.to_string(),
            kind: ArtifactKind::Types,
        }
    }

    #[test]
    fn test_creates_directory_and_writes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("src").join("api");
        let mut sink = DirectorySink::new(&root);

        sink.write(&artifact("types.ts", "export type Id = string;\n")).unwrap();

        assert_eq!(
            fs::read_to_string(root.join("types.ts")).unwrap(),
            "export type Id = string;\n"
        );
        assert_eq!(sink.written(), &[root.join("types.ts")]);
    }

    #[test]
    fn test_write_failure_maps_to_gen_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("api");
        fs::write(&blocker, "not a directory").unwrap();

        let mut sink = DirectorySink::new(&blocker);
        let err = sink.write(&artifact("types.ts", "")).unwrap_err();

        assert!(matches!(err, GenError::Write { ref path, .. } if path == &blocker));
        assert_eq!(err.exit_code(), 3);
        assert!(sink.written().is_empty());
    }
}
