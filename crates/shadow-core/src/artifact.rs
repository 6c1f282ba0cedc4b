//! On-disk shadow artifacts
//!
//! An artifact is a standalone JSON file holding the shadow declarations for
//! one real type or a logical group of types:
//!
//! ```json
//! {
//!   "format": 1,
//!   "declarations": [
//!     {
//!       "target": { "namespace": "System", "name": "IConvertible" },
//!       "operations": [
//!         {
//!           "name": "ToInt32",
//!           "parameters": [{ "name": "provider", "type": "System.IFormatProvider" }],
//!           "returns": "System.Int32",
//!           "annotations": [{ "kind": "pure" }, { "kind": "reads", "scope": "owned" }]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{ShadowDeclaration, TypeIdentity};
use crate::normalizer::normalize_declaration;
use crate::{Error, Result};

/// Artifact format version understood by this crate
pub const ARTIFACT_FORMAT: u32 = 1;

/// File name suffix the filesystem host looks for
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".shadow.json";

/// Contents of one artifact file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowArtifact {
    pub format: u32,
    pub declarations: Vec<ShadowDeclaration>,
}

impl ShadowArtifact {
    pub fn new(declarations: Vec<ShadowDeclaration>) -> Self {
        Self {
            format: ARTIFACT_FORMAT,
            declarations,
        }
    }

    /// Declarations keyed to `identity`, in file order.
    pub fn declarations_for<'a>(
        &'a self,
        identity: &'a TypeIdentity,
    ) -> impl Iterator<Item = &'a ShadowDeclaration> + 'a {
        self.declarations.iter().filter(move |d| &d.target == identity)
    }
}

/// Decode artifact text. `path` is only used for error context.
pub fn parse_artifact(text: &str, path: &Path) -> Result<ShadowArtifact> {
    let artifact: ShadowArtifact =
        serde_json::from_str(text).map_err(|e| Error::MalformedArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if artifact.format != ARTIFACT_FORMAT {
        return Err(Error::MalformedArtifact {
            path: path.to_path_buf(),
            reason: format!(
                "unsupported format {}, expected {}",
                artifact.format, ARTIFACT_FORMAT
            ),
        });
    }
    Ok(artifact)
}

/// Read and decode one artifact file.
pub fn load_artifact(path: &Path) -> Result<ShadowArtifact> {
    let text = fs::read_to_string(path).map_err(|e| Error::MalformedArtifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_artifact(&text, path)
}

/// Write an artifact as pretty JSON with declarations in canonical order.
pub fn write_artifact(path: &Path, artifact: &ShadowArtifact) -> Result<()> {
    let normalized = ShadowArtifact {
        format: artifact.format,
        declarations: artifact
            .declarations
            .iter()
            .cloned()
            .map(normalize_declaration)
            .collect(),
    };
    let json = serde_json::to_string_pretty(&normalized)
        .map_err(|e| Error::Io(format!("cannot encode artifact: {}", e)))?;
    fs::write(path, json)?;
    Ok(())
}

/// True when the file name ends with `suffix`.
pub fn is_artifact(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(suffix) && n.len() > suffix.len())
}
