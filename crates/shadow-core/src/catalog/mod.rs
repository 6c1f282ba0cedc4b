//! Built-in shadow declarations for common runtime surfaces
//!
//! The catalog is packaged like any third-party contract set: [`install`]
//! writes it as an artifact into a directory, which is then used as a
//! search location.

pub mod convertible;

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{write_artifact, ShadowArtifact};
use crate::model::RealType;
use crate::Result;

/// File name of the installed catalog artifact
pub const CATALOG_ARTIFACT: &str = "runtime.shadow.json";

/// Real types the catalog annotates.
pub fn real_types() -> Vec<RealType> {
    vec![convertible::real_type()]
}

/// All catalog declarations as one artifact.
pub fn artifact() -> Result<ShadowArtifact> {
    Ok(ShadowArtifact::new(vec![convertible::shadow()?]))
}

/// Write the catalog into `dir`, creating it if needed. Returns the artifact path.
pub fn install(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(CATALOG_ARTIFACT);
    write_artifact(&path, &artifact()?)?;
    log::info!(
        "event=catalog_install module=catalog status=ok path={}",
        path.display()
    );
    Ok(path)
}
