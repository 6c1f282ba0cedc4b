//! Filesystem base host — enumerates `*.shadow.json` artifacts in directories

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{is_artifact, load_artifact};
use crate::config::HostConfig;
use crate::host::{Candidate, ContractAwareHost, LocationScan};
use crate::model::TypeIdentity;
use crate::{Error, Result};

/// Base host backed by plain directories.
///
/// A location may also name a single artifact file.
#[derive(Debug, Clone, Default)]
pub struct FsContractHost {
    config: HostConfig,
}

impl FsContractHost {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Artifact files under `location`, sorted by path.
    fn artifact_paths(&self, location: &Path) -> Result<Vec<PathBuf>> {
        let meta = fs::metadata(location).map_err(|e| unavailable(location, e.to_string()))?;
        if meta.is_file() {
            return Ok(if is_artifact(location, &self.config.artifact_suffix) {
                vec![location.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        let mut found = Vec::new();
        let mut visited = BTreeSet::new();
        let mut pending = vec![location.to_path_buf()];
        while let Some(dir) = pending.pop() {
            // Symlinked directories may point back up the tree
            let canonical = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !visited.insert(canonical) {
                log::debug!(
                    "event=location_scan module=host status=skip_dir path={} reason=already_visited",
                    dir.display()
                );
                continue;
            }
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                // Unreadable root is fatal for this location, unreadable subdirectories are not
                Err(e) if dir == location => return Err(unavailable(location, e.to_string())),
                Err(e) => {
                    log::debug!(
                        "event=location_scan module=host status=skip_dir path={} reason={}",
                        dir.display(),
                        e
                    );
                    continue;
                }
            };
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::debug!(
                            "event=location_scan module=host status=skip_entry path={} reason={}",
                            dir.display(),
                            e
                        );
                        continue;
                    }
                };
                let path = entry.path();
                if path.is_dir() {
                    if self.config.recursive {
                        pending.push(path);
                    }
                } else if is_artifact(&path, &self.config.artifact_suffix) {
                    found.push(path);
                }
            }
        }
        found.sort();
        Ok(found)
    }
}

impl ContractAwareHost for FsContractHost {
    fn builtin_locations(&self) -> Vec<PathBuf> {
        self.config.builtin_locations.clone()
    }

    fn declarations_in(&self, location: &Path, identity: &TypeIdentity) -> Result<LocationScan> {
        let mut scan = LocationScan::default();
        for path in self.artifact_paths(location)? {
            match load_artifact(&path) {
                Ok(artifact) => {
                    scan.candidates.extend(artifact.declarations_for(identity).map(|d| Candidate {
                        declaration: d.clone(),
                        origin: path.clone(),
                    }));
                }
                Err(e) => scan.failures.push(e),
            }
        }
        Ok(scan)
    }
}

fn unavailable(path: &Path, reason: String) -> Error {
    Error::LocationUnavailable {
        path: path.to_path_buf(),
        reason,
    }
}
