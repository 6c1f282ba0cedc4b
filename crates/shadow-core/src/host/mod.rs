//! Resolution hosts — where shadow declarations are looked up
//!
//! # Architecture
//!
//! ```text
//!   ContractAwareHost (base capability)     ResolutionHost (exposed to the verifier)
//!     builtin_locations()                     add_search_location(path)
//!     declarations_in(location, identity)     resolve(real type)
//!                 ▲                                   │
//!                 └──────── ExtensibleHost ◄──────────┘
//!                        (base + registered locations)
//! ```
//!
//! The extensible host holds the base host and delegates per-location
//! enumeration to it; it never subclasses or replaces it.

mod extensible;
mod fs;
mod shared;

pub use extensible::ExtensibleHost;
pub use fs::FsContractHost;
pub use shared::SharedHost;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::{RealType, ShadowDeclaration, TypeIdentity};
use crate::{Error, Result};

/// A declaration found in a location, before structural matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub declaration: ShadowDeclaration,
    /// Artifact file the declaration came from
    pub origin: PathBuf,
}

/// Outcome of enumerating one location
#[derive(Debug, Clone, Default)]
pub struct LocationScan {
    /// Declarations keyed to the requested identity, in artifact path order
    pub candidates: Vec<Candidate>,
    /// Artifacts that could not be decoded
    pub failures: Vec<Error>,
}

/// The base contract-aware host capability.
pub trait ContractAwareHost {
    /// Locations known before any registration, lowest precedence first.
    fn builtin_locations(&self) -> Vec<PathBuf>;

    /// Enumerate candidate declarations for `identity` in one location.
    ///
    /// # Errors
    /// `LocationUnavailable` when the location is missing or unreadable.
    fn declarations_in(&self, location: &Path, identity: &TypeIdentity) -> Result<LocationScan>;
}

/// The capability the verifier talks to.
pub trait ResolutionHost {
    /// Add a search location for the rest of the session.
    ///
    /// The path is not checked here; a missing path is simply unproductive
    /// when resolving.
    fn add_search_location(&mut self, path: &Path);

    /// First declaration, most recent location first, that structurally
    /// matches `real`. `None` means the type is unannotated; it is not
    /// remembered, so an artifact added to a known location later is found.
    fn resolve(&mut self, real: &RealType) -> Option<ResolvedShadow>;
}

/// A declaration that matched its real type, with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedShadow {
    pub declaration: ShadowDeclaration,
    /// Search location the artifact was found in
    pub location: PathBuf,
    /// Artifact file
    pub origin: PathBuf,
    /// SHA-256 of the declaration's canonical form
    pub fingerprint: String,
}

/// Whether any location has been registered this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    /// Only built-in locations known
    Base,
    /// At least one location registered; never goes back
    Extended,
}
