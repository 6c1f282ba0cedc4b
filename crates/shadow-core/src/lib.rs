//! Shadow Core - contract metadata for types a verifier cannot modify
//!
//! A shadow declaration mirrors the public surface of an externally owned
//! type and attaches behavioral annotations (purity, read effects) to its
//! operations. A resolution host finds those declarations on disk, in
//! built-in locations or in locations registered while a session runs.
//!
//! # Architecture
//!
//! ```text
//! RealType ──► ShadowBuilder ──► ShadowDeclaration ──► artifact (*.shadow.json)
//!                                      │
//!                                   Validator ──► SignatureMismatch diagnostics
//!
//! Session ──► ExtensibleHost ──► ContractAwareHost (built-in + registered locations)
//!                   │
//!                resolve ──► Merge ──► ContractView for the analyzer
//! ```
//!
//! # Guarantees
//!
//! - **Non-invasive**: merging never adds, removes or reshapes real operations
//! - **Structural**: a declaration attaches only if name, ordered parameter
//!   types and return type all match
//! - **Most recent wins**: later registrations take precedence
//! - **Never fatal**: missing locations and broken artifacts are skipped

pub mod artifact;
pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod merge;
pub mod model;
pub mod normalizer;
pub mod session;
pub mod surface;
pub mod validator;

pub use config::HostConfig;
pub use error::{Error, Result};
pub use host::{
    ContractAwareHost, ExtensibleHost, FsContractHost, HostState, ResolutionHost, ResolvedShadow,
    SharedHost,
};
pub use merge::{merge, ContractView};
pub use model::*;
pub use session::Session;
pub use surface::{AnnotationTemplate, ShadowBuilder};
pub use validator::{validate, Discrepancy, ValidationReport};
