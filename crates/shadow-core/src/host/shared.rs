//! Host shared between concurrently running sessions
//!
//! Registration and resolution walks take the same lock, so a walk never
//! observes a half-updated location list.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::host::{ContractAwareHost, ExtensibleHost, HostState, ResolutionHost, ResolvedShadow};
use crate::model::RealType;

#[derive(Debug)]
pub struct SharedHost<H> {
    inner: Arc<Mutex<ExtensibleHost<H>>>,
}

impl<H> Clone for SharedHost<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: ContractAwareHost> SharedHost<H> {
    pub fn new(host: ExtensibleHost<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(host)),
        }
    }

    // A panic mid-walk leaves no partial state behind: registration is a
    // single push and the cache is only written after a walk completes.
    fn lock(&self) -> MutexGuard<'_, ExtensibleHost<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_search_location(&self, path: &Path) {
        self.lock().add_search_location(path);
    }

    pub fn resolve(&self, real: &RealType) -> Option<ResolvedShadow> {
        self.lock().resolve(real)
    }

    pub fn state(&self) -> HostState {
        self.lock().state()
    }

    /// Walk order at this instant; later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<[PathBuf]> {
        self.lock().snapshot()
    }
}

impl<H: ContractAwareHost> ResolutionHost for SharedHost<H> {
    fn add_search_location(&mut self, path: &Path) {
        SharedHost::add_search_location(self, path);
    }

    fn resolve(&mut self, real: &RealType) -> Option<ResolvedShadow> {
        SharedHost::resolve(self, real)
    }
}
