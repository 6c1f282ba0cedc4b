//! Verification session — owns one resolution host for its lifetime
//!
//! Each session holds its own location list; nothing registered in one
//! session is visible to another or survives the session.

use std::path::{Path, PathBuf};

use crate::config::HostConfig;
use crate::host::{ContractAwareHost, ExtensibleHost, FsContractHost, HostState, ResolutionHost, ResolvedShadow};
use crate::merge::{merge, ContractView};
use crate::model::RealType;

pub struct Session<H: ContractAwareHost> {
    host: ExtensibleHost<H>,
}

impl Session<FsContractHost> {
    /// Session over the filesystem host described by `config`.
    pub fn from_config(config: HostConfig) -> Self {
        Session::new(FsContractHost::new(config))
    }
}

impl<H: ContractAwareHost> Session<H> {
    pub fn new(base: H) -> Self {
        let host = ExtensibleHost::new(base);
        log::info!(
            "event=session_start module=session status=ok builtin_locations={}",
            host.search_locations().len()
        );
        Self { host }
    }

    /// Fire-and-forget: the path is only looked at when resolving.
    pub fn register_search_location(&mut self, path: impl AsRef<Path>) {
        self.host.add_search_location(path.as_ref());
    }

    pub fn resolve(&mut self, real: &RealType) -> Option<ResolvedShadow> {
        self.host.resolve(real)
    }

    /// The real type's operations with whatever contracts were found.
    ///
    /// Without a matching declaration every operation is left unannotated.
    pub fn contracts_for(&mut self, real: &RealType) -> ContractView {
        match self.host.resolve(real) {
            Some(resolved) => merge(&resolved.declaration, real).view,
            None => ContractView::unannotated(real),
        }
    }

    pub fn state(&self) -> HostState {
        self.host.state()
    }

    pub fn search_locations(&self) -> Vec<PathBuf> {
        self.host.search_locations()
    }

    pub fn host(&self) -> &ExtensibleHost<H> {
        &self.host
    }
}

impl<H: ContractAwareHost> Drop for Session<H> {
    fn drop(&mut self) {
        log::info!(
            "event=session_end module=session status=ok registered_locations={}",
            self.host.registered_locations().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::model::{Annotation, ReadScope, TypeIdentity};

    #[test]
    fn test_new_session_starts_in_base_state() {
        let session = Session::from_config(HostConfig {
            builtin_locations: vec![PathBuf::from("/builtin")],
            ..HostConfig::default()
        });
        assert_eq!(session.state(), HostState::Base);
        assert_eq!(session.search_locations(), vec![PathBuf::from("/builtin")]);
    }

    #[test]
    fn test_contracts_for_catalog_type() {
        let dir = tempfile::tempdir().unwrap();
        catalog::install(dir.path()).unwrap();

        let mut session = Session::from_config(HostConfig::default());
        session.register_search_location(dir.path());
        let view = session.contracts_for(&catalog::convertible::real_type());
        let set = view.annotations("ToInt32").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Annotation::reads(ReadScope::Owned)));
    }

    #[test]
    fn test_unknown_type_gets_unannotated_view() {
        let mut session = Session::from_config(HostConfig::default());
        session.register_search_location("/does/not/exist");
        let real = RealType::new(TypeIdentity::new("Acme", "Widget"), vec![]);
        assert!(session.resolve(&real).is_none());
        assert!(!session.contracts_for(&real).is_annotated());
    }

    #[test]
    fn test_registrations_do_not_leak_between_sessions() {
        let mut first = Session::from_config(HostConfig::default());
        first.register_search_location("/only/in/first");
        assert_eq!(first.state(), HostState::Extended);
        drop(first);

        let second = Session::from_config(HostConfig::default());
        assert_eq!(second.state(), HostState::Base);
        assert!(second.search_locations().is_empty());
    }
}
