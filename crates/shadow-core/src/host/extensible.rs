//! Extensible resolution host — a base host plus run-time search locations

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::host::{ContractAwareHost, HostState, ResolutionHost, ResolvedShadow};
use crate::model::{OperationSignature, RealType, TypeIdentity};
use crate::normalizer::fingerprint;
use crate::validator::validate;

/// Composes a base host with locations registered during a session.
///
/// Walk order is registered locations newest first, then built-ins newest
/// first. Successful resolutions are cached per type identity, together with
/// the operation set they were matched against, until the next registration.
/// "Not found" is never cached.
#[derive(Debug)]
pub struct ExtensibleHost<H> {
    base: H,
    builtin: Vec<PathBuf>,
    registered: Vec<PathBuf>,
    cache: BTreeMap<TypeIdentity, (Vec<OperationSignature>, ResolvedShadow)>,
}

impl<H: ContractAwareHost> ExtensibleHost<H> {
    /// Start a session in the `Base` state, seeded from the base host.
    pub fn new(base: H) -> Self {
        let builtin = base.builtin_locations();
        Self {
            base,
            builtin,
            registered: Vec::new(),
            cache: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &H {
        &self.base
    }

    pub fn state(&self) -> HostState {
        if self.registered.is_empty() {
            HostState::Base
        } else {
            HostState::Extended
        }
    }

    /// Locations in registration order, oldest first.
    pub fn registered_locations(&self) -> &[PathBuf] {
        &self.registered
    }

    /// Every location in the order a resolution walk visits them.
    pub fn search_locations(&self) -> Vec<PathBuf> {
        self.registered
            .iter()
            .rev()
            .chain(self.builtin.iter().rev())
            .cloned()
            .collect()
    }

    /// Immutable copy of the walk order for use outside the host.
    pub fn snapshot(&self) -> Arc<[PathBuf]> {
        self.search_locations().into()
    }

    /// Walk every location without consulting or filling the cache.
    fn walk(&self, real: &RealType) -> Option<ResolvedShadow> {
        for location in self.search_locations() {
            let scan = match self.base.declarations_in(&location, &real.identity) {
                Ok(scan) => scan,
                Err(e) => {
                    log::debug!(
                        "event=shadow_resolve module=host status=location_skipped target={} error=\"{}\"",
                        real.identity,
                        e
                    );
                    continue;
                }
            };

            for failure in &scan.failures {
                log::warn!(
                    "event=shadow_resolve module=host status=artifact_skipped target={} error=\"{}\"",
                    real.identity,
                    failure
                );
            }

            for candidate in scan.candidates {
                let report = validate(&candidate.declaration, real);
                if !report.is_valid() {
                    let first = report
                        .mismatches()
                        .into_iter()
                        .next()
                        .map(|e| e.to_string())
                        .unwrap_or_default();
                    log::warn!(
                        "event=shadow_resolve module=host status=declaration_skipped target={} origin={} errors={} first=\"{}\"",
                        real.identity,
                        candidate.origin.display(),
                        report.errors().len(),
                        first
                    );
                    continue;
                }

                let fingerprint = fingerprint(&candidate.declaration);
                log::info!(
                    "event=shadow_resolve module=host status=resolved target={} origin={} fingerprint={}",
                    real.identity,
                    candidate.origin.display(),
                    fingerprint
                );
                return Some(ResolvedShadow {
                    declaration: candidate.declaration,
                    location,
                    origin: candidate.origin,
                    fingerprint,
                });
            }
        }

        log::debug!(
            "event=shadow_resolve module=host status=not_found target={}",
            real.identity
        );
        None
    }
}

impl<H: ContractAwareHost> ResolutionHost for ExtensibleHost<H> {
    fn add_search_location(&mut self, path: &Path) {
        log::info!(
            "event=search_location_add module=host status=ok path={} position={}",
            path.display(),
            self.registered.len()
        );
        self.registered.push(path.to_path_buf());
        self.cache.clear();
    }

    fn resolve(&mut self, real: &RealType) -> Option<ResolvedShadow> {
        if let Some((operations, cached)) = self.cache.get(&real.identity) {
            if *operations == real.operations {
                return Some(cached.clone());
            }
        }
        let resolved = self.walk(real)?;
        self.cache.insert(
            real.identity.clone(),
            (real.operations.clone(), resolved.clone()),
        );
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Candidate, LocationScan};
    use crate::model::{OperationSignature, ShadowDeclaration, ShadowOperation};
    use crate::{Error, Result};
    use std::cell::Cell;

    /// Base host serving fixed declarations from virtual locations.
    #[derive(Default)]
    struct FixedHost {
        builtin: Vec<PathBuf>,
        entries: Vec<(PathBuf, ShadowDeclaration)>,
        walks: Cell<usize>,
    }

    impl ContractAwareHost for FixedHost {
        fn builtin_locations(&self) -> Vec<PathBuf> {
            self.builtin.clone()
        }

        fn declarations_in(&self, location: &Path, identity: &TypeIdentity) -> Result<LocationScan> {
            self.walks.set(self.walks.get() + 1);
            let candidates: Vec<Candidate> = self
                .entries
                .iter()
                .filter(|(loc, d)| loc == location && &d.target == identity)
                .map(|(loc, d)| Candidate {
                    declaration: d.clone(),
                    origin: loc.join("virtual.shadow.json"),
                })
                .collect();
            if candidates.is_empty() && !self.entries.iter().any(|(loc, _)| loc == location) {
                return Err(Error::LocationUnavailable {
                    path: location.to_path_buf(),
                    reason: "unknown".into(),
                });
            }
            Ok(LocationScan {
                candidates,
                failures: Vec::new(),
            })
        }
    }

    fn real() -> RealType {
        RealType::new(
            TypeIdentity::new("Acme", "Money"),
            vec![OperationSignature::new("ToDecimal", vec![], "System.Decimal")],
        )
    }

    fn decl() -> ShadowDeclaration {
        ShadowDeclaration {
            target: real().identity,
            operations: vec![ShadowOperation::new(real().operations[0].clone())],
        }
    }

    #[test]
    fn test_state_transitions_base_to_extended() {
        let mut host = ExtensibleHost::new(FixedHost::default());
        assert_eq!(host.state(), HostState::Base);
        host.add_search_location(Path::new("/one"));
        assert_eq!(host.state(), HostState::Extended);
    }

    #[test]
    fn test_walk_order_newest_first_builtins_last() {
        let base = FixedHost {
            builtin: vec![PathBuf::from("/b1"), PathBuf::from("/b2")],
            ..FixedHost::default()
        };
        let mut host = ExtensibleHost::new(base);
        host.add_search_location(Path::new("/r1"));
        host.add_search_location(Path::new("/r2"));
        let order: Vec<PathBuf> = host.snapshot().iter().cloned().collect();
        assert_eq!(
            order,
            ["/r2", "/r1", "/b2", "/b1"].iter().map(PathBuf::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_duplicate_registration_is_kept() {
        let mut host = ExtensibleHost::new(FixedHost::default());
        host.add_search_location(Path::new("/x"));
        host.add_search_location(Path::new("/x"));
        assert_eq!(host.registered_locations().len(), 2);
    }

    #[test]
    fn test_unavailable_locations_are_skipped() {
        let base = FixedHost {
            entries: vec![(PathBuf::from("/real"), decl())],
            ..FixedHost::default()
        };
        let mut host = ExtensibleHost::new(base);
        host.add_search_location(Path::new("/real"));
        host.add_search_location(Path::new("/missing"));
        let resolved = host.resolve(&real()).unwrap();
        assert_eq!(resolved.location, PathBuf::from("/real"));
    }

    #[test]
    fn test_resolution_is_cached_until_registration() {
        let base = FixedHost {
            entries: vec![(PathBuf::from("/a"), decl())],
            ..FixedHost::default()
        };
        let mut host = ExtensibleHost::new(base);
        host.add_search_location(Path::new("/a"));
        assert!(host.resolve(&real()).is_some());
        let walks = host.base().walks.get();
        assert!(host.resolve(&real()).is_some());
        assert_eq!(host.base().walks.get(), walks, "second resolve should hit the cache");

        host.add_search_location(Path::new("/elsewhere"));
        assert!(host.resolve(&real()).is_some());
        assert!(host.base().walks.get() > walks);
    }

    #[test]
    fn test_cached_declaration_not_reused_for_other_operation_set() {
        let base = FixedHost {
            entries: vec![(PathBuf::from("/a"), decl())],
            ..FixedHost::default()
        };
        let mut host = ExtensibleHost::new(base);
        host.add_search_location(Path::new("/a"));
        assert!(host.resolve(&real()).is_some());

        let reshaped = RealType::new(real().identity, vec![]);
        assert!(host.resolve(&reshaped).is_none());
        assert!(host.resolve(&real()).is_some());
    }

    #[test]
    fn test_not_found_is_walked_again() {
        let mut host = ExtensibleHost::new(FixedHost::default());
        host.add_search_location(Path::new("/nothing"));
        assert!(host.resolve(&real()).is_none());
        let walks = host.base().walks.get();
        assert!(host.resolve(&real()).is_none());
        assert!(host.base().walks.get() > walks);
    }

    #[test]
    fn test_not_found_is_none() {
        let mut host = ExtensibleHost::new(FixedHost::default());
        host.add_search_location(Path::new("/nothing"));
        assert!(host.resolve(&real()).is_none());
    }
}
