//! Process-wide registry of assembled record types.
//!
//! Keyed by type identity; the name index points at the most recently
//! assembled type of that name. Entries hold a strong `Arc` and are never
//! removed: an assembled type lives as long as the process, whether or not
//! any caller still holds it.

use crate::record::{RecordId, RecordType};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

///
/// Registry
///

#[derive(Default)]
struct Registry {
    types: HashMap<RecordId, Arc<RecordType>>,
    names: HashMap<String, RecordId>,
}

impl Registry {
    fn insert(&mut self, ty: Arc<RecordType>) {
        self.names.insert(ty.name().to_string(), ty.id());
        self.types.insert(ty.id(), ty);
    }
}

///
/// REGISTRY
///

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::default()));

fn registry_write() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY
        .write()
        .expect("registry RwLock poisoned while acquiring write lock")
}

fn registry_read() -> RwLockReadGuard<'static, Registry> {
    REGISTRY
        .read()
        .expect("registry RwLock poisoned while acquiring read lock")
}

/// Record a freshly assembled type.
pub(crate) fn register(ty: &Arc<RecordType>) {
    log::debug!("registering record type '{}' ({:?})", ty.name(), ty.id());
    registry_write().insert(Arc::clone(ty));
}

#[must_use]
pub fn lookup(id: RecordId) -> Option<Arc<RecordType>> {
    registry_read().types.get(&id).cloned()
}

/// Latest type assembled under `name`.
#[must_use]
pub fn lookup_name(name: &str) -> Option<Arc<RecordType>> {
    let registry = registry_read();

    registry
        .names
        .get(name)
        .and_then(|id| registry.types.get(id))
        .cloned()
}

#[must_use]
pub fn is_registered(id: RecordId) -> bool {
    registry_read().types.contains_key(&id)
}

/// Number of assembled types seen by this process.
#[must_use]
pub fn count() -> usize {
    registry_read().types.len()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assemble,
        model::{Field, Options, RecordDecl},
    };

    #[test]
    fn types_outlive_their_handles() {
        let ty = assemble(
            RecordDecl::new("Transient").field(Field::new("a")),
            Options::default(),
        )
        .unwrap();
        let id = ty.id();
        drop(ty);

        assert!(is_registered(id));
        let found = lookup(id).unwrap();
        assert_eq!(found.name(), "Transient");
        assert!(lookup_name("Transient").is_some());
    }

    #[test]
    fn latest_name_wins() {
        let first = assemble(RecordDecl::new("Twice"), Options::default()).unwrap();
        let second = assemble(RecordDecl::new("Twice"), Options::default()).unwrap();

        assert!(is_registered(first.id()));
        assert_eq!(lookup_name("Twice").unwrap().id(), second.id());
    }
}
