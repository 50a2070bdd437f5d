//! The component registry: identifier to id translation and metadata
//! storage.

use crate::comp::{Component, ComponentId, ComponentInfo};
use crate::util::{NoopBuildHasher, NoopHashMap};
use crate::uuid::Uuid;

/// Assigns dense [`ComponentId`]s to component types and stores their
/// [`ComponentInfo`].
///
/// The registry owns metadata only, never component values. Ids are
/// monotonic: registering never invalidates a previously returned id, and a
/// given identifier always resolves to the id its first registration
/// produced.
pub struct Registry {
    infos:   Vec<ComponentInfo>,
    by_uuid: NoopHashMap<Uuid, ComponentId>,
}

impl Registry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            infos:   Vec::new(),
            by_uuid: NoopHashMap::with_hasher(NoopBuildHasher),
        }
    }

    /// Registers a component type under its stable identifier.
    ///
    /// Registering the same identifier again returns the existing id without
    /// touching the stored metadata.
    ///
    /// # Panics
    /// Panics if the identifier is already registered under a different
    /// debug name. Identifier collisions between distinct types break the
    /// type-erasure contract, so they are reported as early as possible.
    pub fn register(&mut self, uuid: Uuid, info: ComponentInfo) -> ComponentId {
        if let Some(&id) = self.by_uuid.get(&uuid) {
            let existing = &self.infos[id.to_usize()];
            if existing.name() != info.name() {
                registration_collision(uuid, existing.name(), info.name());
            }
            return id;
        }

        let id = self.push_info(info);
        self.by_uuid.insert(uuid, id);
        id
    }

    /// Registers a component type that is not discoverable by identifier.
    ///
    /// Every call creates a new id, even for identical metadata. Useful for
    /// ephemeral, module-local component types.
    pub fn register_anonymous(&mut self, info: ComponentInfo) -> ComponentId {
        self.push_info(info)
    }

    /// Registers the Rust component type `T` under its declared identifier.
    pub fn register_component<T: Component>(&mut self) -> ComponentId {
        self.register(T::UUID, ComponentInfo::of::<T>())
    }

    /// Looks up the id registered for an identifier.
    pub fn lookup(&self, uuid: Uuid) -> Option<ComponentId> {
        self.by_uuid.get(&uuid).copied()
    }

    /// Returns the metadata of a registered component.
    ///
    /// # Panics
    /// Panics if the id was not produced by this registry.
    pub fn info(&self, id: ComponentId) -> &ComponentInfo {
        &self.infos[id.to_usize()]
    }

    /// Returns the number of registered components.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns whether no components have been registered.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    fn push_info(&mut self, info: ComponentInfo) -> ComponentId {
        let id = ComponentId::new(self.infos.len());
        log::debug!("registered component {:?} as {id:?}", info.name());
        self.infos.push(info);
        id
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(never)]
#[cold]
fn registration_collision(uuid: Uuid, existing: &str, new: &str) -> ! {
    panic!(
        "component identifier {uuid} is already registered as {existing:?}, \
         cannot re-register it as {new:?}",
    );
}

#[cfg(test)]
mod tests {
    use std::alloc::Layout;

    use super::Registry;
    use crate::comp::{Component, ComponentInfo};
    use crate::test_util::{Label, Position, Velocity};

    #[test]
    fn ids_are_dense_and_monotonic() {
        let mut registry = Registry::new();

        let position = registry.register_component::<Position>();
        let velocity = registry.register_component::<Velocity>();
        let label = registry.register_component::<Label>();

        assert_eq!(position.to_usize(), 0);
        assert_eq!(velocity.to_usize(), 1);
        assert_eq!(label.to_usize(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn reregistration_returns_the_existing_id() {
        let mut registry = Registry::new();

        let first = registry.register_component::<Position>();
        let second = registry.register_component::<Position>();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_resolves_registered_identifiers_only() {
        let mut registry = Registry::new();

        assert_eq!(registry.lookup(Position::UUID), None);
        let id = registry.register_component::<Position>();
        assert_eq!(registry.lookup(Position::UUID), Some(id));
        assert_eq!(registry.lookup(Velocity::UUID), None);
    }

    #[test]
    fn info_records_layout_and_destructor() {
        let mut registry = Registry::new();

        let position = registry.register_component::<Position>();
        let info = registry.info(position);
        assert_eq!(info.name(), "Position");
        assert_eq!(info.layout(), Layout::new::<Position>());
        assert!(info.drop_fn().is_none());

        let label = registry.register_component::<Label>();
        assert!(registry.info(label).drop_fn().is_some());
    }

    #[test]
    fn anonymous_components_are_not_discoverable() {
        let mut registry = Registry::new();

        let a = registry.register_anonymous(ComponentInfo::of::<Position>());
        let b = registry.register_anonymous(ComponentInfo::of::<Position>());
        assert_ne!(a, b);
        assert_eq!(registry.lookup(Position::UUID), None);
    }

    #[test]
    #[should_panic = "already registered"]
    fn collision_with_a_different_name_is_fatal() {
        let mut registry = Registry::new();

        registry.register(Position::UUID, ComponentInfo::of::<Position>());
        registry.register(
            Position::UUID,
            ComponentInfo::new("Imposter", Layout::new::<u8>(), None),
        );
    }
}
