//! The world: spawn/despawn orchestration over the registry, the entity
//! allocator and the archetype-indexed table store.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::archetype::Archetype;
use crate::comp::{Bundle, Component, ComponentId, ComponentInfo, Registry};
use crate::entity::ealloc::ReserveEntities;
use crate::entity::{Entity, EntityAllocator};
use crate::storage::Table;
use crate::util::BuildFxHasher;
use crate::uuid::Uuid;

/// The map that translates a borrowed archetype to the index of its table.
///
/// The map owns boxed copies of its keys; lookups borrow the caller's id
/// slice.
type TableIndex = HashMap<Box<Archetype>, u32, BuildFxHasher>;

/// Where a living entity's row is: the table and the row within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLocation {
    /// Index of the table holding the entity.
    pub table: u32,
    /// Row of the entity within the table.
    pub row:   u32,
}

impl EntityLocation {
    /// The location of an entity that has not been placed in any table yet.
    pub const INVALID: Self = Self { table: u32::MAX, row: u32::MAX };
}

impl Default for EntityLocation {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A container of entities and their components.
///
/// The world composes the pieces of the runtime core: the component
/// [`Registry`], the [`EntityAllocator`] (whose per-slot metadata is the
/// entity's [`EntityLocation`]), and the archetype-keyed store of
/// [`Table`]s. Tables are created lazily the first time an archetype is
/// spawned and live until the world is dropped.
pub struct World {
    // Field order is load-bearing for teardown: tables drop their component
    // values first, then the archetype index frees its keys, then the
    // registry and the allocator go away.
    tables:     Vec<Table>,
    archetypes: TableIndex,
    registry:   Registry,
    allocator:  EntityAllocator<EntityLocation>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            tables:     Vec::new(),
            archetypes: TableIndex::with_hasher(BuildFxHasher),
            registry:   Registry::new(),
            allocator:  EntityAllocator::new(),
        }
    }

    /// Returns the component registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a component type ahead of its first use in a bundle.
    pub fn register_component<T: Component>(&mut self) -> ComponentId {
        self.registry.register_component::<T>()
    }

    /// Registers a component type that is not backed by a Rust type.
    pub fn register_raw(&mut self, uuid: Uuid, info: ComponentInfo) -> ComponentId {
        self.registry.register(uuid, info)
    }

    /// Returns the entity allocator.
    ///
    /// The allocator's shared surface ([`reserve_one`], [`reserve_many`],
    /// [`contains`]) may be used concurrently from other threads while the
    /// world is otherwise idle.
    ///
    /// [`reserve_one`]: EntityAllocator::reserve_one
    /// [`reserve_many`]: EntityAllocator::reserve_many
    /// [`contains`]: EntityAllocator::contains
    pub fn entities(&self) -> &EntityAllocator<EntityLocation> {
        &self.allocator
    }

    /// Reserves an entity without exclusive access.
    ///
    /// The entity counts as alive immediately; it materializes (with no
    /// components) on the next [`flush_reserved`](Self::flush_reserved).
    pub fn reserve_entity(&self) -> Entity {
        self.allocator.reserve_one()
    }

    /// Reserves `count` entities without exclusive access.
    pub fn reserve_entities(&self, count: usize) -> ReserveEntities<'_, EntityLocation> {
        self.allocator.reserve_many(count)
    }

    /// Promotes every pending reservation into a componentless entity.
    ///
    /// Each promoted entity gets a row in the empty-archetype table, so it
    /// can be addressed and despawned like any other entity. Exclusive
    /// operations require this to have happened after any reservations.
    pub fn flush_reserved(&mut self) {
        if !self.allocator.needs_flush() {
            return;
        }

        let table_index = self.table_index_for(Archetype::empty());
        let flushed: Vec<Entity> = self.allocator.flush().collect();

        let table = &mut self.tables[table_index as usize];
        table.ensure_unused(flushed.len());
        for entity in flushed {
            let row = table.add_row(entity.index());
            *self.allocator.metadata_mut(entity.index()) =
                EntityLocation { table: table_index, row: row as u32 };
        }
    }

    /// Returns whether the entity is alive.
    ///
    /// Reserved but not yet flushed entities count as alive. This method is
    /// safe to call concurrently with reservations through
    /// [`entities`](Self::entities).
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.contains(entity)
    }

    /// Returns the location of a living, placed entity.
    pub fn location(&self, entity: Entity) -> Option<EntityLocation> {
        self.allocator.get(entity).copied()
    }

    /// Spawns an entity with the components of `bundle`.
    ///
    /// The bundle's component types are registered on first use; their
    /// sorted ids select (or lazily create) the table. Requires that no
    /// reservations are pending.
    ///
    /// # Panics
    /// Panics if the bundle contains the same component type twice.
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> EntityMut<'_> {
        debug_assert!(
            !self.allocator.needs_flush(),
            "spawn called with reservations pending; call flush_reserved first",
        );

        let mut field_ids = Vec::new();
        B::component_ids(&mut self.registry, &mut field_ids);
        let table_index = self.table_index_for_fields(&field_ids);

        let table = &mut self.tables[table_index as usize];
        table.ensure_unused(1);
        let entity = self.allocator.allocate(EntityLocation {
            table: table_index,
            row:   table.len() as u32,
        });
        let row = table.add_row(entity.index());

        let mut cursor = 0;
        let cells = || {
            let id = field_ids[cursor];
            cursor += 1;
            // SAFETY: the row was added under ensure_unused(1), and every
            // field id names a column of the resolved table.
            unsafe { table.cell_ptr(id, row) }
        };
        // SAFETY: cells are requested in declaration order, matching
        // field_ids, so each component is written into its own column.
        unsafe { bundle.write(cells) };

        log::trace!("spawned {entity} in table {table_index} row {row}");
        EntityMut { entity, world: self }
    }

    /// Spawns one entity per bundle yielded by `batch`, resolving the table
    /// once up front.
    ///
    /// The returned iterator is lazy: entities not consumed from it are not
    /// spawned.
    pub fn spawn_batch<I>(&mut self, batch: I) -> SpawnBatch<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Bundle,
    {
        debug_assert!(
            !self.allocator.needs_flush(),
            "spawn_batch called with reservations pending; call flush_reserved first",
        );

        let mut field_ids = Vec::new();
        <I::Item as Bundle>::component_ids(&mut self.registry, &mut field_ids);
        let table_index = self.table_index_for_fields(&field_ids);

        let iter = batch.into_iter();
        let table = &mut self.tables[table_index as usize];
        table.ensure_unused(iter.size_hint().0);

        SpawnBatch {
            iter,
            allocator: &mut self.allocator,
            table,
            table_index,
            field_ids,
        }
    }

    /// Despawns an entity, dropping its component values.
    ///
    /// Returns whether the entity was alive. Requires that no reservations
    /// are pending.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        debug_assert!(
            !self.allocator.needs_flush(),
            "despawn called with reservations pending; call flush_reserved first",
        );

        let Some(&location) = self.allocator.get(entity) else {
            return false;
        };
        self.allocator.deallocate(entity);

        let table = &mut self.tables[location.table as usize];
        if let Some(moved) = table.swap_remove(location.row as usize) {
            // The trailing row filled the hole; its entity lives at the
            // removed row now.
            self.allocator.metadata_mut(moved).row = location.row;
        }

        log::trace!("despawned {entity}");
        true
    }

    /// Returns a typed reference to one of the entity's components.
    ///
    /// `None` if the entity is not alive or its archetype does not contain
    /// `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.registry.lookup(T::UUID)?;
        let ptr = self.component_ptr(entity, id)?;
        // SAFETY: the column under T's registered id stores values of
        // exactly type T, and &self forbids concurrent mutation.
        Some(unsafe { &*ptr.cast::<T>() })
    }

    /// Returns a typed mutable reference to one of the entity's components.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.registry.lookup(T::UUID)?;
        let ptr = self.component_ptr(entity, id)?;
        // SAFETY: as in `get`, plus &mut self grants exclusive access.
        Some(unsafe { &mut *ptr.cast::<T>() })
    }

    /// Returns the raw cell of one of the entity's components.
    ///
    /// The pointer is valid until the world is mutated. Casting it to a
    /// concrete component type is the caller's responsibility.
    pub fn component_ptr(&self, entity: Entity, id: ComponentId) -> Option<*mut u8> {
        let location = *self.allocator.get(entity)?;
        let table = self.tables.get(location.table as usize)?;
        let cell = table.component_ptr(id, location.row as usize)?;
        Some(cell.as_ptr())
    }

    /// Returns a read-only handle to a living entity.
    ///
    /// # Panics
    /// Panics if the entity is not alive.
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        self.try_entity(entity).expect("entity does not exist")
    }

    /// Returns a read-only handle to a living entity, or `None` if it is
    /// dead.
    pub fn try_entity(&self, entity: Entity) -> Option<EntityRef<'_>> {
        self.is_alive(entity).then_some(EntityRef { entity, world: self })
    }

    /// Returns an exclusive handle to a living entity.
    ///
    /// # Panics
    /// Panics if the entity is not alive.
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        self.try_entity_mut(entity).expect("entity does not exist")
    }

    /// Returns an exclusive handle to a living entity, or `None` if it is
    /// dead.
    pub fn try_entity_mut(&mut self, entity: Entity) -> Option<EntityMut<'_>> {
        self.is_alive(entity).then_some(EntityMut { entity, world: self })
    }

    /// Resolves the table for a bundle's field ids, sorting them into an
    /// archetype.
    fn table_index_for_fields(&mut self, field_ids: &[ComponentId]) -> u32 {
        let mut sorted: Vec<ComponentId> = field_ids.to_vec();
        sorted.sort_unstable();
        if let Some((&duplicate, _)) = sorted.iter().tuple_windows().find(|(a, b)| a == b) {
            duplicate_component(self.registry.info(duplicate).name());
        }

        // SAFETY: just sorted, duplicates rejected.
        let archetype = unsafe { Archetype::from_sorted_unchecked(&sorted) };
        self.table_index_for(archetype)
    }

    /// Resolves the table for an archetype, creating it on first use.
    fn table_index_for(&mut self, archetype: &Archetype) -> u32 {
        if let Some(&index) = self.archetypes.get(archetype) {
            return index;
        }

        let index: u32 = self.tables.len().try_into().expect("too many tables");
        log::debug!("creating table {index} for archetype {archetype:?}");
        self.tables.push(Table::new(archetype, &self.registry));
        self.archetypes.insert(archetype.clone_boxed(), index);
        index
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(never)]
#[cold]
fn duplicate_component(name: &str) -> ! {
    panic!("bundle contains component {name:?} more than once");
}

/// A read-only handle to a living entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    entity: Entity,
    world:  &'w World,
}

impl<'w> EntityRef<'w> {
    /// Returns the entity's id.
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Returns one of the entity's components.
    pub fn get<T: Component>(&self) -> Option<&'w T> {
        self.world.get(self.entity)
    }

    /// Returns whether the entity has a component of type `T`.
    pub fn has<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }
}

/// An exclusive handle to a living entity.
pub struct EntityMut<'w> {
    entity: Entity,
    world:  &'w mut World,
}

impl<'w> EntityMut<'w> {
    /// Returns the entity's id.
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Returns one of the entity's components.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get(self.entity)
    }

    /// Returns one of the entity's components mutably.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_mut(self.entity)
    }

    /// Returns one of the entity's components mutably, consuming the handle
    /// to keep the world's borrow.
    pub fn into_mut<T: Component>(self) -> Option<&'w mut T> {
        self.world.get_mut(self.entity)
    }

    /// Returns whether the entity has a component of type `T`.
    pub fn has<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Despawns the entity.
    pub fn despawn(self) {
        self.world.despawn(self.entity);
    }
}

/// Iterator spawning one entity per bundle, created by
/// [`World::spawn_batch`].
///
/// Entities are spawned as the iterator advances; dropping it early leaves
/// the remaining bundles unspawned.
pub struct SpawnBatch<'w, I> {
    iter:        I,
    allocator:   &'w mut EntityAllocator<EntityLocation>,
    table:       &'w mut Table,
    table_index: u32,
    field_ids:   Vec<ComponentId>,
}

impl<I> Iterator for SpawnBatch<'_, I>
where
    I: Iterator,
    I::Item: Bundle,
{
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let bundle = self.iter.next()?;

        let table = &mut *self.table;
        table.ensure_unused(1);
        let entity = self.allocator.allocate(EntityLocation {
            table: self.table_index,
            row:   table.len() as u32,
        });
        let row = table.add_row(entity.index());

        let field_ids = &self.field_ids;
        let mut cursor = 0;
        let cells = || {
            let id = field_ids[cursor];
            cursor += 1;
            // SAFETY: as in World::spawn.
            unsafe { table.cell_ptr(id, row) }
        };
        // SAFETY: as in World::spawn.
        unsafe { bundle.write(cells) };

        Some(entity)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
