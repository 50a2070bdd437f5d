//! An archetype-table entity-component container.
//!
//! `archec` is the storage core of a data-oriented game runtime. Entities
//! are integer handles with generational reuse; components are plain value
//! types, stored type-erased in column-major tables; entities sharing the
//! same component set share one table, keyed by its *archetype* — the
//! sorted sequence of component ids. Iteration over a table touches each
//! component array linearly, which is the point of the exercise.
//!
//! The crate deliberately stops at storage: there are no queries, no system
//! scheduler and no parallel iteration. Those are layers a runtime builds
//! *on top of* the [`World`]; the world only promises that spawn, despawn
//! and component access keep every entity's location metadata coherent.
//!
//! # Components
//! A type becomes a component by carrying a stable 128-bit identifier,
//! usually through the [`Component`] derive:
//!
//! ```
//! use archec::{Component, World};
//!
//! #[derive(Component, Debug, PartialEq)]
//! #[component(uuid = "b6f4f3a0-8b2c-4e8e-9d0a-6c9e2f1a7b10")]
//! struct Health(u32);
//!
//! let mut world = World::new();
//! let entity = world.spawn(Health(10)).id();
//! assert_eq!(world.get::<Health>(entity), Some(&Health(10)));
//!
//! world.despawn(entity);
//! assert!(!world.is_alive(entity));
//! ```
//!
//! Components without a Rust type can be registered through
//! [`Registry::register`] with hand-written [`ComponentInfo`].
//!
//! # Concurrency
//! The world requires exclusive access for every mutation. The one
//! concurrent operation is entity *reservation*: any number of threads may
//! call [`World::reserve_entity`] (or the allocator's
//! [`reserve_one`](entity::EntityAllocator::reserve_one)) at the same time,
//! without locks, and the reserved handles become real entities on the next
//! exclusive [`World::flush_reserved`].

#![warn(missing_docs)]

pub mod archetype;
pub use archetype::Archetype;

pub mod comp;
pub use comp::{Bundle, Component, ComponentId, ComponentInfo, Registry};

pub mod entity;
pub use entity::{Entity, EntityAllocator};

mod macros;
#[doc(inline)]
pub use macros::*;

pub mod sparse;

pub mod storage;

pub mod uuid;
pub use uuid::Uuid;

pub mod world;
pub use world::World;

mod util;

#[cfg(test)]
mod test_util;
