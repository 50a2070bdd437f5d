//! Component identity and metadata.
//!
//! A *component* is a plain value type attached to entities. The engine
//! never sees the concrete type: it stores components in type-erased column
//! buffers and only needs each type's [`ComponentInfo`] — a debug name, a
//! memory layout and an optional destructor. The stable, cross-module name
//! of a component type is its [`Uuid`]; the transient, per-process name is
//! the dense [`ComponentId`] handed out by the [`Registry`].

use std::alloc::Layout;

mod bundle;
pub use bundle::Bundle;

mod registry;
pub use registry::Registry;

use crate::uuid::Uuid;

/// Drops a component instance in place.
///
/// For Rust component types this is a thin wrapper around
/// [`drop_in_place`](std::ptr::drop_in_place). Components registered from
/// outside Rust may supply any function of this shape.
///
/// # Safety
/// The pointed-to memory must hold a properly initialized instance of the
/// component. After the call the memory is uninitialized and must not be
/// read again.
pub type DropFn = unsafe fn(*mut u8);

/// A value type that can be attached to entities.
///
/// # Safety
/// The implementor guarantees that [`UUID`](Self::UUID) is globally unique
/// to this type. Two distinct types sharing an identifier would be handed
/// the same column, and readers would reinterpret one type's bytes as the
/// other.
///
/// This is usually implemented through
/// [`#[derive(Component)]`](crate::Component), which takes the identifier
/// from the `#[component(uuid = "...")]` attribute.
pub unsafe trait Component: 'static {
    /// The stable identifier of this component type.
    const UUID: Uuid;

    /// The debug name recorded in the registry.
    const NAME: &'static str;
}

/// The per-process identifier of a registered component type.
///
/// Ids are dense indices assigned in registration order. They are never
/// reused within a process, and they are not stable across processes — use
/// [`Uuid`] for anything that outlives the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u32);

impl ComponentId {
    pub(crate) fn new(index: usize) -> Self {
        let index = index.try_into().expect("too many registered components");
        Self(index)
    }

    /// Returns the id as a dense index.
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// Static metadata describing a component type.
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    name:    Box<str>,
    layout:  Layout,
    drop_fn: Option<DropFn>,
}

impl ComponentInfo {
    /// Creates metadata from its parts.
    ///
    /// `drop_fn` is `None` for components that do not need to be dropped.
    pub fn new(name: impl Into<Box<str>>, layout: Layout, drop_fn: Option<DropFn>) -> Self {
        Self { name: name.into(), layout, drop_fn }
    }

    /// Returns the metadata describing the Rust type `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            name:    T::NAME.into(),
            layout:  Layout::new::<T>(),
            drop_fn: if std::mem::needs_drop::<T>() {
                Some(|ptr| unsafe { ptr.cast::<T>().drop_in_place() })
            } else {
                None
            },
        }
    }

    /// Returns the debug name of the component type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the memory layout of one component instance.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the destructor of the component type, if it has one.
    pub fn drop_fn(&self) -> Option<DropFn> {
        self.drop_fn
    }
}
