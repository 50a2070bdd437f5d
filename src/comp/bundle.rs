//! Heterogeneous component bundles.

use crate::comp::{Component, ComponentId, Registry};

/// A fixed set of components spawned onto one entity together.
///
/// A bundle is either a single [`Component`] value, the unit type `()` for
/// componentless entities, or a tuple of up to twelve component values. The
/// component *types* of a bundle are static: every value of a bundle type
/// registers the same ids in the same order.
///
/// # Safety
/// [`write`](Self::write) must request exactly one cell per id pushed by
/// [`component_ids`](Self::component_ids), in the same order, and must move
/// a valid instance of the matching component type into each returned
/// pointer.
pub unsafe trait Bundle: 'static {
    /// Registers every component of the bundle, pushing the ids onto `ids`
    /// in declaration order.
    fn component_ids(registry: &mut Registry, ids: &mut Vec<ComponentId>);

    /// Moves each component of the bundle into the cell returned for it.
    ///
    /// `cell` is called once per component, in declaration order; each call
    /// returns the column cell the component must be written to.
    ///
    /// # Safety
    /// Every pointer returned by `cell` must be valid for writing one
    /// instance of the component the call corresponds to.
    unsafe fn write(self, cell: impl FnMut() -> *mut u8);
}

unsafe impl Bundle for () {
    fn component_ids(_registry: &mut Registry, _ids: &mut Vec<ComponentId>) {}

    unsafe fn write(self, _cell: impl FnMut() -> *mut u8) {}
}

unsafe impl<T: Component> Bundle for T {
    fn component_ids(registry: &mut Registry, ids: &mut Vec<ComponentId>) {
        ids.push(registry.register_component::<T>());
    }

    unsafe fn write(self, mut cell: impl FnMut() -> *mut u8) {
        unsafe { cell().cast::<T>().write(self) };
    }
}

macro_rules! impl_bundle_for_tuple {
    ($($comp:ident),*) => {
        unsafe impl<$($comp: Component),*> Bundle for ($($comp,)*) {
            fn component_ids(registry: &mut Registry, ids: &mut Vec<ComponentId>) {
                $(ids.push(registry.register_component::<$comp>());)*
            }

            #[allow(non_snake_case)]
            unsafe fn write(self, mut cell: impl FnMut() -> *mut u8) {
                let ($($comp,)*) = self;
                $(unsafe { cell().cast::<$comp>().write($comp) };)*
            }
        }
    };
}

impl_bundle_for_tuple!(C0);
impl_bundle_for_tuple!(C0, C1);
impl_bundle_for_tuple!(C0, C1, C2);
impl_bundle_for_tuple!(C0, C1, C2, C3);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10);
impl_bundle_for_tuple!(C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11);
