//! Archetype keys: the sorted component-id sequences that identify tables.

use std::fmt;

use itertools::Itertools;

use crate::comp::ComponentId;

/// The ordered set of component ids shared by every entity in one table.
///
/// An archetype is stored as an ascending, duplicate-free slice of
/// [`ComponentId`]s. Because the sequence is canonical, two bundles whose
/// component types differ only in declaration order resolve to the same
/// archetype, and equality and hashing can work directly on the id
/// sequence.
///
/// The type is unsized: borrowed archetypes are cheap views over an id
/// slice, and the archetype index clones them into owned
/// [`Box<Archetype>`] keys on first use.
#[derive(PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Archetype([ComponentId]);

impl Archetype {
    /// Creates a borrowed archetype from a component-id slice.
    ///
    /// # Safety
    /// `ids` must be sorted in ascending order and contain no duplicates.
    pub unsafe fn from_sorted_unchecked(ids: &[ComponentId]) -> &Self {
        debug_assert!(is_sorted_and_unique(ids));
        // SAFETY: Archetype is a transparent newtype over [ComponentId].
        unsafe { &*(ids as *const [ComponentId] as *const Self) }
    }

    /// Creates an owned archetype from a boxed component-id slice.
    ///
    /// # Safety
    /// `ids` must be sorted in ascending order and contain no duplicates.
    pub unsafe fn from_sorted_boxed_unchecked(ids: Box<[ComponentId]>) -> Box<Self> {
        debug_assert!(is_sorted_and_unique(&ids));
        // SAFETY: Archetype is a transparent newtype over [ComponentId].
        unsafe { Box::from_raw(Box::into_raw(ids) as *mut Self) }
    }

    /// Returns the archetype of entities with no components.
    pub fn empty() -> &'static Self {
        // SAFETY: an empty slice is trivially sorted and duplicate-free.
        unsafe { Self::from_sorted_unchecked(&[]) }
    }

    /// Clones this archetype into an owned key.
    pub fn clone_boxed(&self) -> Box<Self> {
        // SAFETY: the ids come from an existing archetype.
        unsafe { Self::from_sorted_boxed_unchecked(Box::from(&self.0)) }
    }

    /// Returns the component ids of the archetype.
    pub fn ids(&self) -> &[ComponentId] {
        &self.0
    }

    /// Returns the number of component types in the archetype.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the archetype has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether the archetype contains the component.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.binary_search(&id).is_ok()
    }
}

impl fmt::Debug for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|id| id.to_usize())).finish()
    }
}

/// Returns whether `ids` is ascending with no duplicates.
pub(crate) fn is_sorted_and_unique(ids: &[ComponentId]) -> bool {
    ids.iter().tuple_windows().all(|(a, b)| a < b)
}

#[cfg(test)]
mod tests {
    use super::{is_sorted_and_unique, Archetype};
    use crate::comp::ComponentId;

    fn ids(raw: &[usize]) -> Vec<ComponentId> {
        raw.iter().map(|&id| ComponentId::new(id)).collect()
    }

    #[test]
    fn equality_is_over_the_id_sequence() {
        let a = ids(&[0, 2, 5]);
        let b = ids(&[0, 2, 5]);
        let c = ids(&[0, 2, 6]);

        let a = unsafe { Archetype::from_sorted_unchecked(&a) };
        let b = unsafe { Archetype::from_sorted_unchecked(&b) };
        let c = unsafe { Archetype::from_sorted_unchecked(&c) };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, Archetype::empty());
    }

    #[test]
    fn clone_boxed_round_trips() {
        let raw = ids(&[1, 3]);
        let archetype = unsafe { Archetype::from_sorted_unchecked(&raw) };
        let boxed = archetype.clone_boxed();

        assert_eq!(&*boxed, archetype);
        assert_eq!(boxed.ids(), archetype.ids());
    }

    #[test]
    fn contains_uses_the_sorted_order() {
        let raw = ids(&[1, 4, 9]);
        let archetype = unsafe { Archetype::from_sorted_unchecked(&raw) };

        assert!(archetype.contains(ComponentId::new(4)));
        assert!(!archetype.contains(ComponentId::new(5)));
        assert!(!Archetype::empty().contains(ComponentId::new(0)));
    }

    #[test]
    fn sortedness_check() {
        assert!(is_sorted_and_unique(&ids(&[])));
        assert!(is_sorted_and_unique(&ids(&[7])));
        assert!(is_sorted_and_unique(&ids(&[0, 1, 2])));
        assert!(!is_sorted_and_unique(&ids(&[1, 1])));
        assert!(!is_sorted_and_unique(&ids(&[2, 1])));
    }
}
