//! A table of entities sharing one archetype.

use std::ptr::NonNull;

use crate::archetype::Archetype;
use crate::comp::{ComponentId, Registry};
use crate::sparse::SparseSet;
use crate::storage::Column;

/// The column-major store for every entity of one archetype.
///
/// Each row holds one entity: its slot index in the `entities` array and one
/// value in every column. The column set equals the table's archetype
/// exactly and never changes after construction. All columns share one
/// capacity, driven by [`ensure_unused`](Self::ensure_unused).
pub struct Table {
    /// Slot index of the entity in each row.
    entities: Vec<u32>,
    /// One column per component of the archetype, keyed by component id.
    columns:  SparseSet<Column, u32>,
    /// Shared element capacity of the columns.
    cap:      usize,
}

impl Table {
    /// Creates an empty table with one column per component of the
    /// archetype.
    ///
    /// Every id of the archetype must be valid in `registry`.
    pub fn new(archetype: &Archetype, registry: &Registry) -> Self {
        let mut columns = SparseSet::new();
        for &id in archetype.ids() {
            columns.insert_unique(id.to_usize(), Column::new(registry.info(id)));
        }

        Self { entities: Vec::new(), columns, cap: 0 }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the row capacity.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the slot index stored in each row.
    pub fn entities(&self) -> &[u32] {
        &self.entities
    }

    /// Returns whether the table's archetype contains the component.
    pub fn has_column(&self, id: ComponentId) -> bool {
        self.columns.contains_key(id.to_usize())
    }

    /// Grows the table so that at least `additional` rows can be added
    /// without reallocating.
    pub fn ensure_unused(&mut self, additional: usize) {
        let required = self.len().checked_add(additional).expect("table capacity overflow");
        if required <= self.cap {
            return;
        }

        let target = required.max(self.cap * 2).max(4);
        for column in self.columns.values_mut() {
            column.grow(target);
        }
        self.entities.reserve(target - self.len());
        self.cap = target;
    }

    /// Appends a row for the entity in the given slot and returns its row
    /// index.
    ///
    /// Requires spare capacity; the caller is responsible for writing one
    /// component value into every column at the returned row.
    pub fn add_row(&mut self, slot: u32) -> usize {
        debug_assert!(self.len() < self.cap, "add_row called without spare capacity");

        let row = self.entities.len();
        self.entities.push(slot);
        row
    }

    /// Returns the cell of a component at a row, for writing a freshly
    /// added row.
    ///
    /// # Panics
    /// Panics if the component is not part of the table's archetype.
    ///
    /// # Safety
    /// `row` must be within the capacity of the table.
    pub unsafe fn cell_ptr(&mut self, id: ComponentId, row: usize) -> *mut u8 {
        let column = self
            .columns
            .get_mut(id.to_usize())
            .expect("component is not part of the table's archetype");
        // SAFETY: row < cap is promised by the caller.
        unsafe { column.item_ptr(row) }
    }

    /// Returns the cell of a component at an initialized row, or `None` if
    /// the component is not part of the table's archetype.
    pub fn component_ptr(&self, id: ComponentId, row: usize) -> Option<NonNull<u8>> {
        assert!(row < self.len(), "row {row} out of bounds");

        let column = self.columns.get(id.to_usize())?;
        // SAFETY: row < len <= cap, and the row is initialized.
        Some(unsafe { NonNull::new_unchecked(column.item_ptr(row)) })
    }

    /// Deletes a row by swap-remove.
    ///
    /// Drops the row's component values, then moves the trailing row into
    /// the hole. Returns the slot index of the entity that moved, or `None`
    /// if the removed row was the last one; the caller must rewrite the
    /// moved entity's location metadata.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub fn swap_remove(&mut self, row: usize) -> Option<u32> {
        assert!(row < self.len(), "row {row} out of bounds");

        let last = self.entities.len() - 1;
        for column in self.columns.values_mut() {
            // SAFETY: row and last are initialized rows, row <= last.
            unsafe { column.swap_remove(row, last) };
        }
        self.entities.swap_remove(row);

        (row != last).then(|| self.entities[row])
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        let len = self.entities.len();
        for column in self.columns.values_mut() {
            // SAFETY: every row below len is initialized; the column buffers
            // are freed by Column::drop afterwards.
            unsafe { column.clear(len) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::archetype::Archetype;
    use crate::comp::Registry;
    use crate::test_util::{Label, Position, Velocity};

    /// Builds a registry plus a table over the given component set.
    macro_rules! table {
        ($registry:ident: $($comp:ty),*) => {{
            let mut $registry = Registry::new();
            let mut ids = vec![$($registry.register_component::<$comp>()),*];
            ids.sort_unstable();
            Table::new(unsafe { Archetype::from_sorted_unchecked(&ids) }, &$registry)
        }};
    }

    #[test]
    fn new_table_is_empty() {
        let table = table!(registry: Position, Velocity);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 0);
    }

    #[test]
    fn columns_match_the_archetype() {
        let mut registry = Registry::new();
        let position = registry.register_component::<Position>();
        let velocity = registry.register_component::<Velocity>();
        let label = registry.register_component::<Label>();

        let mut ids = vec![position, velocity];
        ids.sort_unstable();
        let table = Table::new(unsafe { Archetype::from_sorted_unchecked(&ids) }, &registry);

        assert!(table.has_column(position));
        assert!(table.has_column(velocity));
        assert!(!table.has_column(label));
    }

    #[test]
    fn ensure_unused_grows_at_least_geometrically() {
        let mut table = table!(registry: Position);

        table.ensure_unused(1);
        assert_eq!(table.capacity(), 4);

        for _ in 0..4 {
            table.add_row(0);
        }
        table.ensure_unused(1);
        assert_eq!(table.capacity(), 8);

        table.ensure_unused(100);
        assert_eq!(table.capacity(), 104);
    }

    #[test]
    fn add_row_records_the_slot_index() {
        let mut table = table!(registry: Position);

        table.ensure_unused(3);
        assert_eq!(table.add_row(10), 0);
        assert_eq!(table.add_row(20), 1);
        assert_eq!(table.add_row(30), 2);
        assert_eq!(table.entities(), &[10, 20, 30]);
    }

    #[test]
    fn swap_remove_reports_the_moved_slot() {
        let mut table = table!(registry: Position);

        table.ensure_unused(3);
        for slot in [10, 20, 30] {
            let row = table.add_row(slot);
            unsafe {
                table
                    .cell_ptr(crate::comp::ComponentId::new(0), row)
                    .cast::<Position>()
                    .write(Position { x: slot as f32, y: 0.0 });
            }
        }

        // Removing the middle row moves slot 30 up.
        assert_eq!(table.swap_remove(1), Some(30));
        assert_eq!(table.entities(), &[10, 30]);

        // Removing the trailing row moves nothing.
        assert_eq!(table.swap_remove(1), None);
        assert_eq!(table.entities(), &[10]);
    }
}
