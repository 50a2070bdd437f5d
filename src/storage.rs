//! The column-major table store.
//!
//! Entities sharing an archetype live together in one [`Table`]: a row per
//! entity, a type-erased [`Column`] per component. Rows are deleted by
//! swap-remove — the trailing row fills the hole in constant time — and the
//! table reports which entity moved so the world can rewrite that entity's
//! location metadata.

mod column;
pub use column::Column;

mod table;
pub use table::Table;
