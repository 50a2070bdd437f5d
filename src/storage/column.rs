//! The type-erased component buffer backing one column of a table.

use std::alloc::{self, handle_alloc_error, Layout};
use std::ptr::NonNull;

use crate::comp::{ComponentInfo, DropFn};

/// A type-erased buffer holding the values of one component type for every
/// row of a table.
///
/// A column is what remains of a `Vec<T>` once `T` is erased: a data
/// pointer, an element capacity, and the layout and destructor of the
/// element type. It deliberately does *not* track its own length — the
/// owning [`Table`](crate::storage::Table) drives every column in lockstep
/// and passes the row count into the operations that need it.
///
/// # Thread safety
/// The buffer contents are of unknown type, so the column is only accessed
/// under exclusive access to its table.
pub struct Column {
    /// The padded element layout: its size is a multiple of its alignment,
    /// so row offsets stay aligned when multiplied out.
    layout:  Layout,
    drop_fn: Option<DropFn>,
    /// Aligned for the element type; points to a real allocation only when
    /// `cap > 0` and the element size is non-zero.
    data:    NonNull<u8>,
    /// Element capacity. Zero-sized element types get `usize::MAX` up
    /// front, since the buffer never needs to grow for them.
    cap:     usize,
}

impl Column {
    /// Creates an empty column for the described component type.
    pub fn new(info: &ComponentInfo) -> Self {
        let layout = info.layout().pad_to_align();
        let cap = if layout.size() == 0 { usize::MAX } else { 0 };

        Self {
            layout,
            drop_fn: info.drop_fn(),
            // An integer address is a valid dangling pointer for the
            // element alignment.
            data: unsafe { NonNull::new_unchecked(layout.align() as *mut u8) },
            cap,
        }
    }

    /// Returns the padded layout of one element.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the destructor of the element type, if any.
    pub fn drop_fn(&self) -> Option<DropFn> {
        self.drop_fn
    }

    /// Returns the element capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Grows the buffer so that it can hold at least `new_cap` elements.
    ///
    /// Only the first `len` elements are copied into the new allocation;
    /// the uninitialized tail is never touched. Does nothing if the buffer
    /// is already large enough.
    ///
    /// # Panics
    /// Panics if the byte size would overflow `isize::MAX`, and aborts on
    /// allocation failure.
    pub fn grow(&mut self, new_cap: usize) {
        if new_cap <= self.cap {
            return;
        }

        let new_size = new_cap
            .checked_mul(self.layout.size())
            .filter(|&size| size <= isize::MAX as usize)
            .unwrap_or_else(|| capacity_overflow());
        // new_cap > cap rules out zero-sized elements (their cap is already
        // usize::MAX), so new_size is non-zero.
        let new_layout = Layout::from_size_align(new_size, self.layout.align())
            .unwrap_or_else(|_| capacity_overflow());

        let new_data = if self.cap == 0 {
            // SAFETY: new_size is non-zero.
            unsafe { alloc::alloc(new_layout) }
        } else {
            // SAFETY: data was allocated with allocated_layout() and
            // new_size is non-zero.
            unsafe { alloc::realloc(self.data.as_ptr(), self.allocated_layout(), new_size) }
        };

        let Some(new_data) = NonNull::new(new_data) else {
            handle_alloc_error(new_layout);
        };
        self.data = new_data;
        self.cap = new_cap;
    }

    /// Returns a pointer to the element at `row`.
    ///
    /// Elements are only initialized up to the owning table's row count.
    ///
    /// # Safety
    /// `row` must be within the capacity of the column.
    pub unsafe fn item_ptr(&self, row: usize) -> *mut u8 {
        debug_assert!(row < self.cap);
        // SAFETY: row < cap, and cap * size was checked against isize::MAX
        // when the buffer grew.
        unsafe { self.data.as_ptr().add(self.layout.size() * row) }
    }

    /// Deletes the element at `row` by dropping it and moving the element
    /// at `last` into its place.
    ///
    /// # Safety
    /// `row` and `last` must both hold initialized elements, with
    /// `row <= last`.
    pub unsafe fn swap_remove(&mut self, row: usize, last: usize) {
        debug_assert!(row <= last);

        unsafe {
            let hole = self.item_ptr(row);
            if let Some(drop_fn) = self.drop_fn {
                drop_fn(hole);
            }
            if row != last {
                std::ptr::copy_nonoverlapping(self.item_ptr(last), hole, self.layout.size());
            }
        }
    }

    /// Drops the first `len` elements.
    ///
    /// If an element's destructor panics, the remaining elements leak but
    /// the buffer itself is still freed when the column is dropped.
    ///
    /// # Safety
    /// The first `len` elements must be initialized; afterwards they must
    /// be treated as uninitialized.
    pub unsafe fn clear(&mut self, len: usize) {
        if let Some(drop_fn) = self.drop_fn {
            for row in 0..len {
                // SAFETY: len <= cap by the table's invariant.
                unsafe { drop_fn(self.item_ptr(row)) };
            }
        }
    }

    /// The layout of the current allocation.
    fn allocated_layout(&self) -> Layout {
        // SAFETY: checked when the buffer last grew.
        unsafe {
            Layout::from_size_align_unchecked(self.layout.size() * self.cap, self.layout.align())
        }
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        // Element values are dropped by the owning table, which knows the
        // row count; only the buffer is freed here.
        if self.layout.size() != 0 && self.cap != 0 {
            // SAFETY: a non-empty allocation exists exactly under this
            // condition.
            unsafe { alloc::dealloc(self.data.as_ptr(), self.allocated_layout()) };
        }
    }
}

#[inline(never)]
#[track_caller]
#[cold]
fn capacity_overflow() -> ! {
    panic!("column capacity overflow");
}
