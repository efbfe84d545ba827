//! Bounded append-only buffer shared by parallel producers.
//!
//! ```text
//!  producer A ─┐  fetch_add(2) → [0, 2)
//!  producer B ─┼─► cursor ─────► [2, 3)      slots: [A0 A1 B0 C0 C1 C2 · · ·]
//!  producer C ─┘  fetch_add(3) → [3, 6)                          ▲
//!                                                          count = 6
//! ```
//!
//! Producers claim disjoint slot ranges through one atomic `fetch_add` each and
//! then write their items into the claimed range. Nothing orders producers
//! relative to each other. Items that would land past `capacity` are dropped
//! and counted; the cursor keeps advancing so the overflow is measurable.
//!
//! Readers see slots only through `&mut self` methods, after every producer
//! borrow has ended, so no slot is read while it may still be written.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct AppendBuffer<T> {
  slots: Box<[UnsafeCell<T>]>,
  cursor: AtomicUsize,
}

// Each slot index is handed out by `fetch_add` at most once per reset, so two
// threads never touch the same slot through `&self`.
unsafe impl<T: Send> Sync for AppendBuffer<T> {}

impl<T: Copy + Default> AppendBuffer<T> {
  /// Allocate `capacity` slots.
  pub fn with_capacity(capacity: usize) -> Self {
    let slots = (0..capacity).map(|_| UnsafeCell::new(T::default())).collect();
    Self {
      slots,
      cursor: AtomicUsize::new(0),
    }
  }

  /// Append one item. Returns false if it was dropped.
  #[inline]
  pub fn push(&self, item: T) -> bool {
    self.push_slice(&[item]) == 1
  }

  /// Append `items` as one contiguous run, returning how many were stored.
  ///
  /// The run is truncated at capacity; the remainder is dropped.
  #[inline]
  pub fn push_slice(&self, items: &[T]) -> usize {
    if items.is_empty() {
      return 0;
    }

    let start = self.cursor.fetch_add(items.len(), Ordering::Relaxed);
    let capacity = self.slots.len();
    if start >= capacity {
      return 0;
    }

    let stored = items.len().min(capacity - start);
    for (slot, item) in self.slots[start..start + stored].iter().zip(items) {
      // SAFETY: [start, start + stored) was claimed exclusively by the
      // fetch_add above and lies within bounds.
      unsafe {
        *slot.get() = *item;
      }
    }
    stored
  }

  /// Number of valid items, clamped to capacity.
  #[inline]
  pub fn count(&self) -> usize {
    self.cursor.load(Ordering::Acquire).min(self.slots.len())
  }

  /// Items appended past capacity since the last reset.
  #[inline]
  pub fn dropped(&self) -> usize {
    self.cursor.load(Ordering::Acquire).saturating_sub(self.slots.len())
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.count() == 0
  }

  /// Zero the write cursor. Stale slots remain but are never exposed.
  pub fn reset(&mut self) {
    *self.cursor.get_mut() = 0;
  }

  /// The valid prefix.
  pub fn as_slice(&mut self) -> &[T] {
    let count = self.count();
    // SAFETY: `&mut self` guarantees no producer holds `&self`, and
    // `UnsafeCell<T>` has the same layout as `T`.
    unsafe { std::slice::from_raw_parts(self.slots.as_ptr() as *const T, count) }
  }

  /// Copy out the valid prefix.
  pub fn read_back(&mut self) -> Vec<T> {
    self.as_slice().to_vec()
  }
}

#[cfg(test)]
#[path = "append_buffer_test.rs"]
mod append_buffer_test;
