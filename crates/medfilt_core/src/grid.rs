//! Ping-pong buffer pair shared between the controller and the workers.
//!
//! The two equally-shaped buffers live in a small owned array; buffer roles
//! are swapped by flipping an index, not by reseating references. Workers
//! read the front buffer and write disjoint row ranges of the back buffer
//! through raw element pointers captured at construction, so no lock guards
//! the matrices themselves — the engine's barrier protocol is what keeps the
//! accesses ordered.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;

pub(crate) struct GridPair {
    bufs: [UnsafeCell<Array2<i32>>; 2],
    /// Raw element pointers into each buffer's row-major storage.
    cells: [*mut i32; 2],
    /// Index of the buffer holding the latest completed iteration.
    front: AtomicUsize,
    ncols: usize,
}

// SAFETY: GridPair is shared across threads because:
// 1. Each worker writes only its own disjoint row range of the back buffer.
// 2. The front buffer has no writers while workers read it.
// 3. `flip` runs only while every worker is parked at the barrier, and the
//    release/acquire pair on `front` plus the barrier's lock ordering make
//    the new roles visible before any worker resumes.
unsafe impl Send for GridPair {}
unsafe impl Sync for GridPair {}

impl GridPair {
    /// Buffer 0 starts as the front holding `initial`; buffer 1 is a zeroed
    /// scratch of the same shape.
    pub fn new(initial: Array2<i32>) -> Self {
        debug_assert!(initial.is_standard_layout());
        let (nrows, ncols) = initial.dim();
        let bufs = [
            UnsafeCell::new(initial),
            UnsafeCell::new(Array2::zeros((nrows, ncols))),
        ];
        // Captured while construction still has exclusive access; the heap
        // storage stays put when the pair itself moves.
        let cells = [
            unsafe { (*bufs[0].get()).as_mut_ptr() },
            unsafe { (*bufs[1].get()).as_mut_ptr() },
        ];
        Self {
            bufs,
            cells,
            front: AtomicUsize::new(0),
            ncols,
        }
    }

    pub fn front_index(&self) -> usize {
        self.front.load(Ordering::Acquire)
    }

    /// Shared view of one buffer.
    ///
    /// # Safety
    ///
    /// No thread may be writing `index` for as long as the returned reference
    /// lives. The engine guarantees this by only reading the front buffer
    /// between two barrier releases.
    pub unsafe fn read(&self, index: usize) -> &Array2<i32> {
        &*self.bufs[index].get()
    }

    /// Write one cell of buffer `index`.
    ///
    /// # Safety
    ///
    /// `row` must lie inside the calling worker's assigned partition range,
    /// exactly one worker may own that range for the current iteration, and
    /// `index` must be the back buffer (no concurrent readers).
    pub unsafe fn write_cell(&self, index: usize, row: usize, col: usize, value: i32) {
        *self.cells[index].add(row * self.ncols + col) = value;
    }

    /// Swap buffer roles. Controller-only, and strictly inside the window
    /// between the two barrier phases of a round.
    pub fn flip(&self) {
        let front = self.front.load(Ordering::Relaxed);
        self.front.store(1 - front, Ordering::Release);
    }

    /// Consume the pair, returning the front buffer.
    pub fn into_front(self) -> Array2<i32> {
        let front = self.front.load(Ordering::Acquire);
        let [a, b] = self.bufs;
        if front == 0 {
            a.into_inner()
        } else {
            b.into_inner()
        }
    }
}
