// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Double-buffered frame hand-off between one producer and any number of
//! readers.
//!
//! Each buffer owns two fixed-length slots. The producer fills the slot that
//! is not published, then flips the published index. Readers latch the
//! published slot and read it for as long as they like. Neither side ever
//! waits on the other: a reader that still holds the slot the producer wants
//! to reuse causes that frame to be dropped, never torn.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

/// Two fixed-length slots and the index of the published one.
#[derive(Debug)]
pub struct DoubleBuffer<T> {
    slots: [RwLock<Vec<T>>; 2],
    /// Index of the slot readers should latch.
    published: AtomicUsize,
    /// Set once the staging slot holds a complete frame.
    staged: AtomicBool,
    /// Number of commits so far.
    generation: AtomicU64,
    len: usize,
}

impl<T: Copy + Default> DoubleBuffer<T> {
    /// Creates a buffer with both slots filled with `T::default()`.
    pub fn new(len: usize) -> Self {
        Self {
            slots: [
                RwLock::new(vec![T::default(); len]),
                RwLock::new(vec![T::default(); len]),
            ],
            published: AtomicUsize::new(0),
            staged: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            len,
        }
    }

    /// Number of values per frame.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of frames published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Copies `values` into the staging slot.
    ///
    /// Only the common prefix is copied when the lengths differ; the rest of
    /// the slot is reset to the default. Returns false, and drops the frame,
    /// when a reader still holds the staging slot.
    pub fn write(&self, values: &[T]) -> bool {
        self.stage(|slot| {
            let n = slot.len().min(values.len());
            slot[..n].copy_from_slice(&values[..n]);
            slot[n..].fill(T::default());
        })
    }

    /// Fills the staging slot in place. Same contract as [`Self::write`].
    pub fn stage(&self, fill: impl FnOnce(&mut [T])) -> bool {
        let staging = 1 - self.published.load(Ordering::Acquire);
        let Some(mut slot) = self.slots[staging].try_write() else {
            debug!(slot = staging, "Reader still holds staging slot, dropping frame");
            self.staged.store(false, Ordering::Release);
            return false;
        };
        fill(slot.as_mut_slice());
        self.staged.store(true, Ordering::Release);
        true
    }

    /// Publishes the staging slot. Returns false when nothing was staged since
    /// the last commit, in which case the published frame stays as it is.
    pub fn commit(&self) -> bool {
        if !self.staged.swap(false, Ordering::AcqRel) {
            return false;
        }
        let staging = 1 - self.published.load(Ordering::Acquire);
        self.published.store(staging, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Latches the published slot.
    fn latch(&self) -> RwLockReadGuard<'_, Vec<T>> {
        loop {
            let index = self.published.load(Ordering::Acquire);
            if let Some(guard) = self.slots[index].try_read() {
                // The producer may have flipped and refilled this slot between
                // the load and the lock; only keep it if it is still published.
                if self.published.load(Ordering::Acquire) == index {
                    return guard;
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Copies the published frame out. Mostly useful in tests and tools.
    pub fn snapshot(&self) -> Vec<T> {
        self.latch().to_vec()
    }

    /// Creates a reader for this buffer.
    pub fn reader(self: &Arc<Self>) -> FrameReader<T> {
        FrameReader {
            buffer: self.clone(),
            seen: 0,
        }
    }
}

/// Consumer side of a [`DoubleBuffer`].
#[derive(Debug)]
pub struct FrameReader<T> {
    buffer: Arc<DoubleBuffer<T>>,
    seen: u64,
}

impl<T: Copy + Default> FrameReader<T> {
    /// Latches the most recently published frame. The frame stays readable
    /// until the guard is dropped.
    pub fn swap_read(&mut self) -> FrameGuard<'_, T> {
        let guard = self.buffer.latch();
        self.seen = self.buffer.generation();
        FrameGuard { guard }
    }

    /// True when a frame newer than the last latched one has been published.
    pub fn has_new_frame(&self) -> bool {
        self.buffer.generation() != self.seen
    }

    /// Generation of the last latched frame.
    pub fn seen_generation(&self) -> u64 {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<T> Clone for FrameReader<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            seen: self.seen,
        }
    }
}

/// A latched, complete frame.
pub struct FrameGuard<'a, T> {
    guard: RwLockReadGuard<'a, Vec<T>>,
}

impl<T> Deref for FrameGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.guard
    }
}
