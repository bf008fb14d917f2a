//! Swap-file manager (§4.3): the fixed-capacity table of pages backed
//! by a process's on-disk swap file, plus the read/write primitives
//! that move bytes through the page tables and the `SwapBackend`
//! collaborator.
//!
//! Slot index *is* the file offset divider (`offset = slot * PGSIZE`),
//! the same bijection the source keeps between `fileCtrlr[i]` and its
//! backing-store position — so unlike `ResidentSet` there's no separate
//! offset field to track.

use crate::collab::{Pgdir, SwapBackend};
use crate::config::{MAX_FILE, PGSIZE};
use crate::error::invariant_violation;

#[derive(Clone, Copy, Debug)]
pub struct SwapEntry {
    pub pgdir: Pgdir,
    pub va: u32,
}

pub struct SwapSet {
    slots: [Option<SwapEntry>; MAX_FILE],
}

impl SwapSet {
    pub const fn new() -> Self {
        SwapSet {
            slots: [None; MAX_FILE],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, pgdir: Pgdir, va: u32) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Some(e) if e.pgdir == pgdir && e.va == va))
    }

    fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    pub fn remove(&mut self, pgdir: Pgdir, va: u32) {
        if let Some(slot) = self.find(pgdir, va) {
            self.slots[slot] = None;
        }
    }

    /// Locates (or allocates) the slot for `va`, writes `page` to it
    /// through the swap backend, and returns the slot index.
    ///
    /// Panics with `invariant_violation` if all slots are occupied and
    /// `va` doesn't already own one — callers are required to have
    /// checked capacity before evicting (§4.7 step 3).
    pub fn write_out<S: SwapBackend>(
        &mut self,
        backend: &mut S,
        pid: u32,
        pgdir: Pgdir,
        va: u32,
        page: &[u8; PGSIZE],
    ) -> usize {
        let slot = self.find(pgdir, va).or_else(|| self.free_slot());
        let slot = match slot {
            Some(s) => s,
            None => invariant_violation("swap write when swap full"),
        };
        self.slots[slot] = Some(SwapEntry { pgdir, va });
        backend.swap_write(pid, slot * PGSIZE, page);
        slot
    }

    /// Finds the slot matching `(pgdir, va)`, reads its `PGSIZE` bytes
    /// into `dst`, and frees the slot.
    pub fn read_in<S: SwapBackend>(
        &mut self,
        backend: &mut S,
        pid: u32,
        pgdir: Pgdir,
        va: u32,
        dst: &mut [u8; PGSIZE],
    ) {
        let slot = match self.find(pgdir, va) {
            Some(s) => s,
            None => invariant_violation("read_in on a VA with no swap slot"),
        };
        backend.swap_read(pid, slot * PGSIZE, dst);
        self.slots[slot] = None;
    }
}

impl Default for SwapSet {
    fn default() -> Self {
        Self::new()
    }
}
