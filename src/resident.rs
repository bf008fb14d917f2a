//! Resident-set manager (§4.2): the fixed-capacity table of pages a
//! single process currently has backed by a physical frame.
//!
//! Modeled as a flat `[Option<ResidentEntry>; MAX_PSYC]` rather than the
//! `BTreeMap`-keyed tables the base kernel uses for its swap tracker
//! (`memory::swap::SwapState::page_tracker`) — this table's capacity is
//! small and fixed, and the source's `ramCtrlr` array is exactly this
//! shape, so a plain array with linear scans is the faithful rendition.

use crate::collab::Pgdir;
use crate::config::MAX_PSYC;

/// Per-slot metadata for a resident page (§3 "Resident entry").
#[derive(Clone, Copy, Debug)]
pub struct ResidentEntry {
    pub pgdir: Pgdir,
    pub va: u32,
    /// 32-bit shift register; MSB is most-recent tick.
    pub access_history: u32,
    /// Monotonically increasing stamp assigned at insertion (SCFIFO).
    pub create_order: u64,
    /// Ordinal position in the Advancing Queue (AQ).
    pub aq_rank: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full;

pub struct ResidentSet {
    slots: [Option<ResidentEntry>; MAX_PSYC],
    create_order_counter: u64,
    aq_counter: u64,
}

impl ResidentSet {
    pub const fn new() -> Self {
        ResidentSet {
            slots: [None; MAX_PSYC],
            create_order_counter: 0,
            aq_counter: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= MAX_PSYC
    }

    pub fn capacity(&self) -> usize {
        MAX_PSYC
    }

    fn next_create_order(&mut self) -> u64 {
        let v = self.create_order_counter;
        self.create_order_counter += 1;
        v
    }

    /// Bumps an existing entry's `create_order` to a fresh maximum.
    /// Used by SCFIFO's second-chance forgiveness.
    pub fn restamp_create_order(&mut self, slot: usize) {
        let v = self.next_create_order();
        if let Some(e) = self.slots[slot].as_mut() {
            e.create_order = v;
        }
    }

    fn next_aq_rank(&mut self) -> u64 {
        let v = self.aq_counter;
        self.aq_counter += 1;
        v
    }

    /// Inserts a new resident entry in the first free slot.
    /// `init_history` is the policy-specific initial `access_history`
    /// (`0` for NFUA, `0xFFFFFFFF` for LAPA — §4.2).
    pub fn insert(&mut self, pgdir: Pgdir, va: u32, init_history: u32) -> Result<usize, Full> {
        let idx = self.slots.iter().position(|s| s.is_none()).ok_or(Full)?;
        let create_order = self.next_create_order();
        let aq_rank = self.next_aq_rank();
        self.slots[idx] = Some(ResidentEntry {
            pgdir,
            va,
            access_history: init_history,
            create_order,
            aq_rank,
        });
        Ok(idx)
    }

    /// Marks the slot for `(pgdir, va)` free. Idempotent on absent VA.
    pub fn remove(&mut self, pgdir: Pgdir, va: u32) {
        if let Some(slot) = self
            .slots
            .iter()
            .position(|s| matches!(s, Some(e) if e.pgdir == pgdir && e.va == va))
        {
            self.slots[slot] = None;
        }
    }

    pub fn remove_at(&mut self, slot: usize) {
        self.slots[slot] = None;
    }

    pub fn find(&self, pgdir: Pgdir, va: u32) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Some(e) if e.pgdir == pgdir && e.va == va))
    }

    pub fn get(&self, slot: usize) -> Option<&ResidentEntry> {
        self.slots[slot].as_ref()
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut ResidentEntry> {
        self.slots[slot].as_mut()
    }

    /// Iterator over used entries for the aging clock / policy scans.
    pub fn snapshot_for_clock(&self) -> impl Iterator<Item = (usize, &ResidentEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    pub fn iter_used_mut(&mut self) -> impl Iterator<Item = (usize, &mut ResidentEntry)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|e| (i, e)))
    }
}

impl Default for ResidentSet {
    fn default() -> Self {
        Self::new()
    }
}
