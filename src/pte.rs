//! Page-table entry flags and the install/evict/reinstate transitions
//! (§4.1).
//!
//! Flags are a `bitflags` set over the low bits of the entry, the way
//! `sunsided-os`'s `vmem` crate models its `Flags` type, rather than the
//! base kernel's plain `u64` consts — this subsystem's entries are
//! small and the three transitions below read much better as bit
//! algebra than as magic-number ORs.

use crate::error::invariant_violation;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct PteFlags: u32 {
        /// Frame backs this VA.
        const PRESENT  = 1 << 0;
        /// Writable.
        const WRITABLE = 1 << 1;
        /// User-accessible.
        const USER     = 1 << 2;
        /// Hardware-set on reference, cleared by software.
        const ACCESSED = 1 << 3;
        /// Software-defined: page content lives in the swap file.
        const PAGED_OUT = 1 << 4;
    }
}

const ADDR_MASK: u32 = !0xFFF;

/// A page-table entry: a frame address plus flags, packed into one
/// 32-bit word the way the source's `pte_t` is.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(transparent)]
pub struct Pte(u32);

impl Pte {
    pub const fn empty() -> Self {
        Pte(0)
    }

    pub fn flags(&self) -> PteFlags {
        PteFlags::from_bits_truncate(self.0 & !ADDR_MASK)
    }

    pub fn frame(&self) -> u32 {
        self.0 & ADDR_MASK
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(PteFlags::PRESENT)
    }

    pub fn is_paged_out(&self) -> bool {
        self.flags().contains(PteFlags::PAGED_OUT)
    }

    pub fn is_accessed(&self) -> bool {
        self.flags().contains(PteFlags::ACCESSED)
    }

    /// Clears `ACCESSED`. Used by the aging clock and SCFIFO's
    /// second-chance scan, both of which consume the bit once read.
    pub fn clear_accessed(&mut self) {
        self.0 &= !PteFlags::ACCESSED.bits();
    }

    /// absent -> resident. Preconditions per §4.1: neither `P` nor `PG`
    /// set.
    pub fn install(&mut self, frame: u32) {
        if self.is_present() || self.is_paged_out() {
            invariant_violation("install over a non-absent PTE");
        }
        self.0 = (frame & ADDR_MASK)
            | (PteFlags::PRESENT | PteFlags::WRITABLE | PteFlags::USER).bits();
    }

    /// resident -> swapped. Preconditions: `P` set.
    pub fn evict(&mut self) {
        if !self.is_present() {
            invariant_violation("evict on a PTE without PRESENT");
        }
        self.0 = PteFlags::PAGED_OUT.bits();
    }

    /// swapped -> resident. Preconditions: `PG` set, not `P`.
    pub fn reinstate(&mut self, frame: u32) {
        if self.is_present() || !self.is_paged_out() {
            invariant_violation("reinstate on a PTE that wasn't paged out");
        }
        self.0 = (frame & ADDR_MASK)
            | (PteFlags::PRESENT | PteFlags::WRITABLE | PteFlags::USER).bits();
    }

    /// Simulates a hardware reference to this page. Test-only: real
    /// hardware sets `A` on memory access, which this crate never does
    /// itself.
    #[cfg(test)]
    pub fn mark_accessed_for_test(&mut self) {
        self.0 |= PteFlags::ACCESSED.bits();
    }

    /// Marks a fresh (absent) PTE as paged-out with no backing frame.
    /// Used only by `clone_into` (§4.9): the child's PTE for a VA the
    /// parent has swapped out never passes through `install`/`evict` —
    /// it's born in the swapped state directly.
    pub(crate) fn mark_paged_out(&mut self) {
        if self.is_present() || self.is_paged_out() {
            invariant_violation("mark_paged_out on a non-absent PTE");
        }
        self.0 = PteFlags::PAGED_OUT.bits();
    }
}
