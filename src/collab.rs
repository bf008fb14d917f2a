//! Traits for the external collaborators this subsystem is specified
//! against but does not implement: the frame allocator, the page-table
//! walker, the swap-file backend, and the process table (§6).
//!
//! The base kernel wires these up directly as free functions
//! (`frame::alloc_frame`, `paging::AddressSpace::map_page`, ...) because
//! it only ever has one concrete implementation. `sunsided-os`'s `vmem`
//! crate takes the opposite approach — `FrameAlloc`/`PhysMapper` traits
//! with a `BumpAlloc`/`TestPhys` mock pair for tests — and that's the
//! shape this crate needs too, since the spec explicitly calls these
//! out as interfaces rather than things to re-implement.

use crate::config::PGSIZE;
use crate::pte::Pte;

/// Opaque page-directory identifier. The walker (`PageDirectory` impl)
/// knows how to turn this into an actual table; this subsystem only
/// uses it as an entry key (§3 "owning page directory").
pub type Pgdir = u64;

/// Physical frame allocator. `alloc_frame` returns a page-aligned
/// physical address or `None` on OOM.
///
/// `read_frame`/`write_frame` stand in for what the base kernel does
/// with its HHDM offset (`memory::phys_to_virt` + a raw copy) to reach
/// a frame's bytes — this subsystem doesn't know the embedding
/// kernel's physical-memory mapping scheme, so it asks the allocator to
/// move bytes on its behalf instead of assuming one.
pub trait FrameAllocator {
    fn alloc_frame(&mut self) -> Option<u32>;
    fn free_frame(&mut self, frame: u32);
    /// Zero a frame's contents. Kept separate from `alloc_frame` so a
    /// mock can skip the memset and just track allocations.
    fn zero_frame(&mut self, frame: u32);
    fn read_frame(&self, frame: u32, buf: &mut [u8; PGSIZE]);
    fn write_frame(&mut self, frame: u32, buf: &[u8; PGSIZE]);
}

/// A process's page directory, abstracted to the one operation this
/// subsystem needs from the walker: resolve (and optionally create) the
/// PTE for a virtual address.
pub trait PageDirectory {
    /// `walk(va, create)` — returns `None` only when `create` is false
    /// and no page-table page exists yet for `va`.
    fn walk(&mut self, va: u32, create: bool) -> Option<&mut Pte>;

    fn pte(&self, va: u32) -> Option<Pte>;
}

/// Per-process swap-file backend (§4.3, §6). Slot indices are assigned
/// by the swap-file manager; this trait only moves bytes at a given
/// byte offset.
pub trait SwapBackend {
    fn swap_create(&mut self, pid: u32);
    fn swap_destroy(&mut self, pid: u32);
    fn swap_write(&mut self, pid: u32, offset: usize, buf: &[u8]);
    fn swap_read(&mut self, pid: u32, offset: usize, buf: &mut [u8]);
}

/// Process-table facts this subsystem consults but does not own.
pub trait ProcessInfo {
    fn current_pid(&self) -> u32;
    /// True for the privileged bootstrap processes exempt from
    /// `MAX_TOTAL` (§3 invariant 4, §9 bootstrap exemption note).
    fn is_bootstrap(&self, pid: u32) -> bool;
}
