//! VM growth & teardown (§4.5, §4.6) and swap-out (§4.7): the public
//! surface `fork`/`exec`/`sbrk` call in the base system.
//!
//! One `Vm` instance owns one process's resident set, swap set, and
//! counters — mirroring `process::Process::memory` in the base kernel,
//! except collaborators (frame allocator, page-table walker, swap
//! backend, process info) are passed in per call instead of reached
//! through globals, so the whole thing is exercised with the mocks in
//! `testutil` instead of a booted kernel.

use crate::collab::{FrameAllocator, PageDirectory, Pgdir, ProcessInfo, SwapBackend};
use crate::config::{MAX_PSYC, MAX_TOTAL, PGSIZE};
use crate::error::{VmError, VmResult};
#[cfg(not(feature = "policy-none"))]
use crate::policy::{ActivePolicy, Policy};
use crate::resident::ResidentSet;
use crate::swapfile::SwapSet;

fn round_up(sz: u32) -> u32 {
    ((sz as usize + PGSIZE - 1) & !(PGSIZE - 1)) as u32
}

fn round_down(sz: u32) -> u32 {
    (sz as usize & !(PGSIZE - 1)) as u32
}

pub struct Vm {
    pub(crate) pid: u32,
    pub(crate) pgdir: Pgdir,
    pub(crate) size: u32,
    pub(crate) resident: ResidentSet,
    pub(crate) swap: SwapSet,
    pub(crate) paged_out_count: u64,
    pub(crate) page_fault_count: u64,
}

impl Vm {
    pub fn new<SB: SwapBackend>(pid: u32, pgdir: Pgdir, swap_backend: &mut SB) -> Self {
        swap_backend.swap_create(pid);
        Vm {
            pid,
            pgdir,
            size: 0,
            resident: ResidentSet::new(),
            swap: SwapSet::new(),
            paged_out_count: 0,
            page_fault_count: 0,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn paged_out_count(&self) -> u64 {
        self.paged_out_count
    }

    pub fn page_fault_count(&self) -> u64 {
        self.page_fault_count
    }

    pub fn resident(&self) -> &ResidentSet {
        &self.resident
    }

    /// Swap-out (§4.7): selects a victim via the active policy, writes
    /// it to the process's swap file, frees its frame, and frees the
    /// resident slot. Returns the now-free slot index for the caller to
    /// reinstall into.
    #[cfg(not(feature = "policy-none"))]
    pub(crate) fn swap_out<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
    ) -> usize {
        let victim_idx = ActivePolicy::select_victim(&mut self.resident, pgdir);
        let victim = *self.resident.get(victim_idx).unwrap();

        let frame = pgdir
            .walk(victim.va, false)
            .unwrap_or_else(|| crate::error::invariant_violation("swap-out victim has no PTE"))
            .frame();

        let mut page = [0u8; PGSIZE];
        frames.read_frame(frame, &mut page);

        self.swap
            .write_out(swap_backend, self.pid, victim.pgdir, victim.va, &page);

        frames.free_frame(frame);
        self.resident.remove_at(victim_idx);
        self.paged_out_count += 1;

        pgdir
            .walk(victim.va, false)
            .unwrap_or_else(|| crate::error::invariant_violation("swap-out victim has no PTE"))
            .evict();

        victim_idx
    }

    /// Never actually invoked: `grow` only calls `swap_out` once the
    /// resident set is full, and under `policy-none` nothing is ever
    /// tracked as resident, so it never is (§4.10).
    #[cfg(feature = "policy-none")]
    pub(crate) fn swap_out<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        _frames: &mut FA,
        _pgdir: &mut PD,
        _swap_backend: &mut SB,
    ) -> usize {
        crate::error::invariant_violation("swap_out called while policy-none is active")
    }

    /// Tracks a freshly-installed page in the resident set, evicting a
    /// victim first if it's already full (§4.5 step 3). A no-op under
    /// `policy-none`, which disables resident-set/swap logic entirely.
    #[cfg(not(feature = "policy-none"))]
    fn track_new_page<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
        va: u32,
    ) {
        if self.resident.is_full() {
            self.swap_out(frames, pgdir, swap_backend);
        }
        self.resident
            .insert(self.pgdir, va, ActivePolicy::INIT_HISTORY)
            .unwrap_or_else(|_| crate::error::invariant_violation("resident set full after swap-out"));
    }

    #[cfg(feature = "policy-none")]
    fn track_new_page<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        _frames: &mut FA,
        _pgdir: &mut PD,
        _swap_backend: &mut SB,
        _va: u32,
    ) {
    }

    /// Tracks a page cloned into a child's resident set (§4.9). A no-op
    /// under `policy-none`.
    #[cfg(not(feature = "policy-none"))]
    fn track_cloned_page(&mut self, va: u32) {
        self.resident
            .insert(self.pgdir, va, ActivePolicy::INIT_HISTORY)
            .unwrap_or_else(|_| crate::error::invariant_violation("clone: child resident set full"));
    }

    #[cfg(feature = "policy-none")]
    fn track_cloned_page(&mut self, _va: u32) {}

    /// `grow(old, new)` (§4.5).
    pub fn grow<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend, PI: ProcessInfo>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
        procs: &PI,
        new_sz: u32,
    ) -> VmResult<u32> {
        let old_sz = self.size;
        if new_sz <= old_sz {
            return Ok(old_sz);
        }

        let policy_active = !cfg!(feature = "policy-none");
        if policy_active && !procs.is_bootstrap(self.pid) {
            let total_pages = (round_up(new_sz) as usize) / PGSIZE;
            if total_pages > MAX_TOTAL {
                return Err(VmError::Oversize);
            }
        }

        let mut va = round_up(old_sz);
        while va < new_sz {
            let frame = match frames.alloc_frame() {
                Some(f) => f,
                None => {
                    self.shrink(frames, pgdir, swap_backend, procs, va, old_sz);
                    return Err(VmError::Oom);
                }
            };
            frames.zero_frame(frame);
            pgdir.walk(va, true).unwrap().install(frame);

            self.track_new_page(frames, pgdir, swap_backend, va);

            va += PGSIZE as u32;
        }

        self.size = new_sz;
        Ok(new_sz)
    }

    /// `shrink(old, new)` (§4.6). `old_sz` is passed explicitly (rather
    /// than always `self.size`) so `grow`'s rollback path can shrink
    /// from a partially-grown size back to the pre-call size.
    pub fn shrink<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend, PI: ProcessInfo>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        _swap_backend: &mut SB,
        _procs: &PI,
        old_sz: u32,
        new_sz: u32,
    ) -> u32 {
        if new_sz >= old_sz {
            return old_sz;
        }

        let mut va = round_up(new_sz);
        while va < old_sz {
            if let Some(pte) = pgdir.walk(va, false) {
                if pte.is_present() {
                    frames.free_frame(pte.frame());
                    self.resident.remove(self.pgdir, va);
                    *pte = crate::pte::Pte::empty();
                } else if pte.is_paged_out() {
                    self.swap.remove(self.pgdir, va);
                    *pte = crate::pte::Pte::empty();
                }
            }
            va += PGSIZE as u32;
        }

        self.size = new_sz;
        new_sz
    }

    /// `free_all(pgdir)` (§4.6): shrinks to zero and releases the swap
    /// file. Freeing the second-level tables and top-level directory
    /// themselves is the page-table walker's responsibility (out of
    /// scope, §1).
    pub fn free_all<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend, PI: ProcessInfo>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
        procs: &PI,
    ) {
        let old_sz = self.size;
        self.shrink(frames, pgdir, swap_backend, procs, old_sz, 0);
        swap_backend.swap_destroy(self.pid);
    }

    /// `clone(parent_pgdir, sz)` (§4.9). Builds the child's resident
    /// set and PTEs; the child's `Vm` itself (counters, swap set) is
    /// constructed fresh by the caller via `Vm::new`, since a forked
    /// process starts with empty counters even though it inherits page
    /// contents.
    pub fn clone_into<FA: FrameAllocator, PPD: PageDirectory, CPD: PageDirectory, SB: SwapBackend>(
        &self,
        frames: &mut FA,
        parent_pgdir: &mut PPD,
        child: &mut Vm,
        child_pgdir: &mut CPD,
        _swap_backend: &mut SB,
    ) -> VmResult<()> {
        let mut va = 0u32;
        while va < self.size {
            let parent_pte = parent_pgdir
                .walk(va, false)
                .unwrap_or_else(|| crate::error::invariant_violation("clone: pte should exist"));

            if parent_pte.is_paged_out() {
                // Child PTE mirrors paged-out state; no frame. Copying
                // the parent's swap-file bytes into the child's swap
                // file is the process-fork path's job (§4.9, §9).
                child_pgdir.walk(va, true).unwrap().mark_paged_out();
            } else if parent_pte.is_present() {
                let new_frame = match frames.alloc_frame() {
                    Some(f) => f,
                    None => {
                        return Err(VmError::Oom);
                    }
                };
                let mut buf = [0u8; PGSIZE];
                frames.read_frame(parent_pte.frame(), &mut buf);
                frames.write_frame(new_frame, &buf);
                child_pgdir.walk(va, true).unwrap().install(new_frame);
                child.track_cloned_page(va);
            } else {
                crate::error::invariant_violation("clone: parent page not present");
            }

            va += PGSIZE as u32;
        }
        child.size = self.size;
        Ok(())
    }
}
