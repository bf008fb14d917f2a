//! Page-fault handler (§4.8): swap-in, with victim eviction when the
//! resident set is already full.
//!
//! The "fixed kernel scratch buffer" the source keeps as a single
//! file-scope `buff[PGSIZE]` becomes `Scratch` here — an explicit value
//! the caller owns one of per CPU (or per address space) and passes in,
//! per the design note in §9 asking this not be a hidden process-global
//! mutable. Its lifetime already enforces the critical-section
//! requirement: it can't be touched concurrently by two fault handlers
//! without the caller sharing one `Scratch` across threads, which the
//! type doesn't do for you.

use crate::collab::{FrameAllocator, PageDirectory, SwapBackend};
use crate::config::PGSIZE;
#[cfg(not(feature = "policy-none"))]
use crate::policy::{ActivePolicy, Policy};
use crate::vm::Vm;

pub struct Scratch {
    buf: [u8; PGSIZE],
}

impl Scratch {
    pub const fn new() -> Self {
        Scratch { buf: [0u8; PGSIZE] }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

fn round_down(addr: u32) -> u32 {
    (addr as usize & !(PGSIZE - 1)) as u32
}

impl Vm {
    /// Handles a fault at `fault_addr` whose PTE has `PG` set. Faults
    /// on PTEs with neither `P` nor `PG` are not this subsystem's
    /// concern (§4.8) and must be filtered out by the caller before
    /// reaching here.
    #[cfg(not(feature = "policy-none"))]
    pub fn handle_page_fault<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
        scratch: &mut Scratch,
        fault_addr: u32,
    ) {
        self.page_fault_count += 1;
        let fault_va = round_down(fault_addr);

        let frame = frames
            .alloc_frame()
            .unwrap_or_else(|| crate::error::invariant_violation("page fault handler ran out of frames"));
        frames.zero_frame(frame);

        if !self.resident.is_full() {
            pgdir.walk(fault_va, true).unwrap().reinstate(frame);
            self.swap
                .read_in(swap_backend, self.pid, self.pgdir, fault_va, &mut scratch.buf);
            frames.write_frame(frame, &scratch.buf);
            self.resident
                .insert(self.pgdir, fault_va, ActivePolicy::INIT_HISTORY)
                .unwrap_or_else(|_| crate::error::invariant_violation("resident set full after is_full() check"));
            return;
        }

        let victim_idx = ActivePolicy::select_victim(&mut self.resident, pgdir);
        let victim = *self.resident.get(victim_idx).unwrap();

        pgdir.walk(fault_va, true).unwrap().reinstate(frame);

        self.swap
            .read_in(swap_backend, self.pid, self.pgdir, fault_va, &mut scratch.buf);
        frames.write_frame(frame, &scratch.buf);

        let victim_frame = pgdir
            .walk(victim.va, false)
            .unwrap_or_else(|| crate::error::invariant_violation("fault: victim has no PTE"))
            .frame();
        let mut victim_page = [0u8; PGSIZE];
        frames.read_frame(victim_frame, &mut victim_page);
        self.swap
            .write_out(swap_backend, self.pid, victim.pgdir, victim.va, &victim_page);

        frames.free_frame(victim_frame);
        pgdir
            .walk(victim.va, false)
            .unwrap_or_else(|| crate::error::invariant_violation("fault: victim has no PTE"))
            .evict();
        self.paged_out_count += 1;

        self.resident.remove_at(victim_idx);
        self.resident
            .insert(self.pgdir, fault_va, ActivePolicy::INIT_HISTORY)
            .unwrap_or_else(|_| crate::error::invariant_violation("resident set full right after freeing a slot"));
    }

    /// Under `policy-none` the resident set is never populated (§4.10),
    /// so it can never be full; every fault takes the free-slot path
    /// with no victim selection and no resident-set tracking.
    #[cfg(feature = "policy-none")]
    pub fn handle_page_fault<FA: FrameAllocator, PD: PageDirectory, SB: SwapBackend>(
        &mut self,
        frames: &mut FA,
        pgdir: &mut PD,
        swap_backend: &mut SB,
        scratch: &mut Scratch,
        fault_addr: u32,
    ) {
        self.page_fault_count += 1;
        let fault_va = round_down(fault_addr);

        let frame = frames
            .alloc_frame()
            .unwrap_or_else(|| crate::error::invariant_violation("page fault handler ran out of frames"));
        frames.zero_frame(frame);

        pgdir.walk(fault_va, true).unwrap().reinstate(frame);
        self.swap
            .read_in(swap_backend, self.pid, self.pgdir, fault_va, &mut scratch.buf);
        frames.write_frame(frame, &scratch.buf);
    }
}
