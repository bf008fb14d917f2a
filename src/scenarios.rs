//! Concrete scenarios from §8, exercised end to end against the mock
//! collaborators. Scenarios 1 and 4 live next to the code they
//! exercise most directly (`vm::tests`, `fault::tests`); the rest are
//! collected here since they cut across `grow`/`clone`/policy
//! selection.

use crate::config::{MAX_PSYC, MAX_TOTAL, PGSIZE};
use crate::error::VmError;
use crate::testutil::{MockFrameAllocator, MockPageDirectory, MockProcessInfo, MockSwapBackend};
use crate::vm::Vm;

fn harness(pid: u32) -> (Vm, MockFrameAllocator, MockPageDirectory, MockSwapBackend, MockProcessInfo) {
    let mut swap = MockSwapBackend::new();
    let vm = Vm::new(pid, pid as u64, &mut swap);
    (
        vm,
        MockFrameAllocator::new(),
        MockPageDirectory::new(),
        swap,
        MockProcessInfo::new(pid),
    )
}

/// Scenario 2: cap boundary. With any policy != NONE, 33 pages fails
/// with oversize for a non-bootstrap process; 32 succeeds.
#[test]
fn cap_boundary() {
    let (mut vm, mut frames, mut pgdir, mut swap, procs) = harness(3);
    let err = vm
        .grow(&mut frames, &mut pgdir, &mut swap, &procs, (MAX_TOTAL as u32 + 1) * PGSIZE as u32)
        .unwrap_err();
    assert_eq!(err, VmError::Oversize);

    let (mut vm2, mut frames2, mut pgdir2, mut swap2, procs2) = harness(3);
    assert!(vm2
        .grow(&mut frames2, &mut pgdir2, &mut swap2, &procs2, MAX_TOTAL as u32 * PGSIZE as u32)
        .is_ok());
}

/// Scenario 3: fork inheritance under pressure. Parent allocates 17
/// pages and writes `arr[i] = i`. Child inherits identical contents;
/// child's write to its copy must not be visible through the parent.
#[test]
fn fork_inheritance_under_pressure() {
    let (mut parent, mut frames, mut parent_pgdir, mut swap, procs) = harness(3);
    let n = 17u32;
    parent
        .grow(&mut frames, &mut parent_pgdir, &mut swap, &procs, n * PGSIZE as u32)
        .unwrap();

    for i in 0..n {
        let va = i * PGSIZE as u32;
        // pages may have been evicted under MAX_PSYC pressure; fault
        // them back in before writing, the way a real write fault would.
        if parent_pgdir.pte(va).unwrap().is_paged_out() {
            let mut scratch = crate::fault::Scratch::new();
            parent.handle_page_fault(&mut frames, &mut parent_pgdir, &mut swap, &mut scratch, va);
        }
        let frame = parent_pgdir.pte(va).unwrap().frame();
        let mut page = [0u8; PGSIZE];
        page[0] = i as u8;
        frames.write_frame(frame, &page);
    }

    let mut child_swap = MockSwapBackend::new();
    let mut child = Vm::new(4, 99, &mut child_swap);
    let mut child_pgdir = MockPageDirectory::new();
    parent
        .clone_into(&mut frames, &mut parent_pgdir, &mut child, &mut child_pgdir, &mut child_swap)
        .unwrap();

    for i in 0..n {
        let va = i * PGSIZE as u32;
        assert!(child_pgdir.pte(va).unwrap().is_present());
        let frame = child_pgdir.pte(va).unwrap().frame();
        let mut page = [0u8; PGSIZE];
        frames.read_frame(frame, &mut page);
        assert_eq!(page[0], i as u8, "child page {i} should match parent at clone time");
    }

    // child writes arr[i] = i * 10 to its own copy
    let child_frame = child_pgdir.pte(0).unwrap().frame();
    frames.write_frame(child_frame, &{
        let mut p = [0u8; PGSIZE];
        p[0] = 0;
        p
    });

    // parent's page 0 is untouched
    let parent_frame = parent_pgdir.pte(0).unwrap().frame();
    let mut parent_page = [0u8; PGSIZE];
    frames.read_frame(parent_frame, &mut parent_page);
    assert_eq!(parent_page[0], 0);
}

/// Scenario 5: SCFIFO second chance. With SCFIFO selected, 16 pages
/// resident, touching page 0 before an eviction must spare it.
#[cfg(feature = "scfifo")]
#[test]
fn scfifo_second_chance_spares_touched_page() {
    let (mut vm, mut frames, mut pgdir, mut swap, procs) = harness(3);
    vm.grow(&mut frames, &mut pgdir, &mut swap, &procs, MAX_PSYC as u32 * PGSIZE as u32)
        .unwrap();

    pgdir.walk(0, false).unwrap().mark_accessed_for_test();

    let victim_idx = vm.swap_out(&mut frames, &mut pgdir, &mut swap);
    let _ = victim_idx;
    assert!(pgdir.pte(0).unwrap().is_present(), "touched page 0 must not be evicted");
}

/// Scenario 6: AQ promotion. With AQ selected, touching pages {5, 7}
/// for several ticks must keep them out of the next eviction and
/// advance their rank.
#[cfg(feature = "aq")]
#[test]
fn aq_promotion_protects_touched_pages() {
    use crate::aging::tick_aging;

    let (mut vm, mut frames, mut pgdir, mut swap, procs) = harness(3);
    vm.grow(&mut frames, &mut pgdir, &mut swap, &procs, MAX_PSYC as u32 * PGSIZE as u32)
        .unwrap();

    let va5 = 5 * PGSIZE as u32;
    let va7 = 7 * PGSIZE as u32;

    for _ in 0..4 {
        pgdir.walk(va5, false).unwrap().mark_accessed_for_test();
        pgdir.walk(va7, false).unwrap().mark_accessed_for_test();
        tick_aging(&mut vm.resident, &mut pgdir);
    }

    vm.swap_out(&mut frames, &mut pgdir, &mut swap);
    assert!(pgdir.pte(va5).unwrap().is_present());
    assert!(pgdir.pte(va7).unwrap().is_present());
}
