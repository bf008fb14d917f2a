//! Mock collaborator implementations used across unit and property
//! tests, in the shape of `sunsided-os`'s `vmem` crate test module
//! (`BumpAlloc` / `TestPhys`): a bump-pointer frame allocator and an
//! in-process page table, both far simpler than anything a real kernel
//! would ship, but enough to drive every transition this subsystem
//! defines.

#![cfg(test)]

use crate::collab::{FrameAllocator, PageDirectory, Pgdir, ProcessInfo, SwapBackend};
use crate::config::PGSIZE;
use crate::pte::Pte;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

pub struct MockFrameAllocator {
    next: u32,
    limit: Option<u32>,
    contents: BTreeMap<u32, [u8; PGSIZE]>,
}

impl MockFrameAllocator {
    pub fn new() -> Self {
        MockFrameAllocator {
            next: 0x1000,
            limit: None,
            contents: BTreeMap::new(),
        }
    }

    pub fn with_limit(limit: u32) -> Self {
        let mut a = Self::new();
        a.limit = Some(limit);
        a
    }

}

impl FrameAllocator for MockFrameAllocator {
    fn alloc_frame(&mut self) -> Option<u32> {
        if let Some(limit) = self.limit {
            if self.next >= limit {
                return None;
            }
        }
        let f = self.next;
        self.next += PGSIZE as u32;
        self.contents.insert(f, [0u8; PGSIZE]);
        Some(f)
    }

    fn free_frame(&mut self, frame: u32) {
        self.contents.remove(&frame);
    }

    fn zero_frame(&mut self, frame: u32) {
        if let Some(page) = self.contents.get_mut(&frame) {
            *page = [0u8; PGSIZE];
        }
    }

    fn read_frame(&self, frame: u32, buf: &mut [u8; PGSIZE]) {
        *buf = *self.contents.get(&frame).expect("read_frame of unallocated frame");
    }

    fn write_frame(&mut self, frame: u32, buf: &[u8; PGSIZE]) {
        self.contents.insert(frame, *buf);
    }
}

pub struct MockPageDirectory {
    table: BTreeMap<u32, Pte>,
}

impl MockPageDirectory {
    pub fn new() -> Self {
        MockPageDirectory {
            table: BTreeMap::new(),
        }
    }
}

impl PageDirectory for MockPageDirectory {
    fn walk(&mut self, va: u32, create: bool) -> Option<&mut Pte> {
        if create {
            Some(self.table.entry(va).or_insert_with(Pte::empty))
        } else {
            self.table.get_mut(&va)
        }
    }

    fn pte(&self, va: u32) -> Option<Pte> {
        self.table.get(&va).copied()
    }
}

pub struct MockSwapBackend {
    store: BTreeMap<(u32, usize), [u8; PGSIZE]>,
}

impl MockSwapBackend {
    pub fn new() -> Self {
        MockSwapBackend {
            store: BTreeMap::new(),
        }
    }
}

impl SwapBackend for MockSwapBackend {
    fn swap_create(&mut self, _pid: u32) {}

    fn swap_destroy(&mut self, pid: u32) {
        self.store.retain(|(p, _), _| *p != pid);
    }

    fn swap_write(&mut self, pid: u32, offset: usize, buf: &[u8]) {
        let mut page = [0u8; PGSIZE];
        page.copy_from_slice(buf);
        self.store.insert((pid, offset), page);
    }

    fn swap_read(&mut self, pid: u32, offset: usize, buf: &mut [u8]) {
        let page = self
            .store
            .get(&(pid, offset))
            .expect("swap_read of an offset never written");
        buf.copy_from_slice(page);
    }
}

pub struct MockProcessInfo {
    pub current: u32,
    pub bootstrap: Vec<u32>,
}

impl MockProcessInfo {
    pub fn new(current: u32) -> Self {
        MockProcessInfo {
            current,
            bootstrap: Vec::new(),
        }
    }

    pub fn with_bootstrap(mut self, pids: &[u32]) -> Self {
        self.bootstrap.extend_from_slice(pids);
        self
    }
}

impl ProcessInfo for MockProcessInfo {
    fn current_pid(&self) -> u32 {
        self.current
    }

    fn is_bootstrap(&self, pid: u32) -> bool {
        self.bootstrap.contains(&pid)
    }
}

pub const TEST_PGDIR: Pgdir = 1;
