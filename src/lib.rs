//! Demand-paging and page-replacement subsystem for a teaching kernel's
//! virtual-memory layer.
//!
//! Owns the interaction between a per-process resident-set manager, a
//! per-process swap-file manager, four pluggable replacement policies,
//! and the page-fault handler's swap-in path. Everything outside that —
//! the frame allocator, the page-table walker, the swap-file backend,
//! the process table, the scheduler tick — is consumed through the
//! traits in [`collab`] rather than implemented here.
//!
//! `no_std` outside of tests, following the base kernel's
//! `#![cfg_attr(not(test), no_std)]` pattern: `alloc` is still
//! required for the `BTreeMap`/`Vec` the swap and test-mock layers use.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod logger;
pub mod sink;

pub mod aging;
pub mod collab;
pub mod config;
pub mod error;
pub mod fault;
pub mod pte;
pub mod policy;
pub mod resident;
pub mod swapfile;
pub mod vm;


#[cfg(test)]
pub(crate) mod testutil;
#[cfg(test)]
mod scenarios;

pub use collab::{FrameAllocator, PageDirectory, Pgdir, ProcessInfo, SwapBackend};
pub use config::{MAX_FILE, MAX_PSYC, MAX_TOTAL, PGSIZE};
pub use error::{VmError, VmResult};
pub use fault::Scratch;
pub use pte::{Pte, PteFlags};
pub use vm::Vm;
