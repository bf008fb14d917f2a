//! Compile-time constants (§6).

/// Page size in bytes.
pub const PGSIZE: usize = 4096;

/// Resident-set capacity per process.
pub const MAX_PSYC: usize = 16;

/// Total pages (resident + swapped) a non-bootstrap process may hold.
pub const MAX_TOTAL: usize = 32;

/// Swap-file capacity per process.
pub const MAX_FILE: usize = MAX_TOTAL - MAX_PSYC;

const _: () = assert!(MAX_FILE == 16);
