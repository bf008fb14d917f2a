//! Access-bit aging clock (§2 component 1, GLOSSARY "Aging clock").
//!
//! Shared by NFUA and LAPA: once per scheduler tick, shift every
//! resident entry's `access_history` right by one and sample the
//! current hardware `A` bit into the MSB, clearing it afterward so the
//! next tick sees only fresh references.

use crate::collab::PageDirectory;
use crate::resident::ResidentSet;

pub fn shift_access_history<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) {
    for (_, entry) in set.iter_used_mut() {
        let accessed = pgdir
            .walk(entry.va, false)
            .map(|pte| pte.is_accessed())
            .unwrap_or(false);

        entry.access_history >>= 1;
        if accessed {
            entry.access_history |= 0x8000_0000;
            if let Some(pte) = pgdir.walk(entry.va, false) {
                pte.clear_accessed();
            }
        }
    }
}

/// Entry point the ticker collaborator calls per running process
/// (§6 "Ticker that invokes `tick_aging(p)`"). Dispatches to the
/// build-selected policy's `on_tick`.
#[cfg(not(feature = "policy-none"))]
pub fn tick_aging<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) {
    use crate::policy::{ActivePolicy, Policy};
    ActivePolicy::on_tick(set, pgdir);
}

#[cfg(feature = "policy-none")]
pub fn tick_aging<PD: PageDirectory>(_set: &mut ResidentSet, _pgdir: &mut PD) {}
