//! SCFIFO — Second-Chance FIFO. Victim = entry with smallest
//! `create_order`; if its PTE's `A` bit is set, the page is forgiven:
//! clear `A`, re-stamp `create_order` to a fresh maximum, and rescan.
//! Terminates because each forgiven entry's key strictly increases, so
//! at most `MAX_PSYC` forgivenesses occur per call (§4.4).

use super::{argmin_by_key, Policy};
use crate::collab::PageDirectory;
use crate::config::MAX_PSYC;
use crate::error::invariant_violation;
use crate::resident::ResidentSet;

pub struct Scfifo;

impl Policy for Scfifo {
    const INIT_HISTORY: u32 = 0;

    fn on_tick<PD: PageDirectory>(_set: &mut ResidentSet, _pgdir: &mut PD) {
        // Second chance is evaluated lazily in select_victim; nothing
        // to do per tick.
    }

    fn select_victim<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) -> usize {
        for _ in 0..=MAX_PSYC {
            let idx = argmin_by_key(set, |_, e| e.create_order);
            let va = set.get(idx).unwrap().va;
            let accessed = pgdir
                .walk(va, false)
                .map(|pte| pte.is_accessed())
                .unwrap_or(false);

            if !accessed {
                return idx;
            }

            if let Some(pte) = pgdir.walk(va, false) {
                pte.clear_accessed();
            }
            set.restamp_create_order(idx);
        }
        invariant_violation("SCFIFO second chance failed to terminate")
    }
}
