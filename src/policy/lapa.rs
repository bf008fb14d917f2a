//! LAPA — Least Accessed, Popcount Aging. Victim = argmin
//! `popcount(access_history)`, ties broken by lower slot index (§4.4).

use super::{argmin_by_key, Policy};
use crate::aging::shift_access_history;
use crate::collab::PageDirectory;
use crate::resident::ResidentSet;

pub struct Lapa;

impl Policy for Lapa {
    const INIT_HISTORY: u32 = 0xFFFF_FFFF;

    fn on_tick<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) {
        shift_access_history(set, pgdir);
    }

    fn select_victim<PD: PageDirectory>(set: &mut ResidentSet, _pgdir: &mut PD) -> usize {
        argmin_by_key(set, |_, e| e.access_history.count_ones())
    }
}
