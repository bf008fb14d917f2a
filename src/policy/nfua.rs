//! NFUA — Not Frequently Used (Aging). Victim = argmin `access_history`
//! read as an unsigned 32-bit integer; the MSB holds the most recent
//! tick, so older references decay exponentially (§4.4).

use super::{argmin_by_key, Policy};
use crate::aging::shift_access_history;
use crate::collab::PageDirectory;
use crate::resident::ResidentSet;

pub struct Nfua;

impl Policy for Nfua {
    const INIT_HISTORY: u32 = 0;

    fn on_tick<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) {
        shift_access_history(set, pgdir);
    }

    fn select_victim<PD: PageDirectory>(set: &mut ResidentSet, _pgdir: &mut PD) -> usize {
        argmin_by_key(set, |_, e| e.access_history)
    }
}
