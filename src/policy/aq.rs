//! AQ — Advancing Queue. Victim = entry with smallest `aq_rank`. Each
//! tick, scans adjacent pairs in rank order and swaps ranks when the
//! later page was accessed but the earlier was not, promoting unused
//! pages toward the front of the eviction queue (§4.4).
//!
//! §9 notes that the source exists in two variants differing only in
//! whether the rank counter increments or decrements at insertion; this
//! crate uses the incrementing direction the spec settled on (newer
//! pages get higher rank, oldest evicted first — consistent with the
//! other three policies), via `ResidentSet::insert`'s internal counter.

use super::{argmin_by_key, Policy};
use crate::collab::PageDirectory;
use crate::resident::ResidentSet;

pub struct Aq;

fn is_accessed<PD: PageDirectory>(pgdir: &mut PD, va: u32) -> bool {
    pgdir.walk(va, false).map(|p| p.is_accessed()).unwrap_or(false)
}

fn next_after_rank(set: &ResidentSet, boundary: Option<u64>) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, e) in set.snapshot_for_clock() {
        if let Some(b) = boundary {
            if e.aq_rank <= b {
                continue;
            }
        }
        match &best {
            None => best = Some((i, e.aq_rank)),
            Some((_, br)) if e.aq_rank < *br => best = Some((i, e.aq_rank)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

fn swap_ranks(set: &mut ResidentSet, a: usize, b: usize) {
    let ra = set.get(a).unwrap().aq_rank;
    let rb = set.get(b).unwrap().aq_rank;
    set.get_mut(a).unwrap().aq_rank = rb;
    set.get_mut(b).unwrap().aq_rank = ra;
}

impl Policy for Aq {
    const INIT_HISTORY: u32 = 0;

    fn on_tick<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) {
        let mut prior: Option<usize> = None;
        loop {
            let next = match prior {
                None => next_after_rank(set, None),
                Some(p) => {
                    let boundary = set.get(p).unwrap().aq_rank;
                    next_after_rank(set, Some(boundary))
                }
            };
            let next = match next {
                Some(n) => n,
                None => break,
            };

            if let Some(p) = prior {
                let prior_va = set.get(p).unwrap().va;
                let next_va = set.get(next).unwrap().va;
                if is_accessed(pgdir, next_va) && !is_accessed(pgdir, prior_va) {
                    swap_ranks(set, p, next);
                }
            }
            prior = Some(next);
        }
    }

    fn select_victim<PD: PageDirectory>(set: &mut ResidentSet, _pgdir: &mut PD) -> usize {
        argmin_by_key(set, |_, e| e.aq_rank)
    }
}
