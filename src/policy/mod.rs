//! Pluggable replacement policies (§4.4, §9 policy dispatch design
//! note).
//!
//! The source selects a policy with `#if NFUA` / `#if LAPA` /
//! `#if SCFIFO` / `#if AQ` preprocessor blocks around near-identical
//! scan loops. Re-architected here as a trait with one `ActivePolicy`
//! type alias selected by Cargo feature — monomorphised the same way
//! the design note asks for, no vtable, no runtime cost over the
//! source's compile-time branch.

use crate::collab::PageDirectory;
use crate::resident::ResidentSet;

pub mod aq;
pub mod lapa;
pub mod nfua;
pub mod scfifo;

/// A victim-selection strategy over a process's resident set.
pub trait Policy {
    /// Initial `access_history` assigned at insertion (§4.2).
    const INIT_HISTORY: u32;

    /// Per-tick update driven by the aging clock (§2 component 1).
    /// NFUA/LAPA shift `access_history`; AQ performs its adjacent-rank
    /// promotion scan; SCFIFO does nothing here (its second chance is
    /// evaluated lazily in `select_victim`).
    fn on_tick<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD);

    /// Returns the slot index of the entry to evict. Must not be
    /// called on an empty set (§4.2).
    fn select_victim<PD: PageDirectory>(set: &mut ResidentSet, pgdir: &mut PD) -> usize;
}

#[cfg(feature = "nfua")]
pub type ActivePolicy = nfua::Nfua;
#[cfg(feature = "lapa")]
pub type ActivePolicy = lapa::Lapa;
#[cfg(feature = "scfifo")]
pub type ActivePolicy = scfifo::Scfifo;
#[cfg(feature = "aq")]
pub type ActivePolicy = aq::Aq;

#[cfg(not(any(
    feature = "nfua",
    feature = "lapa",
    feature = "scfifo",
    feature = "aq",
    feature = "policy-none"
)))]
compile_error!("exactly one of the `nfua`, `lapa`, `scfifo`, `aq`, `policy-none` features must be enabled");

#[cfg(any(
    all(feature = "nfua", feature = "lapa"),
    all(feature = "nfua", feature = "scfifo"),
    all(feature = "nfua", feature = "aq"),
    all(feature = "nfua", feature = "policy-none"),
    all(feature = "lapa", feature = "scfifo"),
    all(feature = "lapa", feature = "aq"),
    all(feature = "lapa", feature = "policy-none"),
    all(feature = "scfifo", feature = "aq"),
    all(feature = "scfifo", feature = "policy-none"),
    all(feature = "aq", feature = "policy-none"),
))]
compile_error!("at most one of the `nfua`, `lapa`, `scfifo`, `aq`, `policy-none` features may be enabled");

/// Tie-break helper shared by every policy: lowest slot index wins
/// (§4.4).
pub(crate) fn argmin_by_key<T: Ord>(
    set: &ResidentSet,
    mut key: impl FnMut(usize, &crate::resident::ResidentEntry) -> T,
) -> usize {
    let mut best: Option<(usize, T)> = None;
    for (i, e) in set.snapshot_for_clock() {
        let k = key(i, e);
        match &best {
            None => best = Some((i, k)),
            Some((_, bk)) if k < *bk => best = Some((i, k)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
        .unwrap_or_else(|| crate::error::invariant_violation("find_victim on an empty resident set"))
}
