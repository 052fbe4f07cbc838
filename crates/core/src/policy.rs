//! Unlock policy: which modules are currently accessible, derived from the
//! catalog order and the completed set. Pure functions; enforcement of
//! `advance` gating is the caller's responsibility.

use crate::model::{Catalog, Progress};

/// Access state of a module relative to a given progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleAccess {
    /// Predecessor not yet completed.
    Locked,
    /// Reachable but not yet answered correctly.
    Unlocked,
    /// Answered correctly at least once. Never reverts.
    Completed,
}

/// Access state of the module at `position`, or `None` when out of range.
///
/// Position 0 is never locked; position `p > 0` is locked iff the module at
/// `p - 1` is not in the completed set.
#[must_use]
pub fn module_access(catalog: &Catalog, progress: &Progress, position: usize) -> Option<ModuleAccess> {
    let module = catalog.module_at(position)?;
    if progress.is_completed(module.id()) {
        return Some(ModuleAccess::Completed);
    }

    let unlocked = match position {
        0 => true,
        p => catalog
            .module_at(p - 1)
            .is_some_and(|prev| progress.is_completed(prev.id())),
    };
    Some(if unlocked {
        ModuleAccess::Unlocked
    } else {
        ModuleAccess::Locked
    })
}

/// True if the module at `position` may be visited.
#[must_use]
pub fn is_unlocked(catalog: &Catalog, progress: &Progress, position: usize) -> bool {
    matches!(
        module_access(catalog, progress, position),
        Some(ModuleAccess::Unlocked | ModuleAccess::Completed)
    )
}

/// True if the module after the current one may be entered, i.e. the
/// current module has been answered correctly.
#[must_use]
pub fn can_advance(catalog: &Catalog, progress: &Progress) -> bool {
    catalog
        .module_at(progress.position)
        .is_some_and(|module| progress.is_completed(module.id()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
