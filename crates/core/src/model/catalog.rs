use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{ModuleId, PhaseId};
use crate::model::module::Module;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog cannot be empty")]
    Empty,

    #[error("duplicate module id {0}")]
    DuplicateModuleId(ModuleId),

    #[error("duplicate phase id {0}")]
    DuplicatePhaseId(PhaseId),

    #[error("module {module} references unknown phase {phase}")]
    UnknownPhase { module: ModuleId, phase: PhaseId },
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// A named group of consecutive modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    id: PhaseId,
    name: String,
}

impl Phase {
    #[must_use]
    pub fn new(id: PhaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PhaseId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The ordered, read-only list of course modules plus the phase table.
///
/// Defined once at startup and injected into services; module position in
/// the list determines sequential unlock order, while progress is keyed by
/// `ModuleId` so it survives catalog reordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    phases: Vec<Phase>,
    modules: Vec<Module>,
}

impl Catalog {
    /// Build a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the module list is empty, a module or
    /// phase id repeats, or a module references a phase that is not listed.
    pub fn new(phases: Vec<Phase>, modules: Vec<Module>) -> Result<Self, CatalogError> {
        if modules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut phase_ids = HashSet::new();
        for phase in &phases {
            if !phase_ids.insert(phase.id()) {
                return Err(CatalogError::DuplicatePhaseId(phase.id()));
            }
        }

        let mut module_ids = HashSet::new();
        for module in &modules {
            if !module_ids.insert(module.id()) {
                return Err(CatalogError::DuplicateModuleId(module.id()));
            }
            if !phase_ids.contains(&module.phase()) {
                return Err(CatalogError::UnknownPhase {
                    module: module.id(),
                    phase: module.phase(),
                });
            }
        }

        Ok(Self { phases, modules })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module at the given 0-based position.
    #[must_use]
    pub fn module_at(&self, position: usize) -> Option<&Module> {
        self.modules.get(position)
    }

    /// Module by id.
    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id() == id)
    }

    /// Position of the module with the given id.
    #[must_use]
    pub fn position_of(&self, id: ModuleId) -> Option<usize> {
        self.modules.iter().position(|m| m.id() == id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id() == id)
    }

    /// Modules belonging to the given phase, in catalog order.
    pub fn modules_in_phase(&self, id: PhaseId) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(move |m| m.phase() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::Activity;

    fn phase(letter: char) -> Phase {
        Phase::new(PhaseId::new(letter).unwrap(), format!("Phase {letter}"))
    }

    fn module(id: u64, letter: char) -> Module {
        let activity = Activity::new(
            format!("Q{id}?"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            1,
            "",
        )
        .unwrap();
        Module::new(
            ModuleId::new(id),
            PhaseId::new(letter).unwrap(),
            format!("Module {id}"),
            "Concept",
            activity,
        )
    }

    #[test]
    fn builds_and_looks_up() {
        let catalog = Catalog::new(
            vec![phase('A'), phase('B')],
            vec![module(1, 'A'), module(2, 'A'), module(3, 'B')],
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.module_at(1).unwrap().id(), ModuleId::new(2));
        assert_eq!(catalog.position_of(ModuleId::new(3)), Some(2));
        assert!(catalog.get(ModuleId::new(9)).is_none());
        assert_eq!(
            catalog
                .modules_in_phase(PhaseId::new('A').unwrap())
                .count(),
            2
        );
        assert_eq!(catalog.phase(PhaseId::new('B').unwrap()).unwrap().name(), "Phase B");
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = Catalog::new(vec![phase('A')], vec![]).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }

    #[test]
    fn rejects_duplicate_module_ids() {
        let err =
            Catalog::new(vec![phase('A')], vec![module(1, 'A'), module(1, 'A')]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateModuleId(ModuleId::new(1)));
    }

    #[test]
    fn rejects_duplicate_phase_ids() {
        let err = Catalog::new(vec![phase('A'), phase('A')], vec![module(1, 'A')]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicatePhaseId(PhaseId::new('A').unwrap()));
    }

    #[test]
    fn rejects_unknown_phase() {
        let err = Catalog::new(vec![phase('A')], vec![module(1, 'B')]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownPhase {
                module: ModuleId::new(1),
                phase: PhaseId::new('B').unwrap(),
            }
        );
    }
}
