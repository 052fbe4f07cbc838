//! Deterministic per-module shuffling of quiz options.
//!
//! The displayed option order must look different per module yet be exactly
//! reproducible from the module id alone, across processes and platforms,
//! so a resumed session shows the same order and a stored canonical answer
//! can be mapped back to the button the user pressed. The generator is a
//! Park–Miller LCG seeded through a Knuth multiplicative hash, driving a
//! back-to-front Fisher–Yates pass.

use crate::model::{Activity, ModuleId};

const SEED_HASH: u64 = 2_654_435_761;
const LCG_MULTIPLIER: u64 = 16_807;
const LCG_MODULUS: u64 = 2_147_483_647;

//
// ─── OPTION ORDER ──────────────────────────────────────────────────────────────
//

/// A permutation of option indexes: the bidirectional mapping between the
/// canonical (authored) index space and the display (shuffled) index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOrder {
    display_to_canonical: Vec<usize>,
}

impl OptionOrder {
    /// Derive the permutation of `len` indexes for the given seed.
    ///
    /// Pure and total: the same `(len, seed)` pair yields the same
    /// permutation on every call and every platform.
    #[must_use]
    pub fn derive(len: usize, seed: u64) -> Self {
        let mut indexes: Vec<usize> = (0..len).collect();
        let mut state = seed.wrapping_mul(SEED_HASH);

        for i in (1..len).rev() {
            state = state.wrapping_mul(LCG_MULTIPLIER) % LCG_MODULUS;
            let draw = (state.saturating_sub(1)) as f64 / (LCG_MODULUS - 1) as f64;
            // Clamp keeps the swap in range even if the LCG state collapses
            // to zero for a degenerate seed.
            let j = ((draw * (i + 1) as f64) as usize).min(i);
            indexes.swap(i, j);
        }

        Self {
            display_to_canonical: indexes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.display_to_canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_to_canonical.is_empty()
    }

    /// Canonical index of the option shown at `display` position.
    #[must_use]
    pub fn canonical_of(&self, display: usize) -> Option<usize> {
        self.display_to_canonical.get(display).copied()
    }

    /// Display position at which the canonical option appears.
    #[must_use]
    pub fn display_of(&self, canonical: usize) -> Option<usize> {
        self.display_to_canonical
            .iter()
            .position(|&c| c == canonical)
    }

    /// Display position → canonical index, beginning to end.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.display_to_canonical
    }
}

//
// ─── SHUFFLED ACTIVITY ─────────────────────────────────────────────────────────
//

/// An activity's options in display order, with the correct answer's display
/// position and the underlying index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledActivity<'a> {
    options: Vec<&'a str>,
    correct_display: usize,
    order: OptionOrder,
}

impl<'a> ShuffledActivity<'a> {
    /// Shuffle the activity's options using the module id as the seed.
    #[must_use]
    pub fn for_module(activity: &'a Activity, id: ModuleId) -> Self {
        let order = OptionOrder::derive(activity.options().len(), id.value());
        let options = order
            .as_slice()
            .iter()
            .map(|&canonical| activity.options()[canonical].as_str())
            .collect();
        // The permutation always contains correct_index, validated at
        // Activity construction.
        let correct_display = order
            .display_of(activity.correct_index())
            .unwrap_or_default();

        Self {
            options,
            correct_display,
            order,
        }
    }

    /// Option texts in display order.
    #[must_use]
    pub fn options(&self) -> &[&'a str] {
        &self.options
    }

    /// Display position of the correct option.
    #[must_use]
    pub fn correct_display(&self) -> usize {
        self.correct_display
    }

    #[must_use]
    pub fn order(&self) -> &OptionOrder {
        &self.order
    }

    /// Translate a picked display position back into the canonical index
    /// space expected by `Progress::submit_answer`.
    #[must_use]
    pub fn canonical_of(&self, display: usize) -> Option<usize> {
        self.order.canonical_of(display)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
