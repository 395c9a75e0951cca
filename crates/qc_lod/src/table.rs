// SPDX-License-Identifier: MIT OR Apache-2.0
//! LOD table management.
//!
//! Every array shaped by the declared LOD count is resized through
//! [`resize_lod_array`], so all of them share the same tail-only policy:
//! shrinking truncates from the end, growing appends defaults at the end,
//! and entries at surviving indices are left untouched.

use crate::error::{ContractViolation, Result};
use crate::level::LodLevel;
use serde::{Deserialize, Serialize};

/// Maximum number of declared LODs per model
pub const MAX_LODS: usize = 8;

/// Resize a LOD array to `target_len` entries.
pub fn resize_lod_array<T: Default>(array: &mut Vec<T>, target_len: usize) {
    while array.len() > target_len {
        array.pop();
    }
    while array.len() < target_len {
        array.push(T::default());
    }
}

/// An entity that stores an array shaped by the declared LOD count
pub trait LodSlots {
    /// Resize the stored array for `declared_count` LODs.
    ///
    /// `declared_count` has already been validated by the caller.
    fn resize_lod_slots(&mut self, declared_count: usize);

    /// Number of stored entries
    fn lod_slot_count(&self) -> usize;
}

fn check_count(count: usize) -> Result<()> {
    if count > MAX_LODS {
        return Err(ContractViolation::CountOutOfRange(count));
    }
    Ok(())
}

/// Check that an array holds `expected` entries.
pub fn check_slot_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ContractViolation::SlotCountMismatch { expected, actual });
    }
    Ok(())
}

/// Apply one declared-count change to every LOD-shaped array in a group.
///
/// The count is validated once up front, so either every target is resized or
/// none is.
pub fn set_declared_count_all<'a, I>(count: usize, targets: I) -> Result<()>
where
    I: IntoIterator<Item = &'a mut dyn LodSlots>,
{
    check_count(count)?;
    let mut resized = 0usize;
    for target in targets {
        target.resize_lod_slots(count);
        resized += 1;
    }
    tracing::debug!(count, resized, "resized LOD arrays");
    Ok(())
}

/// The ordered LOD definitions attached to a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodTable {
    levels: Vec<LodLevel>,
    declared_count: usize,
    reference_slot: bool,
    inherit_enabled: bool,
    active_lod: usize,
}

impl LodTable {
    /// Create an empty table with inheritance enabled
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            declared_count: 0,
            reference_slot: false,
            inherit_enabled: true,
            active_lod: 0,
        }
    }

    /// Set the declared LOD count and resize the stored levels to match.
    ///
    /// With `has_reference_slot` the array holds one extra leading entry for
    /// the reference mesh.
    pub fn set_declared_count(&mut self, new_count: usize, has_reference_slot: bool) -> Result<()> {
        check_count(new_count)?;

        let target_len = new_count + usize::from(has_reference_slot);
        let previous = self.levels.len();
        resize_lod_array(&mut self.levels, target_len);
        self.declared_count = new_count;
        self.reference_slot = has_reference_slot;

        // Keep the active selection on a surviving entry
        if self.active_lod >= self.levels.len() {
            self.active_lod = self.levels.len().saturating_sub(1);
        }

        tracing::debug!(previous, target_len, "resized LOD table");
        Ok(())
    }

    /// Declared LOD count
    pub fn declared_count(&self) -> usize {
        self.declared_count
    }

    /// Whether LODs inherit operations from higher-detail LODs
    pub fn inherit_enabled(&self) -> bool {
        self.inherit_enabled
    }

    /// Enable or disable inheritance
    pub fn set_inherit_enabled(&mut self, enabled: bool) {
        self.inherit_enabled = enabled;
    }

    /// Stored levels, index 0 first
    pub fn levels(&self) -> &[LodLevel] {
        &self.levels
    }

    /// Number of stored levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels are stored
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the level at `index`
    pub fn level(&self, index: usize) -> Result<&LodLevel> {
        let len = self.levels.len();
        self.levels
            .get(index)
            .ok_or(ContractViolation::IndexOutOfRange { index, len })
    }

    /// Get the level at `index` mutably
    pub fn level_mut(&mut self, index: usize) -> Result<&mut LodLevel> {
        let len = self.levels.len();
        self.levels
            .get_mut(index)
            .ok_or(ContractViolation::IndexOutOfRange { index, len })
    }

    /// Index of the level selected for editing
    pub fn active_index(&self) -> usize {
        self.active_lod
    }

    /// Select the level at `index` for editing
    pub fn set_active_lod(&mut self, index: usize) -> Result<()> {
        self.level(index)?;
        self.active_lod = index;
        Ok(())
    }

    /// The level selected for editing, or `None` when the table is empty
    pub fn active_lod(&self) -> Option<&LodLevel> {
        self.levels.get(self.active_lod)
    }

    /// Check a table that did not come through the mutators, such as one
    /// read from disk.
    ///
    /// The declared count must be in range, the stored levels must match it,
    /// the active index must point at a stored level and every threshold must
    /// be one [`LodLevel::set_threshold`] would accept.
    pub fn validate(&self) -> Result<()> {
        check_count(self.declared_count)?;
        check_slot_count(
            self.declared_count + usize::from(self.reference_slot),
            self.levels.len(),
        )?;
        if !self.levels.is_empty() && self.active_lod >= self.levels.len() {
            return Err(ContractViolation::IndexOutOfRange {
                index: self.active_lod,
                len: self.levels.len(),
            });
        }
        self.levels.iter().try_for_each(LodLevel::validate)
    }
}

impl Default for LodTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LodSlots for LodTable {
    fn resize_lod_slots(&mut self, declared_count: usize) {
        let target_len = declared_count + usize::from(self.reference_slot);
        resize_lod_array(&mut self.levels, target_len);
        self.declared_count = declared_count;
        if self.active_lod >= self.levels.len() {
            self.active_lod = self.levels.len().saturating_sub(1);
        }
    }

    fn lod_slot_count(&self) -> usize {
        self.levels.len()
    }
}
