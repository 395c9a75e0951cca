// SPDX-License-Identifier: MIT OR Apache-2.0
//! A single level of detail and its operation lists.

use crate::error::{ContractViolation, Result};
use crate::ops::{BoneOperation, MaterialOperation};
use serde::{Deserialize, Serialize};

/// Threshold assigned to freshly created levels
pub const DEFAULT_THRESHOLD: f32 = 10.0;

/// Smallest threshold a level accepts
pub const MIN_THRESHOLD: f32 = 0.1;

/// One level of detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodLevel {
    /// Reciprocal of on-screen model height at which this LOD activates
    threshold: f32,
    /// Suppress shape key animation while this LOD is active
    pub suppress_flex_animation: bool,
    /// Bone collapse/replace operations, in entry order
    pub bone_ops: Vec<BoneOperation>,
    /// Material remove/replace operations, in entry order
    pub material_ops: Vec<MaterialOperation>,
}

impl LodLevel {
    /// Create a level with default settings and no operations
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            suppress_flex_animation: false,
            bone_ops: Vec::new(),
            material_ops: Vec::new(),
        }
    }

    /// Current threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Set the activation threshold
    pub fn set_threshold(&mut self, threshold: f32) -> Result<()> {
        check_threshold(threshold)?;
        self.threshold = threshold;
        Ok(())
    }

    /// Check the stored threshold against the same rule as [`Self::set_threshold`]
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)
    }

    /// Append a bone operation
    pub fn add_bone_op(&mut self, op: BoneOperation) {
        self.bone_ops.push(op);
    }

    /// Remove the bone operation at `index`
    pub fn remove_bone_op(&mut self, index: usize) -> Result<BoneOperation> {
        check_op_index(index, self.bone_ops.len())?;
        Ok(self.bone_ops.remove(index))
    }

    /// Append a material operation
    pub fn add_material_op(&mut self, op: MaterialOperation) {
        self.material_ops.push(op);
    }

    /// Remove the material operation at `index`
    pub fn remove_material_op(&mut self, index: usize) -> Result<MaterialOperation> {
        check_op_index(index, self.material_ops.len())?;
        Ok(self.material_ops.remove(index))
    }

    /// Whether this level carries any operations
    pub fn has_operations(&self) -> bool {
        !self.bone_ops.is_empty() || !self.material_ops.is_empty()
    }
}

impl Default for LodLevel {
    fn default() -> Self {
        Self::new()
    }
}

fn check_threshold(threshold: f32) -> Result<()> {
    if !threshold.is_finite() || threshold < MIN_THRESHOLD {
        return Err(ContractViolation::ThresholdOutOfRange(threshold));
    }
    Ok(())
}

fn check_op_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(ContractViolation::OperationOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        let level = LodLevel::default();
        assert_eq!(level.threshold(), DEFAULT_THRESHOLD);
        assert!(!level.suppress_flex_animation);
        assert!(!level.has_operations());
    }

    #[test]
    fn test_threshold_validation() {
        let mut level = LodLevel::new();
        level.set_threshold(MIN_THRESHOLD).unwrap();
        assert_eq!(level.threshold(), MIN_THRESHOLD);

        assert_eq!(
            level.set_threshold(0.05),
            Err(ContractViolation::ThresholdOutOfRange(0.05))
        );
        assert!(level.set_threshold(f32::NAN).is_err());
        // Rejected values leave the old threshold in place
        assert_eq!(level.threshold(), MIN_THRESHOLD);
    }

    #[test]
    fn test_add_remove_operations() {
        let mut level = LodLevel::new();
        level.add_bone_op(BoneOperation::collapse("pelvis"));
        level.add_bone_op(BoneOperation::replace("spine", "hip"));
        level.add_material_op(MaterialOperation::remove("glass"));
        assert!(level.has_operations());

        let removed = level.remove_bone_op(0).unwrap();
        assert_eq!(removed.bone, "pelvis");
        assert_eq!(level.bone_ops, vec![BoneOperation::replace("spine", "hip")]);

        assert_eq!(
            level.remove_material_op(3),
            Err(ContractViolation::OperationOutOfRange { index: 3, len: 1 })
        );
        level.remove_material_op(0).unwrap();
        assert!(level.material_ops.is_empty());
    }

    #[test]
    fn test_serialization_fills_defaults() {
        let level: LodLevel = ron::from_str("(bone_ops: [(bone: \"pelvis\", replacement: \"\")])").unwrap();
        assert_eq!(level.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(level.bone_ops, vec![BoneOperation::collapse("pelvis")]);
        assert_eq!(level.validate(), Ok(()));
    }

    #[test]
    fn test_validate_loaded_threshold() {
        let level: LodLevel = ron::from_str("(threshold: 0.0)").unwrap();
        assert_eq!(level.validate(), Err(ContractViolation::ThresholdOutOfRange(0.0)));
    }
}
