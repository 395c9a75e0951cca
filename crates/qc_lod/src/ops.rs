// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bone and material operations applied at a level of detail.

use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// An operation identified by a key, so later entries can override earlier ones
pub trait KeyedOperation: Clone {
    /// Identity key type
    type Key: Clone + Eq + Hash;

    /// The key this operation is identified by
    fn key(&self) -> &Self::Key;
}

/// Collapse a bone, or replace it with another bone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneOperation {
    /// The bone to collapse or replace
    pub bone: String,
    /// The bone to replace the target with, or empty to collapse the target
    pub replacement: String,
}

impl BoneOperation {
    /// Collapse `bone` without a replacement
    pub fn collapse(bone: impl Into<String>) -> Self {
        Self {
            bone: bone.into(),
            replacement: String::new(),
        }
    }

    /// Replace `bone` with `replacement`
    pub fn replace(bone: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            bone: bone.into(),
            replacement: replacement.into(),
        }
    }

    /// Whether this operation collapses the bone rather than replacing it
    pub fn is_collapse(&self) -> bool {
        self.replacement.is_empty()
    }
}

impl KeyedOperation for BoneOperation {
    type Key = String;

    fn key(&self) -> &String {
        &self.bone
    }
}

/// Remove a material, or replace it with another material
///
/// `None` stands for an unset material reference. An unset target is still a
/// valid key; two operations with unset targets override each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialOperation {
    /// The material to remove or replace
    pub material: Option<String>,
    /// The material to replace the target with, or `None` to remove the target
    pub replacement: Option<String>,
}

impl MaterialOperation {
    /// Remove `material`
    pub fn remove(material: impl Into<String>) -> Self {
        Self {
            material: Some(material.into()),
            replacement: None,
        }
    }

    /// Replace `material` with `replacement`
    pub fn replace(material: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            material: Some(material.into()),
            replacement: Some(replacement.into()),
        }
    }

    /// Whether this operation removes the material rather than replacing it
    pub fn is_removal(&self) -> bool {
        self.replacement.is_none()
    }
}

impl KeyedOperation for MaterialOperation {
    type Key = Option<String>;

    fn key(&self) -> &Option<String> {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_operation_kinds() {
        assert!(BoneOperation::collapse("pelvis").is_collapse());
        assert!(!BoneOperation::replace("spine", "hip").is_collapse());
        assert_eq!(BoneOperation::replace("spine", "hip").key(), "spine");
    }

    #[test]
    fn test_material_operation_kinds() {
        assert!(MaterialOperation::remove("glass").is_removal());
        assert!(!MaterialOperation::replace("glass", "glass_cheap").is_removal());
        assert_eq!(MaterialOperation::default().key(), &None);
    }
}
