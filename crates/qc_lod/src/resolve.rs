// SPDX-License-Identifier: MIT OR Apache-2.0
//! Operation resolution.
//!
//! Computes the effective bone and material operations for one LOD:
//! - Without inheritance a LOD uses only its own lists.
//! - With inheritance the lists of LOD 0 through the requested LOD are merged
//!   in increasing index order.
//!
//! In both cases a later entry for the same key replaces an earlier one, and
//! the merged entry stays at the position where its key first appeared. An
//! empty replacement is an ordinary override, never a deletion.

use crate::error::Result;
use crate::level::LodLevel;
use crate::ops::{BoneOperation, KeyedOperation, MaterialOperation};
use crate::table::LodTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Effective settings for a single LOD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLod {
    /// Index into the table's levels
    pub index: usize,
    /// Activation threshold of this LOD
    pub threshold: f32,
    /// Whether flex animation is suppressed at this LOD
    pub suppress_flex_animation: bool,
    /// Effective bone operations, in output order
    pub bone_ops: Vec<BoneOperation>,
    /// Effective material operations, in output order
    pub material_ops: Vec<MaterialOperation>,
}

/// Merge operation lists by key. `IndexMap::insert` keeps the original slot of
/// an existing key while replacing its value.
fn merge<'a, T, I>(lists: I) -> Vec<T>
where
    T: KeyedOperation + 'a,
    I: IntoIterator<Item = &'a [T]>,
{
    let mut merged: IndexMap<T::Key, T> = IndexMap::new();
    for list in lists {
        for op in list {
            merged.insert(op.key().clone(), op.clone());
        }
    }
    merged.into_values().collect()
}

/// Lists contributing to LOD `index`, highest detail first
fn contributing<'a, T: 'a>(
    table: &'a LodTable,
    index: usize,
    select: impl Fn(&'a LodLevel) -> &'a [T] + 'a,
) -> Result<impl Iterator<Item = &'a [T]> + 'a> {
    table.level(index)?;
    let first = if table.inherit_enabled() { 0 } else { index };
    Ok(table.levels()[first..=index].iter().map(select))
}

/// Effective bone operations for LOD `index`
pub fn resolve_bone_ops(table: &LodTable, index: usize) -> Result<Vec<BoneOperation>> {
    let lists = contributing(table, index, |level| level.bone_ops.as_slice())?;
    Ok(merge(lists))
}

/// Effective material operations for LOD `index`
pub fn resolve_material_ops(table: &LodTable, index: usize) -> Result<Vec<MaterialOperation>> {
    let lists = contributing(table, index, |level| level.material_ops.as_slice())?;
    Ok(merge(lists))
}

/// Effective operations and settings for LOD `index`
pub fn resolve_lod(table: &LodTable, index: usize) -> Result<ResolvedLod> {
    let level = table.level(index)?;
    let bone_ops = resolve_bone_ops(table, index)?;
    let material_ops = resolve_material_ops(table, index)?;

    if bone_ops.iter().any(|op| op.bone.is_empty()) {
        tracing::warn!(index, "LOD has a bone operation with no target bone");
    }
    tracing::debug!(
        index,
        inherit = table.inherit_enabled(),
        bones = bone_ops.len(),
        materials = material_ops.len(),
        "resolved LOD operations"
    );

    Ok(ResolvedLod {
        index,
        threshold: level.threshold(),
        suppress_flex_animation: level.suppress_flex_animation,
        bone_ops,
        material_ops,
    })
}

/// Effective operations for every stored level, index 0 first
pub fn resolve_all(table: &LodTable) -> Result<Vec<ResolvedLod>> {
    (0..table.len()).map(|index| resolve_lod(table, index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractViolation;
    use std::collections::HashSet;

    fn table_with_bones(inherit: bool, bones: &[&[BoneOperation]]) -> LodTable {
        let mut table = LodTable::new();
        table.set_declared_count(bones.len(), false).unwrap();
        table.set_inherit_enabled(inherit);
        for (i, ops) in bones.iter().enumerate() {
            table.level_mut(i).unwrap().bone_ops = ops.to_vec();
        }
        table
    }

    #[test]
    fn test_no_inherit_passthrough() {
        let table = table_with_bones(
            false,
            &[
                &[BoneOperation::collapse("pelvis")],
                &[BoneOperation::replace("spine", "hip")],
            ],
        );
        assert_eq!(
            resolve_bone_ops(&table, 1).unwrap(),
            vec![BoneOperation::replace("spine", "hip")]
        );
    }

    #[test]
    fn test_local_dedup() {
        let table = table_with_bones(
            false,
            &[&[BoneOperation::replace("a", "x"), BoneOperation::replace("a", "y")]],
        );
        assert_eq!(
            resolve_bone_ops(&table, 0).unwrap(),
            vec![BoneOperation::replace("a", "y")]
        );
    }

    #[test]
    fn test_override_keeps_first_position() {
        let table = table_with_bones(
            true,
            &[
                &[BoneOperation::replace("a", "x"), BoneOperation::collapse("b")],
                &[BoneOperation::collapse("c"), BoneOperation::replace("a", "y")],
            ],
        );
        assert_eq!(
            resolve_bone_ops(&table, 1).unwrap(),
            vec![
                BoneOperation::replace("a", "y"),
                BoneOperation::collapse("b"),
                BoneOperation::collapse("c"),
            ]
        );
    }

    #[test]
    fn test_empty_replacement_is_override() {
        let table = table_with_bones(
            true,
            &[
                &[BoneOperation::replace("a", "x"), BoneOperation::collapse("b")],
                &[BoneOperation::collapse("a")],
            ],
        );
        assert_eq!(
            resolve_bone_ops(&table, 1).unwrap(),
            vec![BoneOperation::collapse("a"), BoneOperation::collapse("b")]
        );
    }

    #[test]
    fn test_inherit_key_set_is_monotonic() {
        let table = table_with_bones(
            true,
            &[
                &[BoneOperation::collapse("a")],
                &[BoneOperation::replace("a", "b"), BoneOperation::collapse("c")],
                &[],
                &[BoneOperation::collapse("d"), BoneOperation::collapse("")],
            ],
        );

        let mut previous: HashSet<String> = HashSet::new();
        for index in 0..table.len() {
            let keys: HashSet<String> = resolve_bone_ops(&table, index)
                .unwrap()
                .into_iter()
                .map(|op| op.bone)
                .collect();
            assert!(keys.is_superset(&previous), "LOD {index} dropped a key");
            previous = keys;
        }
        // Empty target bone is kept as a literal key
        assert!(previous.contains(""));
    }

    #[test]
    fn test_reference_slot_scenario() {
        let mut table = LodTable::new();
        table.set_declared_count(2, true).unwrap();
        assert_eq!(table.len(), 3);

        table.level_mut(0).unwrap().add_bone_op(BoneOperation::collapse("pelvis"));
        table.level_mut(1).unwrap().add_bone_op(BoneOperation::replace("spine", "hip"));

        assert_eq!(
            resolve_bone_ops(&table, 2).unwrap(),
            vec![BoneOperation::collapse("pelvis"), BoneOperation::replace("spine", "hip")]
        );

        table.set_inherit_enabled(false);
        assert!(resolve_bone_ops(&table, 2).unwrap().is_empty());
    }

    #[test]
    fn test_material_inheritance() {
        let mut table = LodTable::new();
        table.set_declared_count(2, false).unwrap();
        table.level_mut(0).unwrap().material_ops = vec![
            MaterialOperation::replace("skin", "skin_lod"),
            MaterialOperation::default(),
        ];
        table.level_mut(1).unwrap().material_ops = vec![
            MaterialOperation::remove("skin"),
            MaterialOperation::replace("eyes", "eyes_flat"),
        ];

        assert_eq!(
            resolve_material_ops(&table, 1).unwrap(),
            vec![
                MaterialOperation::remove("skin"),
                MaterialOperation::default(),
                MaterialOperation::replace("eyes", "eyes_flat"),
            ]
        );
    }

    #[test]
    fn test_material_local_dedup() {
        let mut table = LodTable::new();
        table.set_declared_count(2, false).unwrap();
        table.set_inherit_enabled(false);
        table.level_mut(0).unwrap().material_ops = vec![MaterialOperation::remove("skin")];
        table.level_mut(1).unwrap().material_ops = vec![
            MaterialOperation::replace("glass", "glass_a"),
            MaterialOperation::replace("skin", "skin_flat"),
            MaterialOperation::replace("glass", "glass_b"),
        ];

        assert_eq!(
            resolve_material_ops(&table, 1).unwrap(),
            vec![
                MaterialOperation::replace("glass", "glass_b"),
                MaterialOperation::replace("skin", "skin_flat"),
            ]
        );
    }

    #[test]
    fn test_unset_materials_share_a_key() {
        let unset_replace = MaterialOperation {
            material: None,
            replacement: Some("fallback".to_string()),
        };
        let mut table = LodTable::new();
        table.set_declared_count(1, false).unwrap();
        table.set_inherit_enabled(false);
        table.level_mut(0).unwrap().material_ops = vec![
            unset_replace,
            MaterialOperation::remove("skin"),
            MaterialOperation::default(),
        ];

        assert_eq!(
            resolve_material_ops(&table, 0).unwrap(),
            vec![MaterialOperation::default(), MaterialOperation::remove("skin")]
        );
    }

    #[test]
    fn test_edits_visible_on_next_resolve() {
        let mut table = table_with_bones(true, &[&[BoneOperation::collapse("a")], &[]]);
        assert_eq!(resolve_bone_ops(&table, 1).unwrap().len(), 1);

        table.level_mut(0).unwrap().add_bone_op(BoneOperation::collapse("b"));
        assert_eq!(resolve_bone_ops(&table, 1).unwrap().len(), 2);
    }

    #[test]
    fn test_index_out_of_range() {
        let table = table_with_bones(true, &[&[], &[]]);
        assert_eq!(
            resolve_lod(&table, 2),
            Err(ContractViolation::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(resolve_material_ops(&LodTable::new(), 0).is_err());
    }

    #[test]
    fn test_resolve_all_carries_level_settings() {
        let mut table = LodTable::new();
        table.set_declared_count(2, false).unwrap();
        table.level_mut(1).unwrap().set_threshold(25.0).unwrap();
        table.level_mut(1).unwrap().suppress_flex_animation = true;

        let resolved = resolve_all(&table).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].index, 1);
        assert_eq!(resolved[1].threshold, 25.0);
        assert!(resolved[1].suppress_flex_animation);
        assert!(!resolved[0].suppress_flex_animation);
    }
}
