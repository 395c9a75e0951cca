// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference mesh node.
//!
//! Slot 0 of the LOD array is the reference mesh itself, slot `i + 1` is the
//! mesh used by LOD `i`.

use qc_lod::{check_slot_count, resize_lod_array, LodSlots};
use serde::{Deserialize, Serialize};

/// One entry of a reference mesh's LOD array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshLod {
    /// Mesh source file exported for this slot
    pub exportable: Option<String>,
}

/// A body and the meshes it uses at each level of detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefMesh {
    /// Body name written to the script
    pub body_name: String,
    lods: Vec<MeshLod>,
}

impl RefMesh {
    /// Create a reference mesh with only its reference slot
    pub fn new(body_name: impl Into<String>, exportable: impl Into<String>) -> Self {
        Self {
            body_name: body_name.into(),
            lods: vec![MeshLod {
                exportable: Some(exportable.into()),
            }],
        }
    }

    /// All slots, reference first
    pub fn lods(&self) -> &[MeshLod] {
        &self.lods
    }

    /// The reference mesh file
    pub fn reference(&self) -> Option<&str> {
        self.lods.first().and_then(|slot| slot.exportable.as_deref())
    }

    /// The mesh file used by LOD `lod`
    pub fn lod_exportable(&self, lod: usize) -> Option<&str> {
        self.lods.get(lod + 1).and_then(|slot| slot.exportable.as_deref())
    }

    /// Mutable access to the slot at `slot` (0 is the reference)
    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut MeshLod> {
        self.lods.get_mut(slot)
    }

    /// Check that the array holds the reference plus one slot per declared LOD
    pub fn validate(&self, declared_count: usize) -> qc_lod::Result<()> {
        check_slot_count(declared_count + 1, self.lods.len())
    }
}

impl LodSlots for RefMesh {
    fn resize_lod_slots(&mut self, declared_count: usize) {
        // The reference is held in the array too
        resize_lod_array(&mut self.lods, declared_count + 1);
    }

    fn lod_slot_count(&self) -> usize {
        self.lods.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_slot_survives_resize() {
        let mut mesh = RefMesh::new("body", "body_ref.smd");
        mesh.resize_lod_slots(2);
        assert_eq!(mesh.lod_slot_count(), 3);
        assert_eq!(mesh.reference(), Some("body_ref.smd"));
        assert_eq!(mesh.lod_exportable(0), None);

        mesh.slot_mut(2).unwrap().exportable = Some("body_lod2.smd".to_string());
        assert_eq!(mesh.lod_exportable(1), Some("body_lod2.smd"));

        mesh.resize_lod_slots(0);
        assert_eq!(mesh.lods().len(), 1);
        assert_eq!(mesh.reference(), Some("body_ref.smd"));
    }

    #[test]
    fn test_validate_slot_count() {
        let mut mesh = RefMesh::new("body", "body_ref.smd");
        mesh.resize_lod_slots(3);
        assert_eq!(mesh.validate(3), Ok(()));
        assert_eq!(
            mesh.validate(2),
            Err(qc_lod::ContractViolation::SlotCountMismatch { expected: 3, actual: 4 })
        );
    }
}
