// SPDX-License-Identifier: MIT OR Apache-2.0
//! Explicit edits to a QC graph.
//!
//! Every change the host makes to LOD data goes through a [`GraphEdit`], so
//! that a count change is one deliberate call that resizes every LOD array,
//! not a side effect of setting a field.

use crate::graph::QcGraph;
use crate::node::NodeId;
use crate::nodes::ModelInfo;
use qc_lod::{BoneOperation, ContractViolation, MaterialOperation};
use serde::{Deserialize, Serialize};

/// A single edit to the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEdit {
    /// Change the number of LODs
    SetLodCount(usize),
    /// Toggle LOD inheritance
    SetInherit(bool),
    /// Select the LOD shown for editing
    SetActiveLod(usize),
    /// Change a LOD's threshold
    SetThreshold {
        /// LOD index
        lod: usize,
        /// New threshold
        threshold: f32,
    },
    /// Toggle flex animation suppression for a LOD
    SetSuppressFlex {
        /// LOD index
        lod: usize,
        /// New value
        suppress: bool,
    },
    /// Append a bone operation to a LOD
    AddBoneOp {
        /// LOD index
        lod: usize,
        /// Operation to append
        op: BoneOperation,
    },
    /// Remove a bone operation from a LOD
    RemoveBoneOp {
        /// LOD index
        lod: usize,
        /// Position in the LOD's bone list
        index: usize,
    },
    /// Append a material operation to a LOD
    AddMaterialOp {
        /// LOD index
        lod: usize,
        /// Operation to append
        op: MaterialOperation,
    },
    /// Remove a material operation from a LOD
    RemoveMaterialOp {
        /// LOD index
        lod: usize,
        /// Position in the LOD's material list
        index: usize,
    },
    /// Set the mesh file of a reference mesh slot (0 is the reference)
    SetMeshFile {
        /// Reference mesh node
        node: NodeId,
        /// Slot index
        slot: usize,
        /// Mesh file, or `None` to clear
        file: Option<String>,
    },
}

impl GraphEdit {
    /// Human-readable description for history
    pub fn description(&self) -> String {
        match self {
            Self::SetLodCount(count) => format!("Set LOD count to {count}"),
            Self::SetInherit(true) => "Enable LOD inheritance".to_string(),
            Self::SetInherit(false) => "Disable LOD inheritance".to_string(),
            Self::SetActiveLod(lod) => format!("Select LOD {}", lod + 1),
            Self::SetThreshold { lod, threshold } => format!("Set LOD {} threshold to {threshold}", lod + 1),
            Self::SetSuppressFlex { lod, .. } => format!("Toggle flex animation on LOD {}", lod + 1),
            Self::AddBoneOp { lod, .. } => format!("Add bone operation to LOD {}", lod + 1),
            Self::RemoveBoneOp { lod, .. } => format!("Remove bone operation from LOD {}", lod + 1),
            Self::AddMaterialOp { lod, .. } => format!("Add material operation to LOD {}", lod + 1),
            Self::RemoveMaterialOp { lod, .. } => format!("Remove material operation from LOD {}", lod + 1),
            Self::SetMeshFile { slot, .. } => format!("Set mesh file for slot {slot}"),
        }
    }

    /// Apply the edit. A failed edit leaves the graph unchanged.
    pub fn apply(&self, graph: &mut QcGraph) -> Result<(), EditError> {
        match self {
            Self::SetLodCount(count) => {
                if graph.primary_node_id().is_none() {
                    return Err(EditError::NoPrimaryNode);
                }
                graph.set_lod_count(*count)?;
            }
            Self::SetInherit(enabled) => primary(graph)?.lods.set_inherit_enabled(*enabled),
            Self::SetActiveLod(lod) => primary(graph)?.lods.set_active_lod(*lod)?,
            Self::SetThreshold { lod, threshold } => {
                primary(graph)?.lods.level_mut(*lod)?.set_threshold(*threshold)?;
            }
            Self::SetSuppressFlex { lod, suppress } => {
                primary(graph)?.lods.level_mut(*lod)?.suppress_flex_animation = *suppress;
            }
            Self::AddBoneOp { lod, op } => primary(graph)?.lods.level_mut(*lod)?.add_bone_op(op.clone()),
            Self::RemoveBoneOp { lod, index } => {
                primary(graph)?.lods.level_mut(*lod)?.remove_bone_op(*index)?;
            }
            Self::AddMaterialOp { lod, op } => {
                primary(graph)?.lods.level_mut(*lod)?.add_material_op(op.clone());
            }
            Self::RemoveMaterialOp { lod, index } => {
                primary(graph)?.lods.level_mut(*lod)?.remove_material_op(*index)?;
            }
            Self::SetMeshFile { node, slot, file } => {
                let mesh = graph.ref_mesh_mut(*node).ok_or(EditError::NotAMesh(*node))?;
                let len = mesh.lods().len();
                let entry = mesh
                    .slot_mut(*slot)
                    .ok_or(EditError::Lod(ContractViolation::IndexOutOfRange { index: *slot, len }))?;
                entry.exportable = file.clone();
            }
        }

        tracing::debug!(edit = %self.description(), "applied graph edit");
        Ok(())
    }
}

fn primary(graph: &mut QcGraph) -> Result<&mut ModelInfo, EditError> {
    graph.model_info_mut().ok_or(EditError::NoPrimaryNode)
}

/// Error when applying an edit
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The graph has no model info node
    #[error("Graph has no primary QC node")]
    NoPrimaryNode,

    /// Node is missing or not a reference mesh
    #[error("Not a reference mesh node: {0:?}")]
    NotAMesh(NodeId),

    /// LOD data rejected the edit
    #[error("{0}")]
    Lod(#[from] ContractViolation),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::nodes::RefMesh;

    fn graph() -> (QcGraph, NodeId) {
        let mut graph = QcGraph::new("test");
        graph.add_node(Node::model_info(ModelInfo::new("test.mdl"))).unwrap();
        let mesh = graph.add_node(Node::ref_mesh(RefMesh::new("body", "ref.smd"))).unwrap();
        (graph, mesh)
    }

    #[test]
    fn test_lod_edits() {
        let (mut graph, _) = graph();
        GraphEdit::SetLodCount(2).apply(&mut graph).unwrap();
        GraphEdit::AddBoneOp { lod: 1, op: BoneOperation::collapse("pelvis") }
            .apply(&mut graph)
            .unwrap();
        GraphEdit::SetThreshold { lod: 1, threshold: 40.0 }.apply(&mut graph).unwrap();
        GraphEdit::SetInherit(false).apply(&mut graph).unwrap();

        let lods = &graph.model_info().unwrap().lods;
        assert!(!lods.inherit_enabled());
        assert_eq!(lods.level(1).unwrap().threshold(), 40.0);
        assert_eq!(lods.level(1).unwrap().bone_ops.len(), 1);

        GraphEdit::RemoveBoneOp { lod: 1, index: 0 }.apply(&mut graph).unwrap();
        assert!(graph.model_info().unwrap().lods.level(1).unwrap().bone_ops.is_empty());
    }

    #[test]
    fn test_rejected_edits() {
        let (mut graph, mesh) = graph();
        assert!(matches!(
            GraphEdit::AddBoneOp { lod: 0, op: BoneOperation::collapse("a") }.apply(&mut graph),
            Err(EditError::Lod(ContractViolation::IndexOutOfRange { index: 0, len: 0 }))
        ));
        assert!(matches!(
            GraphEdit::SetLodCount(12).apply(&mut graph),
            Err(EditError::Lod(ContractViolation::CountOutOfRange(12)))
        ));
        assert!(matches!(
            GraphEdit::SetMeshFile { node: mesh, slot: 3, file: None }.apply(&mut graph),
            Err(EditError::Lod(_))
        ));

        let mut bare = QcGraph::new("bare");
        assert!(matches!(
            GraphEdit::SetInherit(true).apply(&mut bare),
            Err(EditError::NoPrimaryNode)
        ));
    }

    #[test]
    fn test_mesh_file_edit() {
        let (mut graph, mesh) = graph();
        GraphEdit::SetLodCount(1).apply(&mut graph).unwrap();
        GraphEdit::SetMeshFile { node: mesh, slot: 1, file: Some("lod1.smd".to_string()) }
            .apply(&mut graph)
            .unwrap();
        let mesh = graph.node(mesh).unwrap().as_ref_mesh().unwrap();
        assert_eq!(mesh.lod_exportable(0), Some("lod1.smd"));
    }
}
