// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the QC graph.

use crate::connection::Endpoint;
use crate::nodes::model_info::{PRIMARY_MESH_PORT, SEQUENCES_PORT};
use crate::nodes::{ModelInfo, RefMesh, SequenceInfo};
use crate::port::{Port, PortId, PortType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a node represents, with its data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Model-wide settings and LODs; at most one per graph
    ModelInfo(ModelInfo),
    /// Reference mesh with per-LOD meshes
    RefMesh(RefMesh),
    /// Animation sequence
    Sequence(SequenceInfo),
}

impl NodeKind {
    /// Default display name for this kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::ModelInfo(_) => "QC",
            Self::RefMesh(_) => "Reference Mesh",
            Self::Sequence(_) => "Sequence",
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Kind and data
    pub kind: NodeKind,
    /// Display name (can be customized)
    pub name: String,
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a node of the given kind with its standard ports
    pub fn new(kind: NodeKind) -> Self {
        let (inputs, outputs) = match &kind {
            NodeKind::ModelInfo(_) => (
                vec![
                    Port::input(PRIMARY_MESH_PORT, PortType::RefMesh),
                    Port::input(SEQUENCES_PORT, PortType::Sequence).multi(),
                ],
                Vec::new(),
            ),
            NodeKind::RefMesh(_) => (Vec::new(), vec![Port::output("Mesh", PortType::RefMesh)]),
            NodeKind::Sequence(_) => (Vec::new(), vec![Port::output("Sequence", PortType::Sequence)]),
        };

        Self {
            id: NodeId::new(),
            name: kind.label().to_string(),
            kind,
            inputs,
            outputs,
        }
    }

    /// Create a model info node
    pub fn model_info(info: ModelInfo) -> Self {
        Self::new(NodeKind::ModelInfo(info))
    }

    /// Create a reference mesh node
    pub fn ref_mesh(mesh: RefMesh) -> Self {
        Self::new(NodeKind::RefMesh(mesh))
    }

    /// Create a sequence node
    pub fn sequence(sequence: SequenceInfo) -> Self {
        Self::new(NodeKind::Sequence(sequence))
    }

    /// Endpoint of the input port called `name`
    pub fn input_endpoint(&self, name: &str) -> Option<Endpoint> {
        let port = self.inputs.iter().find(|p| p.name == name)?;
        Some(self.endpoint(port))
    }

    /// Endpoint of this node's output port; the primary node has none
    pub fn output_endpoint(&self) -> Option<Endpoint> {
        self.outputs.first().map(|port| self.endpoint(port))
    }

    fn endpoint(&self, port: &Port) -> Endpoint {
        Endpoint {
            node: self.id,
            port: port.id,
        }
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs
            .iter()
            .find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Model info data, if this is the primary node
    pub fn as_model_info(&self) -> Option<&ModelInfo> {
        match &self.kind {
            NodeKind::ModelInfo(info) => Some(info),
            _ => None,
        }
    }

    /// Reference mesh data, if this is a mesh node
    pub fn as_ref_mesh(&self) -> Option<&RefMesh> {
        match &self.kind {
            NodeKind::RefMesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Sequence data, if this is a sequence node
    pub fn as_sequence(&self) -> Option<&SequenceInfo> {
        match &self.kind {
            NodeKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }
}
