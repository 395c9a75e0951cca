// SPDX-License-Identifier: MIT OR Apache-2.0
//! QC graph containing nodes and connections.

use crate::connection::{Connection, ConnectionId, Endpoint};
use crate::node::{Node, NodeId, NodeKind};
use crate::nodes::{ModelInfo, RefMesh, SequenceInfo};
use crate::port::{Port, PortId, PortType};
use indexmap::IndexMap;
use qc_lod::{set_declared_count_all, ContractViolation, LodSlots};
use serde::{Deserialize, Serialize};

/// A QC node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcGraph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl QcGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Parse a graph from RON and check it with [`Self::validate`]
    pub fn from_ron(source: &str) -> Result<Self, GraphError> {
        let graph: Self = ron::from_str(source)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Serialize the graph to RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Check invariants that the mutators maintain but a file may not.
    ///
    /// At most one primary node, a well-formed LOD table, every reference
    /// mesh sized to the declared count, and no connection to a missing node.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut primaries = self
            .nodes
            .values()
            .filter(|n| matches!(n.kind, NodeKind::ModelInfo(_)));
        primaries.next();
        if let Some(extra) = primaries.next() {
            return Err(GraphError::DuplicatePrimary(extra.id));
        }

        if let Some(info) = self.model_info() {
            info.lods.validate()?;
        }
        let count = self.lod_count();
        for mesh in self.nodes.values().filter_map(Node::as_ref_mesh) {
            mesh.validate(count)?;
        }

        if let Some(dangling) = self
            .connections
            .values()
            .find(|c| !self.nodes.contains_key(&c.source.node) || !self.nodes.contains_key(&c.target.node))
        {
            return Err(GraphError::DanglingConnection(dangling.id));
        }
        Ok(())
    }

    /// Add a node to the graph.
    ///
    /// Only one model info node may exist, and its LOD count is applied to the
    /// reference meshes already present. A reference mesh is shaped to the
    /// graph's current LOD count on insertion.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        let primary_count = match &mut node.kind {
            NodeKind::ModelInfo(info) => {
                if let Some(existing) = self.primary_node_id() {
                    return Err(GraphError::DuplicatePrimary(existing));
                }
                info.lods.validate()?;
                Some(info.lods.declared_count())
            }
            NodeKind::RefMesh(mesh) => {
                mesh.resize_lod_slots(self.lod_count());
                None
            }
            NodeKind::Sequence(_) => None,
        };

        let id = node.id;
        tracing::debug!(?id, kind = node.kind.label(), "added node");
        self.nodes.insert(id, node);
        if let Some(count) = primary_count {
            self.set_lod_count(count)?;
        }
        Ok(id)
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.touches(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link an output endpoint to an input endpoint.
    ///
    /// Both ports must exist, carry the same payload and run output to input.
    /// An input that is not multi-connect accepts one link.
    pub fn connect(&mut self, source: Endpoint, target: Endpoint) -> Result<ConnectionId, ConnectionError> {
        if source.node == target.node {
            return Err(ConnectionError::SelfLoop);
        }

        let source_port = self.port_at(source)?;
        let target_port = self.port_at(target)?;
        if !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }
        if !target_port.multi_connect && self.connections.values().any(|c| c.target == target) {
            return Err(ConnectionError::PortAlreadyConnected(target.port));
        }

        let connection = Connection::between(source, target, source_port.port_type);
        let id = connection.id;
        tracing::debug!(?id, payload = ?connection.payload, "connected");
        self.connections.insert(id, connection);
        Ok(id)
    }

    fn port_at(&self, endpoint: Endpoint) -> Result<&Port, ConnectionError> {
        self.nodes
            .get(&endpoint.node)
            .ok_or(ConnectionError::NodeNotFound(endpoint.node))?
            .port(&endpoint.port)
            .ok_or(ConnectionError::PortNotFound(endpoint.port))
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Links delivering `payload` into `node`, in creation order
    pub fn connections_into(&self, node: NodeId, payload: PortType) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.feeds(node, payload))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// ID of the model info node
    pub fn primary_node_id(&self) -> Option<NodeId> {
        self.primary_node().map(|n| n.id)
    }

    /// The model info node
    pub fn primary_node(&self) -> Option<&Node> {
        self.nodes.values().find(|n| matches!(n.kind, NodeKind::ModelInfo(_)))
    }

    /// Model info data of the primary node
    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.primary_node().and_then(Node::as_model_info)
    }

    /// Mutable model info data of the primary node
    pub fn model_info_mut(&mut self) -> Option<&mut ModelInfo> {
        self.nodes.values_mut().find_map(|n| match &mut n.kind {
            NodeKind::ModelInfo(info) => Some(info),
            _ => None,
        })
    }

    /// Declared LOD count of the primary node, 0 without one
    pub fn lod_count(&self) -> usize {
        self.model_info().map_or(0, |info| info.lods.declared_count())
    }

    /// Change the LOD count of the model.
    ///
    /// Resizes the model info LOD table and every reference mesh's LOD array in
    /// one step.
    pub fn set_lod_count(&mut self, count: usize) -> Result<(), ContractViolation> {
        let targets = self.nodes.values_mut().filter_map(|n| match &mut n.kind {
            NodeKind::ModelInfo(info) => Some(&mut info.lods as &mut dyn LodSlots),
            NodeKind::RefMesh(mesh) => Some(mesh as &mut dyn LodSlots),
            NodeKind::Sequence(_) => None,
        });
        set_declared_count_all(count, targets)?;
        tracing::info!(count, graph = %self.name, "set LOD count");
        Ok(())
    }

    /// Node feeding the primary node's mesh input
    pub fn primary_mesh_node(&self) -> Option<&Node> {
        let primary = self.primary_node_id()?;
        let link = self.connections_into(primary, PortType::RefMesh).next()?;
        self.node(link.source.node)
    }

    /// Reference mesh connected to the primary node
    pub fn primary_mesh(&self) -> Option<&RefMesh> {
        self.primary_mesh_node().and_then(Node::as_ref_mesh)
    }

    /// Mutable reference mesh data of a node
    pub fn ref_mesh_mut(&mut self, node_id: NodeId) -> Option<&mut RefMesh> {
        match &mut self.nodes.get_mut(&node_id)?.kind {
            NodeKind::RefMesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Sequences connected to the primary node, in connection order
    pub fn sequences(&self) -> Vec<&SequenceInfo> {
        let Some(primary) = self.primary_node_id() else {
            return Vec::new();
        };

        self.connections_into(primary, PortType::Sequence)
            .filter_map(|c| self.node(c.source.node))
            .filter_map(Node::as_sequence)
            .collect()
    }
}

impl Default for QcGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when loading a graph or editing its node set
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A second model info node was added
    #[error("Graph already has a primary QC node: {0:?}")]
    DuplicatePrimary(NodeId),

    /// A connection refers to a node that is not in the graph
    #[error("Connection {0:?} refers to a missing node")]
    DanglingConnection(ConnectionId),

    /// LOD data is out of range or out of step with the declared count
    #[error("Invalid LOD data: {0}")]
    Lod(#[from] ContractViolation),

    /// Graph file is not valid RON for a graph
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Incompatible port types or directions
    #[error("Incompatible ports")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
