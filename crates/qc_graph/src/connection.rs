// SPDX-License-Identifier: MIT OR Apache-2.0
//! Links between node ports.
//!
//! A connection records the payload it carries, so lookups such as "the mesh
//! feeding the primary node" filter on the payload instead of going back
//! through the target node's port list.

use crate::node::NodeId;
use crate::port::{PortId, PortType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A port on a specific node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Owning node
    pub node: NodeId,
    /// Port on that node
    pub port: PortId,
}

/// A validated link from an output endpoint to an input endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Output side
    pub source: Endpoint,
    /// Input side
    pub target: Endpoint,
    /// What flows along the link
    pub payload: PortType,
}

impl Connection {
    /// Build a link. Only the graph creates connections, after checking both
    /// ends.
    pub(crate) fn between(source: Endpoint, target: Endpoint, payload: PortType) -> Self {
        Self {
            id: ConnectionId::generate(),
            source,
            target,
            payload,
        }
    }

    /// Whether either end sits on `node`
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.target.node == node
    }

    /// Whether this link delivers `payload` into `node`
    pub fn feeds(&self, node: NodeId, payload: PortType) -> bool {
        self.target.node == node && self.payload == payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint {
            node: NodeId::new(),
            port: PortId::new(),
        }
    }

    #[test]
    fn test_feeds_matches_target_and_payload() {
        let (mesh, primary) = (endpoint(), endpoint());
        let link = Connection::between(mesh, primary, PortType::RefMesh);

        assert!(link.feeds(primary.node, PortType::RefMesh));
        assert!(!link.feeds(primary.node, PortType::Sequence));
        assert!(!link.feeds(mesh.node, PortType::RefMesh));

        assert!(link.touches(mesh.node));
        assert!(link.touches(primary.node));
        assert!(!link.touches(NodeId::new()));
    }
}
