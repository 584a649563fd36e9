// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Create a new random link ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

/// A link from one node's output socket to another node's input socket.
///
/// Sockets are addressed by index into the owning node's socket lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique link ID
    pub id: LinkId,
    /// Producing node
    pub from_node: NodeId,
    /// Output socket index on the producing node
    pub from_socket: usize,
    /// Consuming node
    pub to_node: NodeId,
    /// Input socket index on the consuming node
    pub to_socket: usize,
}

impl Link {
    /// Create a new link
    pub fn new(from_node: NodeId, from_socket: usize, to_node: NodeId, to_socket: usize) -> Self {
        Self {
            id: LinkId::new(),
            from_node,
            from_socket,
            to_node,
            to_socket,
        }
    }

    /// Check if this link involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket index out of range for the node
    #[error("Socket {socket} not found on node {node:?}")]
    SocketNotFound {
        /// Owning node
        node: NodeId,
        /// Socket index
        socket: usize,
    },

    /// Input socket already has an incoming link (no fan-in)
    #[error("Input socket {socket} on node {node:?} is already linked")]
    SocketAlreadyLinked {
        /// Owning node
        node: NodeId,
        /// Socket index
        socket: usize,
    },

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
