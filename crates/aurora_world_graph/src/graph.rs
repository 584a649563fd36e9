// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and links.

use crate::link::{Link, LinkError, LinkId};
use crate::node::{Node, NodeId, NodeKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A world shading node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGraph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Links between sockets
    links: IndexMap<LinkId, Link>,
}

impl NodeGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its links
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.links.retain(|_, l| !l.involves_node(node_id));
        self.nodes.swap_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link an output socket to an input socket.
    ///
    /// An input socket accepts at most one incoming link; connecting to an
    /// already-driven input is an error rather than a silent replacement.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_socket: usize,
        to_node: NodeId,
        to_socket: usize,
    ) -> Result<LinkId, LinkError> {
        let source = self
            .nodes
            .get(&from_node)
            .ok_or(LinkError::NodeNotFound(from_node))?;
        let target = self
            .nodes
            .get(&to_node)
            .ok_or(LinkError::NodeNotFound(to_node))?;

        if source.output(from_socket).is_none() {
            return Err(LinkError::SocketNotFound {
                node: from_node,
                socket: from_socket,
            });
        }
        if target.input(to_socket).is_none() {
            return Err(LinkError::SocketNotFound {
                node: to_node,
                socket: to_socket,
            });
        }

        if from_node == to_node {
            return Err(LinkError::SelfLoop);
        }

        if self
            .links
            .values()
            .any(|l| l.to_node == to_node && l.to_socket == to_socket)
        {
            return Err(LinkError::SocketAlreadyLinked {
                node: to_node,
                socket: to_socket,
            });
        }

        let link = Link::new(from_node, from_socket, to_node, to_socket);
        let id = link.id;
        self.links.insert(id, link);
        Ok(id)
    }

    /// Remove a link
    pub fn disconnect(&mut self, link_id: LinkId) -> Option<Link> {
        self.links.swap_remove(&link_id)
    }

    /// Get all links
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Whether an input socket is driven by a link.
    pub fn is_linked(&self, node_id: NodeId, socket_index: usize) -> bool {
        self.links
            .values()
            .any(|l| l.to_node == node_id && l.to_socket == socket_index)
    }

    /// The node driving the given input socket, or `None` if unlinked.
    pub fn linked_producer(&self, node_id: NodeId, socket_index: usize) -> Option<&Node> {
        let link = self
            .links
            .values()
            .find(|l| l.to_node == node_id && l.to_socket == socket_index)?;
        self.nodes.get(&link.from_node)
    }

    /// The terminal world output node, or `None` if the graph has none.
    ///
    /// Absence is not an error; it means there is nothing to export.
    pub fn output_node(&self) -> Option<&Node> {
        self.nodes
            .values()
            .find(|n| matches!(n.kind, NodeKind::WorldOutput))
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
