// SPDX-License-Identifier: MIT OR Apache-2.0
//! World shading node graph model for the Aurora build pipeline.
//!
//! This crate holds the generic representation of a world's shading graph:
//! nodes with typed sockets, links between them, and default values used
//! when a socket is unlinked. It knows nothing about how a graph is
//! resolved into shader data; that lives in `aurora_world_export`.
//!
//! ## Architecture
//!
//! - Nodes carry a closed [`NodeKind`] sum type; node kinds the pipeline
//!   does not recognize are represented as [`NodeKind::Unknown`] and are
//!   ignored by consumers rather than rejected.
//! - Links join one output socket to one input socket by index. An input
//!   socket accepts at most one incoming link.
//! - Everything serializes with serde so graphs can live in project files.

pub mod graph;
pub mod image;
pub mod link;
pub mod node;
pub mod socket;

pub use graph::NodeGraph;
pub use image::ImageReference;
pub use link::{Link, LinkError, LinkId};
pub use node::{Node, NodeId, NodeKind};
pub use socket::{Socket, SocketValue};
