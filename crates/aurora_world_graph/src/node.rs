// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the world shading graph.

use crate::image::ImageReference;
use crate::socket::{Socket, SocketValue};
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

/// The closed vocabulary of node kinds the export pipeline understands.
///
/// Kinds authored by other tooling that this pipeline does not recognize
/// are preserved as [`NodeKind::Unknown`] so a graph never fails to load;
/// consumers treat them as no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Terminal world output node
    WorldOutput,
    /// Background surface (color + strength)
    Background,
    /// Equirectangular environment texture
    EnvironmentTexture {
        /// Bound image, if the artist assigned one
        image: Option<ImageReference>,
    },
    /// Static image background
    ImageTexture {
        /// Bound image, if the artist assigned one
        image: Option<ImageReference>,
    },
    /// Procedural sky
    SkyTexture {
        /// Direction towards the sun, in the authoring coordinate system
        sun_direction: [f32; 3],
        /// Atmospheric turbidity
        turbidity: f32,
        /// Ground albedo below the horizon
        ground_albedo: f32,
    },
    /// Any node kind this pipeline does not recognize
    Unknown(String),
}

impl NodeKind {
    /// Short tag for logging.
    pub fn tag(&self) -> &str {
        match self {
            Self::WorldOutput => "world_output",
            Self::Background => "background",
            Self::EnvironmentTexture { .. } => "environment_texture",
            Self::ImageTexture { .. } => "image_texture",
            Self::SkyTexture { .. } => "sky_texture",
            Self::Unknown(tag) => tag,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind plus kind-specific properties
    pub kind: NodeKind,
    /// Display name
    pub name: String,
    /// Ordered input sockets
    pub inputs: Vec<Socket>,
    /// Ordered output sockets
    pub outputs: Vec<Socket>,
}

impl Node {
    fn new(kind: NodeKind, name: &str, inputs: Vec<Socket>, outputs: Vec<Socket>) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            name: name.to_string(),
            inputs,
            outputs,
        }
    }

    /// The terminal world output node. Its sole input receives the surface.
    pub fn world_output() -> Self {
        Self::new(
            NodeKind::WorldOutput,
            "World Output",
            vec![Socket::color("Surface", [0.0, 0.0, 0.0, 1.0])],
            vec![],
        )
    }

    /// Background surface node with a color and strength input.
    pub fn background(color: [f32; 4], strength: f32) -> Self {
        Self::new(
            NodeKind::Background,
            "Background",
            vec![
                Socket::color("Color", color),
                Socket::float("Strength", strength),
            ],
            vec![Socket::color("Background", [0.0, 0.0, 0.0, 1.0])],
        )
    }

    /// Environment texture color source.
    pub fn environment_texture(image: Option<ImageReference>) -> Self {
        Self::new(
            NodeKind::EnvironmentTexture { image },
            "Environment Texture",
            vec![Socket::vector3("Vector", [0.0, 0.0, 0.0])],
            vec![Socket::color("Color", [0.0, 0.0, 0.0, 1.0])],
        )
    }

    /// Static image color source.
    pub fn image_texture(image: Option<ImageReference>) -> Self {
        Self::new(
            NodeKind::ImageTexture { image },
            "Image Texture",
            vec![Socket::vector3("Vector", [0.0, 0.0, 0.0])],
            vec![Socket::color("Color", [0.0, 0.0, 0.0, 1.0])],
        )
    }

    /// Procedural sky color source.
    pub fn sky(sun_direction: [f32; 3], turbidity: f32, ground_albedo: f32) -> Self {
        Self::new(
            NodeKind::SkyTexture {
                sun_direction,
                turbidity,
                ground_albedo,
            },
            "Sky Texture",
            vec![Socket::vector3("Vector", [0.0, 0.0, 0.0])],
            vec![Socket::color("Color", [0.0, 0.0, 0.0, 1.0])],
        )
    }

    /// A node of a kind this pipeline does not recognize.
    ///
    /// Editors register many node types (logic gates, vector math, ...)
    /// that are meaningless to the world export; they survive loading as
    /// `Unknown` and are skipped during traversal.
    pub fn unknown(tag: impl Into<String>, inputs: Vec<Socket>, outputs: Vec<Socket>) -> Self {
        let tag = tag.into();
        let name = tag.clone();
        Self::new(NodeKind::Unknown(tag), &name, inputs, outputs)
    }

    /// Get an input socket by index
    pub fn input(&self, index: usize) -> Option<&Socket> {
        self.inputs.get(index)
    }

    /// Get an output socket by index
    pub fn output(&self, index: usize) -> Option<&Socket> {
        self.outputs.get(index)
    }

    /// Default value of an input socket, if present.
    pub fn input_value(&self, index: usize) -> Option<&SocketValue> {
        self.inputs.get(index).map(|s| &s.value)
    }
}
