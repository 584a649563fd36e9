// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};

/// Value carried by a socket when it is not driven by a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Scalar value
    Float(f32),
    /// 3D vector
    Vector3([f32; 3]),
    /// RGBA color
    Color([f32; 4]),
}

impl SocketValue {
    /// Get the scalar value, if this is a float socket.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the vector value, if this is a vector socket.
    pub fn as_vector3(&self) -> Option<[f32; 3]> {
        match self {
            Self::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the color value, if this is a color socket.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

/// A typed socket on a node.
///
/// Whether a socket is linked is derived from the graph's links, not
/// stored here; the default value applies only while unlinked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    /// Socket name
    pub name: String,
    /// Default value used when the socket is unlinked
    pub value: SocketValue,
}

impl Socket {
    /// Create a new socket with a default value.
    pub fn new(name: impl Into<String>, value: SocketValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a float socket.
    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, SocketValue::Float(value))
    }

    /// Create a vector socket.
    pub fn vector3(name: impl Into<String>, value: [f32; 3]) -> Self {
        Self::new(name, SocketValue::Vector3(value))
    }

    /// Create a color socket.
    pub fn color(name: impl Into<String>, value: [f32; 4]) -> Self {
        Self::new(name, SocketValue::Color(value))
    }
}
