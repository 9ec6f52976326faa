//! Instance and vertex types handed to the drawing layer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color (trail triangles)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// One filled circle (bodies and fixed posts)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// Outline width; 0 for none
    pub outline: f32,
    pub color: [f32; 4],
    pub outline_color: [f32; 4],
}

impl CircleInstance {
    pub fn new(center: Vec2, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: center.to_array(),
            radius,
            outline: 0.0,
            color,
            outline_color: color,
        }
    }

    pub fn with_outline(mut self, width: f32, color: [f32; 4]) -> Self {
        self.outline = width;
        self.outline_color = color;
        self
    }
}

/// Axis-aligned rectangle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    pub color: [f32; 4],
}

/// Line segment (springs, tether, velocity vectors)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub width: f32,
    pub color: [f32; 4],
}

impl LineInstance {
    pub fn new(start: Vec2, end: Vec2, width: f32, color: [f32; 4]) -> Self {
        Self {
            start: start.to_array(),
            end: end.to_array(),
            width,
            color,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const OBSTACLE: [f32; 4] = [0.7, 0.7, 0.8, 1.0];
    pub const COLLECTIBLE: [f32; 4] = [0.9, 0.85, 0.3, 1.0]; // Gold/yellow
    pub const SPRING: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
    pub const TETHER: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const LAUNCH_PREVIEW: [f32; 4] = [1.0, 0.87, 0.47, 1.0];
    pub const VELOCITY: [f32; 4] = [1.0, 0.4, 0.2, 0.9];
    pub const CONTROLLED_OUTLINE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
}
