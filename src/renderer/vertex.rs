//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::scene::Paint;

/// Simple 2D vertex with position and color
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

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Neon palette
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const WALL: [f32; 4] = [0.0, 0.9, 1.0, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BUMPER: [f32; 4] = [1.0, 0.1, 0.8, 1.0];
    pub const BUMPER_GLOW: [f32; 4] = [1.0, 0.1, 0.8, 0.25];
    pub const FLIPPER: [f32; 4] = [0.2, 1.0, 0.4, 1.0];
}

pub fn paint_color(paint: Paint) -> [f32; 4] {
    match paint {
        Paint::Ball => colors::BALL,
        Paint::Bumper => colors::BUMPER,
        Paint::Flipper => colors::FLIPPER,
        Paint::Wall => colors::WALL,
    }
}
