//! Fullscreen quad geometry shared by the surface passes.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // clip space, -1..1
    pub uv: [f32; 2],  // 0..1, v grows downward
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 2, 1, 0, 3, 2];
