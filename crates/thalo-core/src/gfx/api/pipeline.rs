// Copyright 2025 thalo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shader and pipeline state descriptors.
//!
//! A shader enters this layer as a compiled bytecode blob; compilation from
//! source is an external collaborator's job. A pipeline is the bound shader
//! stages plus the fixed-function state that accompanies them.

use crate::gfx::api::texture::TextureFormat;
use crate::gfx::handle::RawHandle;

/// The programmable stage a shader module is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment (pixel) shader stage.
    Fragment,
}

/// A descriptor used to create a [`ShaderId`].
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// The stage the bytecode was compiled for.
    pub stage: ShaderStage,
    /// The compiled, backend-native shader bytecode.
    pub bytecode: Vec<u8>,
}

impl ShaderDesc {
    /// Bundles a stage with its compiled bytecode.
    pub fn new(stage: ShaderStage, bytecode: Vec<u8>) -> Self {
        Self { stage, bytecode }
    }
}

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveTopology {
    /// Each vertex is an isolated point.
    PointList,
    /// Every pair of vertices is a line.
    LineList,
    /// Every triple of vertices is a triangle.
    TriangleList,
    /// Each vertex after the second forms a triangle with its two predecessors.
    TriangleStrip,
}

/// Which triangle faces are discarded during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CullMode {
    /// No culling.
    None,
    /// Discard front-facing triangles.
    Front,
    /// Discard back-facing triangles.
    Back,
}

/// A comparison used for depth testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// Passes when the new value is less than the stored value.
    Less,
    /// Passes on equality.
    Equal,
    /// Passes when less than or equal.
    LessEqual,
    /// Passes when greater.
    Greater,
    /// Passes on inequality.
    NotEqual,
    /// Passes when greater than or equal.
    GreaterEqual,
    /// The test always passes.
    Always,
}

/// The memory format of a single vertex attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexFormat {
    /// One 32-bit float component.
    Float32,
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
    /// One 32-bit unsigned integer component.
    Uint32,
    /// Four 8-bit unsigned normalized components.
    Unorm8x4,
}

impl VertexFormat {
    /// Returns the size in bytes of this vertex format.
    pub const fn size(&self) -> u32 {
        match self {
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
            VertexFormat::Uint32 => 4,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

/// The role a vertex attribute plays, mapped to an input semantic by the
/// Direct3D backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexSemantic {
    /// Vertex position.
    Position,
    /// Vertex normal.
    Normal,
    /// Vertex color.
    Color,
    /// Texture coordinates.
    TexCoord,
}

/// One attribute within a vertex layout.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexAttribute {
    /// The attribute's role.
    pub semantic: VertexSemantic,
    /// Distinguishes repeated semantics (e.g. two texture coordinate sets).
    pub semantic_index: u32,
    /// The attribute's data format.
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

/// The layout of one vertex buffer slot.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexLayout {
    /// The distance in bytes between consecutive vertices.
    pub stride: u32,
    /// The attributes read from each vertex.
    pub attributes: Vec<VertexAttribute>,
}

/// Depth-stencil configuration of a pipeline.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthState {
    /// The format of the depth-stencil target the pipeline renders into.
    pub format: TextureFormat,
    /// The depth comparison; [`CompareFunction::Always`] disables the test.
    pub compare: CompareFunction,
    /// Whether passing fragments write their depth.
    pub write_enabled: bool,
}

/// A descriptor used to create a [`PipelineId`].
///
/// Pipeline state is immutable once created: bound shaders plus the
/// fixed-function state, validated against the target formats it will render
/// into.
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// The vertex shader. Required.
    pub vertex_shader: ShaderId,
    /// The fragment shader, or `None` for depth-only rendering.
    pub fragment_shader: Option<ShaderId>,
    /// The layout of vertex buffer slot 0.
    pub vertex_layout: VertexLayout,
    /// Primitive assembly mode.
    pub topology: PrimitiveTopology,
    /// Face culling mode.
    pub cull_mode: CullMode,
    /// The formats of the color targets this pipeline renders into, in
    /// binding order.
    pub color_formats: Vec<TextureFormat>,
    /// Depth-stencil state, or `None` when no depth target is bound.
    pub depth: Option<DepthState>,
}

/// An opaque handle to a compiled shader module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub RawHandle);

/// An opaque handle to an immutable pipeline state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub RawHandle);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_format_sizes() {
        assert_eq!(VertexFormat::Float32x3.size(), 12);
        assert_eq!(VertexFormat::Unorm8x4.size(), 4);
    }

    #[test]
    fn vertex_layout_default_is_empty() {
        let layout = VertexLayout::default();
        assert_eq!(layout.stride, 0);
        assert!(layout.attributes.is_empty());
    }
}
