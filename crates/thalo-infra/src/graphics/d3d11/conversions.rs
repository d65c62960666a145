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

//! Pure mappings from backend-agnostic types to Direct3D 11 equivalents.

use thalo_core::gfx::{
    BufferUsage, CompareFunction, CullMode, HeapKind, PrimitiveTopology, TextureFormat,
    TextureUsage, VertexFormat, VertexSemantic,
};
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

/// Direct3D 11 has no descriptor heap object; only the view-pool kinds the
/// original target/view model needs can be realized.
pub(crate) fn heap_kind_supported(kind: HeapKind) -> bool {
    matches!(kind, HeapKind::ColorTarget | HeapKind::DepthStencil)
}

/// Bind flags for a texture.
///
/// Typed depth formats cannot also be bound for sampling without a typeless
/// resource, so the shader-resource flag is dropped for them.
pub(crate) fn bind_flags_from_texture_usage(usage: TextureUsage, format: TextureFormat) -> u32 {
    let mut flags = 0;
    if usage.contains(TextureUsage::TEXTURE_BINDING) && !format.has_depth_aspect() {
        flags |= D3D11_BIND_SHADER_RESOURCE.0 as u32;
    }
    if usage.contains(TextureUsage::COLOR_ATTACHMENT) {
        flags |= D3D11_BIND_RENDER_TARGET.0 as u32;
    }
    if usage.contains(TextureUsage::DEPTH_STENCIL_ATTACHMENT) {
        flags |= D3D11_BIND_DEPTH_STENCIL.0 as u32;
    }
    flags
}

pub(crate) fn bind_flags_from_buffer_usage(usage: BufferUsage) -> u32 {
    let mut flags = 0;
    if usage.contains(BufferUsage::VERTEX) {
        flags |= D3D11_BIND_VERTEX_BUFFER.0 as u32;
    }
    if usage.contains(BufferUsage::INDEX) {
        flags |= D3D11_BIND_INDEX_BUFFER.0 as u32;
    }
    if usage.contains(BufferUsage::UNIFORM) {
        flags |= D3D11_BIND_CONSTANT_BUFFER.0 as u32;
    }
    flags
}

pub(crate) fn misc_flags_from_buffer_usage(usage: BufferUsage) -> u32 {
    if usage.contains(BufferUsage::INDIRECT) {
        D3D11_RESOURCE_MISC_DRAWINDIRECT_ARGS.0 as u32
    } else {
        0
    }
}

pub(crate) fn topology_to_native(topology: PrimitiveTopology) -> D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        PrimitiveTopology::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        PrimitiveTopology::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        PrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        PrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
    }
}

pub(crate) fn cull_mode_to_native(mode: CullMode) -> D3D11_CULL_MODE {
    match mode {
        CullMode::None => D3D11_CULL_NONE,
        CullMode::Front => D3D11_CULL_FRONT,
        CullMode::Back => D3D11_CULL_BACK,
    }
}

pub(crate) fn compare_to_native(func: CompareFunction) -> D3D11_COMPARISON_FUNC {
    match func {
        CompareFunction::Never => D3D11_COMPARISON_NEVER,
        CompareFunction::Less => D3D11_COMPARISON_LESS,
        CompareFunction::Equal => D3D11_COMPARISON_EQUAL,
        CompareFunction::LessEqual => D3D11_COMPARISON_LESS_EQUAL,
        CompareFunction::Greater => D3D11_COMPARISON_GREATER,
        CompareFunction::NotEqual => D3D11_COMPARISON_NOT_EQUAL,
        CompareFunction::GreaterEqual => D3D11_COMPARISON_GREATER_EQUAL,
        CompareFunction::Always => D3D11_COMPARISON_ALWAYS,
    }
}

pub(crate) fn vertex_format_to_dxgi(format: VertexFormat) -> DXGI_FORMAT {
    match format {
        VertexFormat::Float32 => DXGI_FORMAT_R32_FLOAT,
        VertexFormat::Float32x2 => DXGI_FORMAT_R32G32_FLOAT,
        VertexFormat::Float32x3 => DXGI_FORMAT_R32G32B32_FLOAT,
        VertexFormat::Float32x4 => DXGI_FORMAT_R32G32B32A32_FLOAT,
        VertexFormat::Uint32 => DXGI_FORMAT_R32_UINT,
        VertexFormat::Unorm8x4 => DXGI_FORMAT_R8G8B8A8_UNORM,
    }
}

pub(crate) fn semantic_name(semantic: VertexSemantic) -> PCSTR {
    match semantic {
        VertexSemantic::Position => windows::core::s!("POSITION"),
        VertexSemantic::Normal => windows::core::s!("NORMAL"),
        VertexSemantic::Color => windows::core::s!("COLOR"),
        VertexSemantic::TexCoord => windows::core::s!("TEXCOORD"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_view_pool_heap_kinds_are_supported() {
        assert!(heap_kind_supported(HeapKind::ColorTarget));
        assert!(heap_kind_supported(HeapKind::DepthStencil));
        assert!(!heap_kind_supported(HeapKind::Resource));
        assert!(!heap_kind_supported(HeapKind::Sampler));
    }

    #[test]
    fn depth_textures_drop_the_shader_resource_bind() {
        let flags = bind_flags_from_texture_usage(
            TextureUsage::TEXTURE_BINDING | TextureUsage::DEPTH_STENCIL_ATTACHMENT,
            TextureFormat::Depth32Float,
        );
        assert_eq!(flags & D3D11_BIND_SHADER_RESOURCE.0 as u32, 0);
        assert_ne!(flags & D3D11_BIND_DEPTH_STENCIL.0 as u32, 0);

        let color_flags = bind_flags_from_texture_usage(
            TextureUsage::TEXTURE_BINDING,
            TextureFormat::Rgba8Unorm,
        );
        assert_ne!(color_flags & D3D11_BIND_SHADER_RESOURCE.0 as u32, 0);
    }

    #[test]
    fn indirect_usage_is_a_misc_flag_not_a_bind_flag() {
        let usage = BufferUsage::INDIRECT;
        assert_eq!(bind_flags_from_buffer_usage(usage), 0);
        assert_eq!(
            misc_flags_from_buffer_usage(usage),
            D3D11_RESOURCE_MISC_DRAWINDIRECT_ARGS.0 as u32
        );
    }
}
