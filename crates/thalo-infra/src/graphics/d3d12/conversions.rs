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

//! Pure mappings from backend-agnostic types to Direct3D 12 equivalents.

use thalo_core::gfx::{
    CompareFunction, CullMode, HeapKind, PrimitiveTopology, ResourceState, TextureUsage,
    VertexFormat, VertexSemantic,
};
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

/// Every heap kind has a Direct3D 12 descriptor heap type; the mapping is
/// exhaustive so a new kind fails to compile until it is decided here.
pub(crate) fn heap_kind_to_native(kind: HeapKind) -> D3D12_DESCRIPTOR_HEAP_TYPE {
    match kind {
        HeapKind::ColorTarget => D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
        HeapKind::DepthStencil => D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
        HeapKind::Resource => D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        HeapKind::Sampler => D3D12_DESCRIPTOR_HEAP_TYPE_SAMPLER,
    }
}

pub(crate) fn resource_flags_from_usage(usage: TextureUsage) -> D3D12_RESOURCE_FLAGS {
    let mut flags = D3D12_RESOURCE_FLAG_NONE;
    if usage.contains(TextureUsage::COLOR_ATTACHMENT) {
        flags |= D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET;
    }
    if usage.contains(TextureUsage::DEPTH_STENCIL_ATTACHMENT) {
        flags |= D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL;
    }
    flags
}

pub(crate) fn resource_state_to_native(state: ResourceState) -> D3D12_RESOURCE_STATES {
    match state {
        ResourceState::Common => D3D12_RESOURCE_STATE_COMMON,
        ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
        ResourceState::DepthWrite => D3D12_RESOURCE_STATE_DEPTH_WRITE,
        ResourceState::GenericRead => D3D12_RESOURCE_STATE_GENERIC_READ,
        ResourceState::Present => D3D12_RESOURCE_STATE_PRESENT,
        ResourceState::CopyDest => D3D12_RESOURCE_STATE_COPY_DEST,
    }
}

/// The topology used at draw time.
pub(crate) fn topology_to_native(topology: PrimitiveTopology) -> D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        PrimitiveTopology::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        PrimitiveTopology::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        PrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        PrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
    }
}

/// The coarser topology class baked into pipeline state.
pub(crate) fn topology_type_to_native(
    topology: PrimitiveTopology,
) -> D3D12_PRIMITIVE_TOPOLOGY_TYPE {
    match topology {
        PrimitiveTopology::PointList => D3D12_PRIMITIVE_TOPOLOGY_TYPE_POINT,
        PrimitiveTopology::LineList => D3D12_PRIMITIVE_TOPOLOGY_TYPE_LINE,
        PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => {
            D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE
        }
    }
}

pub(crate) fn cull_mode_to_native(mode: CullMode) -> D3D12_CULL_MODE {
    match mode {
        CullMode::None => D3D12_CULL_MODE_NONE,
        CullMode::Front => D3D12_CULL_MODE_FRONT,
        CullMode::Back => D3D12_CULL_MODE_BACK,
    }
}

pub(crate) fn compare_to_native(func: CompareFunction) -> D3D12_COMPARISON_FUNC {
    match func {
        CompareFunction::Never => D3D12_COMPARISON_FUNC_NEVER,
        CompareFunction::Less => D3D12_COMPARISON_FUNC_LESS,
        CompareFunction::Equal => D3D12_COMPARISON_FUNC_EQUAL,
        CompareFunction::LessEqual => D3D12_COMPARISON_FUNC_LESS_EQUAL,
        CompareFunction::Greater => D3D12_COMPARISON_FUNC_GREATER,
        CompareFunction::NotEqual => D3D12_COMPARISON_FUNC_NOT_EQUAL,
        CompareFunction::GreaterEqual => D3D12_COMPARISON_FUNC_GREATER_EQUAL,
        CompareFunction::Always => D3D12_COMPARISON_FUNC_ALWAYS,
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

/// Input-assembler semantic names. The strings are nul-terminated literals
/// with static lifetime, as `D3D12_INPUT_ELEMENT_DESC` borrows them.
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
    fn heap_kind_mapping_is_total_and_distinct() {
        let kinds = [
            HeapKind::ColorTarget,
            HeapKind::DepthStencil,
            HeapKind::Resource,
            HeapKind::Sampler,
        ];
        let mut seen = Vec::new();
        for kind in kinds {
            let native = heap_kind_to_native(kind);
            assert!(!seen.contains(&native));
            seen.push(native);
        }
    }

    #[test]
    fn strip_and_list_share_a_topology_type() {
        assert_eq!(
            topology_type_to_native(PrimitiveTopology::TriangleList),
            topology_type_to_native(PrimitiveTopology::TriangleStrip)
        );
        assert_ne!(
            topology_to_native(PrimitiveTopology::TriangleList),
            topology_to_native(PrimitiveTopology::TriangleStrip)
        );
    }

    #[test]
    fn attachment_usage_sets_resource_flags() {
        let flags = resource_flags_from_usage(
            TextureUsage::COLOR_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        );
        assert_eq!(flags & D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET, D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET);
        assert_eq!(resource_flags_from_usage(TextureUsage::TEXTURE_BINDING), D3D12_RESOURCE_FLAG_NONE);
    }
}
