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

//! DXGI plumbing shared by both Direct3D backends: pixel format mapping,
//! window handle extraction, and the swap chain description.

use raw_window_handle::RawWindowHandle;
use thalo_core::gfx::{BackendError, BackendParameters, TextureFormat, SWAP_CHAIN_BUFFER_COUNT};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

/// The fixed pixel format every swap chain in this layer is created with.
pub(crate) const SWAP_CHAIN_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// Maps a backend-agnostic texture format to its DXGI equivalent.
///
/// Returns `None` for formats desktop Direct3D cannot express; callers turn
/// that into a typed error before any native call is made.
pub(crate) fn texture_format_to_dxgi(format: TextureFormat) -> Option<DXGI_FORMAT> {
    match format {
        TextureFormat::R8Unorm => Some(DXGI_FORMAT_R8_UNORM),
        TextureFormat::Rg8Unorm => Some(DXGI_FORMAT_R8G8_UNORM),
        TextureFormat::Rgba8Unorm => Some(DXGI_FORMAT_R8G8B8A8_UNORM),
        TextureFormat::Rgba8UnormSrgb => Some(DXGI_FORMAT_R8G8B8A8_UNORM_SRGB),
        TextureFormat::Bgra8Unorm => Some(DXGI_FORMAT_B8G8R8A8_UNORM),
        TextureFormat::R16Float => Some(DXGI_FORMAT_R16_FLOAT),
        TextureFormat::Rg16Float => Some(DXGI_FORMAT_R16G16_FLOAT),
        TextureFormat::Rgba16Float => Some(DXGI_FORMAT_R16G16B16A16_FLOAT),
        TextureFormat::R32Float => Some(DXGI_FORMAT_R32_FLOAT),
        TextureFormat::Rg32Float => Some(DXGI_FORMAT_R32G32_FLOAT),
        TextureFormat::Rgba32Float => Some(DXGI_FORMAT_R32G32B32A32_FLOAT),
        TextureFormat::Depth16Unorm => Some(DXGI_FORMAT_D16_UNORM),
        TextureFormat::Depth24PlusStencil8 => Some(DXGI_FORMAT_D24_UNORM_S8_UINT),
        TextureFormat::Depth32Float => Some(DXGI_FORMAT_D32_FLOAT),
        // ETC2 is a mobile format; desktop Direct3D has no equivalent.
        TextureFormat::Etc2Rgb8Unorm => None,
    }
}

/// Maps an index format to the DXGI format both Direct3D generations use.
pub(crate) fn index_format_to_dxgi(format: thalo_core::gfx::IndexFormat) -> DXGI_FORMAT {
    match format {
        thalo_core::gfx::IndexFormat::Uint16 => DXGI_FORMAT_R16_UINT,
        thalo_core::gfx::IndexFormat::Uint32 => DXGI_FORMAT_R32_UINT,
    }
}

/// Extracts the Win32 window handle from the opaque parameter block.
pub(crate) fn hwnd_from_parameters(params: &BackendParameters) -> Result<HWND, BackendError> {
    match params.window_handle {
        RawWindowHandle::Win32(handle) => {
            Ok(HWND(handle.hwnd.get() as *mut core::ffi::c_void))
        }
        other => Err(BackendError::SwapChainCreation(format!(
            "expected a Win32 window handle, got {other:?}"
        ))),
    }
}

/// The double-buffered flip-discard swap chain description both backends use.
pub(crate) fn swap_chain_desc(params: &BackendParameters) -> DXGI_SWAP_CHAIN_DESC1 {
    DXGI_SWAP_CHAIN_DESC1 {
        Width: params.surface_size.width,
        Height: params.surface_size.height,
        Format: texture_format_to_dxgi(SWAP_CHAIN_FORMAT).expect("swap chain format always maps"),
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            ..Default::default()
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: SWAP_CHAIN_BUFFER_COUNT as u32,
        SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_format_maps_to_a_distinct_dxgi_format() {
        let formats = [
            TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm,
            TextureFormat::R16Float,
            TextureFormat::Rg16Float,
            TextureFormat::Rgba16Float,
            TextureFormat::R32Float,
            TextureFormat::Rg32Float,
            TextureFormat::Rgba32Float,
            TextureFormat::Depth16Unorm,
            TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float,
        ];
        let mut seen = Vec::new();
        for format in formats {
            let dxgi = texture_format_to_dxgi(format).expect("format must map");
            assert!(!seen.contains(&dxgi), "{format:?} maps to a duplicate");
            seen.push(dxgi);
        }
    }

    #[test]
    fn compressed_mobile_format_does_not_map() {
        assert!(texture_format_to_dxgi(TextureFormat::Etc2Rgb8Unorm).is_none());
    }

    #[test]
    fn swap_chain_is_double_buffered_flip_discard() {
        use raw_window_handle::Win32WindowHandle;
        let hwnd = std::num::NonZeroIsize::new(1).unwrap();
        let params = BackendParameters::new(
            1280,
            720,
            RawWindowHandle::Win32(Win32WindowHandle::new(hwnd)),
        );
        let desc = swap_chain_desc(&params);
        assert_eq!(desc.BufferCount, 2);
        assert_eq!(desc.Width, 1280);
        assert_eq!(desc.Height, 720);
        assert_eq!(desc.SwapEffect, DXGI_SWAP_EFFECT_FLIP_DISCARD);
        assert_eq!(desc.Format, DXGI_FORMAT_R8G8B8A8_UNORM);
    }
}
