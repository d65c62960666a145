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

//! Defines data structures related to GPU texture resources.

use crate::gfx::handle::RawHandle;
use crate::thalo_bitflags;

thalo_bitflags! {
    /// A set of flags describing the allowed usages of a [`TextureId`].
    pub struct TextureUsage: u32 {
        /// The texture can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The texture can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The texture can be bound in a shader for sampling.
        const TEXTURE_BINDING = 1 << 2;
        /// The texture can back a color target.
        const COLOR_ATTACHMENT = 1 << 3;
        /// The texture can back a depth-stencil target.
        const DEPTH_STENCIL_ATTACHMENT = 1 << 4;
    }
}

/// The memory format of pixels in a texture.
///
/// The set is backend-agnostic; each backend maps the format it supports to a
/// native pixel format and rejects the rest with a typed error before any
/// native call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFormat {
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Two 8-bit unsigned normalized components.
    Rg8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    Rgba8UnormSrgb,
    /// Four 8-bit unsigned normalized components (BGRA).
    Bgra8Unorm,
    /// One 16-bit float component.
    R16Float,
    /// Two 16-bit float components.
    Rg16Float,
    /// Four 16-bit float components.
    Rgba16Float,
    /// One 32-bit float component.
    R32Float,
    /// Two 32-bit float components.
    Rg32Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// A 16-bit unsigned normalized depth format.
    Depth16Unorm,
    /// A 24-bit unsigned normalized depth format with an 8-bit stencil component.
    Depth24PlusStencil8,
    /// A 32-bit float depth format.
    Depth32Float,
    /// An ETC2-compressed RGB format. Common on mobile GPUs; desktop
    /// Direct3D has no equivalent, so both shipped backends reject it.
    Etc2Rgb8Unorm,
}

impl TextureFormat {
    /// Returns the size in bytes of a single pixel for this format.
    ///
    /// For block-compressed formats this is the per-pixel average, not a
    /// texel size.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm => 2,
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba8UnormSrgb => 4,
            TextureFormat::Bgra8Unorm => 4,
            TextureFormat::R16Float => 2,
            TextureFormat::Rg16Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::R32Float => 4,
            TextureFormat::Rg32Float => 8,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Depth16Unorm => 2,
            TextureFormat::Depth24PlusStencil8 => 4,
            TextureFormat::Depth32Float => 4,
            TextureFormat::Etc2Rgb8Unorm => 1,
        }
    }

    /// Returns `true` if this format carries a depth aspect.
    pub const fn has_depth_aspect(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth16Unorm
                | TextureFormat::Depth24PlusStencil8
                | TextureFormat::Depth32Float
        )
    }

    /// Returns `true` if this format carries a stencil aspect.
    pub const fn has_stencil_aspect(&self) -> bool {
        matches!(self, TextureFormat::Depth24PlusStencil8)
    }

    /// Returns `true` if a texture of this format can back a color target.
    pub const fn is_color_renderable(&self) -> bool {
        !self.has_depth_aspect() && !matches!(self, TextureFormat::Etc2Rgb8Unorm)
    }
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// The width of the texture in pixels.
    pub width: u32,
    /// The height of the texture in pixels.
    pub height: u32,
    /// Placement alignment in bytes; `0` selects the backend's default.
    pub alignment: u64,
    /// The number of mipmap levels, at least 1.
    pub mip_level_count: u32,
    /// The format of the texels in the texture.
    pub format: TextureFormat,
    /// A bitmask of [`TextureUsage`] flags describing how the texture will be
    /// used.
    pub usage: TextureUsage,
}

impl TextureDesc {
    /// A single-mip 2D texture with default alignment and sampling usage.
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            alignment: 0,
            mip_level_count: 1,
            format,
            usage: TextureUsage::TEXTURE_BINDING,
        }
    }

    /// Adds usage flags to the descriptor.
    pub fn with_usage(mut self, usage: TextureUsage) -> Self {
        self.usage |= usage;
        self
    }
}

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub RawHandle);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_formats_are_not_color_renderable() {
        assert!(!TextureFormat::Depth32Float.is_color_renderable());
        assert!(!TextureFormat::Depth24PlusStencil8.is_color_renderable());
        assert!(TextureFormat::Rgba8Unorm.is_color_renderable());
        assert!(TextureFormat::Bgra8Unorm.is_color_renderable());
    }

    #[test]
    fn stencil_aspect_implies_depth_aspect() {
        assert!(TextureFormat::Depth24PlusStencil8.has_stencil_aspect());
        assert!(TextureFormat::Depth24PlusStencil8.has_depth_aspect());
        assert!(!TextureFormat::Depth32Float.has_stencil_aspect());
    }

    #[test]
    fn compressed_format_is_not_renderable() {
        assert!(!TextureFormat::Etc2Rgb8Unorm.is_color_renderable());
        assert!(!TextureFormat::Etc2Rgb8Unorm.has_depth_aspect());
    }

    #[test]
    fn descriptor_builder_accumulates_usage() {
        let desc = TextureDesc::new(256, 256, TextureFormat::Rgba8Unorm)
            .with_usage(TextureUsage::COLOR_ATTACHMENT);
        assert!(desc.usage.contains(TextureUsage::TEXTURE_BINDING));
        assert!(desc.usage.contains(TextureUsage::COLOR_ATTACHMENT));
        assert_eq!(desc.mip_level_count, 1);
        assert_eq!(desc.alignment, 0);
    }
}
