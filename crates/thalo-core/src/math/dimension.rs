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

//! Pixel-based extents and origins.
//!
//! These use integer (`u32`) components and describe surfaces, textures, or
//! regions within them. Anything fractional (viewport rectangles) lives in
//! [`crate::gfx::api::command`] instead.

/// A two-dimensional extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates an extent from a width and a height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` when either dimension is zero.
    ///
    /// A zero-area extent is never a valid surface or texture size.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The total number of pixels covered by this extent.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A two-dimensional origin, an (x, y) offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin2D {
    /// The x-coordinate of the origin.
    pub x: u32,
    /// The y-coordinate of the origin.
    pub y: u32,
}

impl Origin2D {
    /// The origin at (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_emptiness() {
        assert!(Extent2D::new(0, 720).is_empty());
        assert!(Extent2D::new(1280, 0).is_empty());
        assert!(!Extent2D::new(1280, 720).is_empty());
    }

    #[test]
    fn extent_area() {
        assert_eq!(Extent2D::new(1280, 720).area(), 921_600);
        // No overflow at u32 limits.
        assert_eq!(
            Extent2D::new(u32::MAX, u32::MAX).area(),
            (u32::MAX as u64) * (u32::MAX as u64)
        );
    }
}
