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

//! Descriptor heap kinds and descriptors.
//!
//! A heap is a pool of descriptor slots of a single kind. On Direct3D 12 it
//! maps to a real descriptor heap object; on Direct3D 11, which has no
//! descriptor heaps, it is a capacity-tracked pool of typed view objects with
//! identical size semantics.

use crate::gfx::handle::RawHandle;

/// The single kind of descriptor a heap holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeapKind {
    /// Render-target view descriptors.
    ColorTarget,
    /// Depth-stencil view descriptors.
    DepthStencil,
    /// Shader-visible resource descriptors (constant buffers, shader
    /// resources, unordered access).
    Resource,
    /// Sampler descriptors.
    Sampler,
}

/// A descriptor used to create a [`HeapId`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapDesc {
    /// The kind of descriptor every slot in the heap holds.
    pub kind: HeapKind,
    /// The number of descriptor slots.
    pub size: u32,
}

impl HeapDesc {
    /// Bundles a heap kind with a slot count.
    pub const fn new(kind: HeapKind, size: u32) -> Self {
        Self { kind, size }
    }
}

/// An opaque handle to a descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(pub RawHandle);
