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

//! Defines data structures related to GPU buffer resources.

use crate::gfx::handle::RawHandle;
use crate::thalo_bitflags;

thalo_bitflags! {
    /// A set of flags describing the allowed usages of a [`BufferId`].
    pub struct BufferUsage: u32 {
        /// The buffer can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The buffer can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 2;
        /// The buffer can be bound as an index buffer.
        const INDEX = 1 << 3;
        /// The buffer can be bound as a constant/uniform buffer.
        const UNIFORM = 1 << 4;
        /// The buffer can supply arguments to indirect draw commands.
        const INDIRECT = 1 << 5;
    }
}

/// Where a buffer's memory lives and who can touch it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryClass {
    /// GPU-local memory. Fastest for GPU access; initial contents must be
    /// uploaded through a copy.
    DeviceLocal,
    /// CPU-visible upload memory. Initial data can be written directly at
    /// creation time.
    Upload,
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone, Copy)]
pub struct BufferDesc {
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// A bitmask of [`BufferUsage`] flags describing how the buffer will be
    /// used.
    pub usage: BufferUsage,
    /// The memory class the buffer is allocated in.
    pub memory: MemoryClass,
}

impl BufferDesc {
    /// A device-local buffer of the given size and usage.
    pub const fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            size,
            usage,
            memory: MemoryClass::DeviceLocal,
        }
    }

    /// Moves the buffer into CPU-visible upload memory.
    pub const fn upload(mut self) -> Self {
        self.memory = MemoryClass::Upload;
        self
    }
}

/// An opaque handle to a GPU buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub RawHandle);
