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

//! Backend identity and construction parameters.

use crate::math::Extent2D;
use raw_window_handle::RawWindowHandle;

/// The native graphics API realized by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsApi {
    /// Microsoft's Direct3D 11 API.
    Direct3D11,
    /// Microsoft's Direct3D 12 API.
    Direct3D12,
}

impl GraphicsApi {
    /// A human-readable name for log output.
    pub const fn name(&self) -> &'static str {
        match self {
            GraphicsApi::Direct3D11 => "Direct3D 11",
            GraphicsApi::Direct3D12 => "Direct3D 12",
        }
    }
}

/// Immutable input to backend construction.
///
/// The window handle is opaque to this layer; window creation and OS handle
/// plumbing are the host's responsibility.
#[derive(Debug, Clone, Copy)]
pub struct BackendParameters {
    /// The initial size of the presentation surface in pixels.
    pub surface_size: Extent2D,
    /// The native handle of the window the swap chain presents into.
    pub window_handle: RawWindowHandle,
}

impl BackendParameters {
    /// Bundles a surface size and a window handle.
    pub const fn new(width: u32, height: u32, window_handle: RawWindowHandle) -> Self {
        Self {
            surface_size: Extent2D::new(width, height),
            window_handle,
        }
    }
}

/// The number of buffers every swap chain in this layer rotates through.
///
/// Fixed at two (one front, one back), matching the flip-discard presentation
/// model the backends configure.
pub const SWAP_CHAIN_BUFFER_COUNT: usize = 2;
