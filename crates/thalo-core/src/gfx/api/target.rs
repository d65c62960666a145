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

//! Render target handles.
//!
//! A target is a view over a texture usable as a render destination. Targets
//! are created by the owning backend from a texture handle and consumed by
//! command buffer operations; like all handles they are validated for
//! liveness and backend identity at every consumption site.

use crate::gfx::handle::RawHandle;

/// An opaque handle to a color render target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTargetId(pub RawHandle);

/// An opaque handle to a depth-stencil target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilTargetId(pub RawHandle);
