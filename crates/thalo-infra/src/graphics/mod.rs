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

//! Native graphics backends.
//!
//! Each sub-module implements the `thalo-core` graphics contracts atop one
//! native API. Both Direct3D backends share the DXGI plumbing in [`dxgi`].

#[cfg(target_os = "windows")]
pub mod d3d11;
#[cfg(target_os = "windows")]
pub mod d3d12;
#[cfg(target_os = "windows")]
pub(crate) mod dxgi;
