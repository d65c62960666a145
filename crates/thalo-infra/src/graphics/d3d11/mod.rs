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

//! The Direct3D 11 implementation of the graphics contracts.
//!
//! Recording is deferred here too: each command buffer owns a *deferred*
//! device context, and submission executes the finished `ID3D11CommandList`
//! on the device's immediate context. Direct3D 11 has no descriptor heaps
//! and no explicit resource states, so heaps are capacity-tracked view pools
//! and recorded transitions are accepted but compile to nothing.

mod backend;
mod command;
mod conversions;
mod queue;

pub use backend::Direct3D11Backend;
pub use command::Direct3D11CommandBuffer;
pub use queue::Direct3D11CommandQueue;
