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

//! The Direct3D 12 implementation of the graphics contracts.
//!
//! Command buffers record into `ID3D12GraphicsCommandList` objects backed by
//! per-buffer command allocators, so distinct buffers can record on distinct
//! threads. Submission executes on the device's single direct command queue
//! and signals a monotonically increasing fence; a command buffer refuses to
//! reset until its last submission's fence value has been reached.

mod backend;
mod command;
mod conversions;
mod descriptor;
mod queue;

pub use backend::Direct3D12Backend;
pub use command::Direct3D12CommandBuffer;
pub use queue::Direct3D12CommandQueue;
