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

use crate::gfx::api::GraphicsApi;
use crate::gfx::error::CommandError;
use crate::gfx::traits::CommandBuffer;

/// The submission channel that sends command buffers to the GPU.
///
/// A queue owns the native submission object tied to one device (a Direct3D
/// 12 command queue with its fence; Direct3D 11's immediate context).
/// Submission order is FIFO per queue; this layer never reorders. GPU work
/// is asynchronous to the CPU; no promise is made about completion beyond
/// per-queue submission order, and submitted work always runs to completion.
pub trait CommandQueue {
    /// The native API this queue submits to.
    fn api(&self) -> GraphicsApi;

    /// Finalizes a recording and submits it for execution.
    ///
    /// A buffer with zero recorded commands submits successfully and has no
    /// GPU-visible effect. On success the buffer leaves the recording state
    /// and must be [`reset`](CommandBuffer::reset) before reuse.
    ///
    /// ## Errors
    /// * `CommandError::WrongBackend` - The buffer was recorded for a
    ///   different API than this queue submits to. No native call is made.
    /// * `CommandError::NotRecording` - The buffer is not in the recording
    ///   state.
    /// * `CommandError::Submit` - The native API rejected finalization or
    ///   execution.
    fn submit(&mut self, buffer: &mut dyn CommandBuffer) -> Result<(), CommandError>;

    /// Blocks until every previously submitted command buffer has finished
    /// executing on the GPU.
    fn wait_idle(&mut self) -> Result<(), CommandError>;
}
