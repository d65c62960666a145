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

use crate::gfx::api::*;
use crate::gfx::error::CommandError;
use std::any::Any;
use std::ops::Range;

/// A trait for an object that records a sequence of GPU commands.
///
/// Recording is deferred on every backend: `cmd_*` calls append to a native
/// recording object (a Direct3D 12 command list, a Direct3D 11 deferred
/// context) and nothing reaches the GPU until the buffer is handed to a
/// [`CommandQueue`](crate::gfx::traits::CommandQueue).
///
/// The lifecycle is [`CommandBufferState`]: `Initial` → [`reset`] →
/// `Recording` → `cmd_*` calls → submission → `reset` → `Recording` again.
/// Every `cmd_*` call validates its arguments (handle liveness, backend
/// identity, array bounds) and on failure records nothing and returns a
/// typed error.
///
/// [`reset`]: CommandBuffer::reset
pub trait CommandBuffer {
    /// The native API this buffer records for.
    fn api(&self) -> GraphicsApi;

    /// The current lifecycle state.
    fn state(&self) -> CommandBufferState;

    /// Discards any previous recording and enters the recording state.
    ///
    /// This is the only way into a clean recording state, and it is
    /// idempotent while recording.
    ///
    /// ## Errors
    /// * `CommandError::StillExecuting` - The previous submission of this
    ///   buffer has not yet completed on the GPU.
    /// * `CommandError::Submit` - The native recording object rejected the
    ///   reset.
    fn reset(&mut self) -> Result<(), CommandError>;

    /// Binds pipeline state for subsequent draws.
    fn cmd_bind_pipeline(&mut self, pipeline: PipelineId) -> Result<(), CommandError>;

    /// Records a clear of a color target to the given RGBA value.
    fn cmd_clear_color(
        &mut self,
        target: ColorTargetId,
        color: [f32; 4],
    ) -> Result<(), CommandError>;

    /// Records a clear of both aspects of a depth-stencil target.
    ///
    /// Depth and stencil are cleared unconditionally, even for formats
    /// without a stencil aspect (where the stencil value is ignored by the
    /// native API).
    fn cmd_clear_depth_stencil(
        &mut self,
        target: DepthStencilTargetId,
        depth: f32,
        stencil: u8,
    ) -> Result<(), CommandError>;

    /// Binds 0..=8 color targets plus an optional depth-stencil target as
    /// the active render-target set.
    fn cmd_set_targets(
        &mut self,
        color_targets: &[ColorTargetId],
        depth_stencil: Option<DepthStencilTargetId>,
    ) -> Result<(), CommandError>;

    /// Replaces the active viewport array.
    ///
    /// ## Errors
    /// * `CommandError::EmptyArray` - `viewports` is empty; the previously
    ///   bound viewports are unchanged.
    /// * `CommandError::TooMany` - more than [`MAX_VIEWPORTS`] entries.
    fn cmd_set_viewports(&mut self, viewports: &[Viewport]) -> Result<(), CommandError>;

    /// Replaces the active scissor rectangle array, under the same contract
    /// as [`cmd_set_viewports`](CommandBuffer::cmd_set_viewports).
    fn cmd_set_scissors(&mut self, scissors: &[ScissorRect]) -> Result<(), CommandError>;

    /// Binds a vertex buffer to a slot.
    ///
    /// `stride` is the distance in bytes between consecutive vertices; on
    /// Direct3D it is part of the buffer binding rather than the pipeline.
    fn cmd_set_vertex_buffer(
        &mut self,
        slot: u32,
        buffer: BufferId,
        offset: u64,
        stride: u32,
    ) -> Result<(), CommandError>;

    /// Binds an index buffer for indexed draws.
    fn cmd_set_index_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        format: IndexFormat,
    ) -> Result<(), CommandError>;

    /// Records a state transition of a texture between usage states.
    ///
    /// Required around render-target and present usage on Direct3D 12;
    /// recorded as a no-op on Direct3D 11, whose driver tracks states
    /// itself.
    fn cmd_transition_texture(
        &mut self,
        texture: TextureId,
        before: ResourceState,
        after: ResourceState,
    ) -> Result<(), CommandError>;

    /// Records a non-indexed draw using the bound pipeline, targets, and
    /// vertex state.
    fn cmd_draw(
        &mut self,
        vertices: Range<u32>,
        instances: Range<u32>,
    ) -> Result<(), CommandError>;

    /// Records an indexed draw.
    fn cmd_draw_indexed(
        &mut self,
        indices: Range<u32>,
        base_vertex: i32,
        instances: Range<u32>,
    ) -> Result<(), CommandError>;

    /// Records a draw whose arguments the GPU reads from `args` at
    /// `offset`. The buffer needs the
    /// [`INDIRECT`](BufferUsage::INDIRECT) usage.
    fn cmd_draw_indirect(&mut self, args: BufferId, offset: u64) -> Result<(), CommandError>;

    /// Indexed variant of [`cmd_draw_indirect`](CommandBuffer::cmd_draw_indirect).
    fn cmd_draw_indexed_indirect(
        &mut self,
        args: BufferId,
        offset: u64,
    ) -> Result<(), CommandError>;

    /// Returns the trait object as `Any` so a queue of the same backend can
    /// downcast it at submission time.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
