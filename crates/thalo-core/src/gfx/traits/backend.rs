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
use crate::gfx::error::{BackendError, ResourceError};
use crate::gfx::handle::BackendId;
use crate::gfx::traits::{CommandBuffer, CommandQueue};
use std::fmt::Debug;

/// The contract every graphics backend satisfies.
///
/// A backend owns exactly one native device, its context/queue pairing, and
/// one swap chain, and acts as the factory for every other graphics object.
/// Engine code talks only to this trait; the factory surface is identical
/// across backends, so swapping the native API never touches calling code.
///
/// Construction is backend-specific (`Direct3D11Backend::new`,
/// `Direct3D12Backend::new`, each taking [`BackendParameters`]) and fully
/// rolls back on partial failure: a backend either constructs completely or
/// not at all.
///
/// ## Ownership
///
/// Every resource a backend creates lives inside the backend; factories
/// return generation-checked handles, and every handle has a matching
/// `destroy_*`. Destroying a resource invalidates all copies of its handle.
///
/// ## Threading
///
/// A backend instance and the command buffers it creates belong to the
/// thread that drives the device unless [`supports_parallel_recording`]
/// reports otherwise; see that method for the exact guarantee.
///
/// [`supports_parallel_recording`]: GraphicsBackend::supports_parallel_recording
pub trait GraphicsBackend: Debug {
    /// The native API this backend drives.
    fn api(&self) -> GraphicsApi;

    /// The process-unique identity of this backend instance.
    ///
    /// Every handle minted by this backend carries this identity and is
    /// rejected by any other instance.
    fn backend_id(&self) -> BackendId;

    /// The parameters this backend was constructed with.
    fn parameters(&self) -> &BackendParameters;

    /// Creates a command queue bound to this backend's device.
    ///
    /// ## Errors
    /// * `BackendError::QueueCreation` - If the native queue object cannot
    ///   be created.
    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>, BackendError>;

    /// Creates a command buffer in the [`Initial`] state.
    ///
    /// The buffer is not associated with any queue; association happens at
    /// submission time.
    ///
    /// [`Initial`]: crate::gfx::api::command::CommandBufferState::Initial
    ///
    /// ## Errors
    /// * `BackendError::CommandBufferCreation` - If the native recording
    ///   object cannot be created.
    fn create_command_buffer(&self) -> Result<Box<dyn CommandBuffer>, BackendError>;

    /// Creates a descriptor heap.
    ///
    /// ## Errors
    /// * `ResourceError::UnsupportedHeapKind` - If this backend cannot
    ///   realize `desc.kind`. No native call is made.
    /// * `ResourceError::InvalidDescriptor` - If `desc.size` is zero.
    /// * `ResourceError::Creation` - If the native API rejects the heap.
    fn create_heap(&self, desc: &HeapDesc) -> Result<HeapId, ResourceError>;

    /// The number of descriptor slots in a heap, exactly as requested at
    /// creation.
    fn heap_size(&self, heap: HeapId) -> Result<u32, ResourceError>;

    /// Creates a texture in device-local memory.
    ///
    /// ## Errors
    /// * `ResourceError::UnsupportedFormat` - If `desc.format` has no native
    ///   equivalent on this backend. No native call is made.
    /// * `ResourceError::InvalidDescriptor` - If the dimensions or mip count
    ///   are zero.
    /// * `ResourceError::Creation` - If native allocation fails.
    fn create_texture(&self, desc: &TextureDesc) -> Result<TextureId, ResourceError>;

    /// The format a texture was created with.
    fn texture_format(&self, texture: TextureId) -> Result<TextureFormat, ResourceError>;

    /// Creates a buffer, optionally initialized with `data`.
    ///
    /// Initial data requires [`MemoryClass::Upload`]; device-local buffers
    /// are filled through copies, outside this layer's scope.
    fn create_buffer(
        &self,
        desc: &BufferDesc,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError>;

    /// Creates a color target view over a texture.
    ///
    /// The texture must have been created by this backend with a
    /// color-renderable format and the
    /// [`COLOR_ATTACHMENT`](TextureUsage::COLOR_ATTACHMENT) usage.
    fn create_color_target(&self, texture: TextureId) -> Result<ColorTargetId, ResourceError>;

    /// Creates a depth-stencil target view over a texture.
    ///
    /// The texture must have been created by this backend with a depth
    /// format and the
    /// [`DEPTH_STENCIL_ATTACHMENT`](TextureUsage::DEPTH_STENCIL_ATTACHMENT)
    /// usage.
    fn create_depth_stencil_target(
        &self,
        texture: TextureId,
    ) -> Result<DepthStencilTargetId, ResourceError>;

    /// Creates a shader module from compiled bytecode.
    fn create_shader(&self, desc: &ShaderDesc) -> Result<ShaderId, ResourceError>;

    /// Creates an immutable pipeline state object.
    fn create_pipeline(&self, desc: &PipelineDesc) -> Result<PipelineId, ResourceError>;

    /// The swap-chain texture currently designated as the back buffer,
    /// e.g. for recording state transitions around presentation.
    ///
    /// The returned handle changes meaning at every
    /// [`do_swap_buffers`](GraphicsBackend::do_swap_buffers); query it each
    /// frame rather than caching it.
    fn current_back_buffer(&self) -> Result<TextureId, ResourceError>;

    /// The color target over the current back buffer.
    ///
    /// Follows the same per-frame rotation as
    /// [`current_back_buffer`](GraphicsBackend::current_back_buffer).
    fn current_back_buffer_target(&self) -> Result<ColorTargetId, ResourceError>;

    /// Destroys a heap.
    fn destroy_heap(&self, heap: HeapId) -> Result<(), ResourceError>;

    /// Destroys a texture. Targets created over it must be destroyed first
    /// by the caller; the native view keeps the underlying resource alive
    /// otherwise.
    fn destroy_texture(&self, texture: TextureId) -> Result<(), ResourceError>;

    /// Destroys a buffer.
    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), ResourceError>;

    /// Destroys a color target view.
    fn destroy_color_target(&self, target: ColorTargetId) -> Result<(), ResourceError>;

    /// Destroys a depth-stencil target view.
    fn destroy_depth_stencil_target(
        &self,
        target: DepthStencilTargetId,
    ) -> Result<(), ResourceError>;

    /// Destroys a shader module.
    fn destroy_shader(&self, shader: ShaderId) -> Result<(), ResourceError>;

    /// Destroys a pipeline state object.
    fn destroy_pipeline(&self, pipeline: PipelineId) -> Result<(), ResourceError>;

    /// Presents the current back buffer and swaps the logical front/back
    /// buffer references.
    ///
    /// Presentation uses sync interval 0: no vsync wait. Must be called once
    /// per frame from the thread that owns the device. On error the buffer
    /// references are unchanged and the call may be retried.
    fn do_swap_buffers(&mut self) -> Result<(), BackendError>;

    /// Whether distinct command buffers of this backend may record on
    /// different threads concurrently.
    ///
    /// Recording into one buffer is never thread-safe; this only covers
    /// *distinct* buffers. Submission is always serialized per queue.
    fn supports_parallel_recording(&self) -> bool;
}
