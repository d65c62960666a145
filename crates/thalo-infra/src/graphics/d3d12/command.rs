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

//! Deferred command recording into a Direct3D 12 graphics command list.

use super::backend::D3d12Shared;
use super::conversions as conv;
use crate::graphics::dxgi;
use std::any::Any;
use std::mem::ManuallyDrop;
use std::ops::Range;
use std::sync::Arc;
use thalo_core::gfx::{
    check_array_limit, check_bounded_array, BackendError, BufferId, BufferUsage, ColorTargetId,
    CommandBuffer, CommandBufferState, CommandError, DepthStencilTargetId, GraphicsApi,
    IndexFormat, PipelineId, RecorderState, ResourceError, ResourceState, ScissorRect, TextureId,
    Viewport, MAX_COLOR_TARGETS, MAX_SCISSORS, MAX_VIEWPORTS,
};
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

/// A command buffer recording into an `ID3D12GraphicsCommandList`.
///
/// Each buffer owns its command allocator, so distinct buffers can record
/// concurrently. After submission the buffer tracks the fence value its
/// execution signals; [`reset`](CommandBuffer::reset) refuses to recycle the
/// allocator until the GPU has passed that value.
pub struct Direct3D12CommandBuffer {
    shared: Arc<D3d12Shared>,
    allocator: ID3D12CommandAllocator,
    list: ID3D12GraphicsCommandList,
    recorder: RecorderState,
    pending_fence_value: u64,
}

impl Direct3D12CommandBuffer {
    pub(crate) fn new(shared: Arc<D3d12Shared>) -> Result<Self, BackendError> {
        unsafe {
            let allocator: ID3D12CommandAllocator = shared
                .device
                .CreateCommandAllocator(D3D12_COMMAND_LIST_TYPE_DIRECT)
                .map_err(|e| {
                    log::error!(
                        "Direct3D12CommandBuffer::new: CreateCommandAllocator failed: {e}"
                    );
                    BackendError::CommandBufferCreation(format!(
                        "CreateCommandAllocator failed: {e}"
                    ))
                })?;
            let list: ID3D12GraphicsCommandList = shared
                .device
                .CreateCommandList(0, D3D12_COMMAND_LIST_TYPE_DIRECT, &allocator, None)
                .map_err(|e| {
                    log::error!("Direct3D12CommandBuffer::new: CreateCommandList failed: {e}");
                    BackendError::CommandBufferCreation(format!("CreateCommandList failed: {e}"))
                })?;
            // Lists are created open; close so the first reset starts clean.
            list.Close().map_err(|e| {
                BackendError::CommandBufferCreation(format!("initial Close failed: {e}"))
            })?;
            Ok(Self {
                shared,
                allocator,
                list,
                recorder: RecorderState::new(),
                pending_fence_value: 0,
            })
        }
    }

    pub(crate) fn shared(&self) -> &Arc<D3d12Shared> {
        &self.shared
    }

    /// Finalizes the recording and closes the native list for execution.
    pub(crate) fn finish_and_close(&mut self) -> Result<ID3D12GraphicsCommandList, CommandError> {
        self.recorder.finish()?;
        unsafe { self.list.Close() }
            .map_err(|e| CommandError::Submit(format!("command list Close failed: {e}")))?;
        Ok(self.list.clone())
    }

    /// Records the fence value the queue signals for this submission.
    pub(crate) fn mark_submitted(&mut self, fence_value: u64) {
        self.pending_fence_value = fence_value;
        self.recorder.mark_pending();
    }

    fn resolve_rtv(&self, target: ColorTargetId) -> Result<D3D12_CPU_DESCRIPTOR_HANDLE, CommandError> {
        let targets = self.shared.color_targets.lock().unwrap();
        let entry = targets.get(target.0).map_err(|e| {
            log::error!("Direct3D12CommandBuffer: invalid color target: {e}");
            CommandError::from(e)
        })?;
        Ok(entry.rtv)
    }

    fn resolve_dsv(
        &self,
        target: DepthStencilTargetId,
    ) -> Result<D3D12_CPU_DESCRIPTOR_HANDLE, CommandError> {
        let targets = self.shared.depth_targets.lock().unwrap();
        let entry = targets.get(target.0).map_err(|e| {
            log::error!("Direct3D12CommandBuffer: invalid depth-stencil target: {e}");
            CommandError::from(e)
        })?;
        Ok(entry.dsv)
    }

    /// Resolves a buffer handle, checking one required usage flag.
    fn resolve_buffer(
        &self,
        buffer: BufferId,
        required: BufferUsage,
        what: &str,
    ) -> Result<(ID3D12Resource, u64), CommandError> {
        let buffers = self.shared.buffers.lock().unwrap();
        let entry = buffers.get(buffer.0).map_err(|e| {
            log::error!("Direct3D12CommandBuffer: invalid buffer: {e}");
            CommandError::from(e)
        })?;
        if !entry.desc.usage.contains(required) {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                format!("buffer lacks the {what} usage"),
            )));
        }
        Ok((entry.resource.clone(), entry.desc.size))
    }
}

impl CommandBuffer for Direct3D12CommandBuffer {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D12
    }

    fn state(&self) -> CommandBufferState {
        self.recorder.state()
    }

    fn reset(&mut self) -> Result<(), CommandError> {
        if self.recorder.state() == CommandBufferState::Pending {
            if unsafe { self.shared.fence.GetCompletedValue() } >= self.pending_fence_value {
                self.recorder.mark_completed();
            } else {
                return Err(CommandError::StillExecuting);
            }
        }
        let was_recording = self.recorder.state() == CommandBufferState::Recording;
        self.recorder.reset()?;
        unsafe {
            if was_recording {
                // Discard the open recording before recycling the allocator.
                self.list
                    .Close()
                    .map_err(|e| CommandError::Submit(format!("Close failed: {e}")))?;
            }
            self.allocator
                .Reset()
                .map_err(|e| CommandError::Submit(format!("allocator Reset failed: {e}")))?;
            self.list
                .Reset(&self.allocator, None)
                .map_err(|e| CommandError::Submit(format!("command list Reset failed: {e}")))?;
        }
        Ok(())
    }

    fn cmd_bind_pipeline(&mut self, pipeline: PipelineId) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (pso, root_signature, topology) = {
            let pipelines = self.shared.pipelines.lock().unwrap();
            let entry = pipelines.get(pipeline.0).map_err(|e| {
                log::error!("Direct3D12CommandBuffer::cmd_bind_pipeline: {e}");
                CommandError::from(e)
            })?;
            (entry.pso.clone(), entry.root_signature.clone(), entry.topology)
        };
        unsafe {
            self.list.SetGraphicsRootSignature(&root_signature);
            self.list.SetPipelineState(&pso);
            self.list.IASetPrimitiveTopology(topology);
        }
        Ok(())
    }

    fn cmd_clear_color(
        &mut self,
        target: ColorTargetId,
        color: [f32; 4],
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let rtv = self.resolve_rtv(target)?;
        unsafe { self.list.ClearRenderTargetView(rtv, &color, None) };
        Ok(())
    }

    fn cmd_clear_depth_stencil(
        &mut self,
        target: DepthStencilTargetId,
        depth: f32,
        stencil: u8,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let dsv = self.resolve_dsv(target)?;
        unsafe {
            self.list.ClearDepthStencilView(
                dsv,
                D3D12_CLEAR_FLAG_DEPTH | D3D12_CLEAR_FLAG_STENCIL,
                depth,
                stencil,
                None,
            )
        };
        Ok(())
    }

    fn cmd_set_targets(
        &mut self,
        color_targets: &[ColorTargetId],
        depth_stencil: Option<DepthStencilTargetId>,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        check_array_limit("color targets", color_targets.len(), MAX_COLOR_TARGETS)?;
        let mut rtvs = Vec::with_capacity(color_targets.len());
        for target in color_targets {
            rtvs.push(self.resolve_rtv(*target)?);
        }
        let dsv = match depth_stencil {
            Some(target) => Some(self.resolve_dsv(target)?),
            None => None,
        };
        unsafe {
            self.list.OMSetRenderTargets(
                rtvs.len() as u32,
                if rtvs.is_empty() {
                    None
                } else {
                    Some(rtvs.as_ptr())
                },
                false,
                dsv.as_ref().map(|handle| handle as *const _),
            )
        };
        Ok(())
    }

    fn cmd_set_viewports(&mut self, viewports: &[Viewport]) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        check_bounded_array("viewports", viewports.len(), MAX_VIEWPORTS).map_err(|e| {
            log::error!("Direct3D12CommandBuffer::cmd_set_viewports: {e}");
            e
        })?;
        let native: Vec<D3D12_VIEWPORT> = viewports
            .iter()
            .map(|vp| D3D12_VIEWPORT {
                TopLeftX: vp.origin_x,
                TopLeftY: vp.origin_y,
                Width: vp.width,
                Height: vp.height,
                MinDepth: vp.min_depth,
                MaxDepth: vp.max_depth,
            })
            .collect();
        unsafe { self.list.RSSetViewports(&native) };
        Ok(())
    }

    fn cmd_set_scissors(&mut self, scissors: &[ScissorRect]) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        check_bounded_array("scissor rectangles", scissors.len(), MAX_SCISSORS).map_err(|e| {
            log::error!("Direct3D12CommandBuffer::cmd_set_scissors: {e}");
            e
        })?;
        let native: Vec<RECT> = scissors
            .iter()
            .map(|rect| RECT {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            })
            .collect();
        unsafe { self.list.RSSetScissorRects(&native) };
        Ok(())
    }

    fn cmd_set_vertex_buffer(
        &mut self,
        slot: u32,
        buffer: BufferId,
        offset: u64,
        stride: u32,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (resource, size) = self.resolve_buffer(buffer, BufferUsage::VERTEX, "VERTEX")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "vertex buffer offset is past the end of the buffer".into(),
            )));
        }
        let view = D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: unsafe { resource.GetGPUVirtualAddress() } + offset,
            SizeInBytes: (size - offset) as u32,
            StrideInBytes: stride,
        };
        unsafe { self.list.IASetVertexBuffers(slot, Some(&[view])) };
        Ok(())
    }

    fn cmd_set_index_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        format: IndexFormat,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (resource, size) = self.resolve_buffer(buffer, BufferUsage::INDEX, "INDEX")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "index buffer offset is past the end of the buffer".into(),
            )));
        }
        let view = D3D12_INDEX_BUFFER_VIEW {
            BufferLocation: unsafe { resource.GetGPUVirtualAddress() } + offset,
            SizeInBytes: (size - offset) as u32,
            Format: dxgi::index_format_to_dxgi(format),
        };
        unsafe { self.list.IASetIndexBuffer(Some(&view)) };
        Ok(())
    }

    fn cmd_transition_texture(
        &mut self,
        texture: TextureId,
        before: ResourceState,
        after: ResourceState,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let resource = {
            let textures = self.shared.textures.lock().unwrap();
            textures
                .get(texture.0)
                .map_err(|e| {
                    log::error!("Direct3D12CommandBuffer::cmd_transition_texture: {e}");
                    CommandError::from(e)
                })?
                .resource
                .clone()
        };
        if before == after {
            return Ok(());
        }
        unsafe {
            let barrier = D3D12_RESOURCE_BARRIER {
                Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
                Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
                Anonymous: D3D12_RESOURCE_BARRIER_0 {
                    Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                        pResource: ManuallyDrop::new(Some(resource)),
                        Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
                        StateBefore: conv::resource_state_to_native(before),
                        StateAfter: conv::resource_state_to_native(after),
                    }),
                },
            };
            self.list.ResourceBarrier(std::slice::from_ref(&barrier));
            // Balance the reference the barrier payload holds.
            let transition = ManuallyDrop::into_inner(barrier.Anonymous.Transition);
            drop(ManuallyDrop::into_inner(transition.pResource));
        }
        Ok(())
    }

    fn cmd_draw(
        &mut self,
        vertices: Range<u32>,
        instances: Range<u32>,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        unsafe {
            self.list.DrawInstanced(
                vertices.end.saturating_sub(vertices.start),
                instances.end.saturating_sub(instances.start),
                vertices.start,
                instances.start,
            )
        };
        Ok(())
    }

    fn cmd_draw_indexed(
        &mut self,
        indices: Range<u32>,
        base_vertex: i32,
        instances: Range<u32>,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        unsafe {
            self.list.DrawIndexedInstanced(
                indices.end.saturating_sub(indices.start),
                instances.end.saturating_sub(instances.start),
                indices.start,
                base_vertex,
                instances.start,
            )
        };
        Ok(())
    }

    fn cmd_draw_indirect(&mut self, args: BufferId, offset: u64) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (resource, size) = self.resolve_buffer(args, BufferUsage::INDIRECT, "INDIRECT")?;
        if offset + std::mem::size_of::<D3D12_DRAW_ARGUMENTS>() as u64 > size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "indirect arguments are past the end of the buffer".into(),
            )));
        }
        unsafe {
            self.list
                .ExecuteIndirect(&self.shared.draw_signature, 1, &resource, offset, None, 0)
        };
        Ok(())
    }

    fn cmd_draw_indexed_indirect(
        &mut self,
        args: BufferId,
        offset: u64,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (resource, size) = self.resolve_buffer(args, BufferUsage::INDIRECT, "INDIRECT")?;
        if offset + std::mem::size_of::<D3D12_DRAW_INDEXED_ARGUMENTS>() as u64 > size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "indirect arguments are past the end of the buffer".into(),
            )));
        }
        unsafe {
            self.list.ExecuteIndirect(
                &self.shared.draw_indexed_signature,
                1,
                &resource,
                offset,
                None,
                0,
            )
        };
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
