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

//! Deferred command recording into a Direct3D 11 deferred context.

use super::backend::D3d11Shared;
use crate::graphics::dxgi;
use std::any::Any;
use std::ops::Range;
use std::sync::Arc;
use thalo_core::gfx::{
    check_array_limit, check_bounded_array, BackendError, BufferId, BufferUsage, ColorTargetId,
    CommandBuffer, CommandBufferState, CommandError, DepthStencilTargetId, GraphicsApi,
    IndexFormat, PipelineId, RecorderState, ResourceError, ResourceState, ScissorRect, TextureId,
    Viewport, MAX_COLOR_TARGETS, MAX_SCISSORS, MAX_VIEWPORTS,
};
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D11::*;

/// A command buffer recording into a Direct3D 11 deferred context.
///
/// Submission turns the recording into an `ID3D11CommandList` and executes
/// it on the immediate context, which completes synchronously from the CPU's
/// perspective; unlike the Direct3D 12 variant, a submitted buffer is
/// immediately resettable.
pub struct Direct3D11CommandBuffer {
    shared: Arc<D3d11Shared>,
    deferred: ID3D11DeviceContext,
    recorder: RecorderState,
}

impl Direct3D11CommandBuffer {
    pub(crate) fn new(shared: Arc<D3d11Shared>) -> Result<Self, BackendError> {
        let mut deferred: Option<ID3D11DeviceContext> = None;
        unsafe { shared.device.CreateDeferredContext(0, Some(&mut deferred)) }.map_err(|e| {
            log::error!("Direct3D11CommandBuffer::new: CreateDeferredContext failed: {e}");
            BackendError::CommandBufferCreation(format!("CreateDeferredContext failed: {e}"))
        })?;
        let deferred = deferred.ok_or_else(|| {
            BackendError::CommandBufferCreation("CreateDeferredContext returned nothing".into())
        })?;
        Ok(Self {
            shared,
            deferred,
            recorder: RecorderState::new(),
        })
    }

    pub(crate) fn shared(&self) -> &Arc<D3d11Shared> {
        &self.shared
    }

    /// Finalizes the recording into an executable command list.
    pub(crate) fn finish_recording(&mut self) -> Result<ID3D11CommandList, CommandError> {
        self.recorder.finish()?;
        let mut list: Option<ID3D11CommandList> = None;
        unsafe { self.deferred.FinishCommandList(false, Some(&mut list)) }
            .map_err(|e| CommandError::Submit(format!("FinishCommandList failed: {e}")))?;
        list.ok_or_else(|| CommandError::Submit("FinishCommandList produced no list".into()))
    }

    fn resolve_rtv(&self, target: ColorTargetId) -> Result<ID3D11RenderTargetView, CommandError> {
        let targets = self.shared.color_targets.lock().unwrap();
        let entry = targets.get(target.0).map_err(|e| {
            log::error!("Direct3D11CommandBuffer: invalid color target: {e}");
            CommandError::from(e)
        })?;
        Ok(entry.rtv.clone())
    }

    fn resolve_dsv(
        &self,
        target: DepthStencilTargetId,
    ) -> Result<ID3D11DepthStencilView, CommandError> {
        let targets = self.shared.depth_targets.lock().unwrap();
        let entry = targets.get(target.0).map_err(|e| {
            log::error!("Direct3D11CommandBuffer: invalid depth-stencil target: {e}");
            CommandError::from(e)
        })?;
        Ok(entry.dsv.clone())
    }

    fn resolve_buffer(
        &self,
        buffer: BufferId,
        required: BufferUsage,
        what: &str,
    ) -> Result<(ID3D11Buffer, u64), CommandError> {
        let buffers = self.shared.buffers.lock().unwrap();
        let entry = buffers.get(buffer.0).map_err(|e| {
            log::error!("Direct3D11CommandBuffer: invalid buffer: {e}");
            CommandError::from(e)
        })?;
        if !entry.desc.usage.contains(required) {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                format!("buffer lacks the {what} usage"),
            )));
        }
        Ok((entry.buffer.clone(), entry.desc.size))
    }
}

impl CommandBuffer for Direct3D11CommandBuffer {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D11
    }

    fn state(&self) -> CommandBufferState {
        self.recorder.state()
    }

    fn reset(&mut self) -> Result<(), CommandError> {
        // Pending never occurs here: submission executes synchronously.
        let was_recording = self.recorder.state() == CommandBufferState::Recording;
        self.recorder.reset()?;
        if was_recording {
            unsafe {
                // Drop the half-recorded list and unbind everything.
                let mut stale: Option<ID3D11CommandList> = None;
                let _ = self.deferred.FinishCommandList(false, Some(&mut stale));
                drop(stale);
                self.deferred.ClearState();
            }
        }
        Ok(())
    }

    fn cmd_bind_pipeline(&mut self, pipeline: PipelineId) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let pipelines = self.shared.pipelines.lock().unwrap();
        let entry = pipelines.get(pipeline.0).map_err(|e| {
            log::error!("Direct3D11CommandBuffer::cmd_bind_pipeline: {e}");
            CommandError::from(e)
        })?;
        unsafe {
            self.deferred.VSSetShader(&entry.vertex, None);
            match &entry.pixel {
                Some(pixel) => self.deferred.PSSetShader(pixel, None),
                None => self.deferred.PSSetShader(None::<&ID3D11PixelShader>, None),
            }
            match &entry.input_layout {
                Some(layout) => self.deferred.IASetInputLayout(layout),
                None => self.deferred.IASetInputLayout(None::<&ID3D11InputLayout>),
            }
            self.deferred.RSSetState(&entry.rasterizer);
            match &entry.depth_stencil {
                Some(state) => self.deferred.OMSetDepthStencilState(state, 0),
                None => self
                    .deferred
                    .OMSetDepthStencilState(None::<&ID3D11DepthStencilState>, 0),
            }
            self.deferred.IASetPrimitiveTopology(entry.topology);
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
        unsafe { self.deferred.ClearRenderTargetView(&rtv, &color) };
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
            self.deferred.ClearDepthStencilView(
                &dsv,
                (D3D11_CLEAR_DEPTH.0 | D3D11_CLEAR_STENCIL.0) as u32,
                depth,
                stencil,
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
            rtvs.push(Some(self.resolve_rtv(*target)?));
        }
        let dsv = match depth_stencil {
            Some(target) => Some(self.resolve_dsv(target)?),
            None => None,
        };
        unsafe {
            self.deferred.OMSetRenderTargets(
                if rtvs.is_empty() { None } else { Some(&rtvs) },
                dsv.as_ref(),
            )
        };
        Ok(())
    }

    fn cmd_set_viewports(&mut self, viewports: &[Viewport]) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        check_bounded_array("viewports", viewports.len(), MAX_VIEWPORTS).map_err(|e| {
            log::error!("Direct3D11CommandBuffer::cmd_set_viewports: {e}");
            e
        })?;
        let native: Vec<D3D11_VIEWPORT> = viewports
            .iter()
            .map(|vp| D3D11_VIEWPORT {
                TopLeftX: vp.origin_x,
                TopLeftY: vp.origin_y,
                Width: vp.width,
                Height: vp.height,
                MinDepth: vp.min_depth,
                MaxDepth: vp.max_depth,
            })
            .collect();
        unsafe { self.deferred.RSSetViewports(Some(&native)) };
        Ok(())
    }

    fn cmd_set_scissors(&mut self, scissors: &[ScissorRect]) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        check_bounded_array("scissor rectangles", scissors.len(), MAX_SCISSORS).map_err(|e| {
            log::error!("Direct3D11CommandBuffer::cmd_set_scissors: {e}");
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
        unsafe { self.deferred.RSSetScissorRects(Some(&native)) };
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
        let (buffer, size) = self.resolve_buffer(buffer, BufferUsage::VERTEX, "VERTEX")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "vertex buffer offset is past the end of the buffer".into(),
            )));
        }
        let binding = Some(buffer);
        let offset = offset as u32;
        unsafe {
            self.deferred
                .IASetVertexBuffers(slot, 1, Some(&binding), Some(&stride), Some(&offset))
        };
        Ok(())
    }

    fn cmd_set_index_buffer(
        &mut self,
        buffer: BufferId,
        offset: u64,
        format: IndexFormat,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (buffer, size) = self.resolve_buffer(buffer, BufferUsage::INDEX, "INDEX")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "index buffer offset is past the end of the buffer".into(),
            )));
        }
        unsafe {
            self.deferred
                .IASetIndexBuffer(&buffer, dxgi::index_format_to_dxgi(format), offset as u32)
        };
        Ok(())
    }

    fn cmd_transition_texture(
        &mut self,
        texture: TextureId,
        _before: ResourceState,
        _after: ResourceState,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        // The handle is validated for parity with Direct3D 12; the runtime
        // tracks resource states itself, so nothing is recorded.
        self.shared
            .textures
            .lock()
            .unwrap()
            .get(texture.0)
            .map_err(|e| {
                log::error!("Direct3D11CommandBuffer::cmd_transition_texture: {e}");
                CommandError::from(e)
            })?;
        Ok(())
    }

    fn cmd_draw(
        &mut self,
        vertices: Range<u32>,
        instances: Range<u32>,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        unsafe {
            self.deferred.DrawInstanced(
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
            self.deferred.DrawIndexedInstanced(
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
        let (buffer, size) = self.resolve_buffer(args, BufferUsage::INDIRECT, "INDIRECT")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "indirect arguments are past the end of the buffer".into(),
            )));
        }
        unsafe { self.deferred.DrawInstancedIndirect(&buffer, offset as u32) };
        Ok(())
    }

    fn cmd_draw_indexed_indirect(
        &mut self,
        args: BufferId,
        offset: u64,
    ) -> Result<(), CommandError> {
        self.recorder.require_recording()?;
        let (buffer, size) = self.resolve_buffer(args, BufferUsage::INDIRECT, "INDIRECT")?;
        if offset >= size {
            return Err(CommandError::Resource(ResourceError::InvalidDescriptor(
                "indirect arguments are past the end of the buffer".into(),
            )));
        }
        unsafe { self.deferred.DrawIndexedInstancedIndirect(&buffer, offset as u32) };
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
