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

//! The Direct3D 12 backend: device ownership, swap chain, and the factory
//! surface for every other graphics object.

use super::command::Direct3D12CommandBuffer;
use super::conversions as conv;
use super::descriptor::DescriptorPool;
use super::queue::Direct3D12CommandQueue;
use crate::graphics::dxgi;
use std::fmt;
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thalo_core::gfx::{
    BackendError, BackendId, BackendParameters, BufferDesc, BufferId, ColorTargetId, CommandBuffer,
    CommandQueue, DepthStencilTargetId, GraphicsApi, GraphicsBackend, HandleArena, HeapDesc,
    HeapId, HeapKind, MemoryClass, PipelineDesc, PipelineId, ResourceError, ShaderDesc, ShaderId,
    ShaderStage, TextureDesc, TextureFormat, TextureId, TextureUsage, MAX_COLOR_TARGETS,
    SWAP_CHAIN_BUFFER_COUNT,
};
use windows::core::{s, Interface};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::System::LibraryLoader::LoadLibraryA;
use windows::Win32::System::Threading::{WaitForSingleObject, INFINITE};

/// How many render-target / depth-stencil views the backend can hand out at
/// once, swap-chain views included.
const RTV_POOL_CAPACITY: u32 = 64;
const DSV_POOL_CAPACITY: u32 = 32;

pub(crate) struct TextureEntry {
    pub(crate) resource: ID3D12Resource,
    pub(crate) desc: TextureDesc,
}

pub(crate) struct BufferEntry {
    pub(crate) resource: ID3D12Resource,
    pub(crate) desc: BufferDesc,
}

pub(crate) struct HeapEntry {
    // Keeps the native heap alive for the lifetime of the handle.
    #[allow(dead_code)]
    heap: ID3D12DescriptorHeap,
    kind: HeapKind,
    size: u32,
}

pub(crate) struct ColorTargetEntry {
    pub(crate) resource: ID3D12Resource,
    pub(crate) rtv: D3D12_CPU_DESCRIPTOR_HANDLE,
    slot: u32,
    #[allow(dead_code)]
    pub(crate) format: TextureFormat,
}

pub(crate) struct DepthStencilTargetEntry {
    #[allow(dead_code)]
    pub(crate) resource: ID3D12Resource,
    pub(crate) dsv: D3D12_CPU_DESCRIPTOR_HANDLE,
    slot: u32,
    #[allow(dead_code)]
    pub(crate) format: TextureFormat,
}

pub(crate) struct ShaderEntry {
    pub(crate) stage: ShaderStage,
    pub(crate) bytecode: Vec<u8>,
}

pub(crate) struct PipelineEntry {
    pub(crate) pso: ID3D12PipelineState,
    pub(crate) root_signature: ID3D12RootSignature,
    pub(crate) topology: D3D_PRIMITIVE_TOPOLOGY,
}

/// Device-level state shared between the backend, its command buffers, and
/// its queues, mirroring the single device / single direct queue pairing.
pub(crate) struct D3d12Shared {
    pub(crate) device: ID3D12Device,
    pub(crate) queue: ID3D12CommandQueue,
    pub(crate) backend_id: BackendId,
    pub(crate) fence: ID3D12Fence,
    pub(crate) fence_event: HANDLE,
    pub(crate) next_fence_value: AtomicU64,
    pub(crate) draw_signature: ID3D12CommandSignature,
    pub(crate) draw_indexed_signature: ID3D12CommandSignature,
    pub(crate) textures: Mutex<HandleArena<TextureEntry>>,
    pub(crate) buffers: Mutex<HandleArena<BufferEntry>>,
    pub(crate) heaps: Mutex<HandleArena<HeapEntry>>,
    pub(crate) color_targets: Mutex<HandleArena<ColorTargetEntry>>,
    pub(crate) depth_targets: Mutex<HandleArena<DepthStencilTargetEntry>>,
    pub(crate) shaders: Mutex<HandleArena<ShaderEntry>>,
    pub(crate) pipelines: Mutex<HandleArena<PipelineEntry>>,
    pub(crate) rtv_pool: Mutex<DescriptorPool>,
    pub(crate) dsv_pool: Mutex<DescriptorPool>,
}

impl Drop for D3d12Shared {
    fn drop(&mut self) {
        unsafe {
            // Drain in-flight work before COM teardown.
            let value = self.next_fence_value.fetch_add(1, Ordering::Relaxed) + 1;
            if self.queue.Signal(&self.fence, value).is_ok()
                && self.fence.GetCompletedValue() < value
                && self.fence.SetEventOnCompletion(value, self.fence_event).is_ok()
            {
                WaitForSingleObject(self.fence_event, INFINITE);
            }
            let _ = CloseHandle(self.fence_event);
        }
    }
}

/// The Direct3D 12 implementation of [`GraphicsBackend`].
///
/// Owns the device, the direct command queue, and a double-buffered
/// flip-discard swap chain. Construction either succeeds completely or rolls
/// back completely: every native object created before a failure is released
/// when the partially built state drops.
pub struct Direct3D12Backend {
    shared: Arc<D3d12Shared>,
    #[allow(dead_code)]
    factory: IDXGIFactory4,
    swap_chain: IDXGISwapChain3,
    back_buffers: Vec<TextureId>,
    back_buffer_targets: Vec<ColorTargetId>,
    back_index: usize,
    parameters: BackendParameters,
}

impl Direct3D12Backend {
    /// Initializes the backend against the given surface.
    pub fn new(params: &BackendParameters) -> Result<Self, BackendError> {
        if params.surface_size.is_empty() {
            return Err(BackendError::SwapChainCreation(
                "surface size must be non-zero".into(),
            ));
        }

        unsafe { LoadLibraryA(s!("d3d12.dll")) }.map_err(|e| {
            log::warn!("Direct3D12Backend::new: could not load the Direct3D 12 library: {e}");
            BackendError::Unavailable(format!("d3d12.dll could not be loaded: {e}"))
        })?;

        unsafe {
            #[cfg(debug_assertions)]
            {
                let mut debug: Option<ID3D12Debug> = None;
                if D3D12GetDebugInterface(&mut debug).is_ok() {
                    if let Some(debug) = debug {
                        debug.EnableDebugLayer();
                        log::debug!("Direct3D 12 debug layer enabled");
                    }
                }
            }

            let factory_flags = if cfg!(debug_assertions) {
                DXGI_CREATE_FACTORY_DEBUG
            } else {
                DXGI_CREATE_FACTORY_FLAGS(0)
            };
            let factory: IDXGIFactory4 = CreateDXGIFactory2(factory_flags).map_err(|e| {
                log::warn!("Direct3D12Backend::new: CreateDXGIFactory2 failed: {e}");
                BackendError::DeviceCreation(format!("CreateDXGIFactory2 failed: {e}"))
            })?;

            let mut device: Option<ID3D12Device> = None;
            D3D12CreateDevice(None, D3D_FEATURE_LEVEL_11_0, &mut device).map_err(|e| {
                log::warn!("Direct3D12Backend::new: D3D12CreateDevice failed: {e}");
                BackendError::DeviceCreation(format!("D3D12CreateDevice failed: {e}"))
            })?;
            let device = device.expect("device out-param is set on success");

            let queue_desc = D3D12_COMMAND_QUEUE_DESC {
                Type: D3D12_COMMAND_LIST_TYPE_DIRECT,
                Flags: D3D12_COMMAND_QUEUE_FLAG_NONE,
                ..Default::default()
            };
            let queue: ID3D12CommandQueue = device.CreateCommandQueue(&queue_desc).map_err(|e| {
                log::error!("Direct3D12Backend::new: CreateCommandQueue failed: {e}");
                BackendError::QueueCreation(format!("CreateCommandQueue failed: {e}"))
            })?;

            let hwnd = dxgi::hwnd_from_parameters(params)?;
            let sc_desc = dxgi::swap_chain_desc(params);
            let swap_chain: IDXGISwapChain1 = factory
                .CreateSwapChainForHwnd(&queue, hwnd, &sc_desc, None, None)
                .map_err(|e| {
                    log::error!("Direct3D12Backend::new: CreateSwapChainForHwnd failed: {e}");
                    BackendError::SwapChainCreation(format!("CreateSwapChainForHwnd failed: {e}"))
                })?;
            let swap_chain: IDXGISwapChain3 = swap_chain.cast().map_err(|e| {
                BackendError::SwapChainCreation(format!("IDXGISwapChain3 not supported: {e}"))
            })?;

            let fence: ID3D12Fence = device.CreateFence(0, D3D12_FENCE_FLAG_NONE).map_err(|e| {
                BackendError::DeviceCreation(format!("CreateFence failed: {e}"))
            })?;
            let fence_event =
                windows::Win32::System::Threading::CreateEventA(None, false, false, None)
                    .map_err(|e| {
                        BackendError::DeviceCreation(format!("CreateEventA failed: {e}"))
                    })?;

            let draw_signature = create_command_signature(
                &device,
                D3D12_INDIRECT_ARGUMENT_TYPE_DRAW,
                std::mem::size_of::<D3D12_DRAW_ARGUMENTS>() as u32,
            )?;
            let draw_indexed_signature = create_command_signature(
                &device,
                D3D12_INDIRECT_ARGUMENT_TYPE_DRAW_INDEXED,
                std::mem::size_of::<D3D12_DRAW_INDEXED_ARGUMENTS>() as u32,
            )?;

            let backend_id = BackendId::allocate();
            let mut rtv_pool = DescriptorPool::new(
                &device,
                D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
                RTV_POOL_CAPACITY,
                "render target view",
            )
            .map_err(|e| BackendError::DeviceCreation(e.to_string()))?;
            let dsv_pool = DescriptorPool::new(
                &device,
                D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
                DSV_POOL_CAPACITY,
                "depth-stencil view",
            )
            .map_err(|e| BackendError::DeviceCreation(e.to_string()))?;

            // Retrieve the swap chain's buffers and wrap them in regular
            // texture/target handles so command buffers can clear and bind
            // them like any other target.
            let mut textures = HandleArena::new(backend_id);
            let mut color_targets = HandleArena::new(backend_id);
            let mut back_buffers = Vec::with_capacity(SWAP_CHAIN_BUFFER_COUNT);
            let mut back_buffer_targets = Vec::with_capacity(SWAP_CHAIN_BUFFER_COUNT);
            for i in 0..SWAP_CHAIN_BUFFER_COUNT {
                let resource: ID3D12Resource = swap_chain.GetBuffer(i as u32).map_err(|e| {
                    log::error!("Direct3D12Backend::new: swap chain GetBuffer({i}) failed: {e}");
                    BackendError::SwapChainCreation(format!("GetBuffer({i}) failed: {e}"))
                })?;
                let desc = TextureDesc {
                    width: params.surface_size.width,
                    height: params.surface_size.height,
                    alignment: 0,
                    mip_level_count: 1,
                    format: dxgi::SWAP_CHAIN_FORMAT,
                    usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::COPY_DST,
                };
                let (slot, rtv) = rtv_pool
                    .allocate()
                    .map_err(|e| BackendError::SwapChainCreation(e.to_string()))?;
                device.CreateRenderTargetView(&resource, None, rtv);
                back_buffers.push(TextureId(textures.insert(TextureEntry {
                    resource: resource.clone(),
                    desc,
                })));
                back_buffer_targets.push(ColorTargetId(color_targets.insert(ColorTargetEntry {
                    resource,
                    rtv,
                    slot,
                    format: dxgi::SWAP_CHAIN_FORMAT,
                })));
            }
            let back_index = swap_chain.GetCurrentBackBufferIndex() as usize;

            log::info!(
                "Direct3D 12 backend initialized ({}x{}, {} swap chain buffers)",
                params.surface_size.width,
                params.surface_size.height,
                SWAP_CHAIN_BUFFER_COUNT
            );

            Ok(Self {
                shared: Arc::new(D3d12Shared {
                    device,
                    queue,
                    backend_id,
                    fence,
                    fence_event,
                    next_fence_value: AtomicU64::new(0),
                    draw_signature,
                    draw_indexed_signature,
                    textures: Mutex::new(textures),
                    buffers: Mutex::new(HandleArena::new(backend_id)),
                    heaps: Mutex::new(HandleArena::new(backend_id)),
                    color_targets: Mutex::new(color_targets),
                    depth_targets: Mutex::new(HandleArena::new(backend_id)),
                    shaders: Mutex::new(HandleArena::new(backend_id)),
                    pipelines: Mutex::new(HandleArena::new(backend_id)),
                    rtv_pool: Mutex::new(rtv_pool),
                    dsv_pool: Mutex::new(dsv_pool),
                }),
                factory,
                swap_chain,
                back_buffers,
                back_buffer_targets,
                back_index,
                parameters: *params,
            })
        }
    }
}

unsafe fn create_command_signature(
    device: &ID3D12Device,
    argument_type: D3D12_INDIRECT_ARGUMENT_TYPE,
    stride: u32,
) -> Result<ID3D12CommandSignature, BackendError> {
    let argument = D3D12_INDIRECT_ARGUMENT_DESC {
        Type: argument_type,
        ..Default::default()
    };
    let desc = D3D12_COMMAND_SIGNATURE_DESC {
        ByteStride: stride,
        NumArgumentDescs: 1,
        pArgumentDescs: &argument,
        NodeMask: 0,
    };
    let mut signature: Option<ID3D12CommandSignature> = None;
    device
        .CreateCommandSignature(&desc, None, &mut signature)
        .map_err(|e| BackendError::DeviceCreation(format!("CreateCommandSignature failed: {e}")))?;
    signature
        .ok_or_else(|| BackendError::DeviceCreation("CreateCommandSignature returned nothing".into()))
}

impl GraphicsBackend for Direct3D12Backend {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D12
    }

    fn backend_id(&self) -> BackendId {
        self.shared.backend_id
    }

    fn parameters(&self) -> &BackendParameters {
        &self.parameters
    }

    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>, BackendError> {
        // One device, one native direct queue: every queue object submits to
        // the same FIFO timeline.
        Ok(Box::new(Direct3D12CommandQueue::new(self.shared.clone())))
    }

    fn create_command_buffer(&self) -> Result<Box<dyn CommandBuffer>, BackendError> {
        let buffer = Direct3D12CommandBuffer::new(self.shared.clone())?;
        Ok(Box::new(buffer))
    }

    fn create_heap(&self, desc: &HeapDesc) -> Result<HeapId, ResourceError> {
        if desc.size == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "heap size must be at least one descriptor".into(),
            ));
        }
        let native_desc = D3D12_DESCRIPTOR_HEAP_DESC {
            Type: conv::heap_kind_to_native(desc.kind),
            NumDescriptors: desc.size,
            Flags: D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
            NodeMask: 0,
        };
        let heap: ID3D12DescriptorHeap =
            unsafe { self.shared.device.CreateDescriptorHeap(&native_desc) }.map_err(|e| {
                log::error!("Direct3D12Backend::create_heap: CreateDescriptorHeap failed: {e}");
                ResourceError::Creation(format!("CreateDescriptorHeap failed: {e}"))
            })?;
        Ok(HeapId(self.shared.heaps.lock().unwrap().insert(HeapEntry {
            heap,
            kind: desc.kind,
            size: desc.size,
        })))
    }

    fn heap_size(&self, heap: HeapId) -> Result<u32, ResourceError> {
        Ok(self.shared.heaps.lock().unwrap().get(heap.0)?.size)
    }

    fn create_texture(&self, desc: &TextureDesc) -> Result<TextureId, ResourceError> {
        if desc.width == 0 || desc.height == 0 || desc.mip_level_count == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "texture dimensions and mip count must be non-zero".into(),
            ));
        }
        let Some(format) = dxgi::texture_format_to_dxgi(desc.format) else {
            log::error!(
                "Direct3D12Backend::create_texture: unsupported texture format {:?}",
                desc.format
            );
            return Err(ResourceError::UnsupportedFormat {
                api: GraphicsApi::Direct3D12,
                format: desc.format,
            });
        };

        let heap_props = D3D12_HEAP_PROPERTIES {
            Type: D3D12_HEAP_TYPE_DEFAULT,
            ..Default::default()
        };
        let resource_desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
            Alignment: desc.alignment,
            Width: desc.width as u64,
            Height: desc.height,
            DepthOrArraySize: 1,
            MipLevels: desc.mip_level_count as u16,
            Format: format,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
            Flags: conv::resource_flags_from_usage(desc.usage),
        };
        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.shared.device.CreateCommittedResource(
                &heap_props,
                D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                D3D12_RESOURCE_STATE_COMMON,
                None,
                &mut resource,
            )
        }
        .map_err(|e| {
            log::error!("Direct3D12Backend::create_texture: CreateCommittedResource failed: {e}");
            ResourceError::Creation(format!("CreateCommittedResource failed: {e}"))
        })?;
        let resource = resource
            .ok_or_else(|| ResourceError::Creation("CreateCommittedResource returned nothing".into()))?;

        Ok(TextureId(self.shared.textures.lock().unwrap().insert(
            TextureEntry {
                resource,
                desc: desc.clone(),
            },
        )))
    }

    fn texture_format(&self, texture: TextureId) -> Result<TextureFormat, ResourceError> {
        Ok(self.shared.textures.lock().unwrap().get(texture.0)?.desc.format)
    }

    fn create_buffer(
        &self,
        desc: &BufferDesc,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        if desc.size == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "buffer size must be non-zero".into(),
            ));
        }
        if let Some(data) = data {
            if desc.memory != MemoryClass::Upload {
                return Err(ResourceError::InvalidDescriptor(
                    "initial data requires Upload memory".into(),
                ));
            }
            if data.len() as u64 > desc.size {
                return Err(ResourceError::InvalidDescriptor(
                    "initial data exceeds buffer size".into(),
                ));
            }
        }

        let (heap_type, initial_state) = match desc.memory {
            MemoryClass::DeviceLocal => (D3D12_HEAP_TYPE_DEFAULT, D3D12_RESOURCE_STATE_COMMON),
            MemoryClass::Upload => (D3D12_HEAP_TYPE_UPLOAD, D3D12_RESOURCE_STATE_GENERIC_READ),
        };
        let heap_props = D3D12_HEAP_PROPERTIES {
            Type: heap_type,
            ..Default::default()
        };
        let resource_desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
            Width: desc.size,
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            ..Default::default()
        };
        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.shared.device.CreateCommittedResource(
                &heap_props,
                D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                initial_state,
                None,
                &mut resource,
            )
        }
        .map_err(|e| {
            log::error!("Direct3D12Backend::create_buffer: CreateCommittedResource failed: {e}");
            ResourceError::Creation(format!("CreateCommittedResource failed: {e}"))
        })?;
        let resource = resource
            .ok_or_else(|| ResourceError::Creation("CreateCommittedResource returned nothing".into()))?;

        if let Some(data) = data {
            unsafe {
                let mut mapped = std::ptr::null_mut();
                resource.Map(0, None, Some(&mut mapped)).map_err(|e| {
                    ResourceError::Creation(format!("Map failed: {e}"))
                })?;
                std::ptr::copy_nonoverlapping(data.as_ptr(), mapped as *mut u8, data.len());
                resource.Unmap(0, None);
            }
        }

        Ok(BufferId(self.shared.buffers.lock().unwrap().insert(
            BufferEntry {
                resource,
                desc: *desc,
            },
        )))
    }

    fn create_color_target(&self, texture: TextureId) -> Result<ColorTargetId, ResourceError> {
        let (resource, format) = {
            let textures = self.shared.textures.lock().unwrap();
            let entry = textures.get(texture.0).map_err(|e| {
                log::error!("Direct3D12Backend::create_color_target: {e}");
                e
            })?;
            if !entry.desc.format.is_color_renderable() {
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            if !entry.desc.usage.contains(TextureUsage::COLOR_ATTACHMENT) {
                log::error!(
                    "Direct3D12Backend::create_color_target: texture lacks COLOR_ATTACHMENT usage"
                );
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            (entry.resource.clone(), entry.desc.format)
        };

        let (slot, rtv) = self.shared.rtv_pool.lock().unwrap().allocate()?;
        unsafe { self.shared.device.CreateRenderTargetView(&resource, None, rtv) };
        Ok(ColorTargetId(self.shared.color_targets.lock().unwrap().insert(
            ColorTargetEntry {
                resource,
                rtv,
                slot,
                format,
            },
        )))
    }

    fn create_depth_stencil_target(
        &self,
        texture: TextureId,
    ) -> Result<DepthStencilTargetId, ResourceError> {
        let (resource, format) = {
            let textures = self.shared.textures.lock().unwrap();
            let entry = textures.get(texture.0).map_err(|e| {
                log::error!("Direct3D12Backend::create_depth_stencil_target: {e}");
                e
            })?;
            if !entry.desc.format.has_depth_aspect() {
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            if !entry
                .desc
                .usage
                .contains(TextureUsage::DEPTH_STENCIL_ATTACHMENT)
            {
                log::error!(
                    "Direct3D12Backend::create_depth_stencil_target: texture lacks DEPTH_STENCIL_ATTACHMENT usage"
                );
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            (entry.resource.clone(), entry.desc.format)
        };

        let (slot, dsv) = self.shared.dsv_pool.lock().unwrap().allocate()?;
        unsafe { self.shared.device.CreateDepthStencilView(&resource, None, dsv) };
        Ok(DepthStencilTargetId(self.shared.depth_targets.lock().unwrap().insert(
            DepthStencilTargetEntry {
                resource,
                dsv,
                slot,
                format,
            },
        )))
    }

    fn create_shader(&self, desc: &ShaderDesc) -> Result<ShaderId, ResourceError> {
        if desc.bytecode.is_empty() {
            return Err(ResourceError::InvalidDescriptor(
                "shader bytecode must not be empty".into(),
            ));
        }
        Ok(ShaderId(self.shared.shaders.lock().unwrap().insert(
            ShaderEntry {
                stage: desc.stage,
                bytecode: desc.bytecode.clone(),
            },
        )))
    }

    fn create_pipeline(&self, desc: &PipelineDesc) -> Result<PipelineId, ResourceError> {
        if desc.color_formats.len() > MAX_COLOR_TARGETS {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{} color targets requested, limit is {MAX_COLOR_TARGETS}",
                desc.color_formats.len()
            )));
        }
        let mut rtv_formats = [DXGI_FORMAT_UNKNOWN; MAX_COLOR_TARGETS];
        for (i, format) in desc.color_formats.iter().enumerate() {
            if !format.is_color_renderable() {
                return Err(ResourceError::NotRenderable { format: *format });
            }
            rtv_formats[i] = dxgi::texture_format_to_dxgi(*format).ok_or(
                ResourceError::UnsupportedFormat {
                    api: GraphicsApi::Direct3D12,
                    format: *format,
                },
            )?;
        }
        let dsv_format = match &desc.depth {
            Some(depth) => {
                if !depth.format.has_depth_aspect() {
                    return Err(ResourceError::NotRenderable {
                        format: depth.format,
                    });
                }
                dxgi::texture_format_to_dxgi(depth.format).ok_or(
                    ResourceError::UnsupportedFormat {
                        api: GraphicsApi::Direct3D12,
                        format: depth.format,
                    },
                )?
            }
            None => DXGI_FORMAT_UNKNOWN,
        };

        let shaders = self.shared.shaders.lock().unwrap();
        let vs = shaders.get(desc.vertex_shader.0).map_err(|e| {
            log::error!("Direct3D12Backend::create_pipeline: vertex shader: {e}");
            e
        })?;
        if vs.stage != ShaderStage::Vertex {
            return Err(ResourceError::InvalidDescriptor(
                "vertex_shader was not compiled for the vertex stage".into(),
            ));
        }
        let ps = match desc.fragment_shader {
            Some(id) => {
                let entry = shaders.get(id.0).map_err(|e| {
                    log::error!("Direct3D12Backend::create_pipeline: fragment shader: {e}");
                    e
                })?;
                if entry.stage != ShaderStage::Fragment {
                    return Err(ResourceError::InvalidDescriptor(
                        "fragment_shader was not compiled for the fragment stage".into(),
                    ));
                }
                Some(entry)
            }
            None => None,
        };

        unsafe {
            // Minimal root signature: resource binding flows through
            // descriptor heaps, the input assembler through the layout below.
            let root_desc = D3D12_ROOT_SIGNATURE_DESC {
                NumParameters: 0,
                pParameters: std::ptr::null(),
                NumStaticSamplers: 0,
                pStaticSamplers: std::ptr::null(),
                Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
            };
            let mut blob = None;
            D3D12SerializeRootSignature(&root_desc, D3D_ROOT_SIGNATURE_VERSION_1, &mut blob, None)
                .map_err(|e| {
                    ResourceError::Creation(format!("D3D12SerializeRootSignature failed: {e}"))
                })?;
            let blob = blob
                .ok_or_else(|| ResourceError::Creation("root signature blob missing".into()))?;
            let root_signature: ID3D12RootSignature = self
                .shared
                .device
                .CreateRootSignature(
                    0,
                    std::slice::from_raw_parts(
                        blob.GetBufferPointer() as *const u8,
                        blob.GetBufferSize(),
                    ),
                )
                .map_err(|e| {
                    ResourceError::Creation(format!("CreateRootSignature failed: {e}"))
                })?;

            let elements: Vec<D3D12_INPUT_ELEMENT_DESC> = desc
                .vertex_layout
                .attributes
                .iter()
                .map(|attribute| D3D12_INPUT_ELEMENT_DESC {
                    SemanticName: conv::semantic_name(attribute.semantic),
                    SemanticIndex: attribute.semantic_index,
                    Format: conv::vertex_format_to_dxgi(attribute.format),
                    InputSlot: 0,
                    AlignedByteOffset: attribute.offset,
                    InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                    InstanceDataStepRate: 0,
                })
                .collect();

            let mut pso_desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC::default();
            pso_desc.pRootSignature = ManuallyDrop::new(Some(root_signature.clone()));
            pso_desc.VS = D3D12_SHADER_BYTECODE {
                pShaderBytecode: vs.bytecode.as_ptr() as _,
                BytecodeLength: vs.bytecode.len(),
            };
            if let Some(ps) = ps {
                pso_desc.PS = D3D12_SHADER_BYTECODE {
                    pShaderBytecode: ps.bytecode.as_ptr() as _,
                    BytecodeLength: ps.bytecode.len(),
                };
            }
            pso_desc.BlendState.RenderTarget[0] = D3D12_RENDER_TARGET_BLEND_DESC {
                RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
                ..Default::default()
            };
            pso_desc.SampleMask = u32::MAX;
            pso_desc.RasterizerState = D3D12_RASTERIZER_DESC {
                FillMode: D3D12_FILL_MODE_SOLID,
                CullMode: conv::cull_mode_to_native(desc.cull_mode),
                DepthClipEnable: true.into(),
                ..Default::default()
            };
            if let Some(depth) = &desc.depth {
                pso_desc.DepthStencilState = D3D12_DEPTH_STENCIL_DESC {
                    DepthEnable: true.into(),
                    DepthWriteMask: if depth.write_enabled {
                        D3D12_DEPTH_WRITE_MASK_ALL
                    } else {
                        D3D12_DEPTH_WRITE_MASK_ZERO
                    },
                    DepthFunc: conv::compare_to_native(depth.compare),
                    StencilReadMask: 0xFF,
                    StencilWriteMask: 0xFF,
                    ..Default::default()
                };
                pso_desc.DSVFormat = dsv_format;
            }
            pso_desc.InputLayout = D3D12_INPUT_LAYOUT_DESC {
                pInputElementDescs: if elements.is_empty() {
                    std::ptr::null()
                } else {
                    elements.as_ptr()
                },
                NumElements: elements.len() as u32,
            };
            pso_desc.PrimitiveTopologyType = conv::topology_type_to_native(desc.topology);
            pso_desc.NumRenderTargets = desc.color_formats.len() as u32;
            pso_desc.RTVFormats = rtv_formats;
            pso_desc.SampleDesc.Count = 1;

            let result = self.shared.device.CreateGraphicsPipelineState(&pso_desc);
            // Balance the reference the descriptor held on the root signature.
            let _ = ManuallyDrop::into_inner(pso_desc.pRootSignature);
            let pso: ID3D12PipelineState = result.map_err(|e| {
                log::error!(
                    "Direct3D12Backend::create_pipeline: CreateGraphicsPipelineState failed: {e}"
                );
                ResourceError::Creation(format!("CreateGraphicsPipelineState failed: {e}"))
            })?;

            drop(shaders);
            Ok(PipelineId(self.shared.pipelines.lock().unwrap().insert(
                PipelineEntry {
                    pso,
                    root_signature,
                    topology: conv::topology_to_native(desc.topology),
                },
            )))
        }
    }

    fn current_back_buffer(&self) -> Result<TextureId, ResourceError> {
        Ok(self.back_buffers[self.back_index])
    }

    fn current_back_buffer_target(&self) -> Result<ColorTargetId, ResourceError> {
        Ok(self.back_buffer_targets[self.back_index])
    }

    fn destroy_heap(&self, heap: HeapId) -> Result<(), ResourceError> {
        let entry = self.shared.heaps.lock().unwrap().remove(heap.0)?;
        log::debug!(
            "Direct3D12Backend: destroyed {:?} heap ({} slots)",
            entry.kind,
            entry.size
        );
        Ok(())
    }

    fn destroy_texture(&self, texture: TextureId) -> Result<(), ResourceError> {
        self.shared.textures.lock().unwrap().remove(texture.0).map(|_| ())
    }

    fn destroy_buffer(&self, buffer: BufferId) -> Result<(), ResourceError> {
        self.shared.buffers.lock().unwrap().remove(buffer.0).map(|_| ())
    }

    fn destroy_color_target(&self, target: ColorTargetId) -> Result<(), ResourceError> {
        let entry = self.shared.color_targets.lock().unwrap().remove(target.0)?;
        self.shared.rtv_pool.lock().unwrap().free(entry.slot);
        Ok(())
    }

    fn destroy_depth_stencil_target(
        &self,
        target: DepthStencilTargetId,
    ) -> Result<(), ResourceError> {
        let entry = self.shared.depth_targets.lock().unwrap().remove(target.0)?;
        self.shared.dsv_pool.lock().unwrap().free(entry.slot);
        Ok(())
    }

    fn destroy_shader(&self, shader: ShaderId) -> Result<(), ResourceError> {
        self.shared.shaders.lock().unwrap().remove(shader.0).map(|_| ())
    }

    fn destroy_pipeline(&self, pipeline: PipelineId) -> Result<(), ResourceError> {
        self.shared.pipelines.lock().unwrap().remove(pipeline.0).map(|_| ())
    }

    fn do_swap_buffers(&mut self) -> Result<(), BackendError> {
        unsafe { self.swap_chain.Present(0, DXGI_PRESENT(0)) }.ok().map_err(|e| {
            log::error!("Direct3D12Backend::do_swap_buffers: Present failed: {e}");
            BackendError::Present(format!("Present failed: {e}"))
        })?;
        self.back_index = unsafe { self.swap_chain.GetCurrentBackBufferIndex() } as usize;
        Ok(())
    }

    fn supports_parallel_recording(&self) -> bool {
        // Command lists record independently; only submission serializes.
        true
    }
}

impl fmt::Debug for Direct3D12Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Direct3D12Backend")
            .field("backend_id", &self.shared.backend_id)
            .field("surface", &self.parameters.surface_size)
            .field("back_index", &self.back_index)
            .finish_non_exhaustive()
    }
}
