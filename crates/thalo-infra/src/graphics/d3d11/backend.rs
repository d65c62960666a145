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

//! The Direct3D 11 backend: device ownership, swap chain, and the factory
//! surface for every other graphics object.

use super::command::Direct3D11CommandBuffer;
use super::conversions as conv;
use super::queue::Direct3D11CommandQueue;
use crate::graphics::dxgi;
use std::fmt;
use std::sync::{Arc, Mutex};
use thalo_core::gfx::{
    BackendError, BackendId, BackendParameters, BufferDesc, BufferId, ColorTargetId, CommandBuffer,
    CommandQueue, DepthStencilTargetId, GraphicsApi, GraphicsBackend, HandleArena, HeapDesc,
    HeapId, HeapKind, MemoryClass, PipelineDesc, PipelineId, ResourceError, ShaderDesc, ShaderId,
    ShaderStage, TextureDesc, TextureFormat, TextureId, TextureUsage, MAX_COLOR_TARGETS,
};
use windows::core::s;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::System::LibraryLoader::LoadLibraryA;

pub(crate) struct TextureEntry {
    pub(crate) resource: ID3D11Texture2D,
    pub(crate) desc: TextureDesc,
}

pub(crate) struct BufferEntry {
    pub(crate) buffer: ID3D11Buffer,
    pub(crate) desc: BufferDesc,
}

/// Direct3D 11 has no descriptor heap object; a heap is pure capacity
/// bookkeeping with the same size semantics as the Direct3D 12 variant.
pub(crate) struct HeapEntry {
    kind: HeapKind,
    size: u32,
}

pub(crate) struct ColorTargetEntry {
    pub(crate) rtv: ID3D11RenderTargetView,
    #[allow(dead_code)]
    pub(crate) format: TextureFormat,
}

pub(crate) struct DepthStencilTargetEntry {
    pub(crate) dsv: ID3D11DepthStencilView,
    #[allow(dead_code)]
    pub(crate) format: TextureFormat,
}

pub(crate) struct ShaderEntry {
    pub(crate) stage: ShaderStage,
    pub(crate) bytecode: Vec<u8>,
    pub(crate) vertex: Option<ID3D11VertexShader>,
    pub(crate) pixel: Option<ID3D11PixelShader>,
}

pub(crate) struct PipelineEntry {
    pub(crate) vertex: ID3D11VertexShader,
    pub(crate) pixel: Option<ID3D11PixelShader>,
    pub(crate) input_layout: Option<ID3D11InputLayout>,
    pub(crate) rasterizer: ID3D11RasterizerState,
    pub(crate) depth_stencil: Option<ID3D11DepthStencilState>,
    pub(crate) topology: D3D_PRIMITIVE_TOPOLOGY,
}

/// Device-level state shared between the backend, its command buffers, and
/// its queues.
pub(crate) struct D3d11Shared {
    pub(crate) device: ID3D11Device,
    pub(crate) immediate: ID3D11DeviceContext,
    pub(crate) backend_id: BackendId,
    pub(crate) textures: Mutex<HandleArena<TextureEntry>>,
    pub(crate) buffers: Mutex<HandleArena<BufferEntry>>,
    pub(crate) heaps: Mutex<HandleArena<HeapEntry>>,
    pub(crate) color_targets: Mutex<HandleArena<ColorTargetEntry>>,
    pub(crate) depth_targets: Mutex<HandleArena<DepthStencilTargetEntry>>,
    pub(crate) shaders: Mutex<HandleArena<ShaderEntry>>,
    pub(crate) pipelines: Mutex<HandleArena<PipelineEntry>>,
}

/// The Direct3D 11 implementation of [`GraphicsBackend`].
///
/// Owns the device, its immediate context, and a double-buffered
/// flip-discard swap chain. The flip model only exposes buffer 0 to the CPU,
/// so the logical front/back references rotate over a single accessible
/// texture; the swap chain rotates the real surfaces internally.
pub struct Direct3D11Backend {
    shared: Arc<D3d11Shared>,
    #[allow(dead_code)]
    factory: IDXGIFactory2,
    swap_chain: IDXGISwapChain1,
    back_buffer: TextureId,
    back_buffer_target: ColorTargetId,
    // Logical front/back rotation, swapped on every successful present.
    back_index: usize,
    parameters: BackendParameters,
}

impl Direct3D11Backend {
    /// Initializes the backend against the given surface.
    pub fn new(params: &BackendParameters) -> Result<Self, BackendError> {
        if params.surface_size.is_empty() {
            return Err(BackendError::SwapChainCreation(
                "surface size must be non-zero".into(),
            ));
        }

        unsafe { LoadLibraryA(s!("d3d11.dll")) }.map_err(|e| {
            log::warn!("Direct3D11Backend::new: could not load the Direct3D 11 library: {e}");
            BackendError::Unavailable(format!("d3d11.dll could not be loaded: {e}"))
        })?;

        unsafe {
            let factory_flags = if cfg!(debug_assertions) {
                DXGI_CREATE_FACTORY_DEBUG
            } else {
                DXGI_CREATE_FACTORY_FLAGS(0)
            };
            let factory: IDXGIFactory2 = CreateDXGIFactory2(factory_flags).map_err(|e| {
                log::warn!("Direct3D11Backend::new: CreateDXGIFactory2 failed: {e}");
                BackendError::DeviceCreation(format!("CreateDXGIFactory2 failed: {e}"))
            })?;

            let device_flags = if cfg!(debug_assertions) {
                D3D11_CREATE_DEVICE_DEBUG
            } else {
                D3D11_CREATE_DEVICE_FLAG(0)
            };
            let mut device: Option<ID3D11Device> = None;
            let mut immediate: Option<ID3D11DeviceContext> = None;
            let mut feature_level = D3D_FEATURE_LEVEL::default();
            D3D11CreateDevice(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                HMODULE::default(),
                device_flags,
                None,
                D3D11_SDK_VERSION,
                Some(&mut device),
                Some(&mut feature_level),
                Some(&mut immediate),
            )
            .map_err(|e| {
                log::warn!("Direct3D11Backend::new: D3D11CreateDevice failed: {e}");
                BackendError::DeviceCreation(format!("D3D11CreateDevice failed: {e}"))
            })?;
            let device = device.expect("device out-param is set on success");
            let immediate = immediate.expect("context out-param is set on success");
            log::debug!("Direct3D 11 device created at feature level {feature_level:?}");

            let hwnd = dxgi::hwnd_from_parameters(params)?;
            let sc_desc = dxgi::swap_chain_desc(params);
            let swap_chain: IDXGISwapChain1 = factory
                .CreateSwapChainForHwnd(&device, hwnd, &sc_desc, None, None)
                .map_err(|e| {
                    log::error!("Direct3D11Backend::new: CreateSwapChainForHwnd failed: {e}");
                    BackendError::SwapChainCreation(format!("CreateSwapChainForHwnd failed: {e}"))
                })?;

            // Flip-model swap chains expose only buffer 0 for rendering.
            let back_resource: ID3D11Texture2D = swap_chain.GetBuffer(0).map_err(|e| {
                log::error!("Direct3D11Backend::new: swap chain GetBuffer(0) failed: {e}");
                BackendError::SwapChainCreation(format!("GetBuffer(0) failed: {e}"))
            })?;
            let mut rtv: Option<ID3D11RenderTargetView> = None;
            device
                .CreateRenderTargetView(&back_resource, None, Some(&mut rtv))
                .map_err(|e| {
                    log::error!("Direct3D11Backend::new: CreateRenderTargetView failed: {e}");
                    BackendError::SwapChainCreation(format!("CreateRenderTargetView failed: {e}"))
                })?;
            let rtv = rtv.expect("view out-param is set on success");

            let backend_id = BackendId::allocate();
            let mut textures = HandleArena::new(backend_id);
            let mut color_targets = HandleArena::new(backend_id);
            let back_buffer = TextureId(textures.insert(TextureEntry {
                resource: back_resource,
                desc: TextureDesc {
                    width: params.surface_size.width,
                    height: params.surface_size.height,
                    alignment: 0,
                    mip_level_count: 1,
                    format: dxgi::SWAP_CHAIN_FORMAT,
                    usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::COPY_DST,
                },
            }));
            let back_buffer_target = ColorTargetId(color_targets.insert(ColorTargetEntry {
                rtv,
                format: dxgi::SWAP_CHAIN_FORMAT,
            }));

            log::info!(
                "Direct3D 11 backend initialized ({}x{}, feature level {:?})",
                params.surface_size.width,
                params.surface_size.height,
                feature_level
            );

            Ok(Self {
                shared: Arc::new(D3d11Shared {
                    device,
                    immediate,
                    backend_id,
                    textures: Mutex::new(textures),
                    buffers: Mutex::new(HandleArena::new(backend_id)),
                    heaps: Mutex::new(HandleArena::new(backend_id)),
                    color_targets: Mutex::new(color_targets),
                    depth_targets: Mutex::new(HandleArena::new(backend_id)),
                    shaders: Mutex::new(HandleArena::new(backend_id)),
                    pipelines: Mutex::new(HandleArena::new(backend_id)),
                }),
                factory,
                swap_chain,
                back_buffer,
                back_buffer_target,
                back_index: 0,
                parameters: *params,
            })
        }
    }
}

impl GraphicsBackend for Direct3D11Backend {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D11
    }

    fn backend_id(&self) -> BackendId {
        self.shared.backend_id
    }

    fn parameters(&self) -> &BackendParameters {
        &self.parameters
    }

    fn create_command_queue(&self) -> Result<Box<dyn CommandQueue>, BackendError> {
        // The immediate context is the device's single submission channel;
        // every queue object drains into it in FIFO order.
        Ok(Box::new(Direct3D11CommandQueue::new(self.shared.clone())))
    }

    fn create_command_buffer(&self) -> Result<Box<dyn CommandBuffer>, BackendError> {
        let buffer = Direct3D11CommandBuffer::new(self.shared.clone())?;
        Ok(Box::new(buffer))
    }

    fn create_heap(&self, desc: &HeapDesc) -> Result<HeapId, ResourceError> {
        if desc.size == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "heap size must be at least one descriptor".into(),
            ));
        }
        if !conv::heap_kind_supported(desc.kind) {
            log::error!(
                "Direct3D11Backend::create_heap: unsupported heap kind {:?}",
                desc.kind
            );
            return Err(ResourceError::UnsupportedHeapKind {
                api: GraphicsApi::Direct3D11,
                kind: desc.kind,
            });
        }
        Ok(HeapId(self.shared.heaps.lock().unwrap().insert(HeapEntry {
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
                "Direct3D11Backend::create_texture: unsupported texture format {:?}",
                desc.format
            );
            return Err(ResourceError::UnsupportedFormat {
                api: GraphicsApi::Direct3D11,
                format: desc.format,
            });
        };
        if desc.alignment != 0 {
            // Direct3D 11 places committed resources itself.
            log::debug!(
                "Direct3D11Backend::create_texture: ignoring explicit alignment of {}",
                desc.alignment
            );
        }

        let native_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: desc.mip_level_count,
            ArraySize: 1,
            Format: format,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: conv::bind_flags_from_texture_usage(desc.usage, desc.format),
            CPUAccessFlags: 0,
            MiscFlags: 0,
        };
        let mut resource: Option<ID3D11Texture2D> = None;
        unsafe {
            self.shared
                .device
                .CreateTexture2D(&native_desc, None, Some(&mut resource))
        }
        .map_err(|e| {
            log::error!("Direct3D11Backend::create_texture: CreateTexture2D failed: {e}");
            ResourceError::Creation(format!("CreateTexture2D failed: {e}"))
        })?;
        let resource =
            resource.ok_or_else(|| ResourceError::Creation("CreateTexture2D returned nothing".into()))?;

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

        let (usage, cpu_access) = match desc.memory {
            MemoryClass::DeviceLocal => (D3D11_USAGE_DEFAULT, 0),
            MemoryClass::Upload => (D3D11_USAGE_DYNAMIC, D3D11_CPU_ACCESS_WRITE.0 as u32),
        };
        let native_desc = D3D11_BUFFER_DESC {
            ByteWidth: desc.size as u32,
            Usage: usage,
            BindFlags: conv::bind_flags_from_buffer_usage(desc.usage),
            CPUAccessFlags: cpu_access,
            MiscFlags: conv::misc_flags_from_buffer_usage(desc.usage),
            StructureByteStride: 0,
        };
        let initial = data.map(|data| D3D11_SUBRESOURCE_DATA {
            pSysMem: data.as_ptr() as *const core::ffi::c_void,
            SysMemPitch: 0,
            SysMemSlicePitch: 0,
        });
        let mut buffer: Option<ID3D11Buffer> = None;
        unsafe {
            self.shared.device.CreateBuffer(
                &native_desc,
                initial.as_ref().map(|init| init as *const _),
                Some(&mut buffer),
            )
        }
        .map_err(|e| {
            log::error!("Direct3D11Backend::create_buffer: CreateBuffer failed: {e}");
            ResourceError::Creation(format!("CreateBuffer failed: {e}"))
        })?;
        let buffer =
            buffer.ok_or_else(|| ResourceError::Creation("CreateBuffer returned nothing".into()))?;

        Ok(BufferId(self.shared.buffers.lock().unwrap().insert(
            BufferEntry {
                buffer,
                desc: *desc,
            },
        )))
    }

    fn create_color_target(&self, texture: TextureId) -> Result<ColorTargetId, ResourceError> {
        let (resource, format) = {
            let textures = self.shared.textures.lock().unwrap();
            let entry = textures.get(texture.0).map_err(|e| {
                log::error!("Direct3D11Backend::create_color_target: {e}");
                e
            })?;
            if !entry.desc.format.is_color_renderable() {
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            if !entry.desc.usage.contains(TextureUsage::COLOR_ATTACHMENT) {
                log::error!(
                    "Direct3D11Backend::create_color_target: texture lacks COLOR_ATTACHMENT usage"
                );
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            (entry.resource.clone(), entry.desc.format)
        };

        let mut rtv: Option<ID3D11RenderTargetView> = None;
        unsafe {
            self.shared
                .device
                .CreateRenderTargetView(&resource, None, Some(&mut rtv))
        }
        .map_err(|e| {
            log::error!("Direct3D11Backend::create_color_target: CreateRenderTargetView failed: {e}");
            ResourceError::Creation(format!("CreateRenderTargetView failed: {e}"))
        })?;
        let rtv = rtv
            .ok_or_else(|| ResourceError::Creation("CreateRenderTargetView returned nothing".into()))?;

        Ok(ColorTargetId(
            self.shared
                .color_targets
                .lock()
                .unwrap()
                .insert(ColorTargetEntry { rtv, format }),
        ))
    }

    fn create_depth_stencil_target(
        &self,
        texture: TextureId,
    ) -> Result<DepthStencilTargetId, ResourceError> {
        let (resource, format) = {
            let textures = self.shared.textures.lock().unwrap();
            let entry = textures.get(texture.0).map_err(|e| {
                log::error!("Direct3D11Backend::create_depth_stencil_target: {e}");
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
                    "Direct3D11Backend::create_depth_stencil_target: texture lacks DEPTH_STENCIL_ATTACHMENT usage"
                );
                return Err(ResourceError::NotRenderable {
                    format: entry.desc.format,
                });
            }
            (entry.resource.clone(), entry.desc.format)
        };

        let mut dsv: Option<ID3D11DepthStencilView> = None;
        unsafe {
            self.shared
                .device
                .CreateDepthStencilView(&resource, None, Some(&mut dsv))
        }
        .map_err(|e| {
            log::error!(
                "Direct3D11Backend::create_depth_stencil_target: CreateDepthStencilView failed: {e}"
            );
            ResourceError::Creation(format!("CreateDepthStencilView failed: {e}"))
        })?;
        let dsv = dsv
            .ok_or_else(|| ResourceError::Creation("CreateDepthStencilView returned nothing".into()))?;

        Ok(DepthStencilTargetId(
            self.shared
                .depth_targets
                .lock()
                .unwrap()
                .insert(DepthStencilTargetEntry { dsv, format }),
        ))
    }

    fn create_shader(&self, desc: &ShaderDesc) -> Result<ShaderId, ResourceError> {
        if desc.bytecode.is_empty() {
            return Err(ResourceError::InvalidDescriptor(
                "shader bytecode must not be empty".into(),
            ));
        }
        let mut entry = ShaderEntry {
            stage: desc.stage,
            bytecode: desc.bytecode.clone(),
            vertex: None,
            pixel: None,
        };
        unsafe {
            match desc.stage {
                ShaderStage::Vertex => {
                    self.shared
                        .device
                        .CreateVertexShader(&desc.bytecode, None, Some(&mut entry.vertex))
                        .map_err(|e| {
                            log::error!(
                                "Direct3D11Backend::create_shader: CreateVertexShader failed: {e}"
                            );
                            ResourceError::Creation(format!("CreateVertexShader failed: {e}"))
                        })?;
                }
                ShaderStage::Fragment => {
                    self.shared
                        .device
                        .CreatePixelShader(&desc.bytecode, None, Some(&mut entry.pixel))
                        .map_err(|e| {
                            log::error!(
                                "Direct3D11Backend::create_shader: CreatePixelShader failed: {e}"
                            );
                            ResourceError::Creation(format!("CreatePixelShader failed: {e}"))
                        })?;
                }
            }
        }
        Ok(ShaderId(self.shared.shaders.lock().unwrap().insert(entry)))
    }

    fn create_pipeline(&self, desc: &PipelineDesc) -> Result<PipelineId, ResourceError> {
        if desc.color_formats.len() > MAX_COLOR_TARGETS {
            return Err(ResourceError::InvalidDescriptor(format!(
                "{} color targets requested, limit is {MAX_COLOR_TARGETS}",
                desc.color_formats.len()
            )));
        }
        // The formats are not baked into Direct3D 11 state objects, but the
        // contract is validated identically on both backends.
        for format in &desc.color_formats {
            if !format.is_color_renderable() {
                return Err(ResourceError::NotRenderable { format: *format });
            }
            if dxgi::texture_format_to_dxgi(*format).is_none() {
                return Err(ResourceError::UnsupportedFormat {
                    api: GraphicsApi::Direct3D11,
                    format: *format,
                });
            }
        }
        if let Some(depth) = &desc.depth {
            if !depth.format.has_depth_aspect() {
                return Err(ResourceError::NotRenderable {
                    format: depth.format,
                });
            }
        }

        let shaders = self.shared.shaders.lock().unwrap();
        let vs = shaders.get(desc.vertex_shader.0).map_err(|e| {
            log::error!("Direct3D11Backend::create_pipeline: vertex shader: {e}");
            e
        })?;
        if vs.stage != ShaderStage::Vertex {
            return Err(ResourceError::InvalidDescriptor(
                "vertex_shader was not compiled for the vertex stage".into(),
            ));
        }
        let vertex = vs
            .vertex
            .clone()
            .ok_or_else(|| ResourceError::Creation("vertex shader object missing".into()))?;
        let pixel = match desc.fragment_shader {
            Some(id) => {
                let entry = shaders.get(id.0).map_err(|e| {
                    log::error!("Direct3D11Backend::create_pipeline: fragment shader: {e}");
                    e
                })?;
                if entry.stage != ShaderStage::Fragment {
                    return Err(ResourceError::InvalidDescriptor(
                        "fragment_shader was not compiled for the fragment stage".into(),
                    ));
                }
                Some(
                    entry
                        .pixel
                        .clone()
                        .ok_or_else(|| ResourceError::Creation("pixel shader object missing".into()))?,
                )
            }
            None => None,
        };

        unsafe {
            let input_layout = if desc.vertex_layout.attributes.is_empty() {
                None
            } else {
                let elements: Vec<D3D11_INPUT_ELEMENT_DESC> = desc
                    .vertex_layout
                    .attributes
                    .iter()
                    .map(|attribute| D3D11_INPUT_ELEMENT_DESC {
                        SemanticName: conv::semantic_name(attribute.semantic),
                        SemanticIndex: attribute.semantic_index,
                        Format: conv::vertex_format_to_dxgi(attribute.format),
                        InputSlot: 0,
                        AlignedByteOffset: attribute.offset,
                        InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                        InstanceDataStepRate: 0,
                    })
                    .collect();
                let mut layout: Option<ID3D11InputLayout> = None;
                self.shared
                    .device
                    .CreateInputLayout(&elements, &vs.bytecode, Some(&mut layout))
                    .map_err(|e| {
                        log::error!(
                            "Direct3D11Backend::create_pipeline: CreateInputLayout failed: {e}"
                        );
                        ResourceError::Creation(format!("CreateInputLayout failed: {e}"))
                    })?;
                layout
            };

            let rasterizer_desc = D3D11_RASTERIZER_DESC {
                FillMode: D3D11_FILL_SOLID,
                CullMode: conv::cull_mode_to_native(desc.cull_mode),
                DepthClipEnable: true.into(),
                ..Default::default()
            };
            let mut rasterizer: Option<ID3D11RasterizerState> = None;
            self.shared
                .device
                .CreateRasterizerState(&rasterizer_desc, Some(&mut rasterizer))
                .map_err(|e| {
                    ResourceError::Creation(format!("CreateRasterizerState failed: {e}"))
                })?;
            let rasterizer = rasterizer
                .ok_or_else(|| ResourceError::Creation("CreateRasterizerState returned nothing".into()))?;

            let depth_stencil = match &desc.depth {
                Some(depth) => {
                    let ds_desc = D3D11_DEPTH_STENCIL_DESC {
                        DepthEnable: true.into(),
                        DepthWriteMask: if depth.write_enabled {
                            D3D11_DEPTH_WRITE_MASK_ALL
                        } else {
                            D3D11_DEPTH_WRITE_MASK_ZERO
                        },
                        DepthFunc: conv::compare_to_native(depth.compare),
                        ..Default::default()
                    };
                    let mut state: Option<ID3D11DepthStencilState> = None;
                    self.shared
                        .device
                        .CreateDepthStencilState(&ds_desc, Some(&mut state))
                        .map_err(|e| {
                            ResourceError::Creation(format!("CreateDepthStencilState failed: {e}"))
                        })?;
                    state
                }
                None => None,
            };

            drop(shaders);
            Ok(PipelineId(self.shared.pipelines.lock().unwrap().insert(
                PipelineEntry {
                    vertex,
                    pixel,
                    input_layout,
                    rasterizer,
                    depth_stencil,
                    topology: conv::topology_to_native(desc.topology),
                },
            )))
        }
    }

    fn current_back_buffer(&self) -> Result<TextureId, ResourceError> {
        Ok(self.back_buffer)
    }

    fn current_back_buffer_target(&self) -> Result<ColorTargetId, ResourceError> {
        Ok(self.back_buffer_target)
    }

    fn destroy_heap(&self, heap: HeapId) -> Result<(), ResourceError> {
        let entry = self.shared.heaps.lock().unwrap().remove(heap.0)?;
        log::debug!(
            "Direct3D11Backend: destroyed {:?} heap ({} slots)",
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
        self.shared.color_targets.lock().unwrap().remove(target.0).map(|_| ())
    }

    fn destroy_depth_stencil_target(
        &self,
        target: DepthStencilTargetId,
    ) -> Result<(), ResourceError> {
        self.shared.depth_targets.lock().unwrap().remove(target.0).map(|_| ())
    }

    fn destroy_shader(&self, shader: ShaderId) -> Result<(), ResourceError> {
        self.shared.shaders.lock().unwrap().remove(shader.0).map(|_| ())
    }

    fn destroy_pipeline(&self, pipeline: PipelineId) -> Result<(), ResourceError> {
        self.shared.pipelines.lock().unwrap().remove(pipeline.0).map(|_| ())
    }

    fn do_swap_buffers(&mut self) -> Result<(), BackendError> {
        unsafe { self.swap_chain.Present(0, DXGI_PRESENT(0)) }.ok().map_err(|e| {
            log::error!("Direct3D11Backend::do_swap_buffers: Present failed: {e}");
            BackendError::Present(format!("Present failed: {e}"))
        })?;
        self.back_index = 1 - self.back_index;
        Ok(())
    }

    fn supports_parallel_recording(&self) -> bool {
        // Deferred contexts record off-thread, but the runtime serializes
        // them internally and everything drains through the one immediate
        // context; callers should not count on a speedup.
        false
    }
}

impl fmt::Debug for Direct3D11Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Direct3D11Backend")
            .field("backend_id", &self.shared.backend_id)
            .field("surface", &self.parameters.surface_size)
            .field("back_index", &self.back_index)
            .finish_non_exhaustive()
    }
}
