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

//! Submission onto the device's immediate context.

use super::backend::D3d11Shared;
use super::command::Direct3D11CommandBuffer;
use std::sync::Arc;
use thalo_core::gfx::{CommandBuffer, CommandError, CommandQueue, GraphicsApi, ResourceError};
use windows::Win32::Graphics::Direct3D11::*;

/// A [`CommandQueue`] over the device's immediate context.
///
/// Executing a finished command list on the immediate context completes
/// synchronously from the CPU's perspective; FIFO ordering falls out of the
/// single context.
pub struct Direct3D11CommandQueue {
    shared: Arc<D3d11Shared>,
}

impl Direct3D11CommandQueue {
    pub(crate) fn new(shared: Arc<D3d11Shared>) -> Self {
        Self { shared }
    }
}

impl CommandQueue for Direct3D11CommandQueue {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D11
    }

    fn submit(&mut self, buffer: &mut dyn CommandBuffer) -> Result<(), CommandError> {
        let actual = buffer.api();
        let Some(buffer) = buffer.as_any_mut().downcast_mut::<Direct3D11CommandBuffer>() else {
            log::error!(
                "Direct3D11CommandQueue::submit: rejected a {} command buffer",
                actual.name()
            );
            return Err(CommandError::WrongBackend {
                expected: GraphicsApi::Direct3D11,
                actual,
            });
        };
        if buffer.shared().backend_id != self.shared.backend_id {
            log::error!(
                "Direct3D11CommandQueue::submit: command buffer belongs to another backend instance"
            );
            return Err(CommandError::Resource(ResourceError::ForeignHandle {
                owner: buffer.shared().backend_id,
                user: self.shared.backend_id,
            }));
        }

        let list = buffer.finish_recording()?;
        unsafe { self.shared.immediate.ExecuteCommandList(&list, false) };
        Ok(())
    }

    fn wait_idle(&mut self) -> Result<(), CommandError> {
        // Direct3D 11 has no fence at this level; an event query after a
        // flush observes the GPU passing everything submitted so far.
        let query_desc = D3D11_QUERY_DESC {
            Query: D3D11_QUERY_EVENT,
            MiscFlags: 0,
        };
        let mut query: Option<ID3D11Query> = None;
        unsafe { self.shared.device.CreateQuery(&query_desc, Some(&mut query)) }
            .map_err(|e| CommandError::Submit(format!("CreateQuery failed: {e}")))?;
        let query = query
            .ok_or_else(|| CommandError::Submit("CreateQuery returned nothing".into()))?;
        unsafe {
            self.shared.immediate.End(&query);
            self.shared.immediate.Flush();
            loop {
                // The query writes TRUE once the GPU has passed it; until
                // then GetData succeeds with S_FALSE and leaves `done` alone.
                let mut done: u32 = 0;
                let _ = self.shared.immediate.GetData(
                    &query,
                    Some(&mut done as *mut u32 as *mut core::ffi::c_void),
                    std::mem::size_of::<u32>() as u32,
                    0,
                );
                if done != 0 {
                    break;
                }
                std::thread::yield_now();
            }
        }
        Ok(())
    }
}
