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

//! Submission to the device's direct command queue.

use super::backend::D3d12Shared;
use super::command::Direct3D12CommandBuffer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thalo_core::gfx::{CommandBuffer, CommandError, CommandQueue, GraphicsApi, ResourceError};
use windows::Win32::System::Threading::{WaitForSingleObject, INFINITE};

/// A [`CommandQueue`] over the backend's single native direct queue.
///
/// Every queue object created by one backend shares the same native queue
/// and therefore the same FIFO submission timeline; each submission signals
/// the shared fence so command buffers can track their own completion.
pub struct Direct3D12CommandQueue {
    shared: Arc<D3d12Shared>,
}

impl Direct3D12CommandQueue {
    pub(crate) fn new(shared: Arc<D3d12Shared>) -> Self {
        Self { shared }
    }
}

impl CommandQueue for Direct3D12CommandQueue {
    fn api(&self) -> GraphicsApi {
        GraphicsApi::Direct3D12
    }

    fn submit(&mut self, buffer: &mut dyn CommandBuffer) -> Result<(), CommandError> {
        let actual = buffer.api();
        let Some(buffer) = buffer.as_any_mut().downcast_mut::<Direct3D12CommandBuffer>() else {
            log::error!(
                "Direct3D12CommandQueue::submit: rejected a {} command buffer",
                actual.name()
            );
            return Err(CommandError::WrongBackend {
                expected: GraphicsApi::Direct3D12,
                actual,
            });
        };
        if buffer.shared().backend_id != self.shared.backend_id {
            log::error!(
                "Direct3D12CommandQueue::submit: command buffer belongs to another backend instance"
            );
            return Err(CommandError::Resource(ResourceError::ForeignHandle {
                owner: buffer.shared().backend_id,
                user: self.shared.backend_id,
            }));
        }

        let list = buffer.finish_and_close()?;
        let fence_value = self.shared.next_fence_value.fetch_add(1, Ordering::Relaxed) + 1;
        unsafe {
            let lists = [Some(list.into())];
            self.shared.queue.ExecuteCommandLists(&lists);
            self.shared
                .queue
                .Signal(&self.shared.fence, fence_value)
                .map_err(|e| CommandError::Submit(format!("fence Signal failed: {e}")))?;
        }
        buffer.mark_submitted(fence_value);
        Ok(())
    }

    fn wait_idle(&mut self) -> Result<(), CommandError> {
        let fence_value = self.shared.next_fence_value.fetch_add(1, Ordering::Relaxed) + 1;
        unsafe {
            self.shared
                .queue
                .Signal(&self.shared.fence, fence_value)
                .map_err(|e| CommandError::Submit(format!("fence Signal failed: {e}")))?;
            if self.shared.fence.GetCompletedValue() < fence_value {
                self.shared
                    .fence
                    .SetEventOnCompletion(fence_value, self.shared.fence_event)
                    .map_err(|e| {
                        CommandError::Submit(format!("SetEventOnCompletion failed: {e}"))
                    })?;
                WaitForSingleObject(self.shared.fence_event, INFINITE);
            }
        }
        Ok(())
    }
}
