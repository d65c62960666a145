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

//! CPU-side descriptor allocation for render target and depth-stencil views.
//!
//! The backend keeps one non-shader-visible heap per view kind and hands out
//! slots from it when targets are created. Slots are recycled when the
//! target is destroyed.

use thalo_core::gfx::ResourceError;
use windows::Win32::Graphics::Direct3D12::*;

/// A fixed-capacity slot allocator over one CPU-only descriptor heap.
pub(crate) struct DescriptorPool {
    heap: ID3D12DescriptorHeap,
    increment: u32,
    cpu_start: usize,
    capacity: u32,
    next: u32,
    free: Vec<u32>,
    kind_name: &'static str,
}

impl DescriptorPool {
    /// Creates the native heap and wraps it in an allocator.
    pub(crate) fn new(
        device: &ID3D12Device,
        heap_type: D3D12_DESCRIPTOR_HEAP_TYPE,
        capacity: u32,
        kind_name: &'static str,
    ) -> Result<Self, ResourceError> {
        let desc = D3D12_DESCRIPTOR_HEAP_DESC {
            Type: heap_type,
            NumDescriptors: capacity,
            Flags: D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
            NodeMask: 0,
        };
        let heap: ID3D12DescriptorHeap = unsafe { device.CreateDescriptorHeap(&desc) }
            .map_err(|e| {
                ResourceError::Creation(format!("CreateDescriptorHeap ({kind_name}) failed: {e}"))
            })?;
        let increment = unsafe { device.GetDescriptorHandleIncrementSize(heap_type) };
        let cpu_start = unsafe { heap.GetCPUDescriptorHandleForHeapStart() }.ptr;
        Ok(Self {
            heap,
            increment,
            cpu_start,
            capacity,
            next: 0,
            free: Vec::new(),
            kind_name,
        })
    }

    /// Reserves a slot and returns it with its CPU handle.
    pub(crate) fn allocate(&mut self) -> Result<(u32, D3D12_CPU_DESCRIPTOR_HANDLE), ResourceError> {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None if self.next < self.capacity => {
                let slot = self.next;
                self.next += 1;
                slot
            }
            None => {
                return Err(ResourceError::Creation(format!(
                    "{} descriptor pool exhausted ({} slots)",
                    self.kind_name, self.capacity
                )));
            }
        };
        Ok((slot, self.handle(slot)))
    }

    /// Returns a slot to the pool.
    pub(crate) fn free(&mut self, slot: u32) {
        debug_assert!(slot < self.capacity);
        self.free.push(slot);
    }

    fn handle(&self, slot: u32) -> D3D12_CPU_DESCRIPTOR_HANDLE {
        D3D12_CPU_DESCRIPTOR_HANDLE {
            ptr: self.cpu_start + slot as usize * self.increment as usize,
        }
    }

    /// The native heap, kept alive for the lifetime of every handed-out slot.
    #[allow(dead_code)]
    pub(crate) fn heap(&self) -> &ID3D12DescriptorHeap {
        &self.heap
    }
}
