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

//! Generation-checked resource handles and the arena that backs them.
//!
//! Backends never hand out pointers to the objects they create. Every factory
//! call returns a small `Copy` handle carrying three pieces of information:
//! the identity of the backend that created it, the arena slot index, and the
//! slot generation at creation time. Every consumption site revalidates all
//! three, so a stale handle, a double-destroy, or a handle created by a
//! *different* backend instance is a typed error rather than undefined
//! behavior.

use crate::gfx::error::ResourceError;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};

/// The identity of one live backend instance.
///
/// Identities are process-unique and never reused, so a handle can always be
/// traced back to the backend that minted it, even after that backend is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendId(NonZeroU32);

impl BackendId {
    /// Allocates a fresh, process-unique backend identity.
    pub fn allocate() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        let raw = NEXT.fetch_add(1, Ordering::Relaxed);
        // 2^32 backend instances in one process would mean something else is
        // deeply wrong; treat wraparound as a logic error.
        Self(NonZeroU32::new(raw).expect("backend id counter wrapped"))
    }

    /// Returns the numeric value, mainly for log output.
    pub const fn as_u32(self) -> u32 {
        self.0.get()
    }
}

/// The untyped core of every resource handle.
///
/// Typed wrappers ([`TextureId`](crate::gfx::api::texture::TextureId) and
/// friends) are newtypes over this; the arena works on the raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle {
    backend: BackendId,
    index: u32,
    generation: NonZeroU32,
}

impl RawHandle {
    /// The backend instance that created this handle.
    pub const fn backend(&self) -> BackendId {
        self.backend
    }

    /// The arena slot index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The slot generation this handle was minted with.
    pub const fn generation(&self) -> NonZeroU32 {
        self.generation
    }
}

struct Slot<T> {
    /// Bumped on every removal; a handle is live only while its generation
    /// matches the slot's.
    generation: u32,
    value: Option<T>,
}

/// A slot arena owning the backend-side objects behind resource handles.
///
/// Removal bumps the slot generation, which invalidates all outstanding
/// handles to that slot; the slot itself is recycled for later insertions.
pub struct HandleArena<T> {
    backend: BackendId,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> HandleArena<T> {
    /// Creates an empty arena owned by the given backend instance.
    pub fn new(backend: BackendId) -> Self {
        Self {
            backend,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// The backend instance this arena belongs to.
    pub fn backend(&self) -> BackendId {
        self.backend
    }

    /// Stores a value and returns the handle that names it.
    pub fn insert(&mut self, value: T) -> RawHandle {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.value.is_none());
                slot.value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 1,
                    value: Some(value),
                });
                (self.slots.len() - 1) as u32
            }
        };
        let generation = self.slots[index as usize].generation;
        RawHandle {
            backend: self.backend,
            index,
            generation: NonZeroU32::new(generation).expect("slot generation is never zero"),
        }
    }

    fn check(&self, handle: RawHandle) -> Result<usize, ResourceError> {
        if handle.backend != self.backend {
            return Err(ResourceError::ForeignHandle {
                owner: handle.backend,
                user: self.backend,
            });
        }
        let index = handle.index as usize;
        match self.slots.get(index) {
            Some(slot) if slot.value.is_some() && slot.generation == handle.generation.get() => {
                Ok(index)
            }
            _ => Err(ResourceError::InvalidHandle),
        }
    }

    /// Resolves a handle to a shared reference.
    pub fn get(&self, handle: RawHandle) -> Result<&T, ResourceError> {
        let index = self.check(handle)?;
        Ok(self.slots[index].value.as_ref().expect("checked above"))
    }

    /// Resolves a handle to an exclusive reference.
    pub fn get_mut(&mut self, handle: RawHandle) -> Result<&mut T, ResourceError> {
        let index = self.check(handle)?;
        Ok(self.slots[index].value.as_mut().expect("checked above"))
    }

    /// Returns `true` if the handle currently resolves.
    pub fn contains(&self, handle: RawHandle) -> bool {
        self.check(handle).is_ok()
    }

    /// Removes the value behind a handle, invalidating the handle and every
    /// copy of it.
    pub fn remove(&mut self, handle: RawHandle) -> Result<T, ResourceError> {
        let index = self.check(handle)?;
        let slot = &mut self.slots[index];
        let value = slot.value.take().expect("checked above");
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(index as u32);
        Ok(value)
    }

    /// The number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> HandleArena<&'static str> {
        HandleArena::new(BackendId::allocate())
    }

    #[test]
    fn insert_and_resolve() {
        let mut arena = arena();
        let handle = arena.insert("texture");
        assert_eq!(*arena.get(handle).unwrap(), "texture");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_handle_is_rejected_after_remove() {
        let mut arena = arena();
        let handle = arena.insert("a");
        assert_eq!(arena.remove(handle).unwrap(), "a");
        assert!(matches!(
            arena.get(handle),
            Err(ResourceError::InvalidHandle)
        ));
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut arena = arena();
        let handle = arena.insert("a");
        arena.remove(handle).unwrap();
        assert!(matches!(
            arena.remove(handle),
            Err(ResourceError::InvalidHandle)
        ));
    }

    #[test]
    fn recycled_slot_gets_a_new_generation() {
        let mut arena = arena();
        let first = arena.insert("first");
        arena.remove(first).unwrap();
        let second = arena.insert("second");
        // Same slot, different generation: the old handle stays dead.
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        assert!(arena.get(first).is_err());
        assert_eq!(*arena.get(second).unwrap(), "second");
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut ours = arena();
        let mut theirs = arena();
        let foreign = theirs.insert("not yours");
        match ours.get(foreign) {
            Err(ResourceError::ForeignHandle { owner, user }) => {
                assert_eq!(owner, theirs.backend());
                assert_eq!(user, ours.backend());
            }
            other => panic!("expected ForeignHandle, got {other:?}"),
        }
    }

    #[test]
    fn backend_ids_are_unique() {
        let a = BackendId::allocate();
        let b = BackendId::allocate();
        assert_ne!(a, b);
    }
}
