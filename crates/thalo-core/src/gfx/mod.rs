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

//! Provides the public, backend-agnostic graphics contracts.
//!
//! This module defines the "common language" for all drawing operations. It
//! contains the abstract `traits` (like [`GraphicsBackend`]), data structures
//! (like [`TextureDesc`](api::texture::TextureDesc)), handle types, and error
//! types that form the stable, public-facing graphics API.
//!
//! The module defines the 'what' of rendering; the 'how' is handled by a
//! concrete backend in the `thalo-infra` crate (one per native graphics API)
//! which implements these traits. Engine code issues drawing work exclusively
//! through this contract and never names a native API.

pub mod api;
pub mod error;
pub mod handle;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{BackendError, CommandError, RenderError, ResourceError};
pub use self::handle::{BackendId, HandleArena, RawHandle};
pub use self::traits::{CommandBuffer, CommandQueue, GraphicsBackend};
