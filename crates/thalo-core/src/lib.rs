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

//! # Thalo Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the graphics layer's architecture.
//!
//! Nothing in this crate touches a native graphics API. The concrete
//! Direct3D 11 and Direct3D 12 backends live in `thalo-infra` and implement
//! the traits declared here.

#![warn(missing_docs)]

pub mod gfx;
pub mod math;
pub mod utils;

pub use gfx::{BackendError, CommandError, RenderError, ResourceError};
pub use gfx::{CommandBuffer, CommandQueue, GraphicsBackend};
