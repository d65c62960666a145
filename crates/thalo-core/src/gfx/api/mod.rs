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

//! Backend-agnostic graphics API data types.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`backend`]**: Backend identity and construction parameters.
//! - **[`texture`]**: Texture formats, usages, and descriptors.
//! - **[`target`]**: Color and depth-stencil target handles.
//! - **[`heap`]**: Descriptor heap kinds and descriptors.
//! - **[`buffer`]**: GPU buffer usages and descriptors.
//! - **[`pipeline`]**: Shader and pipeline state descriptors.
//! - **[`command`]**: Recording state, viewports, scissors, and limits.

pub mod backend;
pub mod buffer;
pub mod command;
pub mod heap;
pub mod pipeline;
pub mod target;
pub mod texture;

pub use backend::*;
pub use buffer::*;
pub use command::*;
pub use heap::*;
pub use pipeline::*;
pub use target::*;
pub use texture::*;
