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

//! Defines the hierarchy of error types for the graphics layer.
//!
//! Misuse (a foreign handle, an empty viewport array, a command outside the
//! recording state) is reported as a typed, recoverable error and the
//! operation is a no-op. Nothing at this layer panics or aborts; the caller
//! decides whether a failure is fatal.

use crate::gfx::api::backend::GraphicsApi;
use crate::gfx::api::command::CommandBufferState;
use crate::gfx::api::heap::HeapKind;
use crate::gfx::api::texture::TextureFormat;
use crate::gfx::handle::BackendId;
use std::fmt;

/// An error related to the creation, use, or destruction of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The requested texture format does not map to a native pixel format on
    /// this backend. No native call was attempted.
    UnsupportedFormat {
        /// The backend that rejected the format.
        api: GraphicsApi,
        /// The format that has no native equivalent.
        format: TextureFormat,
    },
    /// The requested heap kind cannot be realized on this backend. No native
    /// call was attempted.
    UnsupportedHeapKind {
        /// The backend that rejected the kind.
        api: GraphicsApi,
        /// The kind that has no native equivalent.
        kind: HeapKind,
    },
    /// The handle is stale: the resource behind it was destroyed, or the
    /// handle never named a live resource.
    InvalidHandle,
    /// The handle was created by a different backend instance.
    ForeignHandle {
        /// The backend that minted the handle.
        owner: BackendId,
        /// The backend the handle was passed to.
        user: BackendId,
    },
    /// The texture cannot serve as the requested target kind (e.g. a depth
    /// format passed to color-target creation, or a texture created without
    /// the matching attachment usage).
    NotRenderable {
        /// The format of the rejected texture.
        format: TextureFormat,
    },
    /// The descriptor is self-contradictory or out of range.
    InvalidDescriptor(String),
    /// The native API failed to create the resource.
    Creation(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::UnsupportedFormat { api, format } => {
                write!(f, "Texture format {format:?} is not supported by the {} backend", api.name())
            }
            ResourceError::UnsupportedHeapKind { api, kind } => {
                write!(f, "Heap kind {kind:?} is not supported by the {} backend", api.name())
            }
            ResourceError::InvalidHandle => {
                write!(f, "Stale or unknown resource handle")
            }
            ResourceError::ForeignHandle { owner, user } => {
                write!(
                    f,
                    "Handle belongs to backend #{} but was used with backend #{}",
                    owner.as_u32(),
                    user.as_u32()
                )
            }
            ResourceError::NotRenderable { format } => {
                write!(f, "Texture with format {format:?} cannot be used as the requested target")
            }
            ResourceError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            ResourceError::Creation(msg) => {
                write!(f, "Native resource creation failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// An error raised by backend construction or the presentation path.
#[derive(Debug)]
pub enum BackendError {
    /// The native graphics API is not available on this system.
    Unavailable(String),
    /// Device (or device context) creation failed.
    DeviceCreation(String),
    /// Swap chain creation, or retrieval of its back buffers, failed.
    SwapChainCreation(String),
    /// Creation of the native submission queue failed.
    QueueCreation(String),
    /// Creation of a native command recording object failed.
    CommandBufferCreation(String),
    /// Presenting the back buffer failed. The front/back buffer references
    /// are left unchanged.
    Present(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => {
                write!(f, "Native graphics API unavailable: {msg}")
            }
            BackendError::DeviceCreation(msg) => {
                write!(f, "Device creation failed: {msg}")
            }
            BackendError::SwapChainCreation(msg) => {
                write!(f, "Swap chain creation failed: {msg}")
            }
            BackendError::QueueCreation(msg) => {
                write!(f, "Command queue creation failed: {msg}")
            }
            BackendError::CommandBufferCreation(msg) => {
                write!(f, "Command buffer creation failed: {msg}")
            }
            BackendError::Present(msg) => {
                write!(f, "Present failed: {msg}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// An error raised while recording into or submitting a command buffer.
#[derive(Debug)]
pub enum CommandError {
    /// A `cmd_*` call arrived while the buffer was not in the recording
    /// state. Nothing was recorded.
    NotRecording {
        /// The state the buffer was actually in.
        state: CommandBufferState,
    },
    /// `reset` was called while the previous submission of this buffer was
    /// still executing on the GPU.
    StillExecuting,
    /// An array argument that must carry at least one element was empty. The
    /// previously bound state is unchanged.
    EmptyArray {
        /// What the array describes (e.g. `"viewports"`).
        what: &'static str,
    },
    /// An array argument exceeded the API limit for its binding point.
    TooMany {
        /// What the array describes.
        what: &'static str,
        /// The number of elements passed.
        given: usize,
        /// The maximum the API allows.
        limit: usize,
    },
    /// A command buffer was submitted to a queue of a different backend kind.
    WrongBackend {
        /// The API the queue belongs to.
        expected: GraphicsApi,
        /// The API the command buffer belongs to.
        actual: GraphicsApi,
    },
    /// A handle passed to a recorded command failed validation.
    Resource(ResourceError),
    /// The native API rejected finalization or execution of the recording.
    Submit(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotRecording { state } => {
                write!(f, "Command buffer is not recording (state: {state:?})")
            }
            CommandError::StillExecuting => {
                write!(f, "Command buffer is still executing on the GPU and cannot be reset")
            }
            CommandError::EmptyArray { what } => {
                write!(f, "Empty {what} array; previously bound state left unchanged")
            }
            CommandError::TooMany { what, given, limit } => {
                write!(f, "Too many {what}: {given} given, API limit is {limit}")
            }
            CommandError::WrongBackend { expected, actual } => {
                write!(
                    f,
                    "Command buffer recorded for {} submitted to a {} queue",
                    actual.name(),
                    expected.name()
                )
            }
            CommandError::Resource(err) => {
                write!(f, "Command rejected: {err}")
            }
            CommandError::Submit(msg) => {
                write!(f, "Submission failed: {msg}")
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for CommandError {
    fn from(err: ResourceError) -> Self {
        CommandError::Resource(err)
    }
}

/// A top-level error that can occur anywhere in the graphics layer.
#[derive(Debug)]
pub enum RenderError {
    /// A backend construction or presentation failure.
    Backend(BackendError),
    /// A resource creation, use, or destruction failure.
    Resource(ResourceError),
    /// A command recording or submission failure.
    Command(CommandError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Backend(err) => write!(f, "Graphics backend error: {err}"),
            RenderError::Resource(err) => write!(f, "Graphics resource error: {err}"),
            RenderError::Command(err) => write!(f, "Graphics command error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Backend(err) => Some(err),
            RenderError::Resource(err) => Some(err),
            RenderError::Command(err) => Some(err),
        }
    }
}

impl From<BackendError> for RenderError {
    fn from(err: BackendError) -> Self {
        RenderError::Backend(err)
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

impl From<CommandError> for RenderError {
    fn from(err: CommandError) -> Self {
        RenderError::Command(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn resource_error_display() {
        let err = ResourceError::UnsupportedFormat {
            api: GraphicsApi::Direct3D11,
            format: TextureFormat::Etc2Rgb8Unorm,
        };
        assert_eq!(
            format!("{err}"),
            "Texture format Etc2Rgb8Unorm is not supported by the Direct3D 11 backend"
        );
    }

    #[test]
    fn command_error_wraps_resource_error() {
        let cmd_err: CommandError = ResourceError::InvalidHandle.into();
        assert_eq!(
            format!("{cmd_err}"),
            "Command rejected: Stale or unknown resource handle"
        );
        assert!(cmd_err.source().is_some());
    }

    #[test]
    fn render_error_chains_sources() {
        let render_err: RenderError = CommandError::from(ResourceError::InvalidHandle).into();
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }

    #[test]
    fn too_many_display_carries_counts() {
        let err = CommandError::TooMany {
            what: "viewports",
            given: 20,
            limit: 16,
        };
        assert_eq!(
            format!("{err}"),
            "Too many viewports: 20 given, API limit is 16"
        );
    }
}
