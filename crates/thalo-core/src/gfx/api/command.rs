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

//! Command recording data types: viewports, scissors, resource states, the
//! recording state machine, and the argument validation shared by every
//! backend's command buffer.

use crate::gfx::error::CommandError;

/// The most color targets that can be bound simultaneously.
///
/// Both Direct3D generations share this limit
/// (`D3D11/12_SIMULTANEOUS_RENDER_TARGET_COUNT`).
pub const MAX_COLOR_TARGETS: usize = 8;

/// The most viewports that can be bound simultaneously.
pub const MAX_VIEWPORTS: usize = 16;

/// The most scissor rectangles that can be bound simultaneously.
pub const MAX_SCISSORS: usize = 16;

/// A floating-point viewport rectangle with a depth range.
///
/// Array ordering defines the viewport index.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Left edge of the viewport in pixels.
    pub origin_x: f32,
    /// Top edge of the viewport in pixels.
    pub origin_y: f32,
    /// Width of the viewport in pixels.
    pub width: f32,
    /// Height of the viewport in pixels.
    pub height: f32,
    /// Lower bound of the depth range, usually `0.0`.
    pub min_depth: f32,
    /// Upper bound of the depth range, usually `1.0`.
    pub max_depth: f32,
}

impl Viewport {
    /// A full-surface viewport with the standard `[0, 1]` depth range.
    pub const fn full(width: f32, height: f32) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// An integer scissor rectangle.
///
/// Array ordering parallels render-target indices.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScissorRect {
    /// Left edge, inclusive.
    pub left: i32,
    /// Top edge, inclusive.
    pub top: i32,
    /// Right edge, exclusive.
    pub right: i32,
    /// Bottom edge, exclusive.
    pub bottom: i32,
}

impl ScissorRect {
    /// A scissor covering the rectangle from (0, 0) to (width, height).
    pub const fn full(width: i32, height: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }
}

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

/// The usage state a GPU resource is in, for recorded transitions.
///
/// Direct3D 12 requires explicit transitions between states; the Direct3D 11
/// driver tracks states itself and records a transition as a no-op. Both
/// accept the command so engine code stays backend-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceState {
    /// No particular usage; valid initial state.
    Common,
    /// Bound as a color target.
    RenderTarget,
    /// Bound as a writable depth-stencil target.
    DepthWrite,
    /// Readable by any shader stage or copy source.
    GenericRead,
    /// Queued for presentation.
    Present,
    /// Destination of a copy.
    CopyDest,
}

/// The lifecycle state of a command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandBufferState {
    /// Freshly created; nothing recorded yet. `reset` moves to `Recording`.
    Initial,
    /// Accepting `cmd_*` calls.
    Recording,
    /// Recording finished by a submission; ready to be reset and reused.
    Executable,
    /// Submitted and possibly still executing on the GPU. `reset` fails
    /// until the backend observes completion.
    Pending,
}

/// The recording state machine every backend command buffer embeds.
///
/// The machine enforces the lifecycle contract: commands are only accepted
/// while recording, a buffer comes back to a clean recording state only
/// through `reset`, and a buffer whose submission is still in flight cannot
/// be reset out from under the GPU.
#[derive(Debug)]
pub struct RecorderState {
    state: CommandBufferState,
}

impl RecorderState {
    /// A new machine in the initial state.
    pub const fn new() -> Self {
        Self {
            state: CommandBufferState::Initial,
        }
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> CommandBufferState {
        self.state
    }

    /// Enters the recording state.
    ///
    /// Valid from every state except `Pending`; resetting an already
    /// recording buffer discards what was recorded and succeeds (reset is
    /// the only way back to a clean recording state, and it is idempotent).
    pub fn reset(&mut self) -> Result<(), CommandError> {
        if self.state == CommandBufferState::Pending {
            return Err(CommandError::StillExecuting);
        }
        if self.state == CommandBufferState::Recording {
            log::trace!("command buffer reset while recording; discarding recorded commands");
        }
        self.state = CommandBufferState::Recording;
        Ok(())
    }

    /// Fails unless the buffer is currently recording.
    pub fn require_recording(&self) -> Result<(), CommandError> {
        if self.state != CommandBufferState::Recording {
            return Err(CommandError::NotRecording { state: self.state });
        }
        Ok(())
    }

    /// Finalizes the recording at submission time.
    ///
    /// A buffer with zero recorded commands finalizes successfully; the
    /// submission simply has no GPU-visible effect.
    pub fn finish(&mut self) -> Result<(), CommandError> {
        self.require_recording()?;
        self.state = CommandBufferState::Executable;
        Ok(())
    }

    /// Marks the buffer as in flight on the GPU after execution was issued.
    pub fn mark_pending(&mut self) {
        debug_assert_eq!(self.state, CommandBufferState::Executable);
        self.state = CommandBufferState::Pending;
    }

    /// Marks a pending buffer as completed once the backend has observed the
    /// GPU finishing it.
    pub fn mark_completed(&mut self) {
        debug_assert_eq!(self.state, CommandBufferState::Pending);
        self.state = CommandBufferState::Executable;
    }
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a bounded, non-empty array argument.
///
/// An empty array is rejected so the previously bound state can never be
/// silently replaced by nothing; a count over the API limit is rejected
/// before any native call sees it.
pub fn check_bounded_array(
    what: &'static str,
    len: usize,
    limit: usize,
) -> Result<(), CommandError> {
    if len == 0 {
        return Err(CommandError::EmptyArray { what });
    }
    check_array_limit(what, len, limit)
}

/// Validates an array argument that may be empty but must respect the API
/// limit (e.g. the color target set, which may legally be unbound).
pub fn check_array_limit(
    what: &'static str,
    len: usize,
    limit: usize,
) -> Result<(), CommandError> {
    if len > limit {
        return Err(CommandError::TooMany {
            what,
            given: len,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_happy_path() {
        let mut rec = RecorderState::new();
        assert_eq!(rec.state(), CommandBufferState::Initial);

        rec.reset().unwrap();
        assert_eq!(rec.state(), CommandBufferState::Recording);
        rec.require_recording().unwrap();

        rec.finish().unwrap();
        assert_eq!(rec.state(), CommandBufferState::Executable);

        rec.mark_pending();
        assert_eq!(rec.state(), CommandBufferState::Pending);

        rec.mark_completed();
        rec.reset().unwrap();
        assert_eq!(rec.state(), CommandBufferState::Recording);
    }

    #[test]
    fn commands_outside_recording_are_rejected() {
        let rec = RecorderState::new();
        assert!(matches!(
            rec.require_recording(),
            Err(CommandError::NotRecording {
                state: CommandBufferState::Initial
            })
        ));
    }

    #[test]
    fn reset_is_idempotent_while_recording() {
        let mut rec = RecorderState::new();
        rec.reset().unwrap();
        rec.reset().unwrap();
        assert_eq!(rec.state(), CommandBufferState::Recording);
    }

    #[test]
    fn reset_fails_while_pending() {
        let mut rec = RecorderState::new();
        rec.reset().unwrap();
        rec.finish().unwrap();
        rec.mark_pending();
        assert!(matches!(rec.reset(), Err(CommandError::StillExecuting)));

        rec.mark_completed();
        rec.reset().unwrap();
    }

    #[test]
    fn finish_requires_recording() {
        let mut rec = RecorderState::new();
        assert!(rec.finish().is_err());
        rec.reset().unwrap();
        // Zero recorded commands still finalize.
        rec.finish().unwrap();
        assert!(rec.finish().is_err());
    }

    #[test]
    fn empty_viewport_array_is_rejected() {
        assert!(matches!(
            check_bounded_array("viewports", 0, MAX_VIEWPORTS),
            Err(CommandError::EmptyArray { what: "viewports" })
        ));
    }

    #[test]
    fn oversized_arrays_are_rejected() {
        assert!(matches!(
            check_bounded_array("viewports", MAX_VIEWPORTS + 1, MAX_VIEWPORTS),
            Err(CommandError::TooMany { given: 17, .. })
        ));
        assert!(check_bounded_array("viewports", MAX_VIEWPORTS, MAX_VIEWPORTS).is_ok());
    }

    #[test]
    fn color_target_set_may_be_empty() {
        assert!(check_array_limit("color targets", 0, MAX_COLOR_TARGETS).is_ok());
        assert!(check_array_limit("color targets", 9, MAX_COLOR_TARGETS).is_err());
    }

    #[test]
    fn viewport_full_helper() {
        let vp = Viewport::full(1280.0, 720.0);
        assert_eq!(vp.origin_x, 0.0);
        assert_eq!(vp.max_depth, 1.0);
        assert_eq!(vp.width, 1280.0);
    }
}
