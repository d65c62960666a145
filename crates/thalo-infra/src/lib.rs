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

//! # Thalo Infra
//!
//! Concrete implementations of the contracts declared in `thalo-core`:
//! one graphics backend per native API. The backends are Windows-only and
//! compile away entirely on other platforms.

pub mod graphics;

#[cfg(target_os = "windows")]
pub use graphics::d3d11::Direct3D11Backend;
#[cfg(target_os = "windows")]
pub use graphics::d3d12::Direct3D12Backend;

/// Installs the process-wide `env_logger` sink, if none is installed yet.
///
/// The graphics backends report every failure through the `log` facade; a
/// host that has its own subscriber can skip this and the log lines will
/// land there instead.
pub fn install_default_logger() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
