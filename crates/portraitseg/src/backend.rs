//! Compile-time backend selection for the portraitseg tool.
//!
//! `cuda` takes precedence over `wgpu`; without either, the CPU `ndarray`
//! backend is used.

use burn::tensor::backend::Backend;
use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "cuda")] {
        /// Backend used by the command-line tool
        pub type SelectedBackend = burn::backend::Cuda;
        /// Human readable backend name for logging
        pub const BACKEND_NAME: &str = "CUDA (NVIDIA GPU)";
    } else if #[cfg(feature = "wgpu")] {
        /// Backend used by the command-line tool
        pub type SelectedBackend = burn::backend::Wgpu;
        /// Human readable backend name for logging
        pub const BACKEND_NAME: &str = "WGPU (GPU)";
    } else {
        /// Backend used by the command-line tool
        pub type SelectedBackend = burn::backend::NdArray;
        /// Human readable backend name for logging
        pub const BACKEND_NAME: &str = "NdArray (CPU)";
    }
}

/// Device type of [`SelectedBackend`].
pub type SelectedDevice = <SelectedBackend as Backend>::Device;

/// Default device of the selected backend.
pub fn create_device() -> SelectedDevice {
    SelectedDevice::default()
}
