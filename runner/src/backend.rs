//! Tensor backend for the evaluation run.
//!
//! Every stage of the evaluation is a masked reduction over whole rasters, so
//! the CPU `ndarray` backend is the default. Large sites can opt into the GPU
//! with `--no-default-features --features wgpu`; the metrics are unchanged.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "wgpu")] {
        use burn::backend::wgpu::{Wgpu, WgpuDevice};

        pub type SelectedBackend = Wgpu;
        pub type SelectedDevice = WgpuDevice;

        /// Device the rasters are loaded onto.
        pub fn create_device() -> SelectedDevice {
            WgpuDevice::default()
        }

        pub const fn backend_name() -> &'static str {
            "WGPU"
        }
    } else {
        use burn::backend::ndarray::{NdArray, NdArrayDevice};

        pub type SelectedBackend = NdArray;
        pub type SelectedDevice = NdArrayDevice;

        /// Device the rasters are loaded onto.
        pub fn create_device() -> SelectedDevice {
            NdArrayDevice::Cpu
        }

        pub const fn backend_name() -> &'static str {
            "NdArray (CPU)"
        }
    }
}

#[cfg(all(test, not(feature = "wgpu")))]
mod tests {
    use super::*;
    use burn::prelude::*;

    #[test]
    fn test_default_backend_holds_rasters() {
        let device = create_device();
        let raster = Tensor::<SelectedBackend, 2>::full([2, 2], 1.5, &device);

        assert_eq!(backend_name(), "NdArray (CPU)");
        assert_eq!(raster.sum().into_scalar(), 6.0);
    }
}
