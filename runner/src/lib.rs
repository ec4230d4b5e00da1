//! Command-line runner for `core3d-geometrics`.
//!
//! ## Usage
//!
//! ```bash
//! # Evaluate with rasters named relative to the config file
//! cargo run --bin run_geometrics -- -c site.json
//!
//! # Separate reference and test folders, ignore test CLS no-data
//! cargo run --bin run_geometrics -- -c site.json -r ref/ -t test/ --test-ignore 1
//! ```

pub mod backend;
pub mod config;
pub mod raster_io;

pub use backend::{backend_name, create_device, SelectedBackend, SelectedDevice};
pub use config::{ReferenceFiles, RunConfig, TestFiles};
pub use raster_io::{load_elevations, load_labels, remap_labels};
