//! Material labeling evaluation.
//!
//! Reference structures are extracted from the truth structure-index raster,
//! each structure is attributed its most abundant truth and test material,
//! and both pixels and structures are scored in confusion matrices.

pub mod attribution;
pub mod confusion;
pub mod engine;
pub mod material_map;
pub mod structure;

pub use attribution::{primary_material, MaterialTally};
pub use confusion::ConfusionMatrix;
pub use engine::{evaluate_materials, run_material_metrics, MaterialMetrics};
pub use material_map::{default_material_names, label_names, material_map, MaterialEntry, MATERIALS};
pub use structure::{extract_structures, PixelCoord, Structure, StructureMap, MIN_STRUCTURE_PIXELS};
