//! Structure extraction from a structure-index raster.

use std::collections::BTreeMap;

use crate::raster::{LabelGrid, NO_STRUCTURE};

/// Structures covering fewer pixels than this are discarded.
///
/// Small fragments come from slightly overlapping structure footprints in the
/// reference index raster and do not represent physical objects.
pub const MIN_STRUCTURE_PIXELS: usize = 10;

/// Pixel coordinate `(x, y)` = (column, row).
pub type PixelCoord = (usize, usize);

/// One physical object instance of the reference model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    /// Footprint pixels in row-major discovery order.
    pub pixels: Vec<PixelCoord>,
    /// Most abundant non-ignored truth material, `None` if there is none.
    pub truth_primary_material: Option<i64>,
    /// Most abundant non-ignored test material, `None` if there is none.
    pub test_primary_material: Option<i64>,
}

impl Structure {
    /// Number of footprint pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

/// Structures keyed by their index value, in ascending index order.
pub type StructureMap = BTreeMap<i64, Structure>;

/// Collect the footprint of every structure in a structure-index raster.
///
/// Any positive value is a structure identifier; identifiers need not be
/// contiguous. Values `<= 0` belong to no structure. Structures with fewer
/// than [`MIN_STRUCTURE_PIXELS`] pixels are removed after the full scan.
#[must_use]
pub fn extract_structures(index: &LabelGrid) -> StructureMap {
    let [rows, cols] = index.shape();
    let mut structures = StructureMap::new();

    for y in 0..rows {
        for x in 0..cols {
            let id = index.get(x, y);
            if id > NO_STRUCTURE {
                structures.entry(id).or_default().pixels.push((x, y));
            }
        }
    }

    structures.retain(|_, structure| structure.pixel_count() >= MIN_STRUCTURE_PIXELS);
    structures
}
