//! Material labeling accuracy: pixel and structure confusion matrices.

use std::collections::BTreeSet;

use burn::tensor::backend::Backend;
use serde::Serialize;

use super::{
    attribution::MaterialTally,
    confusion::ConfusionMatrix,
    material_map::label_names,
    structure::{extract_structures, StructureMap},
};
use crate::{
    config::MaterialConfig,
    error::GeometricsResult,
    raster::{ensure_shape, LabelGrid, LabelRaster, NO_STRUCTURE},
};

/// Result record of the material labeling evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialMetrics {
    /// Structures with a valid truth primary material.
    pub scored_structures: u64,
    /// Fraction of scored structures whose test primary material matches; `null` if none scored.
    pub fraction_structures_correct: Option<f64>,
    /// Fraction of scored pixels whose test label matches; `null` if none scored.
    pub fraction_pixels_correct: Option<f64>,
    pub correct_structures: u64,
    /// Retained structures without a valid truth primary material.
    pub unscored_structures: u64,
    pub scored_pixels: u64,
    pub correct_pixels: u64,
    /// Structure pixels whose truth label is ignored.
    pub ignored_pixels: u64,
    /// Pixels of structures too small for structure scoring. They are still
    /// counted in the pixel confusion matrix.
    pub filtered_pixels: u64,
    pub pixel_confusion_matrix: ConfusionMatrix,
    /// Truth primary material by test primary material. A structure whose
    /// test footprint holds only ignored labels is recorded under its most
    /// frequent test label, so columns of ignored labels can be non-zero.
    pub structure_confusion_matrix: ConfusionMatrix,
    /// Retained structures with their attributed primary materials.
    #[serde(skip)]
    pub structures: StructureMap,
}

/// Run the material labeling evaluation on tensors.
///
/// `reference_index` is the truth structure-index raster. See
/// [`evaluate_materials`] for the scoring rules.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the rasters differ in shape and
/// `MaterialLabelOutOfRange` if a scored label has no material name.
pub fn run_material_metrics<B: Backend>(
    reference_index: &LabelRaster<B>,
    reference_materials: &LabelRaster<B>,
    test_materials: &LabelRaster<B>,
    config: &MaterialConfig,
) -> GeometricsResult<MaterialMetrics> {
    let shape = reference_index.dims();
    ensure_shape("reference MTL", shape, reference_materials.dims())?;
    ensure_shape("test MTL", shape, test_materials.dims())?;

    evaluate_materials(
        &LabelGrid::from_tensor(reference_index),
        &LabelGrid::from_tensor(reference_materials),
        &LabelGrid::from_tensor(test_materials),
        &config.names,
        &config.ignore_set(),
    )
}

/// Score test materials against truth materials inside reference structures.
///
/// Pixels are scored when they lie in any structure and their truth label is
/// not ignored. Structures are scored when their truth primary
/// material exists; a structure whose test footprint carries only ignored
/// labels is scored with its most frequent test label, which never matches
/// the truth.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the grids differ in shape and
/// `MaterialLabelOutOfRange` if a scored label has no material name.
pub fn evaluate_materials(
    index: &LabelGrid,
    truth: &LabelGrid,
    test: &LabelGrid,
    names: &[String],
    ignore: &BTreeSet<i64>,
) -> GeometricsResult<MaterialMetrics> {
    let shape = index.shape();
    ensure_shape("reference MTL", shape, truth.shape())?;
    ensure_shape("test MTL", shape, test.shape())?;

    tracing::info!(materials = %names.join(", "), "defined materials");
    let ignored_names = label_names(names, ignore.iter().copied());
    tracing::info!(ignored = %ignored_names.join(", "), "ignored materials in truth");

    let mut structures = extract_structures(index);
    tracing::info!(count = structures.len(), "reference structures");

    for structure in structures.values_mut() {
        let truth_tally = MaterialTally::from_pixels(truth, &structure.pixels);
        let test_tally = MaterialTally::from_pixels(test, &structure.pixels);
        structure.truth_primary_material = truth_tally.dominant(ignore);
        structure.test_primary_material = test_tally.dominant(ignore);
    }

    let mut pixel_matrix = ConfusionMatrix::new(names.len());
    let mut ignored_pixels = 0_u64;
    let mut structure_pixels = 0_u64;
    let labels = truth.values().iter().zip(test.values());
    for (&id, (&truth_label, &test_label)) in index.values().iter().zip(labels) {
        if id <= NO_STRUCTURE {
            continue;
        }
        structure_pixels += 1;
        if ignore.contains(&truth_label) {
            ignored_pixels += 1;
        } else {
            pixel_matrix.record(truth_label, test_label)?;
        }
    }
    let retained_pixels: u64 = structures.values().map(|s| s.pixel_count() as u64).sum();

    let mut structure_matrix = ConfusionMatrix::new(names.len());
    let mut unscored_structures = 0_u64;
    for (id, structure) in &structures {
        match structure.truth_primary_material {
            Some(truth_label) => {
                let test_label = match structure.test_primary_material {
                    Some(label) => label,
                    None => {
                        let fallback = MaterialTally::from_pixels(test, &structure.pixels)
                            .dominant_any()
                            .unwrap_or(truth_label);
                        tracing::debug!(
                            structure = id,
                            label = fallback,
                            "test footprint holds only ignored materials"
                        );
                        fallback
                    }
                };
                structure_matrix.record(truth_label, test_label)?;
            }
            None => unscored_structures += 1,
        }
    }

    let metrics = MaterialMetrics {
        scored_structures: structure_matrix.total(),
        fraction_structures_correct: structure_matrix.fraction_correct(),
        fraction_pixels_correct: pixel_matrix.fraction_correct(),
        correct_structures: structure_matrix.trace(),
        unscored_structures,
        scored_pixels: pixel_matrix.total(),
        correct_pixels: pixel_matrix.trace(),
        ignored_pixels,
        filtered_pixels: structure_pixels - retained_pixels,
        pixel_confusion_matrix: pixel_matrix,
        structure_confusion_matrix: structure_matrix,
        structures,
    };

    tracing::info!(
        "pixel material confusion matrix:\n{}",
        metrics.pixel_confusion_matrix
    );
    tracing::info!(
        scored = metrics.scored_pixels,
        correct = metrics.correct_pixels,
        fraction = ?metrics.fraction_pixels_correct,
        "pixel material statistics"
    );
    tracing::info!(
        "primary structure material confusion matrix:\n{}",
        metrics.structure_confusion_matrix
    );
    tracing::info!(
        unscored = metrics.unscored_structures,
        scored = metrics.scored_structures,
        correct = metrics.correct_structures,
        fraction = ?metrics.fraction_structures_correct,
        "structure material statistics"
    );

    Ok(metrics)
}
