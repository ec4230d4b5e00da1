//! Raster loading with the `image` crate.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use burn::tensor::{backend::Backend, Tensor, TensorData};
use core3d_geometrics::raster::{ElevationRaster, LabelRaster};
use image::{DynamicImage, GenericImageView};

fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to open raster at {}", path.display()))
}

/// Load a single-band integer raster (classification, structure index or materials).
///
/// 8- and 16-bit images are read as stored, without rescaling.
///
/// # Errors
///
/// Fails if the file cannot be decoded or is not a single-band integer image.
pub fn load_labels<B: Backend>(path: &Path, device: &B::Device) -> Result<LabelRaster<B>> {
    let img = open(path)?;
    let (width, height) = img.dimensions();
    let shape = [height as usize, width as usize];
    let values: Vec<i64> = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(i64::from).collect(),
        DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(i64::from).collect(),
        other => anyhow::bail!(
            "Expected a single-band integer raster at {}, got {:?}",
            path.display(),
            other.color()
        ),
    };
    tracing::debug!(path = %path.display(), ?shape, "loaded label raster");

    let data = TensorData::new(values, shape).convert::<B::IntElem>();
    Ok(Tensor::from_data(data, device))
}

/// Load an elevation raster (DSM or DTM).
///
/// Float images contribute their first channel; integer images are read as stored.
///
/// # Errors
///
/// Fails if the file cannot be decoded or has an unsupported pixel format.
pub fn load_elevations<B: Backend>(path: &Path, device: &B::Device) -> Result<ElevationRaster<B>> {
    let img = open(path)?;
    let (width, height) = img.dimensions();
    let shape = [height as usize, width as usize];
    let values: Vec<f32> = match img {
        DynamicImage::ImageRgb32F(buf) => buf.into_raw().into_iter().step_by(3).collect(),
        DynamicImage::ImageRgba32F(buf) => buf.into_raw().into_iter().step_by(4).collect(),
        DynamicImage::ImageLuma16(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(f32::from).collect(),
        other => anyhow::bail!(
            "Unsupported elevation raster format at {}: {:?}",
            path.display(),
            other.color()
        ),
    };
    tracing::debug!(path = %path.display(), ?shape, "loaded elevation raster");

    let data = TensorData::new(values, shape).convert::<B::FloatElem>();
    Ok(Tensor::from_data(data, device))
}

/// Replace label codes according to `remap`; codes not in the map are kept.
pub fn remap_labels<B: Backend>(
    raster: LabelRaster<B>,
    remap: &BTreeMap<i64, i64>,
) -> LabelRaster<B> {
    remap.iter().fold(raster.clone(), |remapped, (&from, &to)| {
        tracing::info!(from, to, "remapping material code");
        remapped.mask_fill(raster.clone().equal_elem(from), to)
    })
}
