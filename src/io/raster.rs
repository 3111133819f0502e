// src/io/raster.rs
use gdal::Dataset;
use ndarray::{Array3, ArrayView2};
use tracing::debug;

use crate::cube::GeoInfo;
use crate::error::Result;

/// Read every band of a GDAL raster into a (bands, height, width) array.
pub fn read_band_stack(dataset: &Dataset) -> Result<Array3<f32>> {
    let (width, height) = dataset.raster_size();
    let count = dataset.raster_count() as usize;
    debug!(width, height, bands = count, "reading band stack");

    let mut stack = Array3::<f32>::zeros((count, height, width));
    for (i, mut plane) in stack.outer_iter_mut().enumerate() {
        // GDAL band indices start at 1
        let band = dataset.rasterband(i + 1)?;
        let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
        plane.assign(&ArrayView2::from_shape((height, width), buffer.data())?);
    }

    Ok(stack)
}

/// Projection and geo-transform, when the dataset carries them.
pub fn geo_info(dataset: &Dataset) -> Option<GeoInfo> {
    let geo_transform = dataset.geo_transform().ok()?;
    Some(GeoInfo {
        projection: dataset.projection(),
        geo_transform,
    })
}
