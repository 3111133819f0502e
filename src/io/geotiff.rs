// src/io/geotiff.rs
use std::path::Path;

use gdal::Dataset;
use tracing::info;

use super::raster::{geo_info, read_band_stack};
use crate::cube::Cube;
use crate::error::Result;

/// Read a multi-band GeoTIFF (or any GDAL raster) into a (row, column, band) cube.
///
/// GDAL returns bands first; the stack is reordered before the cube is built.
/// The dataset is closed before this returns.
pub fn read_geotiff(path: &Path) -> Result<Cube> {
    let (stack, geo) = {
        let dataset = Dataset::open(path)?;
        (read_band_stack(&dataset)?, geo_info(&dataset))
    };

    let cube = Cube::from_band_major(stack)?.with_geo(geo);
    info!(path = %path.display(), dims = ?cube.dim(), "loaded raster cube");
    Ok(cube)
}
