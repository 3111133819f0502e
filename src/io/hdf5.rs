// src/io/hdf5.rs
use std::path::Path;

use gdal::cpl::CslStringList;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use ndarray::Array3;
use tracing::info;

use crate::cube::Cube;
use crate::error::{Result, SnrError};

pub const DEFAULT_DATASET: &str = "hyperspectral_data";

/// Read a 3-D HDF5 dataset stored as (row, column, band).
///
/// Goes through GDAL's multidimensional API so the array keeps its on-disk
/// axis order instead of being split into 2-D raster bands. Any dataset GDAL
/// opens in multidimensional mode works, netCDF and multidim VRT included.
pub fn read_hdf5(path: &Path, dataset_name: &str) -> Result<Cube> {
    let options = DatasetOptions {
        open_flags: GdalOpenFlags::GDAL_OF_MULTIDIM_RASTER,
        ..Default::default()
    };

    let data = {
        let dataset = Dataset::open_ex(path, options)?;
        let root = dataset.root_group()?;
        let array = root.open_md_array(dataset_name.trim_start_matches('/'), CslStringList::new())?;

        let shape: Vec<usize> = array.dimensions()?.iter().map(|d| d.size()).collect();
        if shape.len() != 3 {
            return Err(SnrError::NotThreeDimensional(shape.len()));
        }

        let values = array.read_as::<f32>(vec![0; shape.len()], shape.clone())?;
        Array3::from_shape_vec((shape[0], shape[1], shape[2]), values)?
    };

    let cube = Cube::new(data)?;
    info!(
        path = %path.display(),
        dataset = dataset_name,
        dims = ?cube.dim(),
        "loaded HDF5 cube"
    );
    Ok(cube)
}
