// src/io/mod.rs
pub mod envi;
pub mod geotiff;
pub mod hdf5;
pub mod raster;
pub mod writer;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cube::Cube;
use crate::error::Result;

pub use envi::{read_envi, EnviHeader};
pub use geotiff::read_geotiff;
pub use hdf5::read_hdf5;
pub use writer::write_snr_map;

fn default_hdf5_dataset() -> String {
    hdf5::DEFAULT_DATASET.to_string()
}

/// Where a cube comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum CubeSource {
    Envi {
        header: PathBuf,
    },
    Hdf5 {
        path: PathBuf,
        #[serde(default = "default_hdf5_dataset")]
        dataset: String,
    },
    Geotiff {
        path: PathBuf,
    },
}

impl CubeSource {
    pub fn load(&self) -> Result<Cube> {
        match self {
            CubeSource::Envi { header } => read_envi(header),
            CubeSource::Hdf5 { path, dataset } => read_hdf5(path, dataset),
            CubeSource::Geotiff { path } => read_geotiff(path),
        }
    }
}

impl fmt::Display for CubeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeSource::Envi { header } => write!(f, "{}", header.display()),
            CubeSource::Hdf5 { path, dataset } => write!(f, "{}:{}", path.display(), dataset),
            CubeSource::Geotiff { path } => write!(f, "{}", path.display()),
        }
    }
}
