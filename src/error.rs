use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid cube dimensions: {height}x{width}x{bands}")]
    InvalidDimensions {
        height: usize,
        width: usize,
        bands: usize,
    },

    #[error("Expected a 3-D dataset, found {0} dimensions")]
    NotThreeDimensional(usize),

    #[error("Wavelength count {wavelengths} does not match band count {bands}")]
    WavelengthMismatch { wavelengths: usize, bands: usize },

    #[error("Invalid ENVI header: {0}")]
    InvalidHeader(String),

    #[error("Missing header field: {0}")]
    MissingMetadata(String),

    #[error("Invalid value for header field {field}: {value}")]
    InvalidMetadata { field: String, value: String },

    #[error("No raster data file found next to header {0}")]
    DataFileNotFound(PathBuf),

    #[error("No reduction axes given")]
    NoAxes,

    #[error("Reduction axis {axis} out of range for a {ndim}-D cube")]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[error("Reduction axis {0} given more than once")]
    DuplicateAxis(usize),

    #[error("No raster driver for output {0}")]
    UnknownOutputFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, SnrError>;
