use ndarray::{Array3, ArrayView3};

use crate::error::{Result, SnrError};

/// Georeferencing carried from a GDAL source to the SNR map writer.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoInfo {
    pub projection: String,
    pub geo_transform: [f64; 6],
}

/// Hyperspectral cube indexed by (row, column, band).
#[derive(Clone, Debug)]
pub struct Cube {
    data: Array3<f32>,
    wavelengths: Option<Vec<f64>>,
    geo: Option<GeoInfo>,
}

impl Cube {
    /// Wrap a (height, width, bands) array. Every dimension must be non-zero.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        let (height, width, bands) = data.dim();
        if height == 0 || width == 0 || bands == 0 {
            return Err(SnrError::InvalidDimensions {
                height,
                width,
                bands,
            });
        }

        Ok(Self {
            data,
            wavelengths: None,
            geo: None,
        })
    }

    /// Build a cube from a band-major (bands, height, width) array, the layout
    /// GDAL hands back when reading a multi-band raster.
    pub fn from_band_major(data: Array3<f32>) -> Result<Self> {
        let reordered = data
            .permuted_axes([1, 2, 0])
            .as_standard_layout()
            .into_owned();
        Self::new(reordered)
    }

    pub fn with_wavelengths(mut self, wavelengths: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != self.bands() {
            return Err(SnrError::WavelengthMismatch {
                wavelengths: wavelengths.len(),
                bands: self.bands(),
            });
        }
        self.wavelengths = Some(wavelengths);
        Ok(self)
    }

    pub fn with_geo(mut self, geo: Option<GeoInfo>) -> Self {
        self.geo = geo;
        self
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn bands(&self) -> usize {
        self.data.dim().2
    }

    pub fn wavelengths(&self) -> Option<&[f64]> {
        self.wavelengths.as_deref()
    }

    pub fn geo(&self) -> Option<&GeoInfo> {
        self.geo.as_ref()
    }
}
