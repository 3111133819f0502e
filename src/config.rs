use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which SNR domains to compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnrMode {
    /// Per-band SNR over all pixels
    Spatial,
    /// Per-pixel SNR over all bands
    Spectral,
    #[default]
    Both,
}

impl SnrMode {
    pub fn spatial(self) -> bool {
        matches!(self, SnrMode::Spatial | SnrMode::Both)
    }

    pub fn spectral(self) -> bool {
        matches!(self, SnrMode::Spectral | SnrMode::Both)
    }
}

/// Value reported when the standard deviation of a lane is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ZeroVariance {
    /// Report 0
    #[default]
    Zero,
    /// Report NaN so "no noise" stays distinguishable from "no signal"
    Nan,
}

impl ZeroVariance {
    pub fn value(self) -> f64 {
        match self {
            ZeroVariance::Zero => 0.0,
            ZeroVariance::Nan => f64::NAN,
        }
    }
}

/// What to compute for one cube.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnrOptions {
    #[serde(default)]
    pub mode: SnrMode,
    #[serde(default)]
    pub zero_variance: ZeroVariance,
    /// Extra reduction over arbitrary cube axes, e.g. `[0, 1]`
    #[serde(default)]
    pub axes: Option<Vec<usize>>,
}

/// Raster creation settings for the SNR map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default = "default_compress")]
    pub compress: String,
    #[serde(default = "default_compress_level")]
    pub compress_level: u8,
    #[serde(default = "default_true")]
    pub tiled: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            compress: default_compress(),
            compress_level: default_compress_level(),
            tiled: default_true(),
        }
    }
}

pub(crate) fn default_compress() -> String {
    "DEFLATE".to_string()
}

pub(crate) fn default_compress_level() -> u8 {
    6
}

pub(crate) fn default_true() -> bool {
    true
}

/// Worker count when none is configured.
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}
