// src/processing/domains/spectral.rs
use crate::config::ZeroVariance;
use crate::cube::Cube;
use crate::error::Result;
use crate::processing::parallel::SnrCalculator;
use crate::processing::report::{SnrOutput, SnrResult};
use crate::processing::snr::{spectral_stats, to_snr, zero_variance_lanes};

/// Spectral-domain SNR calculator (one value per pixel)
pub struct SpectralSnr {
    policy: ZeroVariance,
    name: String,
}

impl SpectralSnr {
    pub fn new(policy: ZeroVariance, name: Option<String>) -> Self {
        Self {
            policy,
            name: name.unwrap_or_else(|| "Spectral Domain".to_string()),
        }
    }
}

impl SnrCalculator for SpectralSnr {
    fn calculate(&self, cube: &Cube) -> Result<SnrOutput> {
        let stats = spectral_stats(cube.view());
        Ok(SnrOutput {
            result: SnrResult::PerPixel(to_snr(&stats, self.policy)),
            zero_variance_lanes: zero_variance_lanes(&stats),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
