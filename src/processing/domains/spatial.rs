// src/processing/domains/spatial.rs
use crate::config::ZeroVariance;
use crate::cube::Cube;
use crate::error::Result;
use crate::processing::parallel::SnrCalculator;
use crate::processing::report::{SnrOutput, SnrResult};
use crate::processing::snr::{spatial_stats, to_snr, zero_variance_lanes};

/// Spatial-domain SNR calculator (one value per band)
pub struct SpatialSnr {
    policy: ZeroVariance,
    name: String,
}

impl SpatialSnr {
    pub fn new(policy: ZeroVariance, name: Option<String>) -> Self {
        Self {
            policy,
            name: name.unwrap_or_else(|| "Spatial Domain".to_string()),
        }
    }
}

impl SnrCalculator for SpatialSnr {
    fn calculate(&self, cube: &Cube) -> Result<SnrOutput> {
        let stats = spatial_stats(cube.view());
        Ok(SnrOutput {
            result: SnrResult::PerBand(to_snr(&stats, self.policy)),
            zero_variance_lanes: zero_variance_lanes(&stats),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
