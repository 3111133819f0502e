// src/processing/domains/axes.rs
use crate::config::ZeroVariance;
use crate::cube::Cube;
use crate::error::Result;
use crate::processing::parallel::SnrCalculator;
use crate::processing::report::{SnrOutput, SnrResult};
use crate::processing::snr::{batch_stats, to_snr, zero_variance_lanes};

/// SNR over a caller-chosen set of cube axes
pub struct AxisSnr {
    axes: Vec<usize>,
    policy: ZeroVariance,
    name: String,
}

impl AxisSnr {
    pub fn new(axes: Vec<usize>, policy: ZeroVariance, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| {
            let list: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
            format!("Axes ({})", list.join(","))
        });
        Self { axes, policy, name }
    }

    pub fn axes(&self) -> &[usize] {
        &self.axes
    }
}

impl SnrCalculator for AxisSnr {
    fn calculate(&self, cube: &Cube) -> Result<SnrOutput> {
        let stats = batch_stats(cube.view(), &self.axes)?;
        Ok(SnrOutput {
            result: SnrResult::Reduced(to_snr(&stats, self.policy)),
            zero_variance_lanes: zero_variance_lanes(&stats),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
