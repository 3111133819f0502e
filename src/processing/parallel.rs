// src/processing/parallel.rs
use std::path::Path;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::config::{default_threads, OutputOptions, SnrOptions};
use crate::cube::Cube;
use crate::error::Result;
use crate::io::{write_snr_map, CubeSource};
use crate::processing::domains::{AxisSnr, SpatialSnr, SpectralSnr};
use crate::processing::report::{ReportEntry, SnrOutput, SnrReport};

/// Trait for SNR reductions over a cube
pub trait SnrCalculator: Send + Sync {
    /// Reduce the cube to an SNR vector, map or array
    fn calculate(&self, cube: &Cube) -> Result<SnrOutput>;

    /// Return the name used in reports
    fn name(&self) -> &str;
}

/// Where and how to write the per-pixel SNR map.
#[derive(Clone, Copy, Debug)]
pub struct MapOutput<'a> {
    pub path: &'a Path,
    pub options: &'a OutputOptions,
}

pub struct SnrProcessor {
    threads: usize,
    pool: ThreadPool,
}

impl SnrProcessor {
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let threads = threads.unwrap_or_else(default_threads).max(1);
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;

        Ok(Self { threads, pool })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Calculators selected by `options`, in report order.
    pub fn calculators(options: &SnrOptions) -> Vec<Box<dyn SnrCalculator>> {
        let mut calculators: Vec<Box<dyn SnrCalculator>> = Vec::new();
        if options.mode.spatial() {
            calculators.push(Box::new(SpatialSnr::new(options.zero_variance, None)));
        }
        if options.mode.spectral() {
            calculators.push(Box::new(SpectralSnr::new(options.zero_variance, None)));
        }
        if let Some(axes) = &options.axes {
            calculators.push(Box::new(AxisSnr::new(
                axes.clone(),
                options.zero_variance,
                None,
            )));
        }
        calculators
    }

    /// Run the selected calculators on an in-memory cube.
    pub fn analyze(&self, source: &str, cube: &Cube, options: &SnrOptions) -> Result<SnrReport> {
        self.analyze_with_results(source, cube, options)
            .map(|(report, _)| report)
    }

    fn analyze_with_results(
        &self,
        source: &str,
        cube: &Cube,
        options: &SnrOptions,
    ) -> Result<(SnrReport, Vec<SnrOutput>)> {
        let mut report = SnrReport::new(source, cube, options.zero_variance);
        let mut results = Vec::new();

        for calculator in Self::calculators(options) {
            debug!(calculator = calculator.name(), threads = self.threads, "running");
            let output = self.pool.install(|| calculator.calculate(cube))?;
            report.push(ReportEntry::new(
                calculator.name(),
                &output,
                cube.wavelengths(),
            ));
            results.push(output);
        }

        Ok((report, results))
    }

    /// Load `source`, analyze it and optionally write the per-pixel map.
    pub fn process(
        &self,
        source: &CubeSource,
        options: &SnrOptions,
        map_output: Option<MapOutput<'_>>,
    ) -> Result<SnrReport> {
        let cube = source.load()?;
        let (report, results) = self.analyze_with_results(&source.to_string(), &cube, options)?;

        if let Some(map_output) = map_output {
            match results.iter().find_map(|output| output.result.as_per_pixel()) {
                Some(map) => write_snr_map(
                    map.view(),
                    cube.geo(),
                    map_output.path,
                    map_output.options,
                    options.zero_variance,
                )?,
                None => warn!(
                    path = %map_output.path.display(),
                    "map output requested but spectral SNR was not computed; skipping"
                ),
            }
        }

        info!(source = %source, entries = report.entries.len(), "SNR analysis complete");
        Ok(report)
    }
}
