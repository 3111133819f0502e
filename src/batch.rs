// src/batch.rs
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{
    default_compress, default_compress_level, default_true, OutputOptions, SnrMode, SnrOptions,
    ZeroVariance,
};
use crate::io::CubeSource;
use crate::processing::{MapOutput, SnrProcessor, SnrReport};

#[derive(Deserialize, Serialize, Debug)]
pub struct BatchConfig {
    #[serde(default)]
    pub global: GlobalParams,
    pub jobs: Vec<Job>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GlobalParams {
    #[serde(default)]
    pub mode: SnrMode,
    #[serde(default)]
    pub zero_variance: ZeroVariance,
    #[serde(default)]
    pub axes: Option<Vec<usize>>,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default = "default_compress")]
    pub compress: String,
    #[serde(default = "default_compress_level")]
    pub compress_level: u8,
    #[serde(default = "default_true")]
    pub tiled: bool,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            mode: SnrMode::default(),
            zero_variance: ZeroVariance::default(),
            axes: None,
            threads: None,
            compress: default_compress(),
            compress_level: default_compress_level(),
            tiled: default_true(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Job {
    pub source: CubeSource,
    pub map_output: Option<PathBuf>,
    /// Write this job's report as JSON
    pub report_output: Option<PathBuf>,
    pub mode: Option<SnrMode>,
    pub zero_variance: Option<ZeroVariance>,
    pub axes: Option<Vec<usize>>,
    pub compress: Option<String>,
    pub compress_level: Option<u8>,
    pub tiled: Option<bool>,
}

impl Job {
    /// SNR options with per-job overrides applied over `global`.
    pub fn snr_options(&self, global: &GlobalParams) -> SnrOptions {
        SnrOptions {
            mode: self.mode.unwrap_or(global.mode),
            zero_variance: self.zero_variance.unwrap_or(global.zero_variance),
            axes: self.axes.clone().or_else(|| global.axes.clone()),
        }
    }

    pub fn output_options(&self, global: &GlobalParams) -> OutputOptions {
        OutputOptions {
            compress: self
                .compress
                .clone()
                .unwrap_or_else(|| global.compress.clone()),
            compress_level: self.compress_level.unwrap_or(global.compress_level),
            tiled: self.tiled.unwrap_or(global.tiled),
        }
    }
}

impl BatchConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading batch config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing batch config {}", path.display()))
    }
}

/// Write `report` as pretty-printed JSON.
pub fn write_report(report: &SnrReport, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("writing report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing report {}", path.display()))?;
    Ok(())
}

pub fn process_batch(config_path: &Path) -> Result<Vec<SnrReport>> {
    let config = BatchConfig::read(config_path)?;
    let processor = SnrProcessor::new(config.global.threads)?;

    info!(jobs = config.jobs.len(), "starting batch");

    let mut reports = Vec::with_capacity(config.jobs.len());
    for (i, job) in config.jobs.iter().enumerate() {
        info!("[{}/{}] Processing {}", i + 1, config.jobs.len(), job.source);

        let options = job.snr_options(&config.global);
        let output_options = job.output_options(&config.global);
        let map_output = job.map_output.as_deref().map(|path| MapOutput {
            path,
            options: &output_options,
        });

        let report = processor
            .process(&job.source, &options, map_output)
            .with_context(|| format!("job {} ({})", i + 1, job.source))?;

        if let Some(path) = &job.report_output {
            write_report(&report, path)?;
        }

        reports.push(report);
    }

    info!("batch complete");
    Ok(reports)
}
