// src/processing/report.rs
use std::fmt;

use ndarray::{Array1, Array2, ArrayD};
use serde::Serialize;

use crate::config::ZeroVariance;
use crate::cube::Cube;
use crate::processing::snr::average_snr;

/// Output of one SNR calculator.
#[derive(Clone, Debug, PartialEq)]
pub enum SnrResult {
    /// Length = number of bands
    PerBand(Array1<f64>),
    /// Shape = (height, width)
    PerPixel(Array2<f64>),
    /// Cube shape with the reduced axes removed
    Reduced(ArrayD<f64>),
}

impl SnrResult {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            SnrResult::PerBand(values) => values.shape().to_vec(),
            SnrResult::PerPixel(values) => values.shape().to_vec(),
            SnrResult::Reduced(values) => values.shape().to_vec(),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &f64> + '_> {
        match self {
            SnrResult::PerBand(values) => Box::new(values.iter()),
            SnrResult::PerPixel(values) => Box::new(values.iter()),
            SnrResult::Reduced(values) => Box::new(values.iter()),
        }
    }

    pub fn average(&self) -> Option<f64> {
        average_snr(self.iter())
    }

    pub fn as_per_band(&self) -> Option<&Array1<f64>> {
        match self {
            SnrResult::PerBand(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_per_pixel(&self) -> Option<&Array2<f64>> {
        match self {
            SnrResult::PerPixel(values) => Some(values),
            _ => None,
        }
    }
}

/// SNR values plus the number of lanes that fell back to the zero-variance value.
#[derive(Clone, Debug, PartialEq)]
pub struct SnrOutput {
    pub result: SnrResult,
    pub zero_variance_lanes: usize,
}

/// Summary of one calculator's result.
#[derive(Clone, Debug, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub shape: Vec<usize>,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Lanes whose standard deviation was zero
    pub zero_variance_lanes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wavelengths: Option<Vec<f64>>,
}

impl ReportEntry {
    pub fn new(name: &str, output: &SnrOutput, wavelengths: Option<&[f64]>) -> Self {
        let result = &output.result;
        let finite = || result.iter().copied().filter(|v| v.is_finite());
        let min = finite().reduce(f64::min);
        let max = finite().reduce(f64::max);

        let (values, wavelengths) = match result.as_per_band() {
            Some(values) => (Some(values.to_vec()), wavelengths.map(<[f64]>::to_vec)),
            None => (None, None),
        };

        Self {
            name: name.to_string(),
            shape: result.shape(),
            average: result.average(),
            min,
            max,
            zero_variance_lanes: output.zero_variance_lanes,
            values,
            wavelengths,
        }
    }
}

/// Everything computed for one cube.
#[derive(Clone, Debug, Serialize)]
pub struct SnrReport {
    pub source: String,
    /// (height, width, bands)
    pub shape: [usize; 3],
    pub zero_variance: ZeroVariance,
    pub entries: Vec<ReportEntry>,
}

impl SnrReport {
    pub fn new(source: impl Into<String>, cube: &Cube, zero_variance: ZeroVariance) -> Self {
        let (height, width, bands) = cube.dim();
        Self {
            source: source.into(),
            shape: [height, width, bands],
            zero_variance,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Per-band rows as `wavelength  snr`, falling back to the band index.
    pub fn band_table(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let Some(values) = &entry.values else {
                continue;
            };
            out.push_str(&format!("# {} SNR\n", entry.name));
            for (i, snr) in values.iter().enumerate() {
                match entry.wavelengths.as_ref().and_then(|w| w.get(i)) {
                    Some(wavelength) => out.push_str(&format!("{wavelength:.2}\t{snr:.4}\n")),
                    None => out.push_str(&format!("{i}\t{snr:.4}\n")),
                }
            }
        }
        out
    }
}

impl fmt::Display for SnrReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [height, width, bands] = self.shape;
        writeln!(f, "{} ({}x{}x{})", self.source, height, width, bands)?;
        for entry in &self.entries {
            match entry.average {
                Some(average) => writeln!(f, "Average {} SNR: {:.2}", entry.name, average)?,
                None => writeln!(f, "Average {} SNR: undefined", entry.name)?,
            }
        }
        Ok(())
    }
}
