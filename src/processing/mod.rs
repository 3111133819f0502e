// src/processing/mod.rs
pub mod domains;
pub mod parallel;
pub mod report;
pub mod snr;
pub mod stats;

// Re-export main components
pub use parallel::{MapOutput, SnrCalculator, SnrProcessor};
pub use report::{ReportEntry, SnrOutput, SnrReport, SnrResult};
pub use snr::{
    average_snr, batch_snr, batch_stats, spatial_snr, spatial_stats, spectral_snr, spectral_stats,
    to_snr, zero_variance_lanes,
};
