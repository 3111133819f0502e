// src/processing/domains/mod.rs
pub mod axes;
pub mod spatial;
pub mod spectral;

// Re-export calculators
pub use axes::AxisSnr;
pub use spatial::SpatialSnr;
pub use spectral::SpectralSnr;
