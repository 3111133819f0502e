// src/lib.rs
pub mod batch;
pub mod cli;
pub mod config;
pub mod cube;
pub mod error;
pub mod io;
pub mod processing;

pub use cube::Cube;
pub use error::{Result, SnrError};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
