use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{OutputOptions, SnrMode, SnrOptions, ZeroVariance};

#[derive(Parser)]
#[command(name = "cube-snr")]
#[command(about = "Signal-to-noise ratio metrics for hyperspectral cubes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SNR domains to compute
    #[arg(short, long, value_enum, default_value_t = SnrMode::Both, global = true)]
    pub mode: SnrMode,

    /// Value reported for zero-variance bands or pixels
    #[arg(long, value_enum, default_value_t = ZeroVariance::Zero, global = true)]
    pub zero_variance: ZeroVariance,

    /// Extra reduction over these cube axes (0=row, 1=column, 2=band), e.g. 0,1
    #[arg(long, value_delimiter = ',', global = true)]
    pub axes: Option<Vec<usize>>,

    /// Write the per-pixel SNR map to this raster
    #[arg(long, global = true)]
    pub map_output: Option<PathBuf>,

    /// Compression for the SNR map (DEFLATE, ZSTD, LZW, NONE)
    #[arg(long, default_value = "DEFLATE", global = true)]
    pub compress: String,

    /// Compression level for the SNR map
    #[arg(long, default_value = "6", global = true)]
    pub compress_level: u8,

    /// Write the SNR map striped instead of tiled
    #[arg(long, global = true)]
    pub no_tiled: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print the per-band SNR values
    #[arg(long, global = true)]
    pub per_band: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ENVI image: header plus raw cube
    Envi {
        /// Header (.hdr) file
        #[arg(long)]
        header: PathBuf,
    },

    /// HDF5 container holding a (row, column, band) dataset
    Hdf5 {
        /// HDF5 file
        #[arg(short, long)]
        file: PathBuf,

        /// Dataset name inside the file
        #[arg(short, long, default_value = "hyperspectral_data")]
        dataset: String,
    },

    /// Multi-band GeoTIFF
    Geotiff {
        /// GeoTIFF file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run the jobs listed in a JSON batch file
    Batch {
        /// Batch configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Cli {
    pub fn snr_options(&self) -> SnrOptions {
        SnrOptions {
            mode: self.mode,
            zero_variance: self.zero_variance,
            axes: self.axes.clone(),
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            compress: self.compress.clone(),
            compress_level: self.compress_level,
            tiled: !self.no_tiled,
        }
    }
}
