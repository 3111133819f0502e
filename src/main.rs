// src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cube_snr::batch::process_batch;
use cube_snr::cli::{Cli, Commands};
use cube_snr::io::CubeSource;
use cube_snr::processing::{MapOutput, SnrProcessor, SnrReport};

fn print_report(cli: &Cli, report: &SnrReport) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print!("{report}");
    if cli.per_band {
        print!("{}", report.band_table());
    }
    Ok(())
}

fn run_single(cli: &Cli, source: CubeSource) -> Result<()> {
    let processor = SnrProcessor::new(cli.threads)?;
    let output_options = cli.output_options();
    let map_output = cli.map_output.as_deref().map(|path| MapOutput {
        path,
        options: &output_options,
    });

    let report = processor.process(&source, &cli.snr_options(), map_output)?;
    print_report(cli, &report)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Batch { config } => {
            for report in process_batch(config)? {
                print_report(&cli, &report)?;
            }
        }
        Commands::Envi { header } => run_single(
            &cli,
            CubeSource::Envi {
                header: header.clone(),
            },
        )?,
        Commands::Hdf5 { file, dataset } => run_single(
            &cli,
            CubeSource::Hdf5 {
                path: file.clone(),
                dataset: dataset.clone(),
            },
        )?,
        Commands::Geotiff { file } => run_single(&cli, CubeSource::Geotiff { path: file.clone() })?,
    }

    Ok(())
}
