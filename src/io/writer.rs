// src/io/writer.rs
use std::path::Path;

use gdal::raster::{Buffer, RasterCreationOptions};
use gdal::{DriverManager, DriverType, Metadata};
use ndarray::ArrayView2;
use tracing::info;

use crate::config::{OutputOptions, ZeroVariance};
use crate::cube::GeoInfo;
use crate::error::{Result, SnrError};

pub const NODATA_VALUE: f32 = -999.0;

/// GDAL creation options for the SNR map.
pub fn creation_options(options: &OutputOptions) -> Vec<String> {
    let mut out = Vec::new();
    let compress = options.compress.to_uppercase();

    if compress != "NONE" {
        out.push(format!("COMPRESS={compress}"));

        match compress.as_str() {
            "DEFLATE" => out.push(format!("ZLEVEL={}", options.compress_level.min(9))),
            "ZSTD" => out.push(format!("ZSTD_LEVEL={}", options.compress_level.min(22))),
            _ => {}
        }
    }

    if options.tiled {
        out.push("TILED=YES".to_string());
    }

    out.push("NUM_THREADS=ALL_CPUS".to_string());
    out
}

/// Write a per-pixel SNR map as a single float32 band.
///
/// The driver is picked from the output extension. Non-finite values are
/// written as [`NODATA_VALUE`].
pub fn write_snr_map(
    map: ArrayView2<'_, f64>,
    geo: Option<&GeoInfo>,
    output_path: &Path,
    options: &OutputOptions,
    zero_variance: ZeroVariance,
) -> Result<()> {
    let (height, width) = map.dim();

    let driver = DriverManager::get_output_driver_for_dataset_name(output_path, DriverType::Raster)
        .ok_or_else(|| SnrError::UnknownOutputFormat(output_path.to_path_buf()))?;

    let creation_options = RasterCreationOptions::from_iter(creation_options(options));
    let mut output = driver.create_with_band_type_with_options::<f32, _>(
        output_path,
        width,
        height,
        1,
        &creation_options,
    )?;

    if let Some(geo) = geo {
        output.set_projection(&geo.projection)?;
        output.set_geo_transform(&geo.geo_transform)?;
    }
    output.set_metadata_item("SNR_DOMAIN", "spectral", "")?;
    output.set_metadata_item(
        "SNR_ZERO_VARIANCE",
        match zero_variance {
            ZeroVariance::Zero => "zero",
            ZeroVariance::Nan => "nan",
        },
        "",
    )?;

    let mut band = output.rasterband(1)?;
    band.set_no_data_value(Some(NODATA_VALUE as f64))?;
    band.set_description("Spectral Domain SNR")?;

    let data: Vec<f32> = map
        .iter()
        .map(|&v| if v.is_finite() { v as f32 } else { NODATA_VALUE })
        .collect();
    let mut buffer = Buffer::new((width, height), data);
    band.write((0, 0), (width, height), &mut buffer)?;

    output.flush_cache()?;
    info!(path = %output_path.display(), width, height, "wrote SNR map");
    Ok(())
}
