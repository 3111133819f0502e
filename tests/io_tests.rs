// tests/io_tests.rs
use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use cube_snr::batch::{process_batch, write_report, BatchConfig};
use cube_snr::config::{OutputOptions, SnrMode, SnrOptions, ZeroVariance};
use cube_snr::io::envi::locate_data_file;
use cube_snr::io::writer::{creation_options, NODATA_VALUE};
use cube_snr::io::{read_envi, read_geotiff, read_hdf5, write_snr_map, CubeSource, EnviHeader};
use cube_snr::processing::{spectral_snr, MapOutput, SnrProcessor, SnrReport};
use cube_snr::{Cube, SnrError};
use gdal::raster::Buffer;
use gdal::DriverManager;
use ndarray::{arr2, Array3};

const HEADER: &str = "ENVI
description = {
  Test cube}
samples = 3
lines   = 2
bands   = 4
header offset = 0
file type = ENVI Standard
data type = 4
interleave = bsq
byte order = 0
Wavelength = { 450.5, 550.0,
 650.25 , 750.0 }
";

/// Value stored at (row, column, band) in every fixture
fn pixel(r: usize, c: usize, b: usize) -> f32 {
    (1 + r * 3 + c) as f32 * (b + 1) as f32 + (b * b) as f32
}

/// Write a 3-band float32 GeoTIFF with `pixel` values
fn write_fixture_geotiff(path: &Path, width: usize, height: usize, bands: usize) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<f32, _>(path, width, height, bands)
        .unwrap();
    dataset
        .set_geo_transform(&[500000.0, 30.0, 0.0, 4200000.0, 0.0, -30.0])
        .unwrap();

    for b in 0..bands {
        let mut data = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                data.push(pixel(r, c, b));
            }
        }
        let mut band = dataset.rasterband(b + 1).unwrap();
        let mut buffer = Buffer::new((width, height), data);
        band.write((0, 0), (width, height), &mut buffer).unwrap();
    }
}

/// Write an ENVI BSQ float32 cube next to `HEADER`
fn write_fixture_envi(dir: &Path) -> std::path::PathBuf {
    let header_path = dir.join("scene.hdr");
    fs::write(&header_path, HEADER).unwrap();

    let mut raw = Vec::new();
    for b in 0..4 {
        for r in 0..2 {
            for c in 0..3 {
                raw.extend_from_slice(&pixel(r, c, b).to_le_bytes());
            }
        }
    }
    fs::write(dir.join("scene.img"), raw).unwrap();
    header_path
}

/// Write a multidimensional VRT holding a (2, 3, 4) `pixel` array and a 2-D array
fn write_fixture_multidim(path: &Path) {
    let mut values = Vec::new();
    for r in 0..2 {
        for c in 0..3 {
            for b in 0..4 {
                values.push(pixel(r, c, b).to_string());
            }
        }
    }

    let vrt = format!(
        r#"<VRTDataset>
  <Group name="/">
    <Dimension name="row" size="2"/>
    <Dimension name="col" size="3"/>
    <Dimension name="band" size="4"/>
    <Array name="hyperspectral_data">
      <DataType>Float32</DataType>
      <DimensionRef ref="row"/>
      <DimensionRef ref="col"/>
      <DimensionRef ref="band"/>
      <InlineValues offset="0,0,0" count="2,3,4">{}</InlineValues>
    </Array>
    <Array name="flat">
      <DataType>Float32</DataType>
      <DimensionRef ref="row"/>
      <DimensionRef ref="col"/>
      <InlineValues offset="0,0" count="2,3">1 2 3 4 5 6</InlineValues>
    </Array>
  </Group>
</VRTDataset>
"#,
        values.join(" ")
    );
    fs::write(path, vrt).unwrap();
}

#[test]
fn test_envi_header_parsing() {
    let header = EnviHeader::parse(HEADER).unwrap();

    assert_eq!(header.get("samples"), Some("3"));
    assert_eq!(header.get("LINES"), Some("2"));
    assert_eq!(header.get("description"), Some("{ Test cube}"));
    assert_eq!(
        header.wavelengths().unwrap(),
        vec![450.5, 550.0, 650.25, 750.0]
    );
}

#[test]
fn test_envi_header_errors() {
    assert!(matches!(
        EnviHeader::parse("not a header\nsamples = 3"),
        Err(SnrError::InvalidHeader(_))
    ));
    assert!(matches!(
        EnviHeader::parse("ENVI\nwavelength = { 400, 500"),
        Err(SnrError::InvalidHeader(_))
    ));

    let header = EnviHeader::parse("ENVI\nsamples = 3\n").unwrap();
    assert!(matches!(
        header.wavelengths(),
        Err(SnrError::MissingMetadata(field)) if field == "wavelength"
    ));

    let header = EnviHeader::parse("ENVI\nwavelength = { 400, abc }\n").unwrap();
    assert!(matches!(
        header.wavelengths(),
        Err(SnrError::InvalidMetadata { .. })
    ));
}

#[test]
fn test_locate_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("cube.hdr");
    fs::write(&header, "ENVI\n").unwrap();

    assert!(matches!(
        locate_data_file(&header),
        Err(SnrError::DataFileNotFound(_))
    ));

    fs::write(dir.path().join("cube.dat"), [0u8; 4]).unwrap();
    assert_eq!(locate_data_file(&header).unwrap(), dir.path().join("cube.dat"));

    // A bare stem wins over extensions
    fs::write(dir.path().join("cube"), [0u8; 4]).unwrap();
    assert_eq!(locate_data_file(&header).unwrap(), dir.path().join("cube"));
}

#[test]
fn test_locate_data_file_ignores_extension_case() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("scene.HDR");
    fs::write(&header, "ENVI\n").unwrap();
    fs::write(dir.path().join("scene.Bsq"), [0u8; 4]).unwrap();
    assert_eq!(locate_data_file(&header).unwrap(), dir.path().join("scene.Bsq"));

    // Earlier extensions in the search order win
    fs::write(dir.path().join("scene.IMG"), [0u8; 4]).unwrap();
    assert_eq!(locate_data_file(&header).unwrap(), dir.path().join("scene.IMG"));

    // Other stems are ignored
    let other = dir.path().join("other.hdr");
    fs::write(&other, "ENVI\n").unwrap();
    assert!(matches!(
        locate_data_file(&other),
        Err(SnrError::DataFileNotFound(_))
    ));
}

#[test]
fn test_read_envi_cube() {
    let dir = tempfile::tempdir().unwrap();
    let header_path = write_fixture_envi(dir.path());

    let cube = read_envi(&header_path).unwrap();
    assert_eq!(cube.dim(), (2, 3, 4));
    assert_eq!(cube.wavelengths(), Some(&[450.5, 550.0, 650.25, 750.0][..]));
    for ((r, c, b), value) in cube.view().indexed_iter() {
        assert_eq!(*value, pixel(r, c, b));
    }
}

#[test]
fn test_read_geotiff_reorders_bands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.tif");
    write_fixture_geotiff(&path, 5, 4, 3);

    let cube = read_geotiff(&path).unwrap();
    assert_eq!(cube.dim(), (4, 5, 3));
    assert!(cube.wavelengths().is_none());
    for ((r, c, b), value) in cube.view().indexed_iter() {
        assert_eq!(*value, pixel(r, c, b));
    }

    let geo = cube.geo().unwrap();
    assert_eq!(geo.geo_transform[1], 30.0);
}

#[test]
fn test_read_hdf5_keeps_axis_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.vrt");
    write_fixture_multidim(&path);

    let cube = read_hdf5(&path, "hyperspectral_data").unwrap();
    assert_eq!(cube.dim(), (2, 3, 4));
    assert!(cube.wavelengths().is_none());
    for ((r, c, b), &value) in cube.view().indexed_iter() {
        assert_eq!(value, pixel(r, c, b));
    }

    // Leading slash is accepted
    let cube = read_hdf5(&path, "/hyperspectral_data").unwrap();
    assert_eq!(cube.dim(), (2, 3, 4));
}

#[test]
fn test_read_hdf5_rejects_non_cube_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.vrt");
    write_fixture_multidim(&path);

    assert!(matches!(
        read_hdf5(&path, "flat"),
        Err(SnrError::NotThreeDimensional(2))
    ));
    assert!(read_hdf5(&path, "missing").is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let source = CubeSource::Geotiff {
        path: "does/not/exist.tif".into(),
    };
    assert!(matches!(source.load(), Err(SnrError::Gdal(_))));
}

#[test]
fn test_creation_options() {
    let options = OutputOptions::default();
    assert_eq!(
        creation_options(&options),
        vec!["COMPRESS=DEFLATE", "ZLEVEL=6", "TILED=YES", "NUM_THREADS=ALL_CPUS"]
    );

    let options = OutputOptions {
        compress: "zstd".to_string(),
        compress_level: 40,
        tiled: false,
    };
    assert_eq!(
        creation_options(&options),
        vec!["COMPRESS=ZSTD", "ZSTD_LEVEL=22", "NUM_THREADS=ALL_CPUS"]
    );

    let options = OutputOptions {
        compress: "none".to_string(),
        compress_level: 6,
        tiled: true,
    };
    assert_eq!(
        creation_options(&options),
        vec!["TILED=YES", "NUM_THREADS=ALL_CPUS"]
    );
}

#[test]
fn test_write_snr_map_nodata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.tif");
    let map = arr2(&[[1.5, f64::NAN], [0.0, 3.25]]);

    write_snr_map(
        map.view(),
        None,
        &path,
        &OutputOptions::default(),
        ZeroVariance::Nan,
    )
    .unwrap();

    let cube = read_geotiff(&path).unwrap();
    assert_eq!(cube.dim(), (2, 2, 1));
    let view = cube.view();
    assert_eq!(view[[0, 0, 0]], 1.5);
    assert_eq!(view[[0, 1, 0]], NODATA_VALUE);
    assert_eq!(view[[1, 0, 0]], 0.0);
    assert_eq!(view[[1, 1, 0]], 3.25);
}

#[test]
fn test_process_geotiff_with_map_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cube.tif");
    let map_path = dir.path().join("snr.tif");
    write_fixture_geotiff(&input, 6, 3, 4);

    let processor = SnrProcessor::new(Some(2)).unwrap();
    let output_options = OutputOptions::default();
    let report = processor
        .process(
            &CubeSource::Geotiff {
                path: input.clone(),
            },
            &SnrOptions::default(),
            Some(MapOutput {
                path: &map_path,
                options: &output_options,
            }),
        )
        .unwrap();

    assert_eq!(report.shape, [3, 6, 4]);
    assert_eq!(report.entries.len(), 2);

    let written = read_geotiff(&map_path).unwrap();
    let expected = spectral_snr(read_geotiff(&input).unwrap().view(), ZeroVariance::Zero);
    assert_eq!(written.dim(), (3, 6, 1));
    for ((r, c), snr) in expected.indexed_iter() {
        assert_abs_diff_eq!(written.view()[[r, c, 0]] as f64, *snr, epsilon = 1e-4);
    }
    assert_eq!(
        written.geo().unwrap().geo_transform,
        [500000.0, 30.0, 0.0, 4200000.0, 0.0, -30.0]
    );
}

#[test]
fn test_batch_config_defaults_and_overrides() {
    let config = BatchConfig::parse(
        r#"{
            "global": { "mode": "spatial", "compress": "LZW", "axes": [2] },
            "jobs": [
                { "source": { "format": "hdf5", "path": "scene.h5" } },
                {
                    "source": { "format": "envi", "header": "scene.hdr" },
                    "mode": "both",
                    "zero_variance": "nan",
                    "axes": [0, 1],
                    "tiled": false
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(config.global.mode, SnrMode::Spatial);
    assert_eq!(config.global.compress_level, 6);
    assert!(config.global.tiled);

    let first = &config.jobs[0];
    assert_eq!(
        first.source,
        CubeSource::Hdf5 {
            path: "scene.h5".into(),
            dataset: "hyperspectral_data".to_string()
        }
    );
    assert_eq!(first.snr_options(&config.global).mode, SnrMode::Spatial);
    assert_eq!(first.snr_options(&config.global).axes, Some(vec![2]));
    assert_eq!(first.output_options(&config.global).compress, "LZW");

    let second = &config.jobs[1];
    let options = second.snr_options(&config.global);
    assert_eq!(options.mode, SnrMode::Both);
    assert_eq!(options.zero_variance, ZeroVariance::Nan);
    assert_eq!(options.axes, Some(vec![0, 1]));
    assert!(!second.output_options(&config.global).tiled);
}

#[test]
fn test_batch_config_rejects_unknown_format() {
    let result = BatchConfig::parse(
        r#"{ "jobs": [ { "source": { "format": "netcdf", "path": "x.nc" } } ] }"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_process_batch_writes_reports() {
    let dir = tempfile::tempdir().unwrap();
    let header_path = write_fixture_envi(dir.path());
    let tiff_path = dir.path().join("cube.tif");
    write_fixture_geotiff(&tiff_path, 4, 4, 3);
    let report_path = dir.path().join("report.json");

    let config = serde_json::json!({
        "global": { "threads": 1 },
        "jobs": [
            { "source": { "format": "envi", "header": header_path }, "report_output": report_path },
            { "source": { "format": "geotiff", "path": tiff_path }, "mode": "spectral" }
        ]
    });
    let config_path = dir.path().join("batch.json");
    fs::write(&config_path, config.to_string()).unwrap();

    let reports = process_batch(&config_path).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].entries.len(), 2);
    assert_eq!(reports[1].entries.len(), 1);
    assert_eq!(reports[1].entries[0].name, "Spectral Domain");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(written["shape"], serde_json::json!([2, 3, 4]));
    assert_eq!(written["entries"][0]["name"], "Spatial Domain");
    assert_eq!(written["entries"][0]["wavelengths"][1], 550.0);
}

#[test]
fn test_batch_config_global_axes_default() {
    let config = BatchConfig::parse(
        r#"{ "jobs": [ { "source": { "format": "geotiff", "path": "a.tif" } } ] }"#,
    )
    .unwrap();
    assert_eq!(config.global.axes, None);
    assert_eq!(config.jobs[0].snr_options(&config.global).axes, None);
}

#[test]
fn test_write_report_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cube = Cube::new(Array3::from_shape_fn((2, 3, 4), |(r, c, b)| pixel(r, c, b))).unwrap();
    let report = SnrReport::new("memory", &cube, ZeroVariance::Zero);

    let path = dir.path().join("report.json");
    write_report(&report, &path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["source"], "memory");
    assert_eq!(written["shape"], serde_json::json!([2, 3, 4]));
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_report_surfaces_flush_errors() {
    // Small reports sit in the buffer until flush, where /dev/full fails with ENOSPC
    let cube = Cube::new(Array3::from_elem((1, 1, 1), 1.0f32)).unwrap();
    let report = SnrReport::new("memory", &cube, ZeroVariance::Zero);

    assert!(write_report(&report, Path::new("/dev/full")).is_err());
}
