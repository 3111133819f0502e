// src/io/envi.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use gdal::Dataset;
use tracing::{debug, info};

use super::raster::{geo_info, read_band_stack};
use crate::cube::Cube;
use crate::error::{Result, SnrError};

/// Extensions tried, in order and ignoring case, when looking for the raw cube
/// next to a header.
const DATA_EXTENSIONS: &[&str] = &["img", "dat", "raw", "bsq", "bil", "bip"];

/// Parsed ENVI `.hdr` file. Keys are lower-cased; `{...}` values keep their braces.
#[derive(Clone, Debug, Default)]
pub struct EnviHeader {
    fields: HashMap<String, String>,
}

impl EnviHeader {
    pub fn read(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        match lines.next() {
            Some("ENVI") => {}
            Some(other) => {
                return Err(SnrError::InvalidHeader(format!(
                    "expected ENVI magic line, found {other:?}"
                )))
            }
            None => return Err(SnrError::InvalidHeader("empty header".to_string())),
        }

        let mut fields = HashMap::new();
        while let Some(line) = lines.next() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let mut value = value.trim().to_string();

            // Brace lists may span several lines
            if value.starts_with('{') {
                while !value.contains('}') {
                    match lines.next() {
                        Some(next) => {
                            value.push(' ');
                            value.push_str(next);
                        }
                        None => {
                            return Err(SnrError::InvalidHeader(format!(
                                "unterminated list for field {key:?}"
                            )))
                        }
                    }
                }
            }

            fields.insert(key, value);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| SnrError::MissingMetadata(key.to_string()))
    }

    /// Band centre wavelengths from the `wavelength` list.
    pub fn wavelengths(&self) -> Result<Vec<f64>> {
        let raw = self.require("wavelength")?;
        let invalid = || SnrError::InvalidMetadata {
            field: "wavelength".to_string(),
            value: raw.to_string(),
        };

        let inner = raw
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(invalid)?;

        inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().map_err(|_| invalid()))
            .collect()
    }
}

/// Find the raw cube that belongs to `header`: the header path without its
/// `.hdr` suffix, then a sibling with that stem and a common ENVI data
/// extension in any case.
pub fn locate_data_file(header: &Path) -> Result<PathBuf> {
    let is_hdr = header
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr"));
    let stem = if is_hdr {
        header.with_extension("")
    } else {
        header.to_path_buf()
    };

    if stem != header && stem.is_file() {
        debug!(data = %stem.display(), "found ENVI data file");
        return Ok(stem);
    }

    let not_found = || SnrError::DataFileNotFound(header.to_path_buf());
    let name = stem.file_name().ok_or_else(not_found)?;
    let dir = match stem.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let siblings: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.file_stem() == Some(name) && path.is_file())
        .collect();

    for ext in DATA_EXTENSIONS {
        let found = siblings.iter().find(|path| {
            path.extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        });
        if let Some(candidate) = found {
            debug!(data = %candidate.display(), "found ENVI data file");
            return Ok(candidate.clone());
        }
    }

    Err(not_found())
}

/// Load an ENVI image from its header path.
///
/// Wavelengths come from the header text; pixel data is read through GDAL's
/// ENVI driver, which handles interleave, byte order and data type.
pub fn read_envi(header_path: &Path) -> Result<Cube> {
    let header = EnviHeader::read(header_path)?;
    let wavelengths = header.wavelengths()?;
    let data_path = locate_data_file(header_path)?;

    let (stack, geo) = {
        let dataset = Dataset::open(&data_path)?;
        (read_band_stack(&dataset)?, geo_info(&dataset))
    };

    let cube = Cube::from_band_major(stack)?
        .with_wavelengths(wavelengths)?
        .with_geo(geo);
    info!(
        header = %header_path.display(),
        dims = ?cube.dim(),
        "loaded ENVI cube"
    );
    Ok(cube)
}
