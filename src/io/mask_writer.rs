//! Single-band output writers
//!
//! Writes a band of a raster (a decoded mask, an extracted bit field or a
//! masked data band) as CSV, JSON, NumPy NPY or PNG. Invalid pixels are
//! written as empty CSV cells, JSON `null`, NPY zero/NaN and transparent
//! PNG pixels.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use byteorder::{LittleEndian, WriteBytesExt};
use image::{GrayAlphaImage, LumaA};
use log::{debug, info};

use crate::qa::errors::{QaError, QaResult};
use crate::raster::{Band, BandData, BandRef, MemoryRaster};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Npy,
    Png,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &str) -> Option<Self> {
        Path::new(path)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .and_then(|ext| ext.parse().ok())
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Npy => "npy",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = QaError;

    fn from_str(s: &str) -> QaResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "npy" => Ok(OutputFormat::Npy),
            "png" => Ok(OutputFormat::Png),
            other => Err(QaError::invalid_argument(
                "format",
                format!("unsupported output format '{}' (csv, json, npy, png)", other),
            )),
        }
    }
}

/// Represents one band of a raster ready for output
///
/// This struct contains the band samples along with
/// dimensional information for interpreting them.
#[derive(Debug, Clone)]
pub struct ArrayData {
    /// Width of the array (columns)
    pub width: u32,
    /// Height of the array (rows)
    pub height: u32,
    /// Band samples and validity in row-major order
    pub band: Band,
}

impl ArrayData {
    /// Take one band of a raster
    pub fn from_raster(raster: &MemoryRaster, band: BandRef<'_>) -> QaResult<Self> {
        Ok(ArrayData {
            width: raster.width(),
            height: raster.height(),
            band: raster.band(band)?.clone(),
        })
    }

    /// Cell text of the pixel at `idx`, `None` if invalid
    fn cell(&self, idx: usize) -> Option<String> {
        if !self.band.is_valid(idx) {
            return None;
        }
        match &self.band.data {
            BandData::UInt(values) => values.get(idx).map(|v| v.to_string()),
            BandData::Float(values) => values.get(idx).map(|v| v.to_string()),
        }
    }

    /// Save the array to a file in the specified format
    ///
    /// # Arguments
    /// * `path` - Path to save the file
    /// * `format` - Format to use
    ///
    /// # Returns
    /// Result indicating success or an error
    pub fn save_to_file(&self, path: &str, format: OutputFormat) -> QaResult<()> {
        info!("Writing band '{}' ({}x{}) as {} to {}",
              self.band.name, self.width, self.height, format, path);
        match format {
            OutputFormat::Csv => self.save_as_csv(path),
            OutputFormat::Json => self.save_as_json(path),
            OutputFormat::Npy => self.save_as_npy(path),
            OutputFormat::Png => self.save_as_png(path),
        }
    }

    /// Save the array as CSV
    fn save_as_csv(&self, path: &str) -> QaResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the CSV layout: header with column numbers, row number first
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> QaResult<()> {
        write!(writer, "row/col")?;
        for x in 0..self.width {
            write!(writer, ",{}", x)?;
        }
        writeln!(writer)?;

        for y in 0..self.height {
            write!(writer, "{}", y)?;
            for x in 0..self.width {
                let idx = (y * self.width + x) as usize;
                match self.cell(idx) {
                    Some(value) => write!(writer, ",{}", value)?,
                    None => write!(writer, ",")?,
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Save the array as JSON
    fn save_as_json(&self, path: &str) -> QaResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the JSON layout: dimensions, band name and nested row arrays
    pub fn write_json<W: Write>(&self, writer: &mut W) -> QaResult<()> {
        writeln!(writer, "{{")?;
        writeln!(writer, "  \"band\": \"{}\",", self.band.name.replace('"', "\\\""))?;
        writeln!(writer, "  \"width\": {},", self.width)?;
        writeln!(writer, "  \"height\": {},", self.height)?;
        writeln!(writer, "  \"data\": [")?;

        for y in 0..self.height {
            let row: Vec<String> = (0..self.width)
                .map(|x| {
                    let idx = (y * self.width + x) as usize;
                    match self.cell(idx) {
                        Some(value) if value.parse::<f64>().map_or(false, f64::is_finite) => value,
                        _ => "null".to_string(),
                    }
                })
                .collect();
            let separator = if y + 1 < self.height { "," } else { "" };
            writeln!(writer, "    [{}]{}", row.join(", "), separator)?;
        }

        writeln!(writer, "  ]")?;
        writeln!(writer, "}}")?;

        Ok(())
    }

    /// Save the array as NumPy NPY file
    fn save_as_npy(&self, path: &str) -> QaResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_npy(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write NPY version 1.0: `<u4` for integer bands, `<f4` for float bands
    pub fn write_npy<W: Write>(&self, writer: &mut W) -> QaResult<()> {
        let descr = match self.band.data {
            BandData::UInt(_) => "<u4",
            BandData::Float(_) => "<f4",
        };
        let header_str = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
            descr, self.height, self.width
        );

        // Magic (6) + version (2) + header length (2) + header must be a multiple of 64
        let unpadded = 10 + header_str.len() + 1;
        let padding_len = (64 - unpadded % 64) % 64;
        let padded_header = format!("{}{}\n", header_str, " ".repeat(padding_len));
        debug!("NPY header: {} bytes", padded_header.len());

        writer.write_all(b"\x93NUMPY")?;
        writer.write_all(&[0x01, 0x00])?;
        writer.write_u16::<LittleEndian>(padded_header.len() as u16)?;
        writer.write_all(padded_header.as_bytes())?;

        for idx in 0..self.band.len() {
            let valid = self.band.is_valid(idx);
            match &self.band.data {
                BandData::UInt(values) => {
                    writer.write_u32::<LittleEndian>(if valid { values[idx] } else { 0 })?
                }
                BandData::Float(values) => {
                    writer.write_f32::<LittleEndian>(if valid { values[idx] } else { f32::NAN })?
                }
            }
        }

        Ok(())
    }

    /// Save the array as a grey/alpha PNG
    ///
    /// Boolean bands map to black/white; other bands are stretched
    /// linearly over their valid value range. Invalid pixels are
    /// transparent.
    fn save_as_png(&self, path: &str) -> QaResult<()> {
        let image = self.to_image();
        image.save(path).map_err(|e| QaError::ImageError(format!("Failed to save image: {}", e)))
    }

    /// Render the band as a grey/alpha image
    pub fn to_image(&self) -> GrayAlphaImage {
        let values: Vec<Option<f64>> = (0..self.band.len())
            .map(|idx| if self.band.is_valid(idx) { self.band.data.value_f64(idx) } else { None })
            .collect();

        let (min, max) = values.iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let boolean = min >= 0.0 && max <= 1.0;

        let mut image = GrayAlphaImage::new(self.width, self.height);
        for (idx, value) in values.iter().enumerate() {
            let x = idx as u32 % self.width;
            let y = idx as u32 / self.width;
            let pixel = match value {
                Some(v) if v.is_finite() => {
                    let level = if boolean {
                        *v * 255.0
                    } else if max > min {
                        (*v - min) / (max - min) * 255.0
                    } else {
                        255.0
                    };
                    LumaA([level.round().clamp(0.0, 255.0) as u8, 255])
                }
                _ => LumaA([0, 0]),
            };
            image.put_pixel(x, y, pixel);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_array() -> ArrayData {
        let mut band = Band::uint("QA_mask", vec![1, 0, 1, 1]);
        band.valid = Some(vec![true, true, false, true]);
        ArrayData { width: 2, height: 2, band }
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path("out/mask.PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path("mask.tif"), None);
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        mask_array().write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "row/col,0,1\n0,1,0\n1,,1\n");
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        mask_array().write_json(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"band\": \"QA_mask\""));
        assert!(text.contains("[1, 0],"));
        assert!(text.contains("[null, 1]\n"));
    }

    #[test]
    fn test_write_npy_header_alignment() {
        let mut out = Vec::new();
        mask_array().write_npy(&mut out).unwrap();
        assert_eq!(&out[..6], b"\x93NUMPY");
        let header_len = u16::from_le_bytes([out[8], out[9]]) as usize;
        assert_eq!((10 + header_len) % 64, 0);
        assert_eq!(out.len(), 10 + header_len + 4 * 4);
        assert_eq!(out[10 + header_len + 8..10 + header_len + 12], [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_rendering() {
        let image = mask_array().to_image();
        assert_eq!(image.get_pixel(0, 0), &LumaA([255, 255]));
        assert_eq!(image.get_pixel(1, 0), &LumaA([0, 255]));
        assert_eq!(image.get_pixel(0, 1), &LumaA([0, 0]));
    }
}
