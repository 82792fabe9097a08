//! Band file reading
//!
//! QA bands are loaded either from CSV grids or from raw binary dumps.
//!
//! CSV grids are the layout written by `MaskWriter`: an optional header row
//! starting with `row/col` followed by rows whose first cell is the row
//! index. Plain comma separated grids without header and index column are
//! accepted as well. Empty cells are read as invalid pixels, and a band
//! with any non-integer cell is read as floating point.
//!
//! Raw files hold row-major unsigned samples without header. The grid size
//! must be given; the sample width (1, 2 or 4 bytes) follows from the file
//! length.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::qa::errors::{QaError, QaResult};
use crate::raster::{Band, MemoryRaster};
use crate::utils::progress::ProgressTracker;

use super::byte_order::ByteOrder;

/// Header cell marking the CSV layout with index column
const CSV_HEADER_MARK: &str = "row/col";

/// Rows per progress update when reading raw files
const RAW_PROGRESS_ROWS: u32 = 256;

/// A band read from file together with its grid
#[derive(Debug, Clone)]
pub struct GridBand {
    pub width: u32,
    pub height: u32,
    pub band: Band,
}

/// Reader for CSV and raw binary band files
#[derive(Debug, Clone, Copy, Default)]
pub struct BandReader {
    /// Byte order of raw files
    byte_order: ByteOrder,
    /// Grid of raw files as (width, height)
    size: Option<(u32, u32)>,
}

impl BandReader {
    /// Create a reader with little-endian raw files and no grid size
    pub fn new() -> Self {
        BandReader::default()
    }

    /// Set the byte order of raw files
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the grid size of raw files
    pub fn with_size(mut self, size: Option<(u32, u32)>) -> Self {
        self.size = size;
        self
    }

    /// Read a band, picking the format from the file extension
    ///
    /// `.raw`, `.bin` and `.dat` are read as raw binary, everything else
    /// as CSV.
    pub fn read_band(&self, name: &str, path: &str) -> QaResult<GridBand> {
        let extension = Path::new(path)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(|ext| ext.to_lowercase());

        info!("Reading band '{}' from {}", name, path);
        match extension.as_deref() {
            Some("raw") | Some("bin") | Some("dat") => self.read_raw_file(name, path),
            _ => {
                let file = File::open(path)?;
                self.read_csv(name, BufReader::new(file))
            }
        }
    }

    /// Read several bands into one raster
    ///
    /// # Arguments
    /// * `specs` - (band name, file path) pairs
    ///
    /// # Returns
    /// A raster with the bands in the given order, or an error if the
    /// files do not share one grid
    pub fn read_raster(&self, specs: &[(String, String)]) -> QaResult<MemoryRaster> {
        let mut raster: Option<MemoryRaster> = None;

        for (name, path) in specs {
            let grid = self.read_band(name, path)?;
            let target = raster.get_or_insert_with(|| MemoryRaster::new(grid.width, grid.height));
            if target.dimensions() != (grid.width, grid.height) {
                return Err(QaError::DimensionMismatch {
                    expected: target.dimensions(),
                    found: (grid.width, grid.height),
                });
            }
            target.push_band(grid.band)?;
        }

        raster.ok_or_else(|| QaError::invalid_argument("band", "at least one band file is required"))
    }

    /// Read a band from CSV text
    pub fn read_csv<R: BufRead>(&self, name: &str, reader: R) -> QaResult<GridBand> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut indexed = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            if rows.is_empty() && !indexed && cells[0].eq_ignore_ascii_case(CSV_HEADER_MARK) {
                indexed = true;
                debug!("Band '{}': indexed CSV layout (header on line {})", name, line_no + 1);
                continue;
            }
            rows.push(if indexed { cells[1..].to_vec() } else { cells });
        }

        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(QaError::ParseError(format!("Band '{}' has no samples", name)));
        }
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(QaError::ParseError(format!(
                "Band '{}': row {} has {} columns, expected {}", name, y, row.len(), width
            )));
        }

        let cells: Vec<&str> = rows.iter().flatten().map(String::as_str).collect();
        let band = Self::band_from_cells(name, &cells)?;

        Ok(GridBand {
            width: width as u32,
            height: height as u32,
            band,
        })
    }

    /// Build an integer band, or a float band if any cell is not an integer
    fn band_from_cells(name: &str, cells: &[&str]) -> QaResult<Band> {
        let valid: Vec<bool> = cells.iter().map(|c| !c.is_empty()).collect();
        let all_valid = valid.iter().all(|v| *v);

        let ints: Option<Vec<u32>> = cells.iter()
            .map(|c| if c.is_empty() { Some(0) } else { c.parse::<u32>().ok() })
            .collect();

        let mut band = match ints {
            Some(values) => Band::uint(name, values),
            None => {
                let values = cells.iter()
                    .map(|c| if c.is_empty() {
                        Ok(0.0)
                    } else {
                        c.parse::<f32>().map_err(|_| {
                            QaError::ParseError(format!("Band '{}': '{}' is not a number", name, c))
                        })
                    })
                    .collect::<QaResult<Vec<f32>>>()?;
                Band::float(name, values)
            }
        };

        if !all_valid {
            band.valid = Some(valid);
        }
        Ok(band)
    }

    /// Read a raw binary band file
    pub fn read_raw_file(&self, name: &str, path: &str) -> QaResult<GridBand> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        self.read_raw(name, BufReader::new(file), length)
    }

    /// Read raw samples of `length` bytes
    pub fn read_raw<R: Read>(&self, name: &str, mut reader: R, length: u64) -> QaResult<GridBand> {
        let (width, height) = self.size.ok_or_else(|| {
            QaError::invalid_argument("size", format!("raw band '{}' needs a grid size (WxH)", name))
        })?;

        let pixels = width as u64 * height as u64;
        if pixels == 0 || length % pixels != 0 {
            return Err(QaError::ParseError(format!(
                "Band '{}': {} bytes do not fit a {}x{} grid", name, length, width, height
            )));
        }
        let sample_bytes = length / pixels;
        if !matches!(sample_bytes, 1 | 2 | 4) {
            return Err(QaError::ParseError(format!(
                "Band '{}': unsupported sample width of {} bytes", name, sample_bytes
            )));
        }
        debug!("Band '{}': {}x{} raw, {}-bit {} endian samples",
               name, width, height, sample_bytes * 8, self.byte_order);

        let handler = self.byte_order.create_handler();
        let progress = ProgressTracker::new(height as u64, &format!("Reading {}", name));
        let mut values = Vec::with_capacity(pixels as usize);

        for y in 0..height {
            for _ in 0..width {
                let value = match sample_bytes {
                    1 => handler.read_u8(&mut reader)? as u32,
                    2 => handler.read_u16(&mut reader)? as u32,
                    _ => handler.read_u32(&mut reader)?,
                };
                values.push(value);
            }
            if (y + 1) % RAW_PROGRESS_ROWS == 0 {
                progress.increment(RAW_PROGRESS_ROWS as u64);
            }
        }
        progress.increment((height % RAW_PROGRESS_ROWS) as u64);
        progress.finish();

        Ok(GridBand {
            width,
            height,
            band: Band::uint(name, values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BandData;
    use std::io::Cursor;

    #[test]
    fn test_read_indexed_csv() {
        let text = "row/col,0,1,2\n0,1,2,3\n1,4,,6\n";
        let grid = BandReader::new().read_csv("QA", Cursor::new(text)).unwrap();
        assert_eq!((grid.width, grid.height), (3, 2));
        assert_eq!(grid.band.data, BandData::UInt(vec![1, 2, 3, 4, 0, 6]));
        assert_eq!(grid.band.valid, Some(vec![true, true, true, true, false, true]));
    }

    #[test]
    fn test_read_plain_float_csv() {
        let grid = BandReader::new().read_csv("LST", Cursor::new("290.5,301\n288,1e2\n")).unwrap();
        assert_eq!(grid.band.data, BandData::Float(vec![290.5, 301.0, 288.0, 100.0]));
        assert_eq!(grid.band.valid, None);
    }

    #[test]
    fn test_ragged_csv_is_rejected() {
        let err = BandReader::new().read_csv("QA", Cursor::new("1,2\n3\n")).unwrap_err();
        assert!(matches!(err, QaError::ParseError(_)));
    }

    #[test]
    fn test_read_raw_u16_big_endian() {
        let bytes: Vec<u8> = vec![0x00, 0x01, 0x80, 0x00, 0x00, 0x04, 0xFF, 0xFF];
        let grid = BandReader::new()
            .with_byte_order(ByteOrder::BigEndian)
            .with_size(Some((2, 2)))
            .read_raw("StateQA", Cursor::new(bytes), 8)
            .unwrap();
        assert_eq!(grid.band.data, BandData::UInt(vec![1, 0x8000, 4, 0xFFFF]));
    }

    #[test]
    fn test_raw_needs_size() {
        let err = BandReader::new().read_raw("QA", Cursor::new(vec![0u8; 4]), 4).unwrap_err();
        assert_eq!(err.parameter(), Some("size"));
    }

    #[test]
    fn test_raw_rejects_odd_sample_width() {
        let err = BandReader::new()
            .with_size(Some((1, 1)))
            .read_raw("QA", Cursor::new(vec![0u8; 3]), 3)
            .unwrap_err();
        assert!(matches!(err, QaError::ParseError(_)));
    }
}
