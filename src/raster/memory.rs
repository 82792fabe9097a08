//! In-memory raster and algebra implementation
//!
//! `MemoryRaster` keeps every band as a flat row-major vector and
//! `MemoryAlgebra` evaluates the `RasterAlgebra` primitives eagerly,
//! pixel by pixel. Invalid (masked) pixels stay invalid through every
//! operation.

use log::debug;

use crate::qa::errors::{QaError, QaResult};

use super::algebra::{BandRef, RasterAlgebra};
use super::band::{Band, BandData};

/// A multi-band raster held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRaster {
    /// Width of the raster (columns)
    width: u32,
    /// Height of the raster (rows)
    height: u32,
    /// Bands in insertion order
    bands: Vec<Band>,
}

impl MemoryRaster {
    /// Create an empty raster with the given grid
    pub fn new(width: u32, height: u32) -> Self {
        MemoryRaster {
            width,
            height,
            bands: Vec::new(),
        }
    }

    /// Create a raster from a list of bands
    ///
    /// # Returns
    /// The raster, or an error if a band does not cover the grid
    pub fn from_bands(width: u32, height: u32, bands: Vec<Band>) -> QaResult<Self> {
        let mut raster = MemoryRaster::new(width, height);
        for band in bands {
            raster.push_band(band)?;
        }
        Ok(raster)
    }

    /// Builder-style variant of `push_band`
    pub fn with_band(mut self, band: Band) -> QaResult<Self> {
        self.push_band(band)?;
        Ok(self)
    }

    /// Append a band, replacing any band with the same name
    pub fn push_band(&mut self, band: Band) -> QaResult<()> {
        let expected = self.pixel_count();
        if band.len() != expected {
            return Err(QaError::invalid_argument(
                "band",
                format!("band '{}' has {} samples, raster grid needs {}", band.name, band.len(), expected),
            ));
        }
        if let Some(valid) = &band.valid {
            if valid.len() != expected {
                return Err(QaError::invalid_argument(
                    "band",
                    format!("validity mask of band '{}' has {} entries, expected {}", band.name, valid.len(), expected),
                ));
            }
        }

        match self.bands.iter_mut().find(|b| b.name == band.name) {
            Some(existing) => *existing = band,
            None => self.bands.push(band),
        }
        Ok(())
    }

    /// Raster width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grid dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels per band
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// All bands in order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Names of all bands in order
    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    /// Look up a band by position or name
    pub fn band(&self, band: BandRef<'_>) -> QaResult<&Band> {
        let found = match band {
            BandRef::Index(i) => self.bands.get(i),
            BandRef::Name(name) => self.bands.iter().find(|b| b.name == name),
        };
        found.ok_or_else(|| QaError::BandNotFound(band.to_string()))
    }

    /// Integer sample at (x, y) of a band, `None` if out of bounds or masked
    pub fn get(&self, band: BandRef<'_>, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let band = self.band(band).ok()?;
        let idx = y as usize * self.width as usize + x as usize;
        if !band.is_valid(idx) {
            return None;
        }
        band.as_uint().and_then(|values| values.get(idx).copied())
    }

    fn check_same_grid(&self, other: &MemoryRaster) -> QaResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(QaError::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            });
        }
        Ok(())
    }

    fn single_band(&self, operation: &str) -> QaResult<&Band> {
        match self.bands.as_slice() {
            [band] => Ok(band),
            bands => Err(QaError::invalid_argument(
                operation,
                format!("expected a single-band raster, found {} bands", bands.len()),
            )),
        }
    }

    /// Band of `self` paired with band `index` of a binary operation;
    /// a single-band right-hand side is broadcast to every band.
    fn paired_band<'r>(&self, other: &'r MemoryRaster, index: usize, operation: &str) -> QaResult<&'r Band> {
        if other.bands.len() == 1 {
            return Ok(&other.bands[0]);
        }
        if other.bands.len() != self.bands.len() {
            return Err(QaError::invalid_argument(
                operation,
                format!("band counts differ: {} vs {}", self.bands.len(), other.bands.len()),
            ));
        }
        Ok(&other.bands[index])
    }

    fn map_bands<F>(&self, mut f: F) -> QaResult<MemoryRaster>
    where
        F: FnMut(usize, &Band) -> QaResult<Band>,
    {
        let bands = self.bands.iter()
            .enumerate()
            .map(|(i, band)| f(i, band))
            .collect::<QaResult<Vec<_>>>()?;
        Ok(MemoryRaster {
            width: self.width,
            height: self.height,
            bands,
        })
    }
}

/// Combine two optional validity masks
fn merge_valid(left: &Option<Vec<bool>>, right: &Option<Vec<bool>>) -> Option<Vec<bool>> {
    match (left, right) {
        (None, None) => None,
        (Some(l), None) => Some(l.clone()),
        (None, Some(r)) => Some(r.clone()),
        (Some(l), Some(r)) => Some(l.iter().zip(r).map(|(a, b)| *a && *b).collect()),
    }
}

/// Apply an integer transform to a band, rejecting float bands
fn map_uint_band<F>(band: &Band, f: F) -> QaResult<Band>
where
    F: Fn(u32) -> u32,
{
    let values = band.as_uint().ok_or_else(|| QaError::BandType {
        band: band.name.clone(),
        expected: "unsigned integer",
    })?;
    Ok(Band {
        name: band.name.clone(),
        data: BandData::UInt(values.iter().map(|v| f(*v)).collect()),
        valid: band.valid.clone(),
    })
}

/// Apply a comparison to a band, producing a 0/1 band
fn compare_band<F>(band: &Band, f: F) -> Band
where
    F: Fn(f64) -> bool,
{
    let values = (0..band.len())
        .map(|i| band.data.value_f64(i).map_or(0, |v| f(v) as u32))
        .collect();
    Band {
        name: band.name.clone(),
        data: BandData::UInt(values),
        valid: band.valid.clone(),
    }
}

/// Eager, pixel-by-pixel implementation of `RasterAlgebra`
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryAlgebra;

impl MemoryAlgebra {
    /// Create a new in-memory algebra
    pub fn new() -> Self {
        MemoryAlgebra
    }
}

impl RasterAlgebra for MemoryAlgebra {
    type Raster = MemoryRaster;

    fn select_band(&self, raster: &MemoryRaster, band: BandRef<'_>) -> QaResult<MemoryRaster> {
        let selected = raster.band(band)?.clone();
        debug!("Selected band '{}' ({})", selected.name, band);
        Ok(MemoryRaster {
            width: raster.width,
            height: raster.height,
            bands: vec![selected],
        })
    }

    fn bitwise_and(&self, raster: &MemoryRaster, value: u32) -> QaResult<MemoryRaster> {
        raster.map_bands(|_, band| map_uint_band(band, |v| v & value))
    }

    fn right_shift(&self, raster: &MemoryRaster, bits: u32) -> QaResult<MemoryRaster> {
        if bits >= u32::BITS {
            return Err(QaError::invalid_argument(
                "bits",
                format!("shift of {} exceeds the 32-bit sample width", bits),
            ));
        }
        raster.map_bands(|_, band| map_uint_band(band, |v| v >> bits))
    }

    fn equals(&self, raster: &MemoryRaster, value: u32) -> QaResult<MemoryRaster> {
        let target = value as f64;
        raster.map_bands(|_, band| Ok(compare_band(band, |v| v == target)))
    }

    fn less_than_or_equal(&self, raster: &MemoryRaster, value: u32) -> QaResult<MemoryRaster> {
        let target = value as f64;
        raster.map_bands(|_, band| Ok(compare_band(band, |v| v <= target)))
    }

    fn and(&self, left: &MemoryRaster, right: &MemoryRaster) -> QaResult<MemoryRaster> {
        left.check_same_grid(right)?;
        left.map_bands(|i, band| {
            let other = left.paired_band(right, i, "and")?;
            let values = (0..band.len())
                .map(|p| {
                    let l = band.data.value_f64(p).unwrap_or(0.0) != 0.0;
                    let r = other.data.value_f64(p).unwrap_or(0.0) != 0.0;
                    (l && r) as u32
                })
                .collect();
            Ok(Band {
                name: band.name.clone(),
                data: BandData::UInt(values),
                valid: merge_valid(&band.valid, &other.valid),
            })
        })
    }

    fn rename(&self, raster: &MemoryRaster, name: &str) -> QaResult<MemoryRaster> {
        let mut band = raster.single_band("rename")?.clone();
        band.name = name.to_string();
        Ok(MemoryRaster {
            width: raster.width,
            height: raster.height,
            bands: vec![band],
        })
    }

    fn add_band(&self, raster: &MemoryRaster, band: &MemoryRaster, name: &str) -> QaResult<MemoryRaster> {
        raster.check_same_grid(band)?;
        let mut added = band.single_band("add_band")?.clone();
        added.name = name.to_string();

        let mut result = raster.clone();
        result.push_band(added)?;
        Ok(result)
    }

    fn update_mask(&self, raster: &MemoryRaster, mask: &MemoryRaster) -> QaResult<MemoryRaster> {
        raster.check_same_grid(mask)?;
        raster.map_bands(|i, band| {
            let mask_band = raster.paired_band(mask, i, "update_mask")?;
            let valid = (0..band.len())
                .map(|p| {
                    band.is_valid(p)
                        && mask_band.is_valid(p)
                        && mask_band.data.value_f64(p).unwrap_or(0.0) != 0.0
                })
                .collect();
            Ok(Band {
                name: band.name.clone(),
                data: band.data.clone(),
                valid: Some(valid),
            })
        })
    }
}
