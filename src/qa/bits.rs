//! QA bit-field extraction
//!
//! MODIS QA bands pack several quality flags into fixed bit positions of
//! each pixel value. A `BitRange` names one such field and
//! `extract_bits` isolates it, right-aligned to bit 0.

use std::fmt;
use std::str::FromStr;

use crate::qa::errors::{QaError, QaResult};
use crate::raster::{BandRef, RasterAlgebra};
use crate::utils::parse_utils;

/// Highest addressable bit of a QA sample
pub const MAX_BIT: u32 = u32::BITS - 1;

/// Inclusive range of bit positions within a QA sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    start: u32,
    end: u32,
}

impl BitRange {
    /// Create a bit range, validating `start <= end <= 31`
    pub fn new(start: u32, end: u32) -> QaResult<Self> {
        if start > end {
            return Err(QaError::invalid_argument(
                "bits",
                format!("start bit {} is greater than end bit {}", start, end),
            ));
        }
        if end > MAX_BIT {
            return Err(QaError::invalid_argument(
                "bits",
                format!("end bit {} exceeds the 32-bit sample width", end),
            ));
        }
        Ok(BitRange { start, end })
    }

    /// Create a single-bit range
    pub fn bit(position: u32) -> QaResult<Self> {
        BitRange::new(position, position)
    }

    /// Compile-time checked constructor for the fixed rule tables
    pub(crate) const fn fixed(start: u32, end: u32) -> Self {
        assert!(start <= end && end <= MAX_BIT, "malformed bit range");
        BitRange { start, end }
    }

    /// First bit position (0-based)
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last bit position (inclusive)
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of bits in the range
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Largest value the field can hold once right-aligned
    pub fn max_value(&self) -> u32 {
        ((1u64 << self.width()) - 1) as u32
    }

    /// Mask with bits `start..=end` set
    pub fn mask(&self) -> u32 {
        (((1u64 << self.width()) - 1) << self.start) as u32
    }

    /// Extract the field from a single sample value
    pub fn extract(&self, value: u32) -> u32 {
        (value & self.mask()) >> self.start
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for BitRange {
    type Err = QaError;

    /// Parse `"S-E"` or a single bit `"S"`
    fn from_str(s: &str) -> QaResult<Self> {
        let (start, end) = parse_utils::parse_bit_range(s)?;
        BitRange::new(start, end)
    }
}

/// Extract a bit field from one band of a raster
///
/// Selects `band`, ANDs every sample with the range mask and shifts the
/// result right by `range.start()`, so each output pixel holds a value in
/// `0..=range.max_value()`.
///
/// # Arguments
/// * `algebra` - Raster algebra to evaluate with
/// * `raster` - Source raster
/// * `band` - Band to read, by position or name
/// * `range` - Bits to extract
///
/// # Returns
/// A single-band raster of field values, or an error from the algebra
pub fn extract_bits<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    band: BandRef<'_>,
    range: BitRange,
) -> QaResult<A::Raster> {
    let selected = algebra.select_band(raster, band)?;
    let masked = algebra.bitwise_and(&selected, range.mask())?;
    algebra.right_shift(&masked, range.start())
}
