//! Raster algebra capability
//!
//! This module defines the small set of image-algebra primitives the QA
//! decoder is written against. Any raster engine able to select bands,
//! mask and shift integer samples, compare against constants and combine
//! boolean rasters can drive the decoder by implementing this trait.

use std::fmt;

use crate::qa::errors::QaResult;

/// Reference to a single band, by position or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandRef<'a> {
    /// Zero-based band position
    Index(usize),
    /// Band name
    Name(&'a str),
}

impl<'a> From<&'a str> for BandRef<'a> {
    fn from(name: &'a str) -> Self {
        BandRef::Name(name)
    }
}

impl From<usize> for BandRef<'_> {
    fn from(index: usize) -> Self {
        BandRef::Index(index)
    }
}

impl fmt::Display for BandRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandRef::Index(i) => write!(f, "#{}", i),
            BandRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Image algebra operations used by the QA decoder and mask collaborators
///
/// Every operation is pure: inputs are borrowed and a new raster is
/// returned. Boolean rasters hold `1` for true and `0` for false.
pub trait RasterAlgebra {
    /// Raster type the algebra operates on
    type Raster: Clone;

    /// Select one band as a new single-band raster
    fn select_band(&self, raster: &Self::Raster, band: BandRef<'_>) -> QaResult<Self::Raster>;

    /// Bitwise AND of every sample with a constant
    fn bitwise_and(&self, raster: &Self::Raster, value: u32) -> QaResult<Self::Raster>;

    /// Right shift of every sample by `bits` positions
    fn right_shift(&self, raster: &Self::Raster, bits: u32) -> QaResult<Self::Raster>;

    /// Per-pixel `sample == value`
    fn equals(&self, raster: &Self::Raster, value: u32) -> QaResult<Self::Raster>;

    /// Per-pixel `sample <= value`
    fn less_than_or_equal(&self, raster: &Self::Raster, value: u32) -> QaResult<Self::Raster>;

    /// Per-pixel logical AND of two boolean rasters
    fn and(&self, left: &Self::Raster, right: &Self::Raster) -> QaResult<Self::Raster>;

    /// Rename the band of a single-band raster
    fn rename(&self, raster: &Self::Raster, name: &str) -> QaResult<Self::Raster>;

    /// Add a single-band raster to `raster` under `name`
    fn add_band(&self, raster: &Self::Raster, band: &Self::Raster, name: &str) -> QaResult<Self::Raster>;

    /// Invalidate every pixel of `raster` where `mask` is zero
    fn update_mask(&self, raster: &Self::Raster, mask: &Self::Raster) -> QaResult<Self::Raster>;
}
