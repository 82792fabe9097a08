//! Mask attachment and application
//!
//! Collaborators around the decoder: attach the decoded mask to a raster
//! as a `QA_mask` band, use that band to invalidate bad pixels, and do
//! both over a whole collection of rasters.

use log::info;

use crate::qa::decoder::QualityMaskDecoder;
use crate::qa::errors::QaResult;
use crate::qa::product::ProductKind;
use crate::raster::{BandRef, RasterAlgebra};
use crate::utils::progress::ProgressTracker;

/// Name of the band holding an attached quality mask
pub const MASK_BAND: &str = "QA_mask";

/// Decode the quality mask and add it to the raster as `QA_mask`
pub fn add_mask<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    product: ProductKind,
    night: Option<bool>,
) -> QaResult<A::Raster> {
    let mask = crate::qa::decoder::decode_mask(algebra, raster, product, night)?;
    let mask = algebra.rename(&mask, MASK_BAND)?;
    algebra.add_band(raster, &mask, MASK_BAND)
}

/// Invalidate pixels whose attached `QA_mask` is zero
///
/// The raster must already carry a `QA_mask` band (see `add_mask`).
pub fn apply_mask<A: RasterAlgebra>(algebra: &A, raster: &A::Raster) -> QaResult<A::Raster> {
    let mask = algebra.select_band(raster, BandRef::Name(MASK_BAND))?;
    algebra.update_mask(raster, &mask)
}

/// Attach and apply the quality mask to every raster of a collection
///
/// Rasters are processed in order; the first failure aborts the run.
pub fn mask_collection<A: RasterAlgebra + Clone>(
    algebra: &A,
    rasters: &[A::Raster],
    product: ProductKind,
    night: Option<bool>,
) -> QaResult<Vec<A::Raster>> {
    let decoder = QualityMaskDecoder::new(algebra.clone(), product, night)?;
    let progress = ProgressTracker::new(rasters.len() as u64, &format!("Masking {} rasters", product));

    let mut masked = Vec::with_capacity(rasters.len());
    for (index, raster) in rasters.iter().enumerate() {
        progress.set_message(&format!("{} raster {}/{}", product, index + 1, rasters.len()));
        let mask = decoder.decode(raster)?;
        let mask = algebra.rename(&mask, MASK_BAND)?;
        let with_mask = algebra.add_band(raster, &mask, MASK_BAND)?;
        masked.push(apply_mask(algebra, &with_mask)?);
        progress.increment(1);
    }
    progress.finish();

    info!("Applied {} quality mask to {} rasters", product, masked.len());
    Ok(masked)
}
