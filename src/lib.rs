pub mod api;
pub mod commands;
pub mod config;
pub mod io;
pub mod qa;
pub mod raster;
pub mod utils;

pub use crate::api::{MaskSummary, ModisQa};

pub use config::MaskConfig;
pub use qa::{
    add_mask, apply_mask, decode_mask, decode_mask_by_name, extract_bits, mask_collection,
    BitRange, ProductKind, QaError, QaErrorKind, QaResult, QualityMaskDecoder, RuleSet, MASK_BAND,
};
pub use raster::{Band, BandData, BandRef, MemoryAlgebra, MemoryRaster, RasterAlgebra};
