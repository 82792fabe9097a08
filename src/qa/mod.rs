//! MODIS QA decoding
//!
//! This module provides bit-field extraction, the per-product QA rule
//! tables, the quality mask decoder and the collaborators that attach
//! and apply masks.

pub mod errors;
pub mod bits;
pub mod product;
pub mod rules;
pub mod decoder;
pub mod masking;
#[cfg(test)]
mod tests;

pub use errors::{QaError, QaErrorKind, QaResult};
pub use bits::{extract_bits, BitRange};
pub use product::{ProductInfo, ProductKind};
pub use rules::{FieldVerdict, Inspection, Predicate, QaFieldRule, RuleSet};
pub use decoder::{decode_mask, decode_mask_by_name, QualityMaskDecoder};
pub use masking::{add_mask, apply_mask, mask_collection, MASK_BAND};
