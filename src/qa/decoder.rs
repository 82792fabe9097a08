//! Quality mask decoding
//!
//! Turns the QA bands of a MODIS raster into a single boolean mask:
//! every field rule of the product is decoded with `extract_bits`, tested
//! with its predicate, and the results are ANDed together.

use log::debug;

use crate::qa::bits::extract_bits;
use crate::qa::errors::{QaError, QaResult};
use crate::qa::product::ProductKind;
use crate::qa::rules::{QaFieldRule, RuleSet};
use crate::raster::{BandRef, RasterAlgebra};

/// Evaluate one field rule to a boolean raster
pub fn evaluate_rule<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    rule: &QaFieldRule,
) -> QaResult<A::Raster> {
    let field = extract_bits(algebra, raster, BandRef::Name(rule.band), rule.bits)?;
    rule.predicate.apply(algebra, &field)
}

/// Conjunction of a list of field rules
///
/// The result does not depend on the order of `rules`.
pub fn conjoin_rules<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    rules: &[QaFieldRule],
) -> QaResult<A::Raster> {
    let mut mask: Option<A::Raster> = None;

    for rule in rules {
        debug!("Evaluating QA rule {}", rule);
        let condition = evaluate_rule(algebra, raster, rule)?;
        mask = Some(match mask {
            Some(acc) => algebra.and(&acc, &condition)?,
            None => condition,
        });
    }

    mask.ok_or_else(|| QaError::invalid_argument("rules", "at least one QA rule is required"))
}

/// Decode the quality mask of a MODIS raster
///
/// # Arguments
/// * `algebra` - Raster algebra to evaluate with
/// * `raster` - Raster holding the product's QA bands
/// * `product` - Product whose rule set applies
/// * `night` - Day/night QC band selector, required for land surface
///   temperature
///
/// # Returns
/// A single-band raster where `1` marks good quality pixels and `0`
/// pixels failing at least one rule
pub fn decode_mask<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    product: ProductKind,
    night: Option<bool>,
) -> QaResult<A::Raster> {
    let rule_set = RuleSet::for_product(product, night)?;
    debug!("Decoding {} mask from bands {:?}", product, rule_set.bands());
    conjoin_rules(algebra, raster, rule_set.rules)
}

/// Decode the quality mask for a product given by identifier
///
/// Accepts any name `ProductKind::from_str` resolves; unknown identifiers
/// fail with `UnsupportedProduct`.
pub fn decode_mask_by_name<A: RasterAlgebra>(
    algebra: &A,
    raster: &A::Raster,
    product: &str,
    night: Option<bool>,
) -> QaResult<A::Raster> {
    let kind: ProductKind = product.parse()?;
    decode_mask(algebra, raster, kind, night)
}

/// Decoder bound to one algebra, product and day/night setting
#[derive(Debug, Clone)]
pub struct QualityMaskDecoder<A: RasterAlgebra> {
    algebra: A,
    rule_set: RuleSet,
}

impl<A: RasterAlgebra> QualityMaskDecoder<A> {
    /// Create a decoder, validating the product and night flag up front
    pub fn new(algebra: A, product: ProductKind, night: Option<bool>) -> QaResult<Self> {
        Ok(QualityMaskDecoder {
            algebra,
            rule_set: RuleSet::for_product(product, night)?,
        })
    }

    /// Product this decoder was built for
    pub fn product(&self) -> ProductKind {
        self.rule_set.product
    }

    /// Rules the decoder evaluates
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Underlying raster algebra
    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    /// Decode the mask of one raster
    pub fn decode(&self, raster: &A::Raster) -> QaResult<A::Raster> {
        conjoin_rules(&self.algebra, raster, self.rule_set.rules)
    }
}
