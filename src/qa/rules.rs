//! Per-product QA rule tables
//!
//! Each product's quality mask is the conjunction of a fixed, ordered list
//! of field rules. A rule names the QA band, the bit range of one flag and
//! the predicate the decoded flag value must satisfy.

use std::collections::HashMap;
use std::fmt;

use crate::qa::bits::BitRange;
use crate::qa::errors::{QaError, QaResult};
use crate::qa::product::ProductKind;
use crate::raster::RasterAlgebra;

/// Condition a decoded field value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `value == n`
    Equals(u32),
    /// `value <= n`
    AtMost(u32),
}

impl Predicate {
    /// Evaluate against a single decoded value
    pub fn test(&self, value: u32) -> bool {
        match *self {
            Predicate::Equals(n) => value == n,
            Predicate::AtMost(n) => value <= n,
        }
    }

    /// Evaluate against a raster of decoded values
    pub fn apply<A: RasterAlgebra>(&self, algebra: &A, raster: &A::Raster) -> QaResult<A::Raster> {
        match *self {
            Predicate::Equals(n) => algebra.equals(raster, n),
            Predicate::AtMost(n) => algebra.less_than_or_equal(raster, n),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(n) => write!(f, "== {}", n),
            Predicate::AtMost(n) => write!(f, "<= {}", n),
        }
    }
}

/// One QA field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QaFieldRule {
    /// QA band holding the field
    pub band: &'static str,
    /// Field name, as in the product user guide
    pub field: &'static str,
    /// Bits of the field
    pub bits: BitRange,
    /// Condition for a good pixel
    pub predicate: Predicate,
}

impl QaFieldRule {
    const fn new(band: &'static str, field: &'static str, start: u32, end: u32, predicate: Predicate) -> Self {
        QaFieldRule {
            band,
            field,
            bits: BitRange::fixed(start, end),
            predicate,
        }
    }

    /// Decode this field from a QA sample and test it
    pub fn evaluate(&self, value: u32) -> FieldVerdict {
        let decoded = self.bits.extract(value);
        FieldVerdict {
            rule: *self,
            decoded,
            passed: self.predicate.test(decoded),
        }
    }
}

impl fmt::Display for QaFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {} {}", self.band, self.bits, self.field, self.predicate)
    }
}

pub const STATE_QA: &str = "StateQA";
pub const REFLECTANCE_QA: &str = "QA";
pub const DETAILED_QA: &str = "DetailedQA";
pub const SUMMARY_QA: &str = "SummaryQA";
pub const QC_DAY: &str = "QC_Day";
pub const QC_NIGHT: &str = "QC_Night";
pub const ET_QC: &str = "ET_QC";
pub const FPAR_LAI_QC: &str = "FparLai_QC";

static SURFACE_REFLECTANCE_RULES: [QaFieldRule; 5] = [
    QaFieldRule::new(STATE_QA, "Cloud State", 0, 1, Predicate::Equals(0)),
    QaFieldRule::new(STATE_QA, "Cloud Shadow", 2, 2, Predicate::Equals(0)),
    QaFieldRule::new(REFLECTANCE_QA, "Band 1 QA", 2, 5, Predicate::Equals(0)),
    QaFieldRule::new(REFLECTANCE_QA, "Band 2 QA", 6, 9, Predicate::Equals(0)),
    QaFieldRule::new(REFLECTANCE_QA, "Band 7 QA", 26, 29, Predicate::Equals(0)),
];

static VEGETATION_INDEX_RULES: [QaFieldRule; 4] = [
    QaFieldRule::new(DETAILED_QA, "VI Quality", 0, 1, Predicate::AtMost(1)),
    QaFieldRule::new(DETAILED_QA, "VI Usefulness", 2, 5, Predicate::AtMost(5)),
    QaFieldRule::new(DETAILED_QA, "Possible Shadow", 15, 15, Predicate::Equals(0)),
    QaFieldRule::new(SUMMARY_QA, "Pixel Reliability", 0, 1, Predicate::AtMost(1)),
];

// LST error bits 6-7 <= 1 keeps pixels with average error <= 2K
const fn temperature_rules(band: &'static str) -> [QaFieldRule; 3] {
    [
        QaFieldRule::new(band, "QA Flag", 0, 1, Predicate::Equals(0)),
        QaFieldRule::new(band, "Data Quality", 2, 3, Predicate::Equals(0)),
        QaFieldRule::new(band, "LST Error", 6, 7, Predicate::AtMost(1)),
    ]
}

static TEMPERATURE_DAY_RULES: [QaFieldRule; 3] = temperature_rules(QC_DAY);
static TEMPERATURE_NIGHT_RULES: [QaFieldRule; 3] = temperature_rules(QC_NIGHT);

// ET and FPAR/LAI share the MOD15/MOD16 QC layout
const fn modland_rules(band: &'static str) -> [QaFieldRule; 4] {
    [
        QaFieldRule::new(band, "MODLAND_QC", 0, 0, Predicate::Equals(0)),
        QaFieldRule::new(band, "Sensor", 1, 1, Predicate::Equals(0)),
        QaFieldRule::new(band, "Cloud State", 3, 4, Predicate::Equals(0)),
        QaFieldRule::new(band, "SCF_QC", 5, 7, Predicate::AtMost(1)),
    ]
}

static EVAPOTRANSPIRATION_RULES: [QaFieldRule; 4] = modland_rules(ET_QC);
static FPAR_RULES: [QaFieldRule; 4] = modland_rules(FPAR_LAI_QC);

/// The ordered rule list of one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Product the rules belong to
    pub product: ProductKind,
    /// Rules in evaluation order
    pub rules: &'static [QaFieldRule],
}

impl RuleSet {
    /// Rule set for a product
    ///
    /// # Arguments
    /// * `product` - Product to decode
    /// * `night` - Selects `QC_Night` (true) or `QC_Day` (false); required
    ///   for land surface temperature and ignored otherwise
    ///
    /// # Returns
    /// The rule set, or `InvalidArgument` naming `night` when the
    /// temperature product is requested without a day/night flag
    pub fn for_product(product: ProductKind, night: Option<bool>) -> QaResult<Self> {
        let rules: &'static [QaFieldRule] = match product {
            ProductKind::SurfaceReflectance => &SURFACE_REFLECTANCE_RULES,
            ProductKind::VegetationIndex => &VEGETATION_INDEX_RULES,
            ProductKind::LandSurfaceTemperature => match night {
                Some(true) => &TEMPERATURE_NIGHT_RULES,
                Some(false) => &TEMPERATURE_DAY_RULES,
                None => {
                    return Err(QaError::invalid_argument(
                        "night",
                        "land surface temperature needs night=true (QC_Night) or night=false (QC_Day)",
                    ))
                }
            },
            ProductKind::Evapotranspiration => &EVAPOTRANSPIRATION_RULES,
            ProductKind::Fpar => &FPAR_RULES,
        };

        Ok(RuleSet { product, rules })
    }

    /// Distinct QA bands the rules read, in first-use order
    pub fn bands(&self) -> Vec<&'static str> {
        let mut bands: Vec<&'static str> = Vec::new();
        for rule in self.rules {
            if !bands.contains(&rule.band) {
                bands.push(rule.band);
            }
        }
        bands
    }

    /// Evaluate every rule against scalar QA values keyed by band name
    ///
    /// # Returns
    /// Per-field verdicts, or `BandNotFound` if a required band has no value
    pub fn inspect(&self, values: &HashMap<String, u32>) -> QaResult<Inspection> {
        let fields = self.rules.iter()
            .map(|rule| {
                values.get(rule.band)
                    .map(|value| rule.evaluate(*value))
                    .ok_or_else(|| QaError::BandNotFound(rule.band.to_string()))
            })
            .collect::<QaResult<Vec<_>>>()?;

        Ok(Inspection {
            product: self.product,
            fields,
        })
    }
}

/// Outcome of one field rule on a scalar QA value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldVerdict {
    pub rule: QaFieldRule,
    /// Right-aligned field value
    pub decoded: u32,
    pub passed: bool,
}

/// Per-field decode of one pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub product: ProductKind,
    pub fields: Vec<FieldVerdict>,
}

impl Inspection {
    /// Whether every field passed
    pub fn is_good(&self) -> bool {
        self.fields.iter().all(|f| f.passed)
    }

    /// Fields that failed their predicate
    pub fn failures(&self) -> impl Iterator<Item = &FieldVerdict> {
        self.fields.iter().filter(|f| !f.passed)
    }
}
