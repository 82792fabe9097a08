use log::info;

use crate::io::{ArrayData, BandReader, OutputFormat};
use crate::qa::bits::{extract_bits, BitRange};
use crate::qa::errors::{QaError, QaResult};
use crate::qa::masking::{add_mask, apply_mask, MASK_BAND};
use crate::qa::product::ProductKind;
use crate::qa::rules::{Inspection, RuleSet};
use crate::raster::{BandRef, MemoryAlgebra, MemoryRaster};

/// Outcome of a mask run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSummary {
    pub product: ProductKind,
    /// Pixels passing every rule
    pub good: usize,
    /// Pixels with a valid mask value
    pub total: usize,
}

/// Main interface to the modisqa library
///
/// Loads QA bands from files, decodes product masks with the in-memory
/// raster algebra and writes the results.
#[derive(Debug, Clone, Default)]
pub struct ModisQa {
    reader: BandReader,
    algebra: MemoryAlgebra,
}

impl ModisQa {
    /// Create a new instance with default band reading options
    pub fn new() -> Self {
        ModisQa::default()
    }

    /// Use a configured band reader (raw byte order, grid size)
    pub fn with_reader(mut self, reader: BandReader) -> Self {
        self.reader = reader;
        self
    }

    /// Load band files into one raster
    ///
    /// # Arguments
    /// * `bands` - (band name, file path) pairs
    pub fn load_raster(&self, bands: &[(String, String)]) -> QaResult<MemoryRaster> {
        self.reader.read_raster(bands)
    }

    /// Attach the product's quality mask to a raster as `QA_mask`
    pub fn mask(&self, raster: &MemoryRaster, product: ProductKind, night: Option<bool>) -> QaResult<MemoryRaster> {
        add_mask(&self.algebra, raster, product, night)
    }

    /// Count good and valid pixels of an attached mask
    pub fn summarize(&self, raster: &MemoryRaster, product: ProductKind) -> QaResult<MaskSummary> {
        let band = raster.band(BandRef::Name(MASK_BAND))?;
        let values = band.as_uint().ok_or_else(|| QaError::BandType {
            band: MASK_BAND.to_string(),
            expected: "unsigned integer",
        })?;
        let good = values.iter()
            .enumerate()
            .filter(|(i, v)| band.is_valid(*i) && **v == 1)
            .count();

        Ok(MaskSummary {
            product,
            good,
            total: band.valid_count(),
        })
    }

    /// Decode a product mask from band files and write it
    ///
    /// # Arguments
    /// * `bands` - (band name, file path) pairs
    /// * `product` - Product to decode
    /// * `night` - Day/night flag for land surface temperature
    /// * `output_path` - Where to write the result
    /// * `format` - Output format
    /// * `apply_to` - If set, write this band with the mask applied
    ///   instead of the mask itself
    ///
    /// # Returns
    /// Pixel counts of the decoded mask
    pub fn mask_to_file(&self,
                        bands: &[(String, String)],
                        product: ProductKind,
                        night: Option<bool>,
                        output_path: &str,
                        format: OutputFormat,
                        apply_to: Option<&str>) -> QaResult<MaskSummary> {
        // Validate product and night flag before reading any file
        RuleSet::for_product(product, night)?;

        let raster = self.load_raster(bands)?;
        let with_mask = self.mask(&raster, product, night)?;
        let summary = self.summarize(&with_mask, product)?;
        info!("{} mask: {} of {} pixels good", product, summary.good, summary.total);

        let array = match apply_to {
            Some(band) => {
                let masked = apply_mask(&self.algebra, &with_mask)?;
                ArrayData::from_raster(&masked, BandRef::Name(band))?
            }
            None => ArrayData::from_raster(&with_mask, BandRef::Name(MASK_BAND))?,
        };
        array.save_to_file(output_path, format)?;

        Ok(summary)
    }

    /// Extract a bit field from a band file and write it
    pub fn extract_bits_to_file(&self,
                                band: &(String, String),
                                range: BitRange,
                                output_path: &str,
                                format: OutputFormat) -> QaResult<()> {
        let raster = self.load_raster(std::slice::from_ref(band))?;
        let field = extract_bits(&self.algebra, &raster, BandRef::Index(0), range)?;
        info!("Extracted bits {} of band '{}'", range, band.0);

        ArrayData::from_raster(&field, BandRef::Index(0))?.save_to_file(output_path, format)
    }

    /// Decode scalar QA values field by field
    ///
    /// # Arguments
    /// * `product` - Product whose rules apply
    /// * `night` - Day/night flag for land surface temperature
    /// * `values` - One value per QA band, in the order of
    ///   `RuleSet::bands()`
    pub fn inspect(&self, product: ProductKind, night: Option<bool>, values: &[u32]) -> QaResult<Inspection> {
        let rule_set = RuleSet::for_product(product, night)?;
        let bands = rule_set.bands();
        if values.len() != bands.len() {
            return Err(QaError::invalid_argument(
                "value",
                format!("{} needs {} QA value(s) for bands {}, got {}",
                        product, bands.len(), bands.join(", "), values.len()),
            ));
        }

        let by_band = bands.iter()
            .zip(values)
            .map(|(band, value)| (band.to_string(), *value))
            .collect();
        rule_set.inspect(&by_band)
    }
}
