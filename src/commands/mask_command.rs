//! Quality mask command
//!
//! This module implements the command for decoding a product's quality
//! mask from QA band files and writing it, or writing a data band with
//! the mask applied.

use clap::ArgMatches;
use log::{debug, info};

use crate::api::ModisQa;
use crate::commands::args;
use crate::commands::command_traits::Command;
use crate::config::MaskConfig;
use crate::io::OutputFormat;
use crate::qa::errors::QaResult;
use crate::qa::product::ProductKind;
use crate::utils::logger::Logger;

/// Command for decoding and writing a quality mask
pub struct MaskCommand<'a> {
    /// Band name and file path pairs
    bands: Vec<(String, String)>,
    /// Product to decode
    product: ProductKind,
    /// Day/night flag for land surface temperature
    night: Option<bool>,
    /// Path to the output file
    output_file: String,
    /// Output format
    format: OutputFormat,
    /// Band to write with the mask applied, instead of the mask
    apply_to: Option<String>,
    /// Library entry point with the configured band reader
    modis: ModisQa,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> MaskCommand<'a> {
    /// Create a new mask command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Defaults from the configuration file
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new MaskCommand instance or an error
    pub fn new(args: &ArgMatches, config: &MaskConfig, logger: &'a Logger) -> QaResult<Self> {
        let bands = args::band_specs(args)?;
        let product = args::product(args, config)?;
        let night = args::night(args, config)?;
        let output_file = args::output(args)?;
        let format = args::output_format(args, config, &output_file)?;
        let apply_to = args.get_one::<String>("apply").cloned();
        let modis = ModisQa::new().with_reader(args::band_reader(args, config)?);

        info!("Product: {}", product);
        debug!("Bands: {:?}", bands);
        debug!("Night flag: {:?}", night);

        Ok(MaskCommand {
            bands,
            product,
            night,
            output_file,
            format,
            apply_to,
            modis,
            logger,
        })
    }
}

impl<'a> Command for MaskCommand<'a> {
    fn execute(&self) -> QaResult<()> {
        info!("Decoding {} quality mask to {}", self.product, self.output_file);

        let summary = self.modis.mask_to_file(
            &self.bands,
            self.product,
            self.night,
            &self.output_file,
            self.format,
            self.apply_to.as_deref(),
        )?;

        self.logger.log_mask_summary(self.product.name(), summary.good, summary.total)?;
        info!("Mask written: {} of {} pixels good", summary.good, summary.total);
        Ok(())
    }
}
