//! Bit-field extraction command
//!
//! Writes the value of one QA bit field of a band, right-aligned, so a
//! single flag can be examined on its own.

use clap::ArgMatches;
use log::info;

use crate::api::ModisQa;
use crate::commands::args;
use crate::commands::command_traits::Command;
use crate::config::MaskConfig;
use crate::io::OutputFormat;
use crate::qa::bits::BitRange;
use crate::qa::errors::{QaError, QaResult};
use crate::utils::logger::Logger;

/// Command for extracting a bit field from a band file
pub struct BitsCommand<'a> {
    /// Band name and file path
    band: (String, String),
    /// Bits to extract
    range: BitRange,
    /// Path to the output file
    output_file: String,
    /// Output format
    format: OutputFormat,
    modis: ModisQa,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> BitsCommand<'a> {
    /// Create a new bits command
    pub fn new(args: &ArgMatches, config: &MaskConfig, logger: &'a Logger) -> QaResult<Self> {
        let range = args.get_one::<String>("bits")
            .ok_or_else(|| QaError::invalid_argument("bits", "missing bit range"))?
            .parse::<BitRange>()?;

        let mut bands = args::band_specs(args)?;
        if bands.len() != 1 {
            return Err(QaError::invalid_argument(
                "band",
                format!("bit extraction reads exactly one band, {} given", bands.len()),
            ));
        }
        let band = bands.remove(0);

        let output_file = args::output(args)?;
        let format = args::output_format(args, config, &output_file)?;
        let modis = ModisQa::new().with_reader(args::band_reader(args, config)?);

        Ok(BitsCommand {
            band,
            range,
            output_file,
            format,
            modis,
            logger,
        })
    }
}

impl<'a> Command for BitsCommand<'a> {
    fn execute(&self) -> QaResult<()> {
        info!("Extracting bits {} of band '{}' to {}", self.range, self.band.0, self.output_file);
        self.modis.extract_bits_to_file(&self.band, self.range, &self.output_file, self.format)?;
        self.logger.log(&format!("Extracted bits {} of {} to {}", self.range, self.band.1, self.output_file))?;
        Ok(())
    }
}
