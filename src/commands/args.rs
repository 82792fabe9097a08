//! Shared argument resolution
//!
//! Command-line flags take precedence over configuration file values.

use clap::ArgMatches;
use log::debug;

use crate::config::MaskConfig;
use crate::io::{BandReader, OutputFormat};
use crate::qa::errors::{QaError, QaResult};
use crate::qa::product::ProductKind;
use crate::utils::parse_utils;

/// All `--band NAME=PATH` arguments
pub fn band_specs(args: &ArgMatches) -> QaResult<Vec<(String, String)>> {
    let specs = args.get_many::<String>("band")
        .map(|values| values.map(|v| parse_utils::parse_band_spec(v)).collect::<QaResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    if specs.is_empty() {
        return Err(QaError::invalid_argument("band", "at least one --band NAME=PATH is required"));
    }
    Ok(specs)
}

/// Product from `--product` or the configuration
pub fn product(args: &ArgMatches, config: &MaskConfig) -> QaResult<ProductKind> {
    match args.get_one::<String>("product") {
        Some(id) => id.parse(),
        None => config.product.ok_or_else(|| {
            QaError::invalid_argument("product", "no product given (use --product or the config file)")
        }),
    }
}

/// Day/night flag from `--night` or the configuration
pub fn night(args: &ArgMatches, config: &MaskConfig) -> QaResult<Option<bool>> {
    match args.get_one::<String>("night") {
        Some(text) => parse_utils::parse_night_flag(text).map(Some),
        None => Ok(config.night),
    }
}

/// Output path from `--output`
pub fn output(args: &ArgMatches) -> QaResult<String> {
    args.get_one::<String>("output")
        .cloned()
        .ok_or_else(|| QaError::invalid_argument("output", "missing output file path"))
}

/// Output format: `--format`, else the output extension, else the
/// configuration, else CSV
pub fn output_format(args: &ArgMatches, config: &MaskConfig, output: &str) -> QaResult<OutputFormat> {
    let format = match args.get_one::<String>("format") {
        Some(name) => name.parse()?,
        None => OutputFormat::from_path(output)
            .or(config.format)
            .unwrap_or_default(),
    };
    debug!("Output format: {}", format);
    Ok(format)
}

/// Band reader configured from `--byte-order` and `--size`
pub fn band_reader(args: &ArgMatches, config: &MaskConfig) -> QaResult<BandReader> {
    let byte_order = match args.get_one::<String>("byte-order") {
        Some(order) => order.parse()?,
        None => config.byte_order.unwrap_or_default(),
    };
    let size = match args.get_one::<String>("size") {
        Some(size) => Some(parse_utils::parse_grid_size(size)?),
        None => config.size,
    };

    Ok(BandReader::new().with_byte_order(byte_order).with_size(size))
}
