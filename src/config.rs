//! TOML configuration for mask runs
//!
//! A configuration file supplies defaults for the command-line driver so
//! recurring runs over the same product do not repeat every flag:
//!
//! ```toml
//! product = "MOD11A2"
//! night = false
//! format = "png"
//! byte_order = "little"
//! size = "1200x1200"
//! log_file = "modisqa.log"
//! log_level = "info"
//! ```

use std::fs;

use log::LevelFilter;

use crate::io::byte_order::ByteOrder;
use crate::io::mask_writer::OutputFormat;
use crate::qa::errors::{QaError, QaResult};
use crate::qa::product::ProductKind;
use crate::utils::parse_utils;

/// Defaults loaded from a configuration file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskConfig {
    pub product: Option<ProductKind>,
    pub night: Option<bool>,
    pub format: Option<OutputFormat>,
    pub byte_order: Option<ByteOrder>,
    /// Grid of raw binary bands as (width, height)
    pub size: Option<(u32, u32)>,
    pub log_file: Option<String>,
    pub log_level: Option<LevelFilter>,
}

impl MaskConfig {
    /// Parse a configuration from a TOML string
    pub fn from_str(content: &str) -> QaResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(QaError::ParseError(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = MaskConfig::default();

        if let Some(product) = Self::get_str(&toml_value, "product")? {
            config.product = Some(product.parse()?);
        }

        config.night = match toml_value.get("night") {
            None => None,
            Some(toml::Value::Boolean(b)) => Some(*b),
            Some(toml::Value::String(s)) => Some(parse_utils::parse_night_flag(s)?),
            Some(other) => {
                return Err(QaError::invalid_argument(
                    "night",
                    format!("expected a boolean, found {}", other.type_str()),
                ))
            }
        };

        if let Some(format) = Self::get_str(&toml_value, "format")? {
            config.format = Some(format.parse()?);
        }
        if let Some(order) = Self::get_str(&toml_value, "byte_order")? {
            config.byte_order = Some(order.parse()?);
        }
        if let Some(size) = Self::get_str(&toml_value, "size")? {
            config.size = Some(parse_utils::parse_grid_size(size)?);
        }

        config.log_file = Self::get_str(&toml_value, "log_file")?.map(str::to_string);

        if let Some(level) = Self::get_str(&toml_value, "log_level")? {
            config.log_level = Some(level.parse::<LevelFilter>().map_err(|_| {
                QaError::invalid_argument("log_level", format!("unknown log level '{}'", level))
            })?);
        }

        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &str) -> QaResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => return Err(QaError::IoError(e)),
        };

        Self::from_str(&contents)
    }

    /// Helper to read an optional string key
    fn get_str<'v>(toml_value: &'v toml::Value, key: &str) -> QaResult<Option<&'v str>> {
        match toml_value.get(key) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| {
                QaError::invalid_argument(key, format!("expected a string, found {}", value.type_str()))
            }),
        }
    }
}
