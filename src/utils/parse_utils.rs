//! Parsing helpers for command-line and configuration values

use lazy_static::lazy_static;
use regex::Regex;

use crate::qa::errors::{QaError, QaResult};

lazy_static! {
    static ref BIT_RANGE: Regex = Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?$").unwrap();
    static ref BAND_SPEC: Regex = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.+?)\s*$").unwrap();
    static ref GRID_SIZE: Regex = Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").unwrap();
}

/// Parse a bit range written as `"S-E"` or `"S"`
///
/// Only the syntax is checked here; ordering and width are validated by
/// `BitRange::new`.
pub fn parse_bit_range(text: &str) -> QaResult<(u32, u32)> {
    let caps = BIT_RANGE.captures(text).ok_or_else(|| {
        QaError::invalid_argument("bits", format!("'{}' is not a bit range like 2-5", text))
    })?;

    let start = parse_number("bits", &caps[1])?;
    let end = match caps.get(2) {
        Some(m) => parse_number("bits", m.as_str())?,
        None => start,
    };
    Ok((start, end))
}

/// Parse a `NAME=PATH` band specification
pub fn parse_band_spec(text: &str) -> QaResult<(String, String)> {
    let caps = BAND_SPEC.captures(text).ok_or_else(|| {
        QaError::invalid_argument("band", format!("'{}' is not of the form NAME=PATH", text))
    })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Parse a `WxH` grid size
pub fn parse_grid_size(text: &str) -> QaResult<(u32, u32)> {
    let caps = GRID_SIZE.captures(text).ok_or_else(|| {
        QaError::invalid_argument("size", format!("'{}' is not a size like 2400x2400", text))
    })?;
    Ok((parse_number("size", &caps[1])?, parse_number("size", &caps[2])?))
}

/// Parse a day/night flag
///
/// Accepts `true`/`false`, `night`/`day`, `yes`/`no` and `1`/`0`.
pub fn parse_night_flag(text: &str) -> QaResult<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "night" | "yes" | "1" => Ok(true),
        "false" | "day" | "no" | "0" => Ok(false),
        other => Err(QaError::invalid_argument(
            "night",
            format!("'{}' is neither true nor false", other),
        )),
    }
}

/// Parse a comma separated list of unsigned integers
///
/// Values may be decimal, `0x` hexadecimal or `0b` binary.
pub fn parse_value_list(text: &str) -> QaResult<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_qa_value)
        .collect()
}

/// Parse one QA value in decimal, hexadecimal or binary notation
pub fn parse_qa_value(text: &str) -> QaResult<u32> {
    let cleaned = text.trim().replace('_', "");
    let parsed = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        cleaned.parse::<u32>()
    };
    parsed.map_err(|_| QaError::invalid_argument("value", format!("'{}' is not a 32-bit QA value", text)))
}

fn parse_number(parameter: &str, digits: &str) -> QaResult<u32> {
    digits.parse::<u32>().map_err(|_| {
        QaError::invalid_argument(parameter, format!("'{}' is out of range", digits))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bit_range() {
        assert_eq!(parse_bit_range("2-5").unwrap(), (2, 5));
        assert_eq!(parse_bit_range(" 15 ").unwrap(), (15, 15));
        assert_eq!(parse_bit_range("26 - 29").unwrap(), (26, 29));
        assert!(parse_bit_range("-1-3").is_err());
        assert!(parse_bit_range("a-b").is_err());
    }

    #[test]
    fn test_parse_band_spec() {
        let (name, path) = parse_band_spec("StateQA=data/state qa.csv").unwrap();
        assert_eq!(name, "StateQA");
        assert_eq!(path, "data/state qa.csv");
        assert!(parse_band_spec("=missing.csv").is_err());
        assert!(parse_band_spec("QA").is_err());
    }

    #[test]
    fn test_parse_grid_size() {
        assert_eq!(parse_grid_size("2400x1200").unwrap(), (2400, 1200));
        assert!(parse_grid_size("2400").is_err());
    }

    #[test]
    fn test_parse_night_flag() {
        assert!(parse_night_flag("True").unwrap());
        assert!(!parse_night_flag("day").unwrap());
        let err = parse_night_flag("maybe").unwrap_err();
        assert_eq!(err.parameter(), Some("night"));
    }

    #[test]
    fn test_parse_value_list() {
        assert_eq!(parse_value_list("0, 0x4, 0b101,1_000").unwrap(), vec![0, 4, 5, 1000]);
        assert!(parse_value_list("12,oops").is_err());
    }
}
