//! Byte order handling for raw QA band files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when reading and writing
//! raw binary samples.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Read, Result, Write};
use std::str::FromStr;

use crate::qa::errors::{QaError, QaResult};

/// Represents the byte order of a raw band file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Little-endian byte order (HDF-EOS exports on x86)
    #[default]
    LittleEndian,
    /// Big-endian byte order
    BigEndian,
}

impl ByteOrder {
    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little",
            ByteOrder::BigEndian => "big",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ByteOrder {
    type Err = QaError;

    fn from_str(s: &str) -> QaResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "little" | "le" | "ii" => Ok(ByteOrder::LittleEndian),
            "big" | "be" | "mm" => Ok(ByteOrder::BigEndian),
            other => Err(QaError::invalid_argument(
                "byte_order",
                format!("'{}' is not one of little, big", other),
            )),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u8 value
    fn read_u8(&self, reader: &mut dyn Read) -> Result<u8> {
        reader.read_u8()
    }

    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32>;

    /// Write a u32 value
    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<LittleEndian>(value)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, reader: &mut dyn Read) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn Read) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn write_u32(&self, writer: &mut dyn Write, value: u32) -> Result<()> {
        writer.write_u32::<BigEndian>(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_byte_order() {
        assert_eq!("LE".parse::<ByteOrder>().unwrap(), ByteOrder::LittleEndian);
        assert_eq!("big".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert!("middle".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn test_handlers_read_expected_order() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let le = ByteOrder::LittleEndian.create_handler();
        let be = ByteOrder::BigEndian.create_handler();
        assert_eq!(le.read_u32(&mut Cursor::new(bytes)).unwrap(), 0x0403_0201);
        assert_eq!(be.read_u32(&mut Cursor::new(bytes)).unwrap(), 0x0102_0304);
        assert_eq!(be.read_u16(&mut Cursor::new(bytes)).unwrap(), 0x0102);
    }

    #[test]
    fn test_write_then_read() {
        let handler = ByteOrder::BigEndian.create_handler();
        let mut buffer = Vec::new();
        handler.write_u32(&mut buffer, 0xDEAD_BEEF).unwrap();
        assert_eq!(buffer, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
