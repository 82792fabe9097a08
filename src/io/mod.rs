//! I/O utilities for band files
//!
//! This module provides readers for QA band files and writers for
//! single-band results.

pub mod byte_order;
pub mod band_reader;
pub mod mask_writer;

pub use band_reader::{BandReader, GridBand};
pub use byte_order::ByteOrder;
pub use mask_writer::{ArrayData, OutputFormat};
