//! Raster model and image algebra
//!
//! This module provides the `RasterAlgebra` capability the QA decoder is
//! written against, and an in-memory implementation of it.

pub mod algebra;
pub mod band;
pub mod memory;

pub use algebra::{BandRef, RasterAlgebra};
pub use band::{Band, BandData};
pub use memory::{MemoryAlgebra, MemoryRaster};
