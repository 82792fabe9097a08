use crate::raster::{Band, BandRef, MemoryRaster};

/// Deterministic pseudo-random QA values (64-bit LCG, upper bits)
pub fn pseudo_random_values(count: usize, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 32) as u32
        })
        .collect()
}

/// A 1-pixel raster with the given integer bands
pub fn pixel(bands: &[(&str, u32)]) -> MemoryRaster {
    let bands = bands.iter().map(|(name, value)| Band::uint(name, vec![*value])).collect();
    MemoryRaster::from_bands(1, 1, bands).unwrap()
}

/// A single-row raster with one integer band per (name, values) pair
pub fn row(bands: &[(&str, Vec<u32>)]) -> MemoryRaster {
    let width = bands[0].1.len() as u32;
    let bands = bands.iter().map(|(name, values)| Band::uint(name, values.clone())).collect();
    MemoryRaster::from_bands(width, 1, bands).unwrap()
}

/// Integer samples of the first band
pub fn values(raster: &MemoryRaster) -> Vec<u32> {
    raster.band(BandRef::Index(0)).unwrap().as_uint().unwrap().to_vec()
}

/// Mask value of a 1-pixel raster
pub fn single(raster: &MemoryRaster) -> u32 {
    raster.get(BandRef::Index(0), 0, 0).unwrap()
}
