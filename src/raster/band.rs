//! Band storage for in-memory rasters

/// Sample storage of a band
#[derive(Debug, Clone, PartialEq)]
pub enum BandData {
    /// Unsigned integer samples (QA encodings, boolean masks)
    UInt(Vec<u32>),
    /// Floating point samples (reflectance, temperature, ...)
    Float(Vec<f32>),
}

impl BandData {
    /// Number of samples
    pub fn len(&self) -> usize {
        match self {
            BandData::UInt(values) => values.len(),
            BandData::Float(values) => values.len(),
        }
    }

    /// Whether the band holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the sample type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            BandData::UInt(_) => "unsigned integer",
            BandData::Float(_) => "floating point",
        }
    }

    /// Sample at `index` widened to f64
    pub fn value_f64(&self, index: usize) -> Option<f64> {
        match self {
            BandData::UInt(values) => values.get(index).map(|v| *v as f64),
            BandData::Float(values) => values.get(index).map(|v| *v as f64),
        }
    }
}

/// A named band with an optional per-pixel validity mask
///
/// `valid` is `None` when every pixel is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Band name
    pub name: String,
    /// Samples in row-major order
    pub data: BandData,
    /// Per-pixel validity, same length as `data`
    pub valid: Option<Vec<bool>>,
}

impl Band {
    /// Create an unsigned integer band
    pub fn uint(name: &str, values: Vec<u32>) -> Self {
        Band {
            name: name.to_string(),
            data: BandData::UInt(values),
            valid: None,
        }
    }

    /// Create a floating point band
    pub fn float(name: &str, values: Vec<f32>) -> Self {
        Band {
            name: name.to_string(),
            data: BandData::Float(values),
            valid: None,
        }
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the band holds no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Integer samples, if this is an integer band
    pub fn as_uint(&self) -> Option<&[u32]> {
        match &self.data {
            BandData::UInt(values) => Some(values),
            BandData::Float(_) => None,
        }
    }

    /// Whether the pixel at `index` is valid
    pub fn is_valid(&self, index: usize) -> bool {
        match &self.valid {
            Some(valid) => valid.get(index).copied().unwrap_or(false),
            None => index < self.len(),
        }
    }

    /// Number of valid pixels
    pub fn valid_count(&self) -> usize {
        match &self.valid {
            Some(valid) => valid.iter().filter(|v| **v).count(),
            None => self.len(),
        }
    }
}
