//! MODIS product identifiers and alias catalog
//!
//! This module defines the supported products and resolves the many names
//! a product goes by (collection ids, granule short names, legacy short
//! ids) through a catalog embedded from `products.toml`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::warn;

use crate::qa::errors::{QaError, QaResult};

lazy_static! {
    // Parse the embedded catalog once
    static ref PRODUCT_CATALOG: ProductCatalog = {
        let content = include_str!("../../products.toml");
        ProductCatalog::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse product catalog, only canonical names are accepted: {}", e);
            ProductCatalog::default()
        })
    };
}

/// Supported MODIS products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    /// Surface reflectance (MOD09A1)
    SurfaceReflectance,
    /// Vegetation indices, EVI/NDVI (MOD13Q1)
    VegetationIndex,
    /// Land surface temperature (MOD11A2)
    LandSurfaceTemperature,
    /// Evapotranspiration (MOD16A2)
    Evapotranspiration,
    /// Fraction of absorbed PAR / leaf area index (MOD15A2H)
    Fpar,
}

impl ProductKind {
    /// Every supported product, in catalog order
    pub const ALL: [ProductKind; 5] = [
        ProductKind::SurfaceReflectance,
        ProductKind::VegetationIndex,
        ProductKind::LandSurfaceTemperature,
        ProductKind::Evapotranspiration,
        ProductKind::Fpar,
    ];

    /// Canonical identifier, also the catalog table key
    pub fn name(&self) -> &'static str {
        match self {
            ProductKind::SurfaceReflectance => "surface_reflectance",
            ProductKind::VegetationIndex => "vegetation_index",
            ProductKind::LandSurfaceTemperature => "land_surface_temperature",
            ProductKind::Evapotranspiration => "evapotranspiration",
            ProductKind::Fpar => "fpar",
        }
    }

    /// Whether decoding this product needs the day/night flag
    pub fn requires_night_flag(&self) -> bool {
        matches!(self, ProductKind::LandSurfaceTemperature)
    }

    /// Catalog entry for this product, if the catalog lists it
    pub fn info(&self) -> Option<&'static ProductInfo> {
        PRODUCT_CATALOG.products.get(self)
    }

    fn from_canonical(name: &str) -> Option<ProductKind> {
        ProductKind::ALL.iter().copied().find(|p| p.name() == name)
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProductKind {
    type Err = QaError;

    /// Resolve a canonical name or catalog alias (case-insensitive)
    fn from_str(s: &str) -> QaResult<Self> {
        let key = s.trim().to_lowercase();
        ProductKind::from_canonical(&key)
            .or_else(|| PRODUCT_CATALOG.aliases.get(&key).copied())
            .ok_or_else(|| QaError::UnsupportedProduct(s.to_string()))
    }
}

/// Catalog entry describing a product
#[derive(Debug, Clone, Default)]
pub struct ProductInfo {
    /// Platform collection identifier
    pub collection: String,
    /// Human-readable description
    pub description: String,
    /// Alternative identifiers
    pub aliases: Vec<String>,
}

/// Product catalog: per-product info and an alias lookup table
#[derive(Debug, Default)]
pub struct ProductCatalog {
    /// Info per product
    pub products: HashMap<ProductKind, ProductInfo>,
    /// Lower-cased alias to product
    pub aliases: HashMap<String, ProductKind>,
}

impl ProductCatalog {
    /// Parse a catalog from a TOML string
    ///
    /// Tables under `[products]` whose key is not a canonical product name
    /// are rejected.
    pub fn from_str(content: &str) -> QaResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(QaError::ParseError(format!("Failed to parse TOML: {}", e))),
        };

        let mut catalog = ProductCatalog::default();

        let table = match toml_value.get("products").and_then(|v| v.as_table()) {
            Some(table) => table,
            None => return Ok(catalog),
        };

        for (key, entry) in table {
            let kind = ProductKind::from_canonical(key)
                .ok_or_else(|| QaError::UnsupportedProduct(key.clone()))?;

            let info = ProductInfo {
                collection: Self::string_field(entry, "collection"),
                description: Self::string_field(entry, "description"),
                aliases: entry.get("aliases")
                    .and_then(|v| v.as_array())
                    .map(|items| items.iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect())
                    .unwrap_or_default(),
            };

            for alias in info.aliases.iter().chain(std::iter::once(&info.collection)) {
                if alias.is_empty() {
                    continue;
                }
                if let Some(previous) = catalog.aliases.insert(alias.to_lowercase(), kind) {
                    if previous != kind {
                        return Err(QaError::ParseError(format!(
                            "Alias '{}' names both {} and {}", alias, previous, kind
                        )));
                    }
                }
            }

            catalog.products.insert(kind, info);
        }

        Ok(catalog)
    }

    fn string_field(entry: &toml::Value, field: &str) -> String {
        entry.get(field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}
