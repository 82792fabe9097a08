//! Tests for quality mask decoding

use std::collections::HashMap;

use crate::qa::decoder::{conjoin_rules, decode_mask, decode_mask_by_name, QualityMaskDecoder};
use crate::qa::errors::{QaError, QaErrorKind};
use crate::qa::product::ProductKind;
use crate::qa::rules::RuleSet;
use crate::raster::{MemoryAlgebra, MemoryRaster};

use super::test_utils::{pixel, pseudo_random_values, row, single, values};

fn decode(raster: &MemoryRaster, product: ProductKind, night: Option<bool>) -> u32 {
    single(&decode_mask(&MemoryAlgebra, raster, product, night).unwrap())
}

#[test]
fn test_surface_reflectance_clear_pixel_is_good() {
    let raster = pixel(&[("QA", 0), ("StateQA", 0)]);
    assert_eq!(decode(&raster, ProductKind::SurfaceReflectance, None), 1);
}

#[test]
fn test_surface_reflectance_cloud_shadow_is_bad() {
    let raster = pixel(&[("QA", 0), ("StateQA", 0b100)]);
    assert_eq!(decode(&raster, ProductKind::SurfaceReflectance, None), 0);
}

#[test]
fn test_surface_reflectance_each_field_matters() {
    for (band, value) in [
        ("StateQA", 0b01),
        ("StateQA", 0b10),
        ("QA", 1 << 2),
        ("QA", 1 << 6),
        ("QA", 1 << 26),
    ] {
        let other = if band == "QA" { "StateQA" } else { "QA" };
        let raster = pixel(&[(band, value), (other, 0)]);
        assert_eq!(decode(&raster, ProductKind::SurfaceReflectance, None), 0, "{} = {:#b}", band, value);
    }

    // Bits outside every rule do not affect the mask
    let raster = pixel(&[("QA", 0b11 | 1 << 10 | 1 << 31), ("StateQA", 0b1111_1000)]);
    assert_eq!(decode(&raster, ProductKind::SurfaceReflectance, None), 1);
}

#[test]
fn test_evi_low_quality_is_bad_regardless_of_other_fields() {
    for summary in [0, 1] {
        for usefulness in [0, 3, 5] {
            let detailed = 2 | usefulness << 2;
            let raster = pixel(&[("DetailedQA", detailed), ("SummaryQA", summary)]);
            assert_eq!(decode(&raster, ProductKind::VegetationIndex, None), 0);
        }
    }
}

#[test]
fn test_evi_thresholds() {
    let good = pixel(&[("DetailedQA", 1 | 5 << 2), ("SummaryQA", 1)]);
    assert_eq!(decode(&good, ProductKind::VegetationIndex, None), 1);

    let useless = pixel(&[("DetailedQA", 6 << 2), ("SummaryQA", 0)]);
    assert_eq!(decode(&useless, ProductKind::VegetationIndex, None), 0);

    let shadow = pixel(&[("DetailedQA", 1 << 15), ("SummaryQA", 0)]);
    assert_eq!(decode(&shadow, ProductKind::VegetationIndex, None), 0);

    let unreliable = pixel(&[("DetailedQA", 0), ("SummaryQA", 2)]);
    assert_eq!(decode(&unreliable, ProductKind::VegetationIndex, None), 0);
}

#[test]
fn test_temperature_selects_qc_band() {
    let raster = pixel(&[("QC_Day", 0), ("QC_Night", 0b01)]);
    assert_eq!(decode(&raster, ProductKind::LandSurfaceTemperature, Some(false)), 1);
    assert_eq!(decode(&raster, ProductKind::LandSurfaceTemperature, Some(true)), 0);

    let day_only = pixel(&[("QC_Day", 0)]);
    let err = decode_mask(&MemoryAlgebra, &day_only, ProductKind::LandSurfaceTemperature, Some(true)).unwrap_err();
    assert!(matches!(err, QaError::BandNotFound(band) if band == "QC_Night"));
}

#[test]
fn test_temperature_error_threshold() {
    let within = pixel(&[("QC_Day", 1 << 6)]);
    let beyond = pixel(&[("QC_Day", 2 << 6)]);
    assert_eq!(decode(&within, ProductKind::LandSurfaceTemperature, Some(false)), 1);
    assert_eq!(decode(&beyond, ProductKind::LandSurfaceTemperature, Some(false)), 0);
}

#[test]
fn test_temperature_requires_night_flag() {
    let raster = pixel(&[("QC_Day", 0), ("QC_Night", 0)]);
    let err = decode_mask(&MemoryAlgebra, &raster, ProductKind::LandSurfaceTemperature, None).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::InvalidArgument);
    assert_eq!(err.parameter(), Some("night"));
}

#[test]
fn test_unsupported_product_name() {
    let raster = pixel(&[("QA", 0)]);
    let err = decode_mask_by_name(&MemoryAlgebra, &raster, "not_a_real_product", None).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::UnsupportedProduct);
    assert_ne!(err.kind(), QaErrorKind::InvalidArgument);
}

#[test]
fn test_decode_by_alias() {
    let raster = pixel(&[("ET_QC", 0b0010_0000)]);
    let mask = decode_mask_by_name(&MemoryAlgebra, &raster, "MOD16A2", None).unwrap();
    assert_eq!(single(&mask), 1);
}

#[test]
fn test_modland_products() {
    for (product, band) in [(ProductKind::Evapotranspiration, "ET_QC"), (ProductKind::Fpar, "FparLai_QC")] {
        assert_eq!(decode(&pixel(&[(band, 0)]), product, None), 1);
        assert_eq!(decode(&pixel(&[(band, 1 << 5)]), product, None), 1);
        assert_eq!(decode(&pixel(&[(band, 0b100)]), product, None), 1);
        assert_eq!(decode(&pixel(&[(band, 2 << 5)]), product, None), 0);
        assert_eq!(decode(&pixel(&[(band, 1)]), product, None), 0);
        assert_eq!(decode(&pixel(&[(band, 0b10)]), product, None), 0);
        assert_eq!(decode(&pixel(&[(band, 1 << 3)]), product, None), 0);
    }
}

fn random_scene(seed: u64) -> MemoryRaster {
    let bands = ["QA", "StateQA", "DetailedQA", "SummaryQA", "QC_Day", "QC_Night", "ET_QC", "FparLai_QC"];
    // Sparse bit patterns so that a fair share of pixels pass every rule
    let data: Vec<(&str, Vec<u32>)> = bands.iter()
        .enumerate()
        .map(|(i, name)| {
            let a = pseudo_random_values(64, seed + i as u64);
            let b = pseudo_random_values(64, seed + 100 + i as u64);
            (*name, a.iter().zip(&b).map(|(x, y)| x & y & (y >> 3)).collect())
        })
        .collect();
    row(&data)
}

fn product_cases() -> Vec<(ProductKind, Option<bool>)> {
    vec![
        (ProductKind::SurfaceReflectance, None),
        (ProductKind::VegetationIndex, None),
        (ProductKind::LandSurfaceTemperature, Some(true)),
        (ProductKind::LandSurfaceTemperature, Some(false)),
        (ProductKind::Evapotranspiration, None),
        (ProductKind::Fpar, None),
    ]
}

#[test]
fn test_rule_order_does_not_change_mask() {
    let scene = random_scene(42);
    for (product, night) in product_cases() {
        let rule_set = RuleSet::for_product(product, night).unwrap();
        let expected = values(&decode_mask(&MemoryAlgebra, &scene, product, night).unwrap());

        let mut reversed = rule_set.rules.to_vec();
        reversed.reverse();
        assert_eq!(values(&conjoin_rules(&MemoryAlgebra, &scene, &reversed).unwrap()), expected);

        for shift in 1..rule_set.rules.len() {
            let mut rotated = rule_set.rules.to_vec();
            rotated.rotate_left(shift);
            assert_eq!(values(&conjoin_rules(&MemoryAlgebra, &scene, &rotated).unwrap()), expected);
        }
    }
}

#[test]
fn test_raster_mask_matches_scalar_inspection() {
    let scene = random_scene(9);
    for (product, night) in product_cases() {
        let mask = values(&decode_mask(&MemoryAlgebra, &scene, product, night).unwrap());
        let rule_set = RuleSet::for_product(product, night).unwrap();

        for (x, good) in mask.iter().enumerate() {
            let pixel_values: HashMap<String, u32> = scene.bands()
                .iter()
                .map(|b| (b.name.clone(), b.as_uint().unwrap()[x]))
                .collect();
            let inspection = rule_set.inspect(&pixel_values).unwrap();
            assert_eq!(*good == 1, inspection.is_good(), "{} pixel {}", product, x);
        }
    }
}

#[test]
fn test_decoder_struct_matches_function() {
    let scene = random_scene(5);
    let decoder = QualityMaskDecoder::new(MemoryAlgebra, ProductKind::VegetationIndex, None).unwrap();
    assert_eq!(decoder.product(), ProductKind::VegetationIndex);
    assert_eq!(decoder.rule_set().bands(), vec!["DetailedQA", "SummaryQA"]);
    assert_eq!(
        decoder.decode(&scene).unwrap(),
        decode_mask(&MemoryAlgebra, &scene, ProductKind::VegetationIndex, None).unwrap()
    );

    assert!(QualityMaskDecoder::new(MemoryAlgebra, ProductKind::LandSurfaceTemperature, None).is_err());
}

#[test]
fn test_empty_rule_list_is_rejected() {
    let scene = random_scene(1);
    let err = conjoin_rules(&MemoryAlgebra, &scene, &[]).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::InvalidArgument);
}
