//! Tests for the per-product rule tables

use std::collections::HashMap;

use crate::qa::bits::BitRange;
use crate::qa::errors::QaErrorKind;
use crate::qa::product::ProductKind;
use crate::qa::rules::{Predicate, RuleSet};

fn fields(product: ProductKind, night: Option<bool>) -> Vec<(&'static str, &'static str, BitRange, Predicate)> {
    RuleSet::for_product(product, night)
        .unwrap()
        .rules
        .iter()
        .map(|r| (r.band, r.field, r.bits, r.predicate))
        .collect()
}

fn bits(start: u32, end: u32) -> BitRange {
    BitRange::new(start, end).unwrap()
}

#[test]
fn test_surface_reflectance_table() {
    assert_eq!(fields(ProductKind::SurfaceReflectance, None), vec![
        ("StateQA", "Cloud State", bits(0, 1), Predicate::Equals(0)),
        ("StateQA", "Cloud Shadow", bits(2, 2), Predicate::Equals(0)),
        ("QA", "Band 1 QA", bits(2, 5), Predicate::Equals(0)),
        ("QA", "Band 2 QA", bits(6, 9), Predicate::Equals(0)),
        ("QA", "Band 7 QA", bits(26, 29), Predicate::Equals(0)),
    ]);
}

#[test]
fn test_vegetation_index_table() {
    assert_eq!(fields(ProductKind::VegetationIndex, None), vec![
        ("DetailedQA", "VI Quality", bits(0, 1), Predicate::AtMost(1)),
        ("DetailedQA", "VI Usefulness", bits(2, 5), Predicate::AtMost(5)),
        ("DetailedQA", "Possible Shadow", bits(15, 15), Predicate::Equals(0)),
        ("SummaryQA", "Pixel Reliability", bits(0, 1), Predicate::AtMost(1)),
    ]);
}

#[test]
fn test_temperature_band_follows_night_flag() {
    let night = RuleSet::for_product(ProductKind::LandSurfaceTemperature, Some(true)).unwrap();
    let day = RuleSet::for_product(ProductKind::LandSurfaceTemperature, Some(false)).unwrap();
    assert_eq!(night.bands(), vec!["QC_Night"]);
    assert_eq!(day.bands(), vec!["QC_Day"]);

    let expected = vec![
        (bits(0, 1), Predicate::Equals(0)),
        (bits(2, 3), Predicate::Equals(0)),
        (bits(6, 7), Predicate::AtMost(1)),
    ];
    for set in [night, day] {
        let got: Vec<_> = set.rules.iter().map(|r| (r.bits, r.predicate)).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn test_temperature_without_night_flag() {
    let err = RuleSet::for_product(ProductKind::LandSurfaceTemperature, None).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::InvalidArgument);
    assert_eq!(err.parameter(), Some("night"));
}

#[test]
fn test_night_flag_ignored_elsewhere() {
    assert_eq!(
        RuleSet::for_product(ProductKind::Fpar, Some(true)).unwrap(),
        RuleSet::for_product(ProductKind::Fpar, None).unwrap()
    );
}

fn without_band(rules: &[(&'static str, &'static str, BitRange, Predicate)]) -> Vec<(&'static str, BitRange, Predicate)> {
    rules.iter().map(|(_, field, bits, predicate)| (*field, *bits, *predicate)).collect()
}

#[test]
fn test_et_and_fpar_share_layout() {
    let et = fields(ProductKind::Evapotranspiration, None);
    let fpar = fields(ProductKind::Fpar, None);
    let expected = vec![
        ("MODLAND_QC", bits(0, 0), Predicate::Equals(0)),
        ("Sensor", bits(1, 1), Predicate::Equals(0)),
        ("Cloud State", bits(3, 4), Predicate::Equals(0)),
        ("SCF_QC", bits(5, 7), Predicate::AtMost(1)),
    ];
    assert_eq!(without_band(&et), expected);
    assert_eq!(without_band(&fpar), expected);
    assert!(et.iter().all(|r| r.0 == "ET_QC"));
    assert!(fpar.iter().all(|r| r.0 == "FparLai_QC"));
}

#[test]
fn test_inspect_reports_failing_fields() {
    let rules = RuleSet::for_product(ProductKind::SurfaceReflectance, None).unwrap();
    let mut values = HashMap::new();
    values.insert("StateQA".to_string(), 0b100u32);
    values.insert("QA".to_string(), 0u32);

    let inspection = rules.inspect(&values).unwrap();
    assert!(!inspection.is_good());
    let failed: Vec<_> = inspection.failures().map(|f| (f.rule.field, f.decoded)).collect();
    assert_eq!(failed, vec![("Cloud Shadow", 1)]);

    values.insert("StateQA".to_string(), 0);
    assert!(rules.inspect(&values).unwrap().is_good());
}

#[test]
fn test_inspect_needs_every_band() {
    let rules = RuleSet::for_product(ProductKind::VegetationIndex, None).unwrap();
    let mut values = HashMap::new();
    values.insert("DetailedQA".to_string(), 0u32);
    let err = rules.inspect(&values).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::Raster);
}

#[test]
fn test_rule_display() {
    let rules = RuleSet::for_product(ProductKind::LandSurfaceTemperature, Some(false)).unwrap();
    assert_eq!(rules.rules[2].to_string(), "QC_Day[6-7] LST Error <= 1");
}
