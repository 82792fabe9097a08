//! Tests for mask attachment and application

use crate::qa::errors::QaErrorKind;
use crate::qa::masking::{add_mask, apply_mask, mask_collection, MASK_BAND};
use crate::qa::product::ProductKind;
use crate::raster::{Band, BandRef, MemoryAlgebra, MemoryRaster};

fn evi_scene(detailed: Vec<u32>) -> MemoryRaster {
    let width = detailed.len() as u32;
    MemoryRaster::from_bands(width, 1, vec![
        Band::float("EVI", (0..width).map(|i| i as f32 * 0.1).collect()),
        Band::uint("DetailedQA", detailed),
        Band::uint("SummaryQA", vec![0; width as usize]),
    ]).unwrap()
}

#[test]
fn test_add_mask_appends_qa_mask_band() {
    let scene = evi_scene(vec![0, 2, 1, 1 << 15]);
    let with_mask = add_mask(&MemoryAlgebra, &scene, ProductKind::VegetationIndex, None).unwrap();

    assert_eq!(with_mask.band_names(), vec!["EVI", "DetailedQA", "SummaryQA", MASK_BAND]);
    let mask = with_mask.band(BandRef::Name(MASK_BAND)).unwrap();
    assert_eq!(mask.as_uint().unwrap(), &[1, 0, 1, 0]);
}

#[test]
fn test_apply_mask_invalidates_bad_pixels() {
    let scene = evi_scene(vec![0, 2, 1, 1 << 15]);
    let with_mask = add_mask(&MemoryAlgebra, &scene, ProductKind::VegetationIndex, None).unwrap();
    let masked = apply_mask(&MemoryAlgebra, &with_mask).unwrap();

    let evi = masked.band(BandRef::Name("EVI")).unwrap();
    assert_eq!(evi.valid, Some(vec![true, false, true, false]));
    assert_eq!(evi.valid_count(), 2);
}

#[test]
fn test_apply_mask_needs_attached_mask() {
    let scene = evi_scene(vec![0]);
    let err = apply_mask(&MemoryAlgebra, &scene).unwrap_err();
    assert_eq!(err.kind(), QaErrorKind::Raster);
}

#[test]
fn test_mask_collection() {
    let scenes = vec![evi_scene(vec![0, 2]), evi_scene(vec![3, 0])];
    let masked = mask_collection(&MemoryAlgebra, &scenes, ProductKind::VegetationIndex, None).unwrap();

    assert_eq!(masked.len(), 2);
    assert_eq!(masked[0].band(BandRef::Name("EVI")).unwrap().valid, Some(vec![true, false]));
    assert_eq!(masked[1].band(BandRef::Name("EVI")).unwrap().valid, Some(vec![false, true]));
}

#[test]
fn test_mask_collection_validates_night_before_work() {
    let scenes = vec![evi_scene(vec![0])];
    let err = mask_collection(&MemoryAlgebra, &scenes, ProductKind::LandSurfaceTemperature, None).unwrap_err();
    assert_eq!(err.parameter(), Some("night"));
}
