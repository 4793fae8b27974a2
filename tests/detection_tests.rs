// tests/detection_tests.rs
use visage_core::{AppConfig, Detection, DetectionSet};

#[test]
fn test_flip_union_merges_symmetric_hits() {
    // A frontal face found by both the direct and the mirrored pass shows
    // up as two nearly identical boxes once the mirrored one is
    // re-projected; merging must collapse them to one.
    let frame_width = 320;
    let direct = Detection::new(100, 80, 60, 60);
    let from_mirror = Detection::new(158, 80, 62, 60).mirror_x(frame_width);

    let mut union = DetectionSet::new();
    union.push(direct);
    union.push(from_mirror);

    let merged = union.merge_overlapping(AppConfig::default().merge_threshold);
    assert_eq!(merged.len(), 1);
}

#[test]
fn test_flip_union_keeps_distinct_objects() {
    let frame_width = 320;
    let left_face = Detection::new(20, 40, 50, 50);
    // An asymmetric object only the mirrored pass caught, far from the
    // first one.
    let mirrored_only = Detection::new(30, 140, 50, 50).mirror_x(frame_width);

    let mut union = DetectionSet::new();
    union.push(left_face);
    union.push(mirrored_only);

    let merged = union.merge_overlapping(0.3);
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_shrunken_coordinates_map_back() {
    // Detections on a half-resolution work image must come back in
    // full-frame coordinates.
    let set = DetectionSet::from_vec(vec![Detection::new(50, 40, 30, 30)]);
    let full = set.scaled(2.0);
    assert_eq!(full.as_slice()[0], Detection::new(100, 80, 60, 60));
}

#[test]
fn test_nested_boxes_land_in_frame_coordinates() {
    // A sub-feature found inside a primary hit's region of interest is
    // offset by the hit's origin, then scaled with everything else.
    let face = Detection::new(40, 40, 60, 60);
    let eye_in_roi = Detection::new(10, 15, 12, 8);

    let placed = DetectionSet::from_vec(vec![eye_in_roi])
        .offset(face.x, face.y)
        .scaled(1.5);
    assert_eq!(placed.as_slice()[0], Detection::new(75, 83, 18, 12));
}

#[test]
fn test_config_json_round_trip_of_overrides() {
    let mut config = AppConfig::default();
    config.shrink = 1.3;
    config.try_flip = true;
    config.primary.min_object_size = (40, 40);

    let json = serde_json::to_string(&config).unwrap();
    let parsed: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.shrink, 1.3);
    assert!(parsed.try_flip);
    assert_eq!(parsed.primary.min_object_size, (40, 40));
    assert_eq!(parsed.nested.min_object_size, (15, 15));
}
