use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

use super::*;

fn random_surface(height: usize, width: usize, seed: u64) -> BackgroundSurface {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..height * width)
        .map(|_| rng.random_range(-1.0e6..1.0e6))
        .collect();
    BackgroundSurface::from_vec(height, width, values)
}

fn assert_bit_identical(a: &BackgroundSurface, b: &BackgroundSurface) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.values().iter().zip(b.values()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn test_round_trip_bit_exact() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());

    for (i, &(h, w)) in [(1, 1), (3, 7), (64, 48)].iter().enumerate() {
        let surface = random_surface(h, w, 42 + i as u64);
        let name = format!("sky_{i}");
        store.save(&surface, &name).unwrap();
        assert!(store.contains(&name));

        let loaded = store.load(&name).unwrap();
        assert_bit_identical(&surface, &loaded);
    }
}

#[test]
fn test_round_trip_special_values() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    let surface = BackgroundSurface::from_vec(
        2,
        3,
        vec![0.0, -0.0, f64::MIN_POSITIVE, f64::MAX, f64::MIN, 1e-300],
    );

    store.save(&surface, "edge").unwrap();
    assert_bit_identical(&surface, &store.load("edge").unwrap());
}

#[test]
fn test_artifact_layout() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    let surface = random_surface(4, 5, 7);

    store.save(&surface, "skyBack").unwrap();

    let shape = fs::read_to_string(dir.path().join("skyBack.shape")).unwrap();
    assert_eq!(shape, "(4, 5)");

    let bytes = fs::read(dir.path().join("skyBack.bin")).unwrap();
    assert_eq!(bytes.len(), 4 * 5 * 8);
    let first = f64::from_ne_bytes(bytes[..8].try_into().unwrap());
    assert_eq!(first.to_bits(), surface.values()[0].to_bits());
}

#[test]
fn test_save_overwrites() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());

    store.save(&random_surface(10, 10, 1), "sky").unwrap();
    let smaller = random_surface(2, 3, 2);
    store.save(&smaller, "sky").unwrap();

    assert_bit_identical(&smaller, &store.load("sky").unwrap());
}

#[test]
fn test_failed_save_keeps_previous_model() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    let previous = random_surface(3, 3, 11);
    store.save(&previous, "sky").unwrap();

    // A directory where the staged shape file goes makes the second write fail.
    fs::create_dir(dir.path().join("sky.shape.tmp")).unwrap();
    assert!(store.save(&random_surface(3, 3, 12), "sky").is_err());

    assert_bit_identical(&previous, &store.load("sky").unwrap());
    assert!(!dir.path().join("sky.bin.tmp").exists());
}

#[test]
fn test_save_leaves_no_staged_files() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    store.save(&random_surface(2, 2, 5), "sky").unwrap();

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["sky.bin", "sky.shape"]);
}

#[test]
fn test_load_externally_written_model() {
    let dir = tempdir().unwrap();
    let values = [1.5f64, 2.5, -3.0, 4.0, 0.125, 6.0];
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
    fs::write(dir.path().join("ext.bin"), bytes).unwrap();
    fs::write(dir.path().join("ext.shape"), "(2, 3)\n").unwrap();

    let loaded = BackgroundModelStore::new(dir.path()).load("ext").unwrap();
    assert_eq!(loaded.shape(), (2, 3));
    assert_eq!(loaded.values(), &values);
    assert_eq!(loaded.get(2, 0), -3.0);
    assert_eq!(loaded.get(0, 1), 4.0);
}

#[test]
fn test_missing_bin_is_not_found() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sky.shape"), "(2, 2)").unwrap();

    let err = BackgroundModelStore::new(dir.path()).load("sky").unwrap_err();
    match err {
        Error::NotFound { path } => assert!(path.ends_with("sky.bin")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_shape_is_not_found() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sky.bin"), [0u8; 32]).unwrap();

    let err = BackgroundModelStore::new(dir.path()).load("sky").unwrap_err();
    match err {
        Error::NotFound { path } => assert!(path.ends_with("sky.shape")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_unknown_name_is_not_found() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    assert!(!store.contains("nothing"));
    assert!(matches!(store.load("nothing"), Err(Error::NotFound { .. })));
}

#[test]
fn test_count_mismatch_is_corrupt() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    store.save(&random_surface(3, 3, 9), "sky").unwrap();
    fs::write(dir.path().join("sky.shape"), "(3, 4)").unwrap();

    let err = store.load("sky").unwrap_err();
    match err {
        Error::CorruptModel { reason, .. } => assert!(reason.contains("expected 12 values")),
        other => panic!("expected CorruptModel, got {other:?}"),
    }
}

#[test]
fn test_partial_value_is_corrupt() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sky.bin"), [0u8; 12]).unwrap();
    fs::write(dir.path().join("sky.shape"), "(1, 1)").unwrap();

    let err = BackgroundModelStore::new(dir.path()).load("sky").unwrap_err();
    assert!(matches!(err, Error::CorruptModel { .. }));
}

#[test]
fn test_malformed_shape_is_corrupt() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sky.bin"), [0u8; 8]).unwrap();

    for text in ["1, 1", "(1)", "(a, 1)", "(1, 1, 1)", "(-1, 1)", ""] {
        fs::write(dir.path().join("sky.shape"), text).unwrap();
        let err = BackgroundModelStore::new(dir.path()).load("sky").unwrap_err();
        assert!(
            matches!(err, Error::CorruptModel { .. }),
            "{text:?} gave {err:?}"
        );
    }
}

#[test]
fn test_free_functions_use_path_prefix() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("filter.z");
    let surface = random_surface(2, 2, 3);

    save(&surface, &base).unwrap();
    assert!(dir.path().join("filter.z.bin").is_file());
    assert!(dir.path().join("filter.z.shape").is_file());
    assert_bit_identical(&surface, &load(&base).unwrap());
}

#[test]
fn test_parse_shape() {
    assert_eq!(parse_shape("(480, 640)"), Ok((480, 640)));
    assert_eq!(parse_shape("  (1,2)\n"), Ok((1, 2)));
    assert_eq!(parse_shape("(0, 5)"), Ok((0, 5)));
    assert!(parse_shape("[1, 2]").is_err());
}

#[test]
fn test_empty_surface_round_trip() {
    let dir = tempdir().unwrap();
    let store = BackgroundModelStore::new(dir.path());
    let surface = BackgroundSurface::from_vec(0, 4, Vec::new());

    store.save(&surface, "empty").unwrap();
    assert_eq!(store.load("empty").unwrap().shape(), (0, 4));
}
