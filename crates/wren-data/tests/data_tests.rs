// Tests for wren-data: assembly, normalization, label encoding, splitting

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::SeedableRng;

use wren_core::Error;
use wren_data::{
    assemble, encode_labels, normalize, split_dataset, Assembler, Dataset, Digit, LabelEncoder,
    SplitName, DEFAULT_TRAINING_FRACTION,
};

// Fixture directory helpers

/// A scratch tree under the system temp dir, removed on drop.
struct Fixture {
    root: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("wren_data_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Fixture { root }
    }

    fn class_dir(&self, split: &str, class: &str) -> PathBuf {
        let dir = self.root.join(split).join(class);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `count` 28×28 PNGs whose pixels all equal `shade + i`.
    fn add_images(&self, split: &str, class: &str, count: usize, shade: u8) {
        let dir = self.class_dir(split, class);
        for i in 0..count {
            write_png(&dir.join(format!("img_{i:03}.png")), 28, 28, shade + i as u8);
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn write_png(path: &Path, w: u32, h: u32, value: u8) {
    GrayImage::from_pixel(w, h, Luma([value])).save(path).unwrap();
}

fn labels_as_strings(ds: &Dataset) -> Vec<String> {
    ds.labels().iter().map(|d| d.to_string()).collect()
}

// Assembly

#[test]
fn test_two_class_scenario() {
    let fx = Fixture::new("scenario");
    fx.add_images("training", "0", 3, 10);
    fx.add_images("training", "1", 2, 50);

    let ds = assemble(&fx.root, "training").unwrap();
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.data().dims(), &[5, 28, 28, 1]);
    assert_eq!(labels_as_strings(&ds), vec!["0", "0", "0", "1", "1"]);

    let oh = encode_labels(ds.labels()).unwrap();
    assert_eq!(oh.as_tensor().dims(), &[5, 10]);
    for i in 0..3 {
        assert_eq!(oh.class_index(i), 0);
    }
    for i in 3..5 {
        assert_eq!(oh.class_index(i), 1);
    }
}

#[test]
fn test_labels_grouped_ascending_with_folder_counts() {
    let fx = Fixture::new("grouped");
    // Create folders out of order; 4 stays empty, 6 and 8 are missing.
    fx.add_images("training", "9", 2, 0);
    fx.add_images("training", "2", 4, 0);
    fx.add_images("training", "0", 1, 0);
    fx.class_dir("training", "4");
    for c in ["1", "3", "5", "7"] {
        fx.add_images("training", c, 1, 0);
    }

    let ds = assemble(&fx.root, "training").unwrap();
    assert_eq!(ds.data().rows(), ds.labels().len());

    let counts = ds.class_counts();
    assert_eq!(counts, [1, 1, 4, 1, 0, 1, 0, 1, 0, 2]);

    let labels: Vec<u8> = ds.labels().iter().map(|d| d.value()).collect();
    let mut sorted = labels.clone();
    sorted.sort();
    assert_eq!(labels, sorted);
}

#[test]
fn test_missing_class_folder_same_as_empty() {
    let with_empty = Fixture::new("with_empty");
    with_empty.add_images("testing", "3", 2, 0);
    with_empty.class_dir("testing", "5");

    let without = Fixture::new("without");
    without.add_images("testing", "3", 2, 0);

    let a = assemble(&with_empty.root, "testing").unwrap();
    let b = assemble(&without.root, "testing").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.class_counts()[5], 0);
}

#[test]
fn test_files_load_in_name_order() {
    let fx = Fixture::new("order");
    let dir = fx.class_dir("training", "7");
    write_png(&dir.join("c.png"), 28, 28, 3);
    write_png(&dir.join("a.png"), 28, 28, 1);
    write_png(&dir.join("b.png"), 28, 28, 2);

    let ds = assemble(&fx.root, "training").unwrap();
    let firsts: Vec<u8> = (0..ds.len()).map(|i| ds.image(i)[0]).collect();
    assert_eq!(firsts, vec![1, 2, 3]);
}

#[test]
fn test_non_image_files_are_ignored() {
    let fx = Fixture::new("ignored");
    fx.add_images("training", "1", 2, 0);
    let dir = fx.class_dir("training", "1");
    fs::write(dir.join("notes.txt"), "not an image").unwrap();
    fs::create_dir_all(dir.join("nested.png")).unwrap();

    let ds = assemble(&fx.root, "training").unwrap();
    assert_eq!(ds.len(), 2);
}

#[test]
fn test_corrupt_file_aborts_assembly() {
    let fx = Fixture::new("corrupt");
    fx.add_images("training", "0", 2, 0);
    let dir = fx.class_dir("training", "0");
    fs::write(dir.join("img_bad.png"), b"garbage").unwrap();

    let err = assemble(&fx.root, "training").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_wrong_size_aborts_unless_resizing() {
    let fx = Fixture::new("size");
    fx.add_images("training", "2", 1, 0);
    write_png(&fx.class_dir("training", "2").join("odd.png"), 20, 20, 9);

    let err = assemble(&fx.root, "training").unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));

    let ds = Assembler::new(&fx.root)
        .resize(true)
        .assemble(SplitName::Training)
        .unwrap();
    assert_eq!(ds.data().dims(), &[2, 28, 28, 1]);
}

#[test]
fn test_custom_image_size_and_extensions() {
    let fx = Fixture::new("custom");
    let dir = fx.class_dir("testing", "8");
    write_png(&dir.join("a.png"), 8, 6, 1);
    GrayImage::from_pixel(8, 6, Luma([2]))
        .save(dir.join("b.bmp"))
        .unwrap();

    let png_only = Assembler::new(&fx.root)
        .image_size(6, 8)
        .assemble(SplitName::Testing)
        .unwrap();
    assert_eq!(png_only.data().dims(), &[1, 6, 8, 1]);

    let both = Assembler::new(&fx.root)
        .image_size(6, 8)
        .extensions(["png", "bmp"])
        .assemble(SplitName::Testing)
        .unwrap();
    assert_eq!(both.len(), 2);
    assert_eq!(both.image_shape().dims(), &[6, 8, 1]);
}

#[test]
fn test_parallel_matches_sequential() {
    let fx = Fixture::new("parallel");
    for c in 0..10u8 {
        fx.add_images("training", &c.to_string(), (c as usize % 4) + 3, c * 20);
    }

    let seq = Assembler::new(&fx.root)
        .progress_every(2)
        .assemble(SplitName::Training)
        .unwrap();
    let par = Assembler::new(&fx.root)
        .progress_every(2)
        .parallel(true)
        .assemble(SplitName::Training)
        .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn test_invalid_split_name() {
    let fx = Fixture::new("badsplit");
    fx.add_images("training", "0", 1, 0);
    let err = assemble(&fx.root, "validation").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_empty_split_dir_yields_empty_dataset() {
    let fx = Fixture::new("emptysplit");
    fs::create_dir_all(fx.root.join("testing")).unwrap();
    let ds = assemble(&fx.root, "testing").unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.data().dims(), &[0, 28, 28, 1]);
}

// Normalization + encoding

#[test]
fn test_normalize_assembled_pixels() {
    let fx = Fixture::new("norm");
    fx.add_images("training", "4", 1, 51);

    let ds = assemble(&fx.root, "training").unwrap();
    let n = normalize(ds.data());
    assert_eq!(n.dims(), ds.data().dims());
    assert!(n.as_slice().iter().all(|&v| v == 51.0 / 255.0));
}

#[test]
fn test_encode_unknown_string_label() {
    let err = encode_labels(&["3", "eleven"]).unwrap_err();
    assert!(matches!(err, Error::UnknownLabel { .. }));
}

// Splitting

#[test]
fn test_split_coverage_over_many_seeds() {
    let fx = Fixture::new("seeds");
    fx.add_images("training", "0", 6, 0);
    fx.add_images("training", "5", 5, 100);
    let ds = assemble(&fx.root, "training").unwrap();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = split_dataset(&ds, DEFAULT_TRAINING_FRACTION, &mut rng).unwrap();
        assert_eq!(s.train.len() + s.valid.len(), ds.len());
        assert!(s
            .train_indices
            .iter()
            .all(|i| !s.valid_indices.contains(i)));
        assert_eq!(s.train.labels().len(), s.train.data().rows());
    }
}

#[test]
fn test_split_fixed_seed_is_reproducible() {
    let fx = Fixture::new("fixedseed");
    fx.add_images("training", "1", 8, 0);
    let ds = assemble(&fx.root, "training").unwrap();

    let a = split_dataset(&ds, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = split_dataset(&ds, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a.train_indices, b.train_indices);
    assert_eq!(a.valid_indices, b.valid_indices);
}

#[test]
fn test_split_rejects_bad_fraction() {
    let ds = Dataset::new(
        wren_core::Tensor::<u8>::empty((28, 28, 1)),
        Vec::<Digit>::new(),
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        split_dataset(&ds, 0.0, &mut rng),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        split_dataset(&ds, 1.0, &mut rng),
        Err(Error::InvalidArgument(_))
    ));
    let s = split_dataset(&ds, 0.75, &mut rng).unwrap();
    assert_eq!(s.total(), 0);
}

// Full pipeline

#[test]
fn test_full_pipeline() {
    let fx = Fixture::new("pipeline");
    fx.add_images("training", "3", 10, 0);
    fx.add_images("training", "6", 10, 100);

    let prepared = assemble(&fx.root, "training")
        .unwrap()
        .normalize()
        .encode_labels(&LabelEncoder::digits())
        .unwrap();
    let split = prepared
        .split(DEFAULT_TRAINING_FRACTION, &mut StdRng::seed_from_u64(1))
        .unwrap();

    assert_eq!(split.total(), 20);
    for (j, &src) in split.valid_indices.iter().enumerate() {
        let expected = if src < 10 { 3 } else { 6 };
        assert_eq!(split.valid.labels().class_index(j), expected);
        let px = split.valid.image(j)[0];
        assert!((0.0..=1.0).contains(&px));
    }
}

#[test]
fn test_idx_export_of_assembled_dataset() {
    let fx = Fixture::new("idx");
    fx.add_images("testing", "2", 3, 7);
    let ds = assemble(&fx.root, "testing").unwrap();

    let out = fx.root.join("export");
    ds.save_idx(&out, "testing").unwrap();
    let back = Dataset::load_idx(&out, "testing").unwrap();
    assert_eq!(back, ds);
}
