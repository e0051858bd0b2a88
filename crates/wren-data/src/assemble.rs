// DatasetAssembler: build one Dataset from a class-per-folder layout
//
// Expected layout:
//
//   root/
//     training/
//       0/  img_0001.png  img_0002.png ...
//       1/  ...
//       ...
//       9/
//     testing/
//       0/ ... 9/
//
// Classes are visited in ascending order 0..=9 and files within a class in
// file-name order, so the label sequence is always grouped and ascending:
//
//   labels = [0, 0, ..., 0, 1, 1, ..., 9]
//
// A class folder may be empty or missing entirely; both contribute zero
// examples. Any file that fails to load aborts the whole assembly.
//
// USAGE:
//
//   let ds = Assembler::new("data/digits")
//       .image_size(28, 28)
//       .assemble(SplitName::Training)?;
//   println!("{} images", ds.len());

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use wren_core::{Error, Result, Tensor};

use crate::dataset::Dataset;
use crate::image_loader::{load_image, Image, ImageOptions};
use crate::labels::Digit;

/// File extensions picked up by default (case-insensitive).
pub const DEFAULT_EXTENSIONS: &[&str] = &["png"];

/// Emit a progress event every this many images within a class.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Which top-level partition of the directory tree to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitName {
    Training,
    Testing,
}

impl SplitName {
    pub const ALL: [SplitName; 2] = [SplitName::Training, SplitName::Testing];

    /// Folder name under the root.
    pub fn as_str(self) -> &'static str {
        match self {
            SplitName::Training => "training",
            SplitName::Testing => "testing",
        }
    }
}

impl FromStr for SplitName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "training" => Ok(SplitName::Training),
            "testing" => Ok(SplitName::Testing),
            other => Err(Error::invalid_argument(format!(
                "split name must be one of {:?}, got {other:?}",
                SplitName::ALL.map(SplitName::as_str)
            ))),
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder that walks `root/<split>/<digit>/` and loads every image.
#[derive(Debug, Clone)]
pub struct Assembler {
    root: PathBuf,
    image: ImageOptions,
    extensions: Vec<String>,
    progress_every: usize,
    parallel: bool,
}

impl Assembler {
    /// An assembler rooted at `root` with 28×28 images and `.png` files.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Assembler {
            root: root.as_ref().to_path_buf(),
            image: ImageOptions::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            parallel: false,
        }
    }

    /// Expected image size in pixels.
    pub fn image_size(mut self, height: u32, width: u32) -> Self {
        self.image.height = height;
        self.image.width = width;
        self
    }

    /// Resize images of another size instead of failing.
    pub fn resize(mut self, yes: bool) -> Self {
        self.image.resize = yes;
        self
    }

    /// File extensions to load (without the dot, case-insensitive).
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Progress event interval; 0 turns progress events off.
    pub fn progress_every(mut self, n: usize) -> Self {
        self.progress_every = n;
        self
    }

    /// Decode the files of each class on the rayon pool.
    ///
    /// The output is identical to sequential assembly.
    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_options(&self) -> &ImageOptions {
        &self.image
    }

    /// `root/<split>/<digit>`.
    pub fn class_dir(&self, split: SplitName, digit: Digit) -> PathBuf {
        self.root.join(split.as_str()).join(digit.as_str())
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Image files directly inside `dir`, sorted by file name.
    ///
    /// A missing directory yields an empty list.
    pub fn list_images(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            warn!(dir = %dir.display(), "class folder missing, treating as empty");
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.is_image(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse `split_name` and assemble that split.
    ///
    /// An unknown split name fails with [`Error::InvalidArgument`] before
    /// the file system is touched.
    pub fn assemble_named(&self, split_name: &str) -> Result<Dataset> {
        let split: SplitName = split_name.parse()?;
        self.assemble(split)
    }

    /// Load every image of `split` into one aligned dataset.
    pub fn assemble(&self, split: SplitName) -> Result<Dataset> {
        let split_dir = self.root.join(split.as_str());
        if !split_dir.is_dir() {
            return Err(Error::InvalidPath(split_dir));
        }

        let mut data: Tensor<u8> = Tensor::empty(self.image.shape());
        let mut labels: Vec<Digit> = Vec::new();

        for digit in Digit::ALL {
            let files = self.list_images(&self.class_dir(split, digit))?;
            let batch = self.load_class(digit, &files)?;
            let count = batch.rows();
            data.append(batch)?;
            labels.extend(std::iter::repeat(digit).take(count));
            info!(class = %digit, count, "loaded class");
        }

        info!(split = %split, examples = labels.len(), "assembled dataset");
        Dataset::new(data, labels)
    }

    /// Decode `files` into a `[count, H, W, 1]` batch, in order.
    fn load_class(&self, digit: Digit, files: &[PathBuf]) -> Result<Tensor<u8>> {
        let total = files.len();
        let images: Vec<Image> = if self.parallel {
            let processed = AtomicUsize::new(0);
            files
                .par_iter()
                .map(|path| {
                    let img = load_image(path, &self.image)?;
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.report_progress(digit, done, total);
                    Ok(img)
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            let mut images = Vec::with_capacity(total);
            for (i, path) in files.iter().enumerate() {
                images.push(load_image(path, &self.image)?);
                self.report_progress(digit, i + 1, total);
            }
            images
        };
        Tensor::stack(&images, self.image.shape())
    }

    fn progress_due(&self, processed: usize) -> bool {
        self.progress_every > 0 && processed > 0 && processed % self.progress_every == 0
    }

    fn report_progress(&self, digit: Digit, processed: usize, total: usize) {
        if self.progress_due(processed) {
            debug!(class = %digit, processed, total, "loading images");
        }
    }
}

/// Assemble `root/<split_name>/` with default options.
pub fn assemble<P: AsRef<Path>>(root: P, split_name: &str) -> Result<Dataset> {
    Assembler::new(root).assemble_named(split_name)
}
