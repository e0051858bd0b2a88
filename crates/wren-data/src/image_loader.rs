// ImageLoader: decode one file into a [H, W, 1] intensity tensor
//
// Decoding is delegated to the `image` crate. Whatever the on-disk format
// (8-bit gray, RGB, palette, 16-bit), the pixels are converted to 8-bit luma
// so every example ends up with a single channel. The channel dimension is
// kept (size 1) so batches are always [N, H, W, 1].

use std::path::Path;

use image::imageops::{self, FilterType};

use wren_core::{Error, Result, Shape, Tensor};

/// A decoded single-channel image of shape `[H, W, 1]`.
pub type Image = Tensor<u8>;

/// Default MNIST-style image height.
pub const DEFAULT_HEIGHT: u32 = 28;
/// Default MNIST-style image width.
pub const DEFAULT_WIDTH: u32 = 28;

/// Expected geometry of decoded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Resize images of a different size instead of rejecting them.
    pub resize: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            resize: false,
        }
    }
}

impl ImageOptions {
    pub fn new(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            ..Self::default()
        }
    }

    /// Resize mismatched images (Lanczos3) instead of failing.
    pub fn resize(mut self, yes: bool) -> Self {
        self.resize = yes;
        self
    }

    /// Shape of one decoded image: `[height, width, 1]`.
    pub fn shape(&self) -> Shape {
        Shape::from((self.height as usize, self.width as usize, 1))
    }
}

/// Decode the image at `path` as grayscale.
///
/// Errors:
/// - [`Error::InvalidPath`] if `path` does not exist
/// - [`Error::Decode`] if the file is corrupt or in an unsupported format
/// - [`Error::ShapeMismatch`] if its size differs from `opts` and resizing is off
pub fn load_image(path: impl AsRef<Path>, opts: &ImageOptions) -> Result<Image> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InvalidPath(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut gray = img.to_luma8();

    let (w, h) = gray.dimensions();
    if (h, w) != (opts.height, opts.width) {
        if !opts.resize {
            return Err(Error::ShapeMismatch {
                expected: opts.shape(),
                got: Shape::from((h as usize, w as usize, 1)),
            });
        }
        gray = imageops::resize(&gray, opts.width, opts.height, FilterType::Lanczos3);
    }

    Tensor::from_vec(gray.into_raw(), opts.shape())
}
