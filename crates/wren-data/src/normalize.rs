// Normalizer: rescale pixel intensities
//
// Pure elementwise division by a fixed maximum (255 for 8-bit images). Inputs
// are assumed to lie in [0, scale] but this is not enforced: out-of-range
// values come out outside [0, 1], nothing is clamped.

use wren_core::Tensor;

use crate::dataset::Dataset;

/// The assumed maximum of an 8-bit intensity.
pub const MAX_INTENSITY: f32 = 255.0;

/// Divides every element by `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    scale: f32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            scale: MAX_INTENSITY,
        }
    }
}

impl Normalizer {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// `out[i] = data[i] / scale`.
    pub fn apply<T: Copy + Into<f32>>(&self, data: &Tensor<T>) -> Tensor<f32> {
        let scale = self.scale;
        data.map(|&v| v.into() / scale)
    }

    /// `out[i] = data[i] * scale`.
    pub fn invert(&self, data: &Tensor<f32>) -> Tensor<f32> {
        let scale = self.scale;
        data.map(|&v| v * scale)
    }
}

/// Rescale intensities from [0, 255] to [0, 1].
pub fn normalize<T: Copy + Into<f32>>(data: &Tensor<T>) -> Tensor<f32> {
    Normalizer::default().apply(data)
}

impl<T: Copy + Into<f32>, L> Dataset<Tensor<T>, L> {
    /// Rescale the images by 1/255, keeping labels.
    pub fn normalize(self) -> Dataset<Tensor<f32>, L> {
        self.normalize_with(&Normalizer::default())
    }

    pub fn normalize_with(self, normalizer: &Normalizer) -> Dataset<Tensor<f32>, L> {
        Dataset {
            data: normalizer.apply(&self.data),
            labels: self.labels,
        }
    }
}
