// IDX export/import: persist an assembled dataset in the MNIST file format
//
// A dataset is written as two files:
//   <prefix>-images-idx3-ubyte   (N images of rows×cols u8 pixels)
//   <prefix>-labels-idx1-ubyte   (N u8 labels, 0-9)
//
// IDX format (all header values big-endian u32):
//   images: magic(2051) | count | rows | cols | pixel_data(u8...)
//   labels: magic(2049) | count | label_data(u8...)
//
// Files are written uncompressed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use wren_core::{Error, Result, Tensor};

use crate::dataset::Dataset;
use crate::labels::Digit;

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// File names used for a given prefix: (images, labels).
pub fn idx_file_names(prefix: &str) -> (String, String) {
    (
        format!("{prefix}-images-idx3-ubyte"),
        format!("{prefix}-labels-idx1-ubyte"),
    )
}

fn read_u32_be(data: &[u8], off: usize) -> u32 {
    u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

fn check_magic(data: &[u8], expected: u32) -> Result<()> {
    let got = read_u32_be(data, 0);
    if got != expected {
        return Err(Error::InvalidIdx(format!(
            "bad magic: expected {expected}, got {got}"
        )));
    }
    Ok(())
}

/// Encode `[N, H, W, 1]` (or `[N, H, W]`) images as IDX3 bytes.
pub fn encode_idx3(images: &Tensor<u8>) -> Result<Vec<u8>> {
    let dims = images.dims();
    let (n, rows, cols) = match dims {
        [n, r, c] | [n, r, c, 1] => (*n, *r, *c),
        _ => {
            return Err(Error::invalid_argument(format!(
                "IDX3 needs [N, H, W, 1] images, got {}",
                images.shape()
            )))
        }
    };
    let mut buf = Vec::with_capacity(16 + images.elem_count());
    for v in [IMAGES_MAGIC, n as u32, rows as u32, cols as u32] {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf.extend_from_slice(images.as_slice());
    Ok(buf)
}

/// Decode IDX3 bytes into a `[N, rows, cols, 1]` tensor.
pub fn decode_idx3(data: &[u8]) -> Result<Tensor<u8>> {
    if data.len() < 16 {
        return Err(Error::InvalidIdx("IDX3 header too short".into()));
    }
    check_magic(data, IMAGES_MAGIC)?;

    let count = read_u32_be(data, 4) as usize;
    let rows = read_u32_be(data, 8) as usize;
    let cols = read_u32_be(data, 12) as usize;
    let expected_len = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| Error::InvalidIdx("IDX3 header dimensions overflow".into()))?;
    if data.len() < expected_len {
        return Err(Error::InvalidIdx(format!(
            "IDX3 truncated: expected {expected_len} bytes, got {}",
            data.len()
        )));
    }
    Tensor::from_vec(data[16..expected_len].to_vec(), (count, rows, cols, 1))
}

/// Encode digit labels as IDX1 bytes.
pub fn encode_idx1(labels: &[Digit]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + labels.len());
    buf.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
    buf.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    buf.extend(labels.iter().map(|d| d.value()));
    buf
}

/// Decode IDX1 bytes, validating every label as a digit.
pub fn decode_idx1(data: &[u8]) -> Result<Vec<Digit>> {
    if data.len() < 8 {
        return Err(Error::InvalidIdx("IDX1 header too short".into()));
    }
    check_magic(data, LABELS_MAGIC)?;

    let count = read_u32_be(data, 4) as usize;
    let expected_len = count
        .checked_add(8)
        .ok_or_else(|| Error::InvalidIdx("IDX1 header count overflows".into()))?;
    if data.len() < expected_len {
        return Err(Error::InvalidIdx(format!(
            "IDX1 truncated: expected {expected_len} bytes, got {}",
            data.len()
        )));
    }
    data[8..expected_len].iter().map(|&b| Digit::new(b)).collect()
}

impl Dataset {
    /// Serialise as (IDX3 image bytes, IDX1 label bytes).
    pub fn to_idx_bytes(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        Ok((encode_idx3(&self.data)?, encode_idx1(&self.labels)))
    }

    /// Rebuild from IDX3/IDX1 bytes.
    ///
    /// Fails with [`Error::RowCountMismatch`] if the two files disagree on
    /// the number of examples.
    pub fn from_idx_bytes(images: &[u8], labels: &[u8]) -> Result<Self> {
        Dataset::new(decode_idx3(images)?, decode_idx1(labels)?)
    }

    /// Write `<dir>/<prefix>-images-idx3-ubyte` and `<dir>/<prefix>-labels-idx1-ubyte`.
    ///
    /// Creates `dir` if needed and returns the two paths.
    pub fn save_idx(&self, dir: impl AsRef<Path>, prefix: &str) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let (img_name, lbl_name) = idx_file_names(prefix);
        let (img_path, lbl_path) = (dir.join(img_name), dir.join(lbl_name));

        let (img_bytes, lbl_bytes) = self.to_idx_bytes()?;
        fs::write(&img_path, img_bytes)?;
        fs::write(&lbl_path, lbl_bytes)?;
        info!(path = %img_path.display(), examples = self.len(), "wrote IDX files");
        Ok((img_path, lbl_path))
    }

    /// Read a dataset written by [`Dataset::save_idx`].
    pub fn load_idx(dir: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let (img_name, lbl_name) = idx_file_names(prefix);
        let read = |name: String| -> Result<Vec<u8>> {
            let path = dir.join(name);
            if !path.exists() {
                return Err(Error::InvalidPath(path));
            }
            Ok(fs::read(&path)?)
        };
        Dataset::from_idx_bytes(&read(img_name)?, &read(lbl_name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let data = Tensor::from_vec((0..12).collect::<Vec<u8>>(), (3, 2, 2, 1)).unwrap();
        let labels = vec![Digit::ALL[0], Digit::ALL[4], Digit::ALL[9]];
        Dataset::new(data, labels).unwrap()
    }

    #[test]
    fn header_layout() {
        let (img, lbl) = sample().to_idx_bytes().unwrap();
        assert_eq!(read_u32_be(&img, 0), 2051);
        assert_eq!(read_u32_be(&img, 4), 3);
        assert_eq!(read_u32_be(&img, 8), 2);
        assert_eq!(read_u32_be(&img, 12), 2);
        assert_eq!(img.len(), 16 + 12);
        assert_eq!(&lbl[8..], &[0, 4, 9]);
    }

    #[test]
    fn bytes_restore_the_dataset() {
        let ds = sample();
        let (img, lbl) = ds.to_idx_bytes().unwrap();
        assert_eq!(Dataset::from_idx_bytes(&img, &lbl).unwrap(), ds);
    }

    #[test]
    fn invalid_magic() {
        let (mut img, lbl) = sample().to_idx_bytes().unwrap();
        img[3] = 99;
        assert!(matches!(
            Dataset::from_idx_bytes(&img, &lbl),
            Err(Error::InvalidIdx(_))
        ));
    }

    #[test]
    fn truncated_and_mismatched_payloads() {
        let (img, _) = sample().to_idx_bytes().unwrap();
        assert!(matches!(
            decode_idx3(&img[..img.len() - 1]),
            Err(Error::InvalidIdx(_))
        ));

        let two = encode_idx1(&[Digit::ALL[1], Digit::ALL[2]]);
        assert!(matches!(
            Dataset::from_idx_bytes(&img, &two),
            Err(Error::RowCountMismatch { data: 3, labels: 2 })
        ));
    }

    #[test]
    fn oversized_header_dimensions_are_rejected() {
        let mut img = Vec::new();
        for v in [IMAGES_MAGIC, u32::MAX, u32::MAX, u32::MAX] {
            img.extend_from_slice(&v.to_be_bytes());
        }
        assert!(matches!(decode_idx3(&img), Err(Error::InvalidIdx(_))));

        let mut lbl = Vec::new();
        for v in [LABELS_MAGIC, u32::MAX] {
            lbl.extend_from_slice(&v.to_be_bytes());
        }
        assert!(matches!(decode_idx1(&lbl), Err(Error::InvalidIdx(_))));
    }

    #[test]
    fn out_of_range_label_byte() {
        let mut lbl = encode_idx1(&[Digit::ALL[1]]);
        lbl[8] = 12;
        assert!(matches!(decode_idx1(&lbl), Err(Error::UnknownLabel { .. })));
    }

    #[test]
    fn save_and_load_files() {
        let dir = std::env::temp_dir().join(format!("wren_idx_{}", std::process::id()));
        let ds = sample();
        let (img_path, _) = ds.save_idx(&dir, "train").unwrap();
        assert!(img_path.ends_with("train-images-idx3-ubyte"));
        assert_eq!(Dataset::load_idx(&dir, "train").unwrap(), ds);
        assert!(matches!(
            Dataset::load_idx(&dir, "missing"),
            Err(Error::InvalidPath(_))
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
