//! Image preprocessing for OCR.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::OcrError;

/// Grayscale, upscale and binarize screenshots before handing them to the
/// OCR engine.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Integer upscale factor; 1 leaves the size unchanged.
    upscale_factor: u32,
    /// Side of the square neighbourhood used for the local mean.
    block_size: u32,
    /// Offset subtracted from the local mean.
    offset: i32,
}

impl ImagePreprocessor {
    pub fn new() -> Self {
        Self {
            upscale_factor: 2,
            block_size: 15,
            offset: 5,
        }
    }

    pub fn with_upscale_factor(mut self, factor: u32) -> Self {
        self.upscale_factor = factor.max(1);
        self
    }

    pub fn with_block_size(mut self, size: u32) -> Self {
        self.block_size = size.max(1);
        self
    }

    /// Apply grayscale conversion, upscaling and adaptive thresholding.
    pub fn enhance(&self, image: &DynamicImage) -> DynamicImage {
        let gray = image.to_luma8();
        let gray = if self.upscale_factor > 1 {
            let (width, height) = gray.dimensions();
            image::imageops::resize(
                &gray,
                width.saturating_mul(self.upscale_factor),
                height.saturating_mul(self.upscale_factor),
                FilterType::Lanczos3,
            )
        } else {
            gray
        };

        DynamicImage::ImageLuma8(self.adaptive_threshold(&gray))
    }

    /// Enhance the image at `path` and write it to a temporary PNG.
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn prepare(&self, path: &Path) -> Result<NamedTempFile, OcrError> {
        let image = image::open(path)
            .map_err(|e| OcrError::Engine(format!("cannot read image {}: {}", path.display(), e)))?;
        debug!(
            "Preprocessing {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        let enhanced = self.enhance(&image);
        let mut file = tempfile::Builder::new()
            .prefix("yomitori-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Engine(format!("failed to create temp file: {}", e)))?;
        enhanced
            .write_to(&mut file, ImageFormat::Png)
            .map_err(|e| OcrError::Engine(format!("failed to write temp image: {}", e)))?;
        Ok(file)
    }

    /// Mean-based local threshold over a summed-area table.
    fn adaptive_threshold(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut result = GrayImage::new(width, height);
        if width == 0 || height == 0 {
            return result;
        }

        let stride = width as usize + 1;
        let mut integral = vec![0u64; stride * (height as usize + 1)];
        for y in 0..height as usize {
            let mut row_sum = 0u64;
            for x in 0..width as usize {
                row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
                integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
            }
        }

        let half_block = self.block_size / 2;
        for y in 0..height {
            let y0 = y.saturating_sub(half_block) as usize;
            let y1 = (y + half_block + 1).min(height) as usize;
            for x in 0..width {
                let x0 = x.saturating_sub(half_block) as usize;
                let x1 = (x + half_block + 1).min(width) as usize;

                let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                    - integral[y0 * stride + x1]
                    - integral[y1 * stride + x0];
                let count = ((y1 - y0) * (x1 - x0)) as u64;

                let threshold = (sum / count) as i32 - self.offset;
                let value = image.get_pixel(x, y)[0] as i32;
                let output = if value > threshold { 255 } else { 0 };
                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}
