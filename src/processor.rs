//! This module provides tools for preprocessing images before they are fed into a model.
//!
//! It defines the `ImageProcessor` trait for generic image processing operations
//! and provides a concrete implementation, `ImagePreprocessor`, which resizes the
//! image to fit the model input, pads it by repeating the border pixels, and scales
//! the pixel values to `[0, 1]` in NHWC layout.

use image::{imageops::FilterType, DynamicImage, RgbImage};
use ndarray::{Array, Array4, Ix4};
use std::path::Path;

use crate::error::{EvalError, Result};

/// A trait for processing images into tensors suitable for model input.
pub trait ImageProcessor {
    /// Processes a single image into a 4D tensor with a batch axis of one.
    fn process(&self, image: &DynamicImage) -> Result<Array<f32, Ix4>>;

    /// Opens the image at `path` and processes it.
    fn process_path(&self, path: &Path) -> Result<Array<f32, Ix4>> {
        let image = image::open(path).map_err(|source| EvalError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        self.process(&image)
    }
}

/// A preprocessor that resizes, edge-pads, and scales images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreprocessor {
    pub height: u32,
    pub width: u32,
}

impl ImagePreprocessor {
    /// Creates a new `ImagePreprocessor`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { height, width }
    }

    /// Scales the image so it fits inside the target size, keeping its aspect ratio.
    fn fit(&self, image: &DynamicImage) -> RgbImage {
        image
            .resize(self.width, self.height, FilterType::Triangle)
            .to_rgb8()
    }

    /// Centers the image on the target canvas and converts it to a tensor.
    ///
    /// Canvas pixels outside the image take the value of the nearest edge pixel.
    fn pad_and_to_tensor(&self, image: &RgbImage) -> Array<f32, Ix4> {
        let (image_width, image_height) = image.dimensions();
        let (width, height) = (self.width as usize, self.height as usize);
        let mut tensor = Array4::<f32>::zeros((1, height, width, 3));

        if image_width == 0 || image_height == 0 {
            return tensor;
        }

        let pad_left = (self.width.saturating_sub(image_width) / 2) as i64;
        let pad_top = (self.height.saturating_sub(image_height) / 2) as i64;
        let max_x = image_width as i64 - 1;
        let max_y = image_height as i64 - 1;

        for y in 0..height {
            let src_y = (y as i64 - pad_top).clamp(0, max_y) as u32;
            for x in 0..width {
                let src_x = (x as i64 - pad_left).clamp(0, max_x) as u32;
                let [r, g, b] = image.get_pixel(src_x, src_y).0;
                tensor[[0, y, x, 0]] = r as f32 / 255.0;
                tensor[[0, y, x, 1]] = g as f32 / 255.0;
                tensor[[0, y, x, 2]] = b as f32 / 255.0;
            }
        }

        tensor
    }
}

impl ImageProcessor for ImagePreprocessor {
    fn process(&self, image: &DynamicImage) -> Result<Array<f32, Ix4>> {
        let fitted = self.fit(image);
        Ok(self.pad_and_to_tensor(&fitted))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let processor = ImagePreprocessor::new(100, 100);
        let wide = DynamicImage::ImageRgb8(RgbImage::new(400, 100));
        assert_eq!(processor.fit(&wide).dimensions(), (100, 25));

        let small = DynamicImage::ImageRgb8(RgbImage::new(10, 20));
        assert_eq!(processor.fit(&small).dimensions(), (50, 100));
    }

    #[test]
    fn test_edge_padding() {
        let processor = ImagePreprocessor::new(4, 4);
        // Two columns: left red, right blue. Centered with one column of padding each side.
        let mut image = RgbImage::new(2, 4);
        for y in 0..4 {
            image.put_pixel(0, y, Rgb([255, 0, 0]));
            image.put_pixel(1, y, Rgb([0, 0, 255]));
        }

        let tensor = processor.pad_and_to_tensor(&image);
        assert_eq!(tensor.shape(), &[1, 4, 4, 3]);
        for y in 0..4 {
            assert_eq!(tensor[[0, y, 0, 0]], 1.0);
            assert_eq!(tensor[[0, y, 1, 0]], 1.0);
            assert_eq!(tensor[[0, y, 2, 2]], 1.0);
            assert_eq!(tensor[[0, y, 3, 2]], 1.0);
            assert_eq!(tensor[[0, y, 3, 0]], 0.0);
        }
    }
}
