//! Image preprocessing for the BioCLIP vision encoder.
//!
//! BioCLIP (ViT-B/16, CLIP-style) expects:
//! - Input size: 224×224 pixels, shortest side resized then center-cropped
//! - Normalization: per-channel `(pixel/255 - mean) / std` with the CLIP constants
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::DynamicImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP normalization mean (per-channel).
const NORM_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP normalization std (per-channel).
const NORM_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Preprocess an image for BioCLIP inference.
///
/// Resizes so the shorter edge equals `image_size`, center-crops to a square,
/// normalizes each channel and returns an NCHW tensor for ONNX Runtime.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    let cropped = image.resize_to_fill(
        image_size,
        image_size,
        image::imageops::FilterType::CatmullRom,
    );
    let rgb = cropped.to_rgb8();

    let size = image_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));

    let raw = rgb.as_raw();
    if let Some(tensor_data) = tensor.as_slice_mut() {
        for (i, pixel) in raw.chunks_exact(CHANNELS).enumerate() {
            let y = i / size;
            let x = i % size;
            for (c, &val) in pixel.iter().enumerate() {
                // NCHW layout: offset = c * size * size + y * size + x
                let idx = c * size * size + y * size + x;
                tensor_data[idx] = (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c];
            }
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_preprocess_shape_224() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let tensor = preprocess(&img, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_non_square_is_cropped() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(300, 900));
        let tensor = preprocess(&img, 64);
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);
    }

    #[test]
    fn test_preprocess_channel_normalization() {
        let img =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, image::Rgb([255, 255, 255])));
        let tensor = preprocess(&img, 32);
        for c in 0..CHANNELS {
            let expected = (1.0 - NORM_MEAN[c]) / NORM_STD[c];
            assert!((tensor[[0, c, 5, 5]] - expected).abs() < 1e-3);
        }

        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, image::Rgb([0, 0, 0])));
        let tensor = preprocess(&img, 32);
        for c in 0..CHANNELS {
            let expected = -NORM_MEAN[c] / NORM_STD[c];
            assert!((tensor[[0, c, 0, 0]] - expected).abs() < 1e-3);
        }
    }
}
