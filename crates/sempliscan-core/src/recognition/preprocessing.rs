//! Image preprocessing for recognition.

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

/// Binarize a page to black/white before recognition.
///
/// The threshold is either fixed or chosen per page with Otsu's method
/// on the grayscale histogram. Pure transform: improves the engine's
/// match rate on photographed documents, no semantic effect downstream.
pub fn binarize(image: &DynamicImage, threshold: Option<u8>) -> DynamicImage {
    let mut gray = image.to_luma8();
    let t = threshold.unwrap_or_else(|| otsu_threshold(&gray));
    debug!("binarizing with threshold {}", t);

    for pixel in gray.pixels_mut() {
        *pixel = if pixel[0] > t { Luma([255]) } else { Luma([0]) };
    }
    DynamicImage::ImageLuma8(gray)
}

/// Otsu's method: pick the threshold maximizing between-class variance.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = (gray.width() as u64) * (gray.height() as u64);
    if total == 0 {
        return 128;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut background_sum = 0f64;
    let mut background_weight = 0u64;
    let mut best_threshold = 0u8;
    let mut best_variance = -1f64;

    for t in 0..256usize {
        background_weight += histogram[t];
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += t as f64 * histogram[t] as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight as f64;

        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bimodal_image() -> DynamicImage {
        let mut img = GrayImage::new(10, 10);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < 5 { Luma([30]) } else { Luma([220]) };
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn output_is_pure_black_and_white() {
        let binarized = binarize(&bimodal_image(), None).to_luma8();
        assert!(binarized.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn otsu_separates_the_modes() {
        let t = otsu_threshold(&bimodal_image().to_luma8());
        assert!(t >= 30 && t < 220, "threshold {} outside modes", t);
    }

    #[test]
    fn fixed_threshold_is_honored() {
        let binarized = binarize(&bimodal_image(), Some(250)).to_luma8();
        // Everything falls below 250 and goes black.
        assert!(binarized.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn empty_image_defaults() {
        assert_eq!(otsu_threshold(&GrayImage::new(0, 0)), 128);
    }
}
