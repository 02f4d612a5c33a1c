//! Adaptive thresholding and mask cleanup

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, open};

/// Neighborhood size of the adaptive threshold
pub const BLOCK_SIZE: u32 = 11;

/// Constant subtracted from the weighted neighborhood mean
pub const THRESHOLD_C: f32 = 2.0;

/// Radius of the square structuring element (5x5)
pub const MORPH_RADIUS: u8 = 2;

/// Gaussian sigma used for a kernel of the given size
///
/// Same rule as OpenCV's `getGaussianKernel` when sigma is left unspecified.
pub fn gaussian_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Inverted adaptive Gaussian threshold
///
/// A pixel becomes foreground (255) when it is at least `c` darker than the
/// Gaussian-weighted mean of its `block_size` neighborhood.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: u32, c: f32) -> GrayImage {
    let blurred = gaussian_blur_f32(gray, gaussian_sigma(block_size));
    let (width, height) = gray.dimensions();

    GrayImage::from_fn(width, height, |x, y| {
        let value = gray.get_pixel(x, y)[0] as f32;
        let mean = blurred.get_pixel(x, y)[0] as f32;
        if value <= mean - c {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Close then open with a square structuring element
///
/// Closing bridges the gaps inside photographs, opening removes speckle.
pub fn clean_mask(mask: &GrayImage, radius: u8) -> GrayImage {
    let closed = close(mask, Norm::LInf, radius);
    open(&closed, Norm::LInf, radius)
}
