use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma};

use crate::error::{AdvError, Result};
use crate::frame::PixelBuffer;

/// Rescale a sample of the buffer's depth to the full 16-bit range.
pub fn scale_to_u16(value: u32, max_value: u32) -> u16 {
    if max_value == 0 {
        return 0;
    }
    ((value.min(max_value) as u64 * u16::MAX as u64) / max_value as u64) as u16
}

fn to_gray16(pixels: &PixelBuffer) -> Result<ImageBuffer<Luma<u16>, Vec<u16>>> {
    let (h, w) = pixels.shape();
    let max = pixels.max_value();
    let data: Vec<u16> = pixels
        .as_array()
        .iter()
        .map(|&v| scale_to_u16(v, max))
        .collect();

    ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, data).ok_or(
        AdvError::InvalidDimensions {
            width: w as u32,
            height: h as u32,
        },
    )
}

/// Save a frame as 16-bit grayscale TIFF.
pub fn save_tiff(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    to_gray16(pixels)?.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a frame as 16-bit grayscale PNG.
pub fn save_png(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    to_gray16(pixels)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save frame, choosing format from file extension.
pub fn save_image(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_tiff(pixels, path),
        Some("png") => save_png(pixels, path),
        _ => save_tiff(pixels, path),
    }
}
