//! Uploaded bytes → H×W×C pixel array.
//!
//! Pixels are passed through untouched: no resizing, normalisation or
//! channel reordering. Deeper than 8-bit images are narrowed to 8 bits with
//! their channel count preserved.

use image::DynamicImage;
use ndarray::Array3;

use crate::error::RelayError;

/// Decoded image laid out as (height, width, channels).
pub type ImageTensor = Array3<u8>;

/// Decodes any image format the `image` crate can guess from its content.
pub fn decode_image(data: &[u8]) -> Result<ImageTensor, RelayError> {
    let image = image::load_from_memory(data)?;
    to_tensor(image)
}

fn to_tensor(image: DynamicImage) -> Result<ImageTensor, RelayError> {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let (channels, raw) = match image {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => match other.color().channel_count() {
            1 => (1, other.to_luma8().into_raw()),
            2 => (2, other.to_luma_alpha8().into_raw()),
            3 => (3, other.to_rgb8().into_raw()),
            _ => (4, other.to_rgba8().into_raw()),
        },
    };

    Ok(Array3::from_shape_vec((height, width, channels), raw)?)
}
