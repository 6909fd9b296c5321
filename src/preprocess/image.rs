/// Image-to-tensor conversion.
///
/// Every model input goes through the same three steps: resize to the exact
/// dimensions the first layer was built for, drop alpha, and map each 8-bit
/// channel through a `Normalization`. The resulting vector is row-major by
/// pixel with channels interleaved (R, G, B, R, G, B, ...).

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::Result;
use crate::network::metadata::Normalization;

/// Bilinear, matching a filtered bitmap rescale.
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Decodes PNG/JPEG/BMP/GIF bytes.
///
/// Pixels come back in stored order. An EXIF orientation tag on a JPEG is
/// not applied, so a sideways phone photo is classified sideways.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resizes to `width × height` (aspect ratio is not preserved) and flattens
/// as R, G, B per pixel.
///
/// Returns a flat `Vec<f64>` of length `width * height * 3`.
pub fn image_to_tensor(
    img: &DynamicImage,
    width: u32,
    height: u32,
    normalization: Normalization,
) -> Vec<f64> {
    let rgb = resize(img, width, height).to_rgb8();
    let mut out = Vec::with_capacity(width as usize * height as usize * 3);
    for p in rgb.pixels() {
        let [r, g, b] = p.0;
        out.push(normalization.apply(r));
        out.push(normalization.apply(g));
        out.push(normalization.apply(b));
    }
    out
}

/// Grayscale counterpart of `image_to_tensor`; length `width * height`.
pub fn image_to_grayscale_tensor(
    img: &DynamicImage,
    width: u32,
    height: u32,
    normalization: Normalization,
) -> Vec<f64> {
    resize(img, width, height)
        .to_luma8()
        .pixels()
        .map(|p| normalization.apply(p.0[0]))
        .collect()
}

fn resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        img.clone()
    } else {
        img.resize_exact(width, height, RESIZE_FILTER)
    }
}
