//! Cover-resize to the output frame.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, Rgba};

use crate::error::ImageResult;

const JPEG_QUALITY: u8 = 90;

/// Save an image as JPEG at fixed quality, flattening any alpha first.
pub fn save_jpeg(img: &DynamicImage, dest: &Path) -> ImageResult<()> {
    let rgb = flatten_to_rgb(img);
    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(())
}

/// Flatten transparency onto a white background.
fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        other => {
            let rgba = other.to_rgba8();
            let mut out = RgbImage::new(rgba.width(), rgba.height());
            for (x, y, &Rgba([r, g, b, a])) in rgba.enumerate_pixels() {
                let alpha = a as u16;
                let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
                out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
            }
            out
        }
    }
}

/// Compute the resize dimensions that cover a target frame while keeping
/// aspect ratio. The result is always >= the target in both axes.
pub fn cover_dimensions(
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let img_ratio = width as f64 / height as f64;
    let target_ratio = target_width as f64 / target_height as f64;

    if img_ratio > target_ratio {
        // wider than the frame, size by height
        let new_height = target_height;
        let new_width = (img_ratio * new_height as f64).round() as u32;
        (new_width.max(target_width), new_height)
    } else {
        let new_width = target_width;
        let new_height = (new_width as f64 / img_ratio).round() as u32;
        (new_width, new_height.max(target_height))
    }
}

/// Resize and center-crop an image file to exactly the target frame,
/// writing the result as JPEG at `dest`.
pub fn cover_resize(
    src: &Path,
    dest: &Path,
    target_width: u32,
    target_height: u32,
) -> ImageResult<()> {
    let img = image::open(src)?;

    let (new_width, new_height) = cover_dimensions(
        img.width().max(1),
        img.height().max(1),
        target_width,
        target_height,
    );

    let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);

    let left = (new_width - target_width) / 2;
    let top = (new_height - target_height) / 2;
    let cropped = resized.crop_imm(left, top, target_width, target_height);

    save_jpeg(&cropped, dest)
}
