//! Deterministic placeholder images.
//!
//! When no illustration can be downloaded for a keyword, the image stage
//! degrades to a generated frame so pairing with audio never breaks.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::ImageResult;
use crate::resize::save_jpeg;

/// Background palette cycled by segment index.
const PALETTE: [[u8; 3]; 7] = [
    [0xFF, 0x6B, 0x6B],
    [0x4E, 0xCD, 0xC4],
    [0x45, 0xB7, 0xD1],
    [0x96, 0xCE, 0xB4],
    [0xFE, 0xCA, 0x57],
    [0xFF, 0x9F, 0xF3],
    [0x54, 0xA0, 0xFF],
];

/// Generate a placeholder frame for the given segment index.
///
/// The color is picked from a fixed palette by index and shaded with a
/// vertical gradient, so repeated runs produce identical bytes.
pub fn generate_placeholder(
    dest: &Path,
    index: usize,
    width: u32,
    height: u32,
) -> ImageResult<()> {
    let base = PALETTE[index % PALETTE.len()];

    let img = RgbImage::from_fn(width, height, |_, y| {
        // darken toward the bottom, down to 65% brightness
        let shade = 1.0 - 0.35 * (y as f32 / height.max(1) as f32);
        Rgb([
            (base[0] as f32 * shade) as u8,
            (base[1] as f32 * shade) as u8,
            (base[2] as f32 * shade) as u8,
        ])
    });

    save_jpeg(&image::DynamicImage::ImageRgb8(img), dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");

        generate_placeholder(&a, 2, 64, 36).unwrap();
        generate_placeholder(&b, 2, 64, 36).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_palette_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.jpg");
        let wrapped = dir.path().join("wrapped.jpg");

        generate_placeholder(&first, 0, 64, 36).unwrap();
        generate_placeholder(&wrapped, PALETTE.len(), 64, 36).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&wrapped).unwrap()
        );
    }

    #[test]
    fn test_placeholder_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.jpg");
        generate_placeholder(&path, 1, 128, 72).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 128);
        assert_eq!(img.height(), 72);
    }
}
