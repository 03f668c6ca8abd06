//! The packed tile bitmap format kept in graphics memory.
//!
//! ```text
//! offset 0  u16 LE  width in pixels
//! offset 2  u16 LE  height in pixels
//! offset 4  8x8 tiles, left to right then top to bottom;
//!           inside a tile, 8 rows of 4 bytes, each byte two pixels
//!           (high nibble left, low nibble right)
//! ```

use std::convert::TryFrom;
use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::emulator::error::{Error, Result};
use crate::util::nibble_pair::{le_u16, split_le_u16, NibblePair};

pub const TILE_SIZE: usize = 8;
pub const HEADER_LEN: usize = 4;

/// Packed bytes per tile, at two pixels per byte.
pub const TILE_BYTES: usize = TILE_SIZE * TILE_SIZE / 2;

/// One decoded pixel, in unscaled screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub intensity: u8,
}

impl Pixel {
    pub fn is_lit(&self) -> bool {
        self.intensity != 0
    }
}

/// Read the width and height header, if there is room for it.
pub fn dimensions(graphics: &[u8]) -> Option<(u16, u16)> {
    if graphics.len() < HEADER_LEN {
        return None;
    }
    Some((le_u16(graphics[0], graphics[1]), le_u16(graphics[2], graphics[3])))
}

/// Decode the bitmap at the start of `graphics`, placing its top left corner at
/// `(origin_x, origin_y)` and handing every pixel to `emit`.
///
/// Decoding stops quietly when the declared size runs past the end of
/// `graphics`. Returns the number of bytes consumed, header included.
pub fn decode<F>(graphics: &[u8], origin_x: i16, origin_y: i16, mut emit: F) -> usize
where
    F: FnMut(Pixel),
{
    let (width, height) = match dimensions(graphics) {
        Some(dimensions) => dimensions,
        None => return 0,
    };

    let mut ptr = HEADER_LEN;
    for tile_y in (0..height as i32).step_by(TILE_SIZE) {
        for tile_x in (0..width as i32).step_by(TILE_SIZE) {
            for py in 0..TILE_SIZE as i32 {
                for px in (0..TILE_SIZE as i32).step_by(2) {
                    if ptr >= graphics.len() {
                        return ptr;
                    }
                    let packed = NibblePair::new(graphics[ptr]);
                    ptr += 1;

                    let x = origin_x as i32 + tile_x + px;
                    let y = origin_y as i32 + tile_y + py;
                    emit(Pixel { x, y, intensity: packed.high() });
                    emit(Pixel { x: x + 1, y, intensity: packed.low() });
                }
            }
        }
    }

    ptr
}

/// Pack a row-major image of 4-bit intensities into the tile format.
/// Positions outside the image, when the size isn't a multiple of the
/// tile size, are padded with zero.
pub fn encode(width: u16, height: u16, intensities: &[u8]) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let tiles = ((width + TILE_SIZE - 1) / TILE_SIZE) * ((height + TILE_SIZE - 1) / TILE_SIZE);
    let mut out = Vec::with_capacity(HEADER_LEN + tiles * TILE_BYTES);

    let (low, high) = split_le_u16(width as u16);
    out.extend_from_slice(&[low, high]);
    let (low, high) = split_le_u16(height as u16);
    out.extend_from_slice(&[low, high]);

    let pixel = |x: usize, y: usize| -> u8 {
        if x < width && y < height {
            intensities.get(y * width + x).copied().unwrap_or(0)
        } else {
            0
        }
    };

    for tile_y in (0..height).step_by(TILE_SIZE) {
        for tile_x in (0..width).step_by(TILE_SIZE) {
            for y in 0..TILE_SIZE {
                for x in (0..TILE_SIZE).step_by(2) {
                    let left = pixel(tile_x + x, tile_y + y);
                    let right = pixel(tile_x + x + 1, tile_y + y);
                    out.push(NibblePair::from_nibbles(left, right).as_u8());
                }
            }
        }
    }

    out
}

/// Reduce an 8-bit luminance to a 4-bit intensity.
pub fn quantize(luma: u8) -> u8 {
    luma >> 4
}

/// Encode an image, one 4-bit intensity per pixel taken from its luminance.
pub fn encode_image(image: &DynamicImage) -> Result<Vec<u8>> {
    encode_gray(&image.to_luma8())
}

pub fn encode_gray(image: &GrayImage) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    let too_large = || Error::ImageTooLarge { width, height };
    let w = u16::try_from(width).map_err(|_| too_large())?;
    let h = u16::try_from(height).map_err(|_| too_large())?;

    let intensities: Vec<u8> = image.pixels().map(|pixel| quantize(pixel.0[0])).collect();
    Ok(encode(w, h, &intensities))
}

/// Load an image file (PNG) and encode it.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let image = image::open(path)?.to_luma8();
    log::info!("Encoding {}x{} image", image.width(), image.height());
    encode_gray(&image)
}

#[cfg(test)]
mod tests {

    use super::*;
    use test_case::test_case;

    fn collect(graphics: &[u8], x: i16, y: i16) -> (Vec<Pixel>, usize) {
        let mut pixels = Vec::new();
        let consumed = decode(graphics, x, y, |pixel| pixels.push(pixel));
        (pixels, consumed)
    }

    #[test]
    fn blank_tile_emits_64_unlit_pixels() {
        let mut graphics: Vec<u8> = vec![8, 0, 8, 0];
        graphics.extend_from_slice(&[0; TILE_BYTES]);
        graphics.extend_from_slice(&[0xFF; 16]); // trailing data must not be read

        let (pixels, consumed) = collect(&graphics, 3, 5);
        assert_eq!(consumed, HEADER_LEN + 32);
        assert_eq!(pixels.len(), 64);
        assert!(pixels.iter().all(|pixel| !pixel.is_lit()));

        let mut positions: Vec<(i32, i32)> = pixels.iter().map(|p| (p.x, p.y)).collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 64);
        assert_eq!(positions.first(), Some(&(3, 5)));
        assert_eq!(positions.last(), Some(&(10, 12)));
    }

    #[test]
    fn high_nibble_is_left_pixel() {
        let mut graphics: Vec<u8> = vec![8, 0, 8, 0, 0xA0];
        graphics.extend_from_slice(&[0; TILE_BYTES - 1]);
        let (pixels, _) = collect(&graphics, 0, 0);
        assert_eq!(pixels[0], Pixel { x: 0, y: 0, intensity: 0xA });
        assert_eq!(pixels[1], Pixel { x: 1, y: 0, intensity: 0 });
    }

    #[test]
    fn tiles_are_scanned_left_to_right_then_down() {
        // 16x16: four tiles, each lit in its first pixel only
        let mut graphics: Vec<u8> = vec![16, 0, 16, 0];
        for _ in 0..4 {
            graphics.push(0x10);
            graphics.extend_from_slice(&[0; TILE_BYTES - 1]);
        }
        let (pixels, consumed) = collect(&graphics, 0, 0);
        assert_eq!(consumed, HEADER_LEN + 4 * TILE_BYTES);
        let lit: Vec<(i32, i32)> = pixels.iter().filter(|p| p.is_lit()).map(|p| (p.x, p.y)).collect();
        assert_eq!(lit, vec![(0, 0), (8, 0), (0, 8), (8, 8)]);
    }

    #[test_case(b"" ; "no header")]
    #[test_case(b"\x08\x00\x08" ; "short header")]
    fn missing_header_draws_nothing(graphics: &[u8]) {
        let (pixels, consumed) = collect(graphics, 0, 0);
        assert!(pixels.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn overrunning_bitmap_stops_early() {
        let graphics: [u8; 7] = [64, 0, 64, 0, 0x11, 0x11, 0x11];
        let (pixels, consumed) = collect(&graphics, 0, 0);
        assert_eq!(pixels.len(), 6);
        assert_eq!(consumed, graphics.len());
    }

    #[test]
    fn negative_origin_is_kept() {
        let mut graphics: Vec<u8> = vec![8, 0, 8, 0];
        graphics.extend_from_slice(&[0; TILE_BYTES]);
        let (pixels, _) = collect(&graphics, -4, -1);
        assert_eq!((pixels[0].x, pixels[0].y), (-4, -1));
    }

    #[test]
    fn encode_pads_partial_tiles() {
        // 3x1 image: [1, 2, 3]
        let encoded = encode(3, 1, &[1, 2, 3]);
        assert_eq!(encoded.len(), HEADER_LEN + TILE_BYTES);
        assert_eq!(&encoded[..6], &[3, 0, 1, 0, 0x12, 0x30]);
        assert!(encoded[6..].iter().all(|b| *b == 0));
    }

    #[test]
    fn encoded_image_decodes_to_same_pixels() {
        let (width, height) = (16u16, 8u16);
        let image: Vec<u8> = (0..width as usize * height as usize).map(|i| (i % 16) as u8).collect();
        let encoded = encode(width, height, &image);

        let (pixels, consumed) = collect(&encoded, 0, 0);
        assert_eq!(consumed, encoded.len());
        for pixel in pixels {
            let expected = image[pixel.y as usize * width as usize + pixel.x as usize];
            assert_eq!(pixel.intensity, expected);
        }
    }

    #[test_case(0x00 => 0x0 ; "black")]
    #[test_case(0x1F => 0x1 ; "dark")]
    #[test_case(0x80 => 0x8 ; "middle")]
    #[test_case(0xFF => 0xF ; "white")]
    fn luminance_keeps_high_nibble(luma: u8) -> u8 {
        quantize(luma)
    }

    #[test]
    fn gray_image_decodes_to_quantized_pixels() {
        let image = GrayImage::from_fn(12, 9, |x, y| image::Luma([(x * 20 + y * 7) as u8]));
        let encoded = encode_image(&DynamicImage::ImageLuma8(image.clone())).unwrap();
        assert_eq!(dimensions(&encoded), Some((12, 9)));
        assert_eq!(encoded.len(), HEADER_LEN + 4 * TILE_BYTES);

        let (pixels, consumed) = collect(&encoded, 0, 0);
        assert_eq!(consumed, encoded.len());
        for pixel in pixels {
            let (x, y) = (pixel.x as u32, pixel.y as u32);
            let expected = if x < 12 && y < 9 { quantize(image.get_pixel(x, y).0[0]) } else { 0 };
            assert_eq!(pixel.intensity, expected, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn color_image_uses_luminance() {
        let image = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        let encoded = encode_image(&DynamicImage::ImageRgb8(image)).unwrap();
        assert!(encoded[HEADER_LEN..].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn image_wider_than_header_is_rejected() {
        let image = GrayImage::new(70_000, 1);
        assert!(matches!(
            encode_gray(&image),
            Err(Error::ImageTooLarge { width: 70_000, height: 1 })
        ));
    }
}
