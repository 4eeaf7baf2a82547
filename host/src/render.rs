//! Turns the proven binary half-canvas into a PNG.
//!
//! Colors and stamps are cosmetic and applied after proving, so they can change
//! freely without a new proof.

use std::str::FromStr;

use image::{imageops, Rgb, RgbImage};
use ror_core::{BinaryImage, PrivateKey, HEIGHT, WIDTH};
use thiserror::Error;

const FULL_WIDTH: u32 = 2 * WIDTH as u32;
const FULL_HEIGHT: u32 = HEIGHT as u32;
const STAMP: u32 = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected `r,g,b` with components in 0..=255")]
pub struct InvalidColor(String);

/// `r,g,b` command line color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbX(pub Rgb<u8>);

impl FromStr for RgbX {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InvalidColor(s.to_string()))?;
        match parts.as_slice() {
            [r, g, b] => Ok(RgbX(Rgb([*r, *g, *b]))),
            _ => Err(InvalidColor(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub foreground: Rgb<u8>,
    pub background: Rgb<u8>,
    /// Corner stamp offset from the edges; `None` disables the stamps.
    pub stamp_offset: Option<u32>,
    pub scale: u32,
}

pub fn render(image: &BinaryImage, key: &PrivateKey, opts: &RenderOptions) -> RgbImage {
    let mut canvas = mirror(image, opts);
    if let Some(offset) = opts.stamp_offset {
        stamp_corners(&mut canvas, key, opts, offset);
    }
    imageops::resize(
        &canvas,
        FULL_WIDTH * opts.scale,
        FULL_HEIGHT * opts.scale,
        imageops::FilterType::Nearest,
    )
}

/// Colors the half-canvas and mirrors it across the vertical axis.
fn mirror(image: &BinaryImage, opts: &RenderOptions) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(FULL_WIDTH, FULL_HEIGHT, opts.background);
    for y in 0..FULL_HEIGHT {
        for x in 0..WIDTH as u32 {
            if image.get_pixel(u64::from(x), u64::from(y)) {
                canvas.put_pixel(x, y, opts.foreground);
                canvas.put_pixel(FULL_WIDTH - x - 1, y, opts.foreground);
            }
        }
    }
    canvas
}

/// Encodes the key as four 8×8 bit grids, 8 key bytes per corner, one byte per
/// row, like the indices of a playing card.
fn stamp_corners(canvas: &mut RgbImage, key: &PrivateKey, opts: &RenderOptions, offset: u32) {
    let offset = offset.min(FULL_HEIGHT / 2 - STAMP);
    let far_x = FULL_WIDTH - STAMP - offset;
    let far_y = FULL_HEIGHT - STAMP - offset;
    let corners = [(offset, offset), (far_x, offset), (offset, far_y), (far_x, far_y)];

    for (chunk, (start_x, start_y)) in key.as_bytes().chunks_exact(8).zip(corners) {
        for (row, byte) in chunk.iter().enumerate() {
            for col in 0..STAMP {
                let bit = (byte >> (7 - col)) & 1;
                let color = if bit == 1 {
                    opts.foreground
                } else {
                    opts.background
                };
                canvas.put_pixel(start_x + col, start_y + row as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const FG: Rgb<u8> = Rgb([255, 217, 102]);
    const BG: Rgb<u8> = Rgb([255, 0, 129]);

    fn opts(stamp_offset: Option<u32>, scale: u32) -> RenderOptions {
        RenderOptions {
            foreground: FG,
            background: BG,
            stamp_offset,
            scale,
        }
    }

    #[rstest]
    #[case("255,0,129", Rgb([255, 0, 129]))]
    #[case(" 1, 2 ,3", Rgb([1, 2, 3]))]
    fn parses_colors(#[case] input: &str, #[case] expected: Rgb<u8>) {
        assert_eq!(input.parse::<RgbX>().unwrap(), RgbX(expected));
    }

    #[rstest]
    #[case("255,0")]
    #[case("1,2,3,4")]
    #[case("256,0,0")]
    #[case("red")]
    fn rejects_bad_colors(#[case] input: &str) {
        assert!(input.parse::<RgbX>().is_err());
    }

    #[test]
    fn mirrors_half_canvas() {
        let mut image = BinaryImage::new();
        image.set_pixel(3, 10, true);
        let out = render(&image, &PrivateKey::from_bytes([0; 32]), &opts(None, 1));

        assert_eq!(out.dimensions(), (64, 64));
        assert_eq!(*out.get_pixel(3, 10), FG);
        assert_eq!(*out.get_pixel(60, 10), FG);
        assert_eq!(*out.get_pixel(4, 10), BG);
    }

    #[test]
    fn stamps_key_bits_in_corners() {
        let mut key = [0u8; 32];
        key[0] = 0b1000_0001;
        key[24] = 0b0100_0000;
        let out = render(&BinaryImage::new(), &PrivateKey::from_bytes(key), &opts(Some(2), 1));

        assert_eq!(*out.get_pixel(2, 2), FG);
        assert_eq!(*out.get_pixel(3, 2), BG);
        assert_eq!(*out.get_pixel(9, 2), FG);
        assert_eq!(*out.get_pixel(64 - 8 - 2 + 1, 64 - 8 - 2), FG);
    }

    #[test]
    fn upscales_with_nearest_neighbour() {
        let mut image = BinaryImage::new();
        image.set_pixel(0, 0, true);
        let out = render(&image, &PrivateKey::from_bytes([0; 32]), &opts(None, 8));

        assert_eq!(out.dimensions(), (512, 512));
        assert_eq!(*out.get_pixel(3, 3), FG);
        assert_eq!(*out.get_pixel(20, 20), BG);
    }
}
