// Copyright 2024 the Piet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing and unpacking of pixels in the supported destination formats.

use crate::color::Color;

/// The layout of a destination pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32 bits, stored as the bytes B, G, R, A (a little-endian `0xAARRGGBB` word).
    Argb8888,
    /// 24 bits, stored as the bytes B, G, R.
    Rgb888,
    /// 16 bits, little-endian `rrrrrggggggbbbbb`.
    Rgb565,
    /// 16 bits, luminance followed by alpha.
    Al88,
    /// 8 bits of luminance.
    L8,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Argb8888,
        PixelFormat::Rgb888,
        PixelFormat::Rgb565,
        PixelFormat::Al88,
        PixelFormat::L8,
    ];

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Argb8888 => 4,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Rgb565 | PixelFormat::Al88 => 2,
            PixelFormat::L8 => 1,
        }
    }

    /// Whether the format stores an alpha channel. Without one, pixels decode as opaque.
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Argb8888 | PixelFormat::Al88)
    }
}

/// A decoded pixel with straight (non-premultiplied) alpha.
///
/// Formats without an alpha channel decode with `a == 255`, grayscale formats decode
/// to a gray triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const fn opaque(color: Color) -> Self {
        Self {
            r: color.red,
            g: color.green,
            b: color.blue,
            a: 255,
        }
    }

    pub const fn color(self) -> Color {
        Color::new(self.r, self.g, self.b)
    }
}

/// A color encoded in the native layout of some format.
///
/// Only the first `bytes_per_pixel` bytes are meaningful.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    bytes: [u8; 4],
    len: u8,
}

impl Encoded {
    pub fn new(pixel: Pixel, format: PixelFormat) -> Self {
        let mut bytes = [0; 4];
        let len = format.bytes_per_pixel();
        encode(pixel, format, &mut bytes[..len]);

        Self {
            bytes,
            len: len as u8,
        }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// The raw bytes, including padding beyond `len`.
    #[inline(always)]
    pub(crate) fn raw(&self) -> [u8; 4] {
        self.bytes
    }
}

/// Encode `pixel` into `dst`, which must be exactly one pixel long.
#[inline(always)]
pub fn encode(pixel: Pixel, format: PixelFormat, dst: &mut [u8]) {
    match format {
        PixelFormat::Argb8888 => dst.copy_from_slice(&[pixel.b, pixel.g, pixel.r, pixel.a]),
        PixelFormat::Rgb888 => dst.copy_from_slice(&[pixel.b, pixel.g, pixel.r]),
        PixelFormat::Rgb565 => dst.copy_from_slice(&pack_rgb565(pixel.color()).to_le_bytes()),
        PixelFormat::Al88 => dst.copy_from_slice(&[pixel.color().luminance(), pixel.a]),
        PixelFormat::L8 => dst[0] = pixel.color().luminance(),
    }
}

/// Decode the single pixel stored in `src`.
#[inline(always)]
pub fn decode(src: &[u8], format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Argb8888 => Pixel {
            r: src[2],
            g: src[1],
            b: src[0],
            a: src[3],
        },
        PixelFormat::Rgb888 => Pixel::opaque(Color::new(src[2], src[1], src[0])),
        PixelFormat::Rgb565 => Pixel::opaque(unpack_rgb565(u16::from_le_bytes([src[0], src[1]]))),
        PixelFormat::Al88 => Pixel {
            r: src[0],
            g: src[0],
            b: src[0],
            a: src[1],
        },
        PixelFormat::L8 => Pixel::opaque(Color::new(src[0], src[0], src[0])),
    }
}

/// Pack by truncating each channel to its high bits, no rounding.
#[inline(always)]
pub const fn pack_rgb565(color: Color) -> u16 {
    ((color.red as u16 & 0xF8) << 8) | ((color.green as u16 & 0xFC) << 3) | (color.blue as u16 >> 3)
}

/// Unpack by replicating the high bits into the low bits of each channel.
#[inline(always)]
pub const fn unpack_rgb565(value: u16) -> Color {
    let r5 = ((value >> 11) & 0x1F) as u8;
    let g6 = ((value >> 5) & 0x3F) as u8;
    let b5 = (value & 0x1F) as u8;

    Color::new(
        (r5 << 3) | (r5 >> 2),
        (g6 << 2) | (g6 >> 4),
        (b5 << 3) | (b5 >> 2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COLOR: Color = Color::new(0x12, 0x34, 0x56);

    fn round_trip(pixel: Pixel, format: PixelFormat) -> Pixel {
        decode(Encoded::new(pixel, format).as_bytes(), format)
    }

    #[test]
    fn argb8888_byte_order() {
        let encoded = Encoded::new(Pixel::opaque(TEST_COLOR), PixelFormat::Argb8888);
        assert_eq!(encoded.as_bytes(), &[0x56, 0x34, 0x12, 0xFF]);
        assert_eq!(
            u32::from_le_bytes(encoded.raw()),
            0xFF12_3456,
            "little-endian word is 0xAARRGGBB"
        );
    }

    #[test]
    fn argb8888_round_trips_every_channel_value() {
        for v in 0..=255u8 {
            let pixel = Pixel {
                r: v,
                g: v.wrapping_mul(7),
                b: 255 - v,
                a: v.wrapping_add(3),
            };
            assert_eq!(round_trip(pixel, PixelFormat::Argb8888), pixel);
        }
    }

    #[test]
    fn rgb888_round_trips() {
        for v in 0..=255u8 {
            let pixel = Pixel::opaque(Color::new(v, 255 - v, v / 2));
            assert_eq!(round_trip(pixel, PixelFormat::Rgb888), pixel);
        }
        assert_eq!(
            Encoded::new(Pixel::opaque(TEST_COLOR), PixelFormat::Rgb888).as_bytes(),
            &[0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn rgb565_truncates() {
        let expected: u16 = ((0x12 & 0xF8) << 8) | ((0x34 & 0xFC) << 3) | ((0x56 & 0xF8) >> 3);
        assert_eq!(pack_rgb565(TEST_COLOR), expected);
        assert_eq!(
            Encoded::new(Pixel::opaque(TEST_COLOR), PixelFormat::Rgb565).as_bytes(),
            &expected.to_le_bytes()
        );
        // Low bits never influence the result.
        assert_eq!(pack_rgb565(Color::new(0x17, 0x37, 0x57)), expected);
    }

    #[test]
    fn rgb565_unpack_is_stable() {
        for value in 0..=u16::MAX {
            assert_eq!(pack_rgb565(unpack_rgb565(value)), value);
        }
        assert_eq!(unpack_rgb565(0xFFFF), Color::WHITE);
        assert_eq!(unpack_rgb565(0), Color::BLACK);
    }

    #[test]
    fn grayscale_formats() {
        let l = TEST_COLOR.luminance();
        assert_eq!(
            Encoded::new(Pixel::opaque(TEST_COLOR), PixelFormat::L8).as_bytes(),
            &[l]
        );

        let translucent = Pixel {
            a: 0x40,
            ..Pixel::opaque(TEST_COLOR)
        };
        assert_eq!(
            Encoded::new(translucent, PixelFormat::Al88).as_bytes(),
            &[l, 0x40]
        );
        assert_eq!(
            decode(&[l, 0x40], PixelFormat::Al88),
            Pixel {
                r: l,
                g: l,
                b: l,
                a: 0x40
            }
        );
        assert_eq!(decode(&[l], PixelFormat::L8).a, 255);
    }

    #[test]
    fn decoded_alpha_follows_format() {
        let translucent = Pixel {
            a: 0x40,
            ..Pixel::opaque(Color::WHITE)
        };

        for format in PixelFormat::ALL {
            let expected = if format.has_alpha() { 0x40 } else { 255 };
            assert_eq!(round_trip(translucent, format).a, expected, "{format:?}");
        }

        let with_alpha: Vec<_> = PixelFormat::ALL
            .into_iter()
            .filter(|format| format.has_alpha())
            .collect();
        assert_eq!(with_alpha, [PixelFormat::Argb8888, PixelFormat::Al88]);
    }

    #[test]
    fn encoded_length_matches_format() {
        for format in PixelFormat::ALL {
            let encoded = Encoded::new(Pixel::opaque(TEST_COLOR), format);
            assert_eq!(encoded.as_bytes().len(), format.bytes_per_pixel());
        }
    }
}
