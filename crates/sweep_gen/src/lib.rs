//! Deterministic inputs for fill tests and benchmarks.
//!
//! Geometry is swept exhaustively, colors, opacities and masks come from a seeded
//! [`StdRng`] so every run sees the same values.

use peniko::color::{AlphaColor, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

pub const SEED: [u8; 32] = [0; 32];

/// The extents of a geometry sweep.
#[derive(Clone, Debug)]
pub struct SweepParams {
    /// Rectangle widths in pixels.
    pub widths: RangeInclusive<usize>,
    /// Rectangle heights in pixels.
    pub heights: RangeInclusive<usize>,
    /// How far the first pixel is moved away from an aligned address, in bytes.
    pub unaligns: RangeInclusive<usize>,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            widths: 8..=16,
            heights: 1..=16,
            unaligns: 0..=16,
        }
    }
}

/// One rectangle of a sweep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub width: usize,
    pub height: usize,
    /// Pixels between the starts of two rows, at least `width`.
    pub stride_px: usize,
    pub unalign: usize,
}

impl Case {
    /// The destination stride in bytes for pixels of `bpp` bytes.
    pub fn stride(&self, bpp: usize) -> usize {
        self.stride_px * bpp
    }
}

/// Every combination of width, height, stride between `width` and `2 * width` pixels,
/// and misalignment.
pub struct SweepIterator {
    params: SweepParams,
    next: Option<Case>,
}

impl SweepIterator {
    pub fn new(params: SweepParams) -> Self {
        let next = first(&params);

        Self { params, next }
    }
}

fn first(params: &SweepParams) -> Option<Case> {
    let width = *params.widths.start();
    let height = *params.heights.start();
    let unalign = *params.unaligns.start();

    let empty = params.widths.is_empty() || params.heights.is_empty() || params.unaligns.is_empty();

    (!empty).then_some(Case {
        width,
        height,
        stride_px: width,
        unalign,
    })
}

impl Iterator for SweepIterator {
    type Item = Case;

    fn next(&mut self) -> Option<Case> {
        let current = self.next?;
        let p = &self.params;
        let mut n = current;

        // Innermost to outermost: misalignment, stride, height, width.
        if n.unalign < *p.unaligns.end() {
            n.unalign += 1;
        } else {
            n.unalign = *p.unaligns.start();

            if n.stride_px < 2 * n.width {
                n.stride_px += 1;
            } else if n.height < *p.heights.end() {
                n.height += 1;
                n.stride_px = n.width;
            } else if n.width < *p.widths.end() {
                n.width += 1;
                n.height = *p.heights.start();
                n.stride_px = n.width;
            } else {
                self.next = None;
                return Some(current);
            }
        }

        self.next = Some(n);

        Some(current)
    }
}

/// Random opaque colors.
pub struct ColorIter {
    rng: StdRng,
}

impl ColorIter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_seed(SEED),
        }
    }
}

impl Default for ColorIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for ColorIter {
    type Item = AlphaColor<Srgb>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(gen_color(&mut self.rng, 255))
    }
}

/// Random opacities and masks.
pub struct MaskGen {
    rng: StdRng,
}

impl MaskGen {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_seed(SEED),
        }
    }

    /// An opacity strictly between transparent and opaque.
    pub fn partial_opa(&mut self) -> u8 {
        self.rng.gen_range(1..=254)
    }

    /// `len` mask bytes.
    ///
    /// Every fourth byte is 0 or 255 so masks hit the skip and overwrite cases too.
    pub fn mask(&mut self, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| match i % 8 {
                3 => 0,
                7 => 255,
                _ => self.rng.gen(),
            })
            .collect()
    }
}

impl Default for MaskGen {
    fn default() -> Self {
        Self::new()
    }
}

fn gen_color(rng: &mut StdRng, alpha: u8) -> AlphaColor<Srgb> {
    let r = rng.gen_range(0..=255);
    let g = rng.gen_range(0..=255);
    let b = rng.gen_range(0..=255);

    AlphaColor::from_rgba8(r, g, b, alpha)
}
