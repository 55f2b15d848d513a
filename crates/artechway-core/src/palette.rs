//! Dominant-color palette extraction.
//!
//! Sampled pixel colors are quantized with median cut: the color box holding
//! the most pixels is repeatedly split at the weighted median of its widest
//! channel until there are as many boxes as requested colors. Each box
//! contributes its population-weighted average, and boxes are emitted most
//! populous first.
//!
//! Splits always fall between two distinct channel values, so every box lies
//! strictly on one side of each of its ancestors' cut planes. Box averages are
//! therefore pairwise distinct and the palette never repeats a color.

use std::collections::HashMap;

use crate::decode::{DecodeError, RasterImage};
use crate::sample::ColorSample;

/// Palette size used by the color palette tool.
pub const DEFAULT_PALETTE_SIZE: usize = 8;

/// Sampling stride used by the color palette tool (every 10th pixel).
pub const DEFAULT_SAMPLE_QUALITY: u32 = 10;

type Rgb = [u8; 3];

/// Distinct colors of one median-cut box with their pixel counts.
struct ColorBox {
    colors: Vec<(Rgb, u32)>,
    population: u64,
}

impl ColorBox {
    fn new(colors: Vec<(Rgb, u32)>) -> Self {
        let population = colors.iter().map(|&(_, n)| n as u64).sum();
        Self { colors, population }
    }

    fn is_splittable(&self) -> bool {
        self.colors.len() > 1
    }

    /// Channel with the largest value range, and that range.
    fn widest_channel(&self) -> (usize, u8) {
        (0..3)
            .map(|ch| {
                let (lo, hi) = self
                    .colors
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                        (lo.min(c[ch]), hi.max(c[ch]))
                    });
                (ch, hi - lo)
            })
            .max_by_key(|&(ch, range)| (range, std::cmp::Reverse(ch)))
            .unwrap_or((0, 0))
    }

    /// Split at the weighted median of the widest channel.
    ///
    /// Caller guarantees the box holds at least two distinct colors, so the
    /// widest channel has a non-zero range and both halves are non-empty.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (ch, _) = self.widest_channel();
        self.colors.sort_unstable_by_key(|&(c, _)| (c[ch], c));

        let half = self.population.div_ceil(2);
        let mut running = 0u64;
        let median = self
            .colors
            .iter()
            .find(|&&(_, n)| {
                running += n as u64;
                running >= half
            })
            .map(|&(c, _)| c[ch])
            .unwrap_or(0);

        let max = self.colors.last().map(|&(c, _)| c[ch]).unwrap_or(0);
        let cut_value = if median == max { median - 1 } else { median };
        let cut = self.colors.partition_point(|&(c, _)| c[ch] <= cut_value);

        let upper = self.colors.split_off(cut);
        (ColorBox::new(self.colors), ColorBox::new(upper))
    }

    fn average(&self) -> Rgb {
        let mut sum = [0u64; 3];
        for &(c, n) in &self.colors {
            for ch in 0..3 {
                sum[ch] += c[ch] as u64 * n as u64;
            }
        }
        let pop = self.population.max(1);
        sum.map(|s| ((s + pop / 2) / pop) as u8)
    }
}

/// Extract up to `max_colors` representative colors, most prominent first.
///
/// `quality` is the sampling stride: 1 reads every pixel, 10 every tenth.
/// Zero is treated as 1. Fully transparent pixels carry no color and are
/// skipped.
///
/// A strided sample that finds fewer than `max_colors` distinct colors falls
/// back to a full scan, so the palette is only shorter than `max_colors` when
/// the image itself has fewer distinct colors. In that case exactly those
/// colors are returned, ordered by frequency.
///
/// # Errors
///
/// Returns `DecodeError::EmptyImage` for a zero-sized image and
/// `DecodeError::NoReadablePixels` when every pixel is transparent.
pub fn extract_palette(
    image: &RasterImage,
    max_colors: usize,
    quality: u32,
) -> Result<Vec<ColorSample>, DecodeError> {
    if image.is_empty() {
        return Err(DecodeError::EmptyImage);
    }

    let mut counts = sample_counts(image, quality);
    if counts.len() < max_colors.max(1) && quality > 1 {
        counts = sample_counts(image, 1);
    }
    if counts.is_empty() {
        return Err(DecodeError::NoReadablePixels);
    }
    if max_colors == 0 {
        return Ok(Vec::new());
    }

    let mut colors: Vec<(Rgb, u32)> = counts.into_iter().collect();

    let palette: Vec<(Rgb, u64)> = if colors.len() <= max_colors {
        colors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        colors.into_iter().map(|(c, n)| (c, n as u64)).collect()
    } else {
        let mut boxes = median_cut(colors, max_colors);
        boxes.sort_by(|a, b| b.population.cmp(&a.population));
        boxes.iter().map(|b| (b.average(), b.population)).collect()
    };

    log::debug!(
        "extracted {} colors from {}x{} image (stride {})",
        palette.len(),
        image.width,
        image.height,
        quality.max(1)
    );

    Ok(palette
        .into_iter()
        .map(|([r, g, b], _)| ColorSample::from_rgb(r, g, b))
        .collect())
}

/// Count opaque-enough colors at every `quality`-th pixel.
fn sample_counts(image: &RasterImage, quality: u32) -> HashMap<Rgb, u32> {
    let stride = quality.max(1) as usize;
    let mut counts = HashMap::new();

    for px in image
        .pixels
        .chunks_exact(RasterImage::CHANNELS)
        .step_by(stride)
    {
        if px[3] == 0 {
            continue;
        }
        *counts.entry([px[0], px[1], px[2]]).or_insert(0u32) += 1;
    }

    counts
}

/// Split into exactly `target` boxes. Requires more distinct colors than
/// `target`, which guarantees a splittable box exists at every step.
fn median_cut(colors: Vec<(Rgb, u32)>, target: usize) -> Vec<ColorBox> {
    let mut boxes = vec![ColorBox::new(colors)];

    while boxes.len() < target {
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_splittable())
            .max_by(|(ia, a), (ib, b)| a.population.cmp(&b.population).then(ib.cmp(ia)))
            .map(|(i, _)| i)
        else {
            break;
        };

        let (lower, upper) = boxes.swap_remove(idx).split();
        boxes.push(lower);
        boxes.push(upper);
    }

    boxes
}
