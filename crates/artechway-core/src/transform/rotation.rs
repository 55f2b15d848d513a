//! Image rotation onto an expanded, transparent canvas.
//!
//! Mirrors what the cropper does with a 2D canvas: the canvas is enlarged to
//! the rotated bounding box, translated to its center, rotated, and the source
//! is drawn offset by its own half size. Positive angles turn clockwise on
//! screen, as `CanvasRenderingContext2D.rotate` does.
//!
//! # Algorithm
//!
//! Inverse mapping with pixel-center sampling: for each destination pixel
//! center we find the source point that lands on it and interpolate
//! bilinearly. With the canvas matrix `R(θ) = [cos -sin; sin cos]` in y-down
//! coordinates, the inverse transform is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! Interpolation happens on premultiplied color so transparent corners do not
//! darken the edges.

use image::imageops;

use super::TransformError;
use crate::decode::RasterImage;

const ANGLE_EPSILON: f64 = 0.001;

/// Quarter turns for angles that are (nearly) exact multiples of 90°.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < ANGLE_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// ```text
/// new_w = |w*cos| + |h*sin|
/// new_h = |w*sin| + |h*cos|
/// ```
/// rounded to whole pixels. Multiples of 90° are exact.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image about its center onto the rotated bounding box.
///
/// Areas of the expanded canvas not covered by the source are transparent.
///
/// # Errors
///
/// `TransformError::InvalidAngle` for NaN or infinite angles,
/// `TransformError::SurfaceUnavailable` if the source buffer is malformed.
pub fn rotate(image: &RasterImage, angle_degrees: f64) -> Result<RasterImage, TransformError> {
    if image.is_empty() {
        return Err(TransformError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    if !angle_degrees.is_finite() {
        return Err(TransformError::InvalidAngle(angle_degrees));
    }

    if let Some(turns) = quarter_turns(angle_degrees) {
        if turns == 0 {
            return Ok(image.clone());
        }
        let rgba = image
            .to_rgba_image()
            .ok_or(TransformError::SurfaceUnavailable)?;
        let rotated = match turns {
            1 => imageops::rotate90(&rgba),
            2 => imageops::rotate180(&rgba),
            _ => imageops::rotate270(&rgba),
        };
        return Ok(RasterImage::from_rgba_image(rotated));
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * RasterImage::CHANNELS];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            let pixel = sample_bilinear(image, src_x - 0.5, src_y - 0.5);
            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * RasterImage::CHANNELS;
            output[idx..idx + RasterImage::CHANNELS].copy_from_slice(&pixel);
        }
    }

    log::debug!(
        "rotated {}x{} by {angle_degrees}° onto {dst_w}x{dst_h}",
        image.width,
        image.height
    );

    Ok(RasterImage::new(dst_w, dst_h, output))
}

/// Premultiplied pixel, transparent outside the image.
#[inline]
fn premultiplied(image: &RasterImage, x: i64, y: i64) -> [f64; 4] {
    if x < 0 || y < 0 || x >= image.width as i64 || y >= image.height as i64 {
        return [0.0; 4];
    }
    let [r, g, b, a] = image.pixel(x as u32, y as u32);
    let alpha = a as f64 / 255.0;
    [r as f64 * alpha, g as f64 * alpha, b as f64 * alpha, a as f64]
}

/// Sample at pixel-index coordinates `(x, y)` using bilinear interpolation.
///
/// Neighbours outside the image count as transparent, which gives the
/// soft edge a canvas draws along a rotated border.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (premultiplied(image, x0, y0), (1.0 - fx) * (1.0 - fy)),
        (premultiplied(image, x0 + 1, y0), fx * (1.0 - fy)),
        (premultiplied(image, x0, y0 + 1), (1.0 - fx) * fy),
        (premultiplied(image, x0 + 1, y0 + 1), fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (px, weight) in taps {
        for i in 0..4 {
            acc[i] += px[i] * weight;
        }
    }

    let alpha = acc[3].clamp(0.0, 255.0).round();
    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }

    let unpremul = |v: f64| (v * 255.0 / acc[3]).clamp(0.0, 255.0).round() as u8;
    [unpremul(acc[0]), unpremul(acc[1]), unpremul(acc[2]), alpha as u8]
}
