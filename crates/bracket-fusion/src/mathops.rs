/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Small per-pixel routines shared by merge and tonemap operations

/// Rec.601 luma weights for R, G and B
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Smallest value passed to `ln` when computing log luminance
pub const LOG_FLOOR: f32 = 1e-4;

/// Compute the luminance plane of an RGB or Luma image
///
/// For a single channel the channel itself is the luminance
pub fn luminance(channels: &[Vec<f32>]) -> Vec<f32> {
    if channels.len() < 3 {
        return channels[0].clone();
    }
    channels[0]
        .iter()
        .zip(&channels[1])
        .zip(&channels[2])
        .map(|((r, g), b)| LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b)
        .collect()
}

/// Natural log of every value, values below [`LOG_FLOOR`] are raised to it first
pub fn log_floor(values: &[f32]) -> Vec<f32> {
    values.iter().map(|x| x.max(LOG_FLOOR).ln()).collect()
}

/// Minimum and maximum of a buffer
///
/// An empty buffer returns `(inf,-inf)`
pub fn min_max(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(*x), hi.max(*x))
        })
}

pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|x| f64::from(*x)).sum();
    (sum / values.len() as f64) as f32
}

/// Dot product accumulated in `f64`
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

/// Linearly map all channels to `[0,1]` using the global minimum and maximum
///
/// A constant image is left untouched
pub fn normalize(channels: &mut [Vec<f32>]) {
    let (lo, hi) = channels
        .iter()
        .map(|c| min_max(c))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |acc, (lo, hi)| {
            (acc.0.min(lo), acc.1.max(hi))
        });

    let range = hi - lo;

    if range > f32::EPSILON {
        let inv_range = 1.0 / range;

        for x in channels.iter_mut().flatten() {
            *x = (*x - lo) * inv_range;
        }
    }
}

/// Apply `x^(1/gamma)` to every value
///
/// Absolute values are used so negative inputs cannot produce NaN
pub fn apply_gamma(channels: &mut [Vec<f32>], gamma: f32) {
    if (gamma - 1.0).abs() <= f32::EPSILON {
        return;
    }
    let inv_gamma = 1.0 / gamma;

    for x in channels.iter_mut().flatten() {
        *x = x.abs().powf(inv_gamma);
    }
}

/// Replace the luminance of an image
///
/// Every channel becomes `(c / lum)^saturation * new_lum`, pixels with zero
/// luminance map to zero
pub fn map_luminance(channels: &mut [Vec<f32>], lum: &[f32], new_lum: &[f32], saturation: f32) {
    for channel in channels.iter_mut() {
        for ((c, l), n) in channel.iter_mut().zip(lum).zip(new_lum) {
            *c = if *l > 0.0 {
                (*c / *l).abs().powf(saturation) * n
            } else {
                0.0
            };
        }
    }
}

/// Clamp every value to `[0,1]`, NaN becomes `0`
pub fn clamp_unit(values: &mut [f32]) {
    for x in values.iter_mut() {
        // max returns the other operand for NaN
        *x = x.max(0.0).min(1.0);
    }
}

/// Multiply every value by `factor`
pub fn scale(values: &mut [f32], factor: f32) {
    if (factor - 1.0).abs() <= f32::EPSILON {
        return;
    }
    for x in values.iter_mut() {
        *x *= factor;
    }
}

/// Convert a value in `[0,1]` to 8 bits
///
/// The scaled value is clamped before the cast so it can never wrap
pub fn unit_to_u8(value: f32) -> u8 {
    (value * 255.0).round().max(0.0).min(255.0) as u8
}

/// `sign(x) * |x|^power`
#[inline]
pub fn signed_pow(x: f32, power: f32) -> f32 {
    x.abs().powf(power).copysign(x)
}

#[cfg(test)]
mod tests {
    use crate::mathops::{
        apply_gamma, clamp_unit, luminance, map_luminance, normalize, signed_pow, unit_to_u8
    };

    #[test]
    fn test_clamp_unit() {
        let mut values = [-1.0, 0.25, 3.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY];
        clamp_unit(&mut values);
        assert_eq!(values, [0.0, 0.25, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unit_to_u8_never_wraps() {
        assert_eq!(unit_to_u8(2.0), 255);
        assert_eq!(unit_to_u8(-2.0), 0);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(f32::NAN), 0);
    }

    #[test]
    fn test_normalize() {
        let mut channels = vec![vec![2.0, 4.0], vec![6.0, 10.0]];
        normalize(&mut channels);
        assert_eq!(channels, vec![vec![0.0, 0.25], vec![0.5, 1.0]]);

        // constant images are left alone
        let mut constant = vec![vec![3.0; 4]];
        normalize(&mut constant);
        assert_eq!(constant, vec![vec![3.0; 4]]);
    }

    #[test]
    fn test_gamma() {
        let mut channels = vec![vec![0.25, 1.0]];
        apply_gamma(&mut channels, 2.0);
        assert!((channels[0][0] - 0.5).abs() < 1e-6);
        assert!((channels[0][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        let channels = vec![vec![0.5; 3], vec![0.5; 3], vec![0.5; 3]];
        let lum = luminance(&channels);
        assert!(lum.iter().all(|x| (x - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_map_luminance_zero() {
        let mut channels = vec![vec![0.0, 0.4]];
        map_luminance(&mut channels, &[0.0, 0.4], &[1.0, 0.8], 1.0);
        assert_eq!(channels[0][0], 0.0);
        assert!((channels[0][1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_signed_pow() {
        assert!((signed_pow(-4.0, 0.5) + 2.0).abs() < 1e-6);
        assert!((signed_pow(9.0, 0.5) - 3.0).abs() < 1e-6);
        assert_eq!(signed_pow(0.0, 0.5), 0.0);
    }
}
