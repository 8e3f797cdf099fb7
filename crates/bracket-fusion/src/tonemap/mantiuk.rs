/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Contrast mapping tonemapping
//!
//! Log luminance gradients are measured on every level of a gaussian pyramid,
//! passed through a contrast response curve and scaled, then a luminance image
//! matching the scaled gradients is recovered with a conjugate gradient solve.
use log::trace;

use crate::errors::FusionErrors;
use crate::mathops::{dot, log_floor, luminance, map_luminance, normalize, signed_pow};
use crate::pyramid::{max_level, pyr_down, pyr_up, Plane};
use crate::radiance::RadianceImage;
use crate::tonemap::linear::linear_map;
use crate::traits::TonemapTrait;

/// Exponent of the contrast response curve
const RESPONSE_POWER: f32 = 0.4185;

const MAX_ITERATIONS: usize = 100;

/// Relative residual at which the solver stops, squared
const TARGET_ERROR: f64 = 1e-6;

/// Mantiuk tonemap operator
#[derive(Copy, Clone, Debug)]
pub struct Mantiuk {
    gamma:      f32,
    scale:      f32,
    saturation: f32
}

impl Default for Mantiuk {
    fn default() -> Self {
        Mantiuk::new(1.0, 0.7, 1.0)
    }
}

impl Mantiuk {
    /// Create a new Mantiuk operator
    ///
    /// # Arguments
    /// - gamma: Gamma applied to the output
    /// - scale: Contrast scale factor, lower values compress more. Usually in `[0.6,0.9]`
    /// - saturation: Color saturation, `1` keeps the input saturation
    pub fn new(gamma: f32, scale: f32, saturation: f32) -> Mantiuk {
        Mantiuk {
            gamma,
            scale,
            saturation
        }
    }

    fn map_contrast(&self, contrast: &mut Plane) {
        for x in contrast.data.iter_mut() {
            *x = signed_pow(signed_pow(*x, RESPONSE_POWER) * self.scale, 1.0 / RESPONSE_POWER);
        }
    }
}

/// `dst[x] = src[x+1] - src[x]`, last column is zero
fn forward_gradient_x(src: &Plane) -> Plane {
    let mut dst = Plane::zeros(src.width, src.height);

    for (out, row) in dst
        .data
        .chunks_exact_mut(src.width)
        .zip(src.data.chunks_exact(src.width))
    {
        for x in 0..src.width.saturating_sub(1) {
            out[x] = row[x + 1] - row[x];
        }
    }
    dst
}

/// `dst[y] = src[y+1] - src[y]`, last row is zero
fn forward_gradient_y(src: &Plane) -> Plane {
    let width = src.width;
    let mut dst = Plane::zeros(width, src.height);

    for y in 0..src.height.saturating_sub(1) {
        for x in 0..width {
            dst.data[y * width + x] = src.data[(y + 1) * width + x] - src.data[y * width + x];
        }
    }
    dst
}

/// `dst[x] = src[x] - src[x-1]`, first column is zero
fn backward_gradient_x(src: &Plane) -> Plane {
    let mut dst = Plane::zeros(src.width, src.height);

    for (out, row) in dst
        .data
        .chunks_exact_mut(src.width)
        .zip(src.data.chunks_exact(src.width))
    {
        for x in 1..src.width {
            out[x] = row[x] - row[x - 1];
        }
    }
    dst
}

/// `dst[y] = src[y] - src[y-1]`, first row is zero
fn backward_gradient_y(src: &Plane) -> Plane {
    let width = src.width;
    let mut dst = Plane::zeros(width, src.height);

    for y in 1..src.height {
        for x in 0..width {
            dst.data[y * width + x] = src.data[y * width + x] - src.data[(y - 1) * width + x];
        }
    }
    dst
}

/// Gradients of every level of a gaussian pyramid, at least one level
fn contrast_pyramid(src: &Plane) -> Vec<(Plane, Plane)> {
    let levels = max_level(src.width, src.height).max(1);
    let mut contrast = Vec::with_capacity(levels);

    let mut layer = src.clone();

    for _ in 0..levels {
        contrast.push((forward_gradient_x(&layer), forward_gradient_y(&layer)));
        layer = pyr_down(&layer);
    }
    contrast
}

/// Sum the divergence of every level, coarsest first, up-sampling on the way
fn divergence_sum(contrast: &[(Plane, Plane)]) -> Plane {
    let Some((last, _)) = contrast.last() else {
        return Plane::zeros(0, 0);
    };
    let mut sum = Plane::zeros(last.width, last.height);

    for (i, (x_contrast, y_contrast)) in contrast.iter().enumerate().rev() {
        sum.add_assign(&backward_gradient_x(x_contrast));
        sum.add_assign(&backward_gradient_y(y_contrast));

        if i != 0 {
            let (target, _) = &contrast[i - 1];
            sum = pyr_up(&sum, target.width, target.height);
        }
    }
    sum
}

/// The linear operator solved for, divergence of the multi-scale gradients
fn product(src: &Plane) -> Plane {
    divergence_sum(&contrast_pyramid(src))
}

impl TonemapTrait for Mantiuk {
    fn name(&self) -> &'static str {
        "mantiuk"
    }

    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        let (width, height) = image.dimensions();
        let mut output = image.clone();
        let channels = output.channels_mut();

        normalize(channels);

        let gray = luminance(channels);
        let log_gray = Plane::new(log_floor(&gray), width, height);

        let mut contrast = contrast_pyramid(&log_gray);

        for (x_contrast, y_contrast) in contrast.iter_mut() {
            self.map_contrast(x_contrast);
            self.map_contrast(y_contrast);
        }
        let right = divergence_sum(&contrast);

        // conjugate gradients, starting from the input log luminance
        let mut x = log_gray;
        let mut r = right.clone();
        r.sub_assign(&product(&x));

        let mut p = r.clone();
        let target = dot(&right.data, &right.data) * TARGET_ERROR;
        let mut rr = dot(&r.data, &r.data);

        let mut iterations = 0;

        while iterations < MAX_ITERATIONS && rr > target {
            let ap = product(&p);
            let dprod = dot(&p.data, &ap.data);

            if dprod.abs() <= f64::EPSILON {
                break;
            }
            let alpha = (rr / dprod) as f32;

            for (ri, api) in r.data.iter_mut().zip(&ap.data) {
                *ri -= alpha * api;
            }
            for (xi, pi) in x.data.iter_mut().zip(&p.data) {
                *xi += alpha * pi;
            }
            let new_rr = dot(&r.data, &r.data);
            let beta = (new_rr / rr) as f32;

            for (pi, ri) in p.data.iter_mut().zip(&r.data) {
                *pi = ri + beta * *pi;
            }
            rr = new_rr;
            iterations += 1;
        }
        trace!("Contrast mapping solved in {iterations} iterations");

        let new_lum: Vec<f32> = x.data.iter().map(|v| v.exp()).collect();

        map_luminance(channels, &gray, &new_lum, self.saturation);
        linear_map(channels, self.gamma);

        Ok(output)
    }
}
