/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Edge preserving smoothing of a single `f32` plane
use crate::pyramid::reflect_101;

/// Smooth `src` while preserving edges
///
/// Each output pixel is the weighted average of pixels within a circular
/// window of radius `round(1.5*sigma_space)`, each neighbour weighted by
/// its spatial distance and by how close its value is to the centre value.
///
/// Non-positive sigmas are treated as `1.0`
pub fn bilateral_filter(
    src: &[f32], width: usize, height: usize, mut sigma_color: f32, mut sigma_space: f32
) -> Vec<f32> {
    if sigma_color <= 0.0 {
        sigma_color = 1.0;
    }
    if sigma_space <= 0.0 {
        sigma_space = 1.0;
    }
    let gauss_color_coeff = -0.5 / (sigma_color * sigma_color);
    let gauss_space_coeff = -0.5 / (sigma_space * sigma_space);

    let radius = (sigma_space * 1.5).round() as isize;

    // offsets inside the circle and their spatial weight
    let mut space_weight = Vec::new();
    let mut space_offs = Vec::new();

    for i in -radius..=radius {
        for j in -radius..=radius {
            let r = ((i * i + j * j) as f32).sqrt();

            if r > radius as f32 {
                continue;
            }
            space_weight.push((r * r * gauss_space_coeff).exp());
            space_offs.push((i, j));
        }
    }
    let mut dest = vec![0.0_f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let val0 = src[y * width + x];
            let mut sum = 0.0;
            let mut wsum = 0.0;

            for (&(dy, dx), space) in space_offs.iter().zip(&space_weight) {
                let sy = reflect_101(y as isize + dy, height);
                let sx = reflect_101(x as isize + dx, width);
                let val = src[sy * width + sx];
                let diff = val - val0;

                let w = space * (diff * diff * gauss_color_coeff).exp();
                sum += val * w;
                wsum += w;
            }
            // the centre always contributes a weight of 1
            dest[y * width + x] = sum / wsum;
        }
    }
    dest
}
