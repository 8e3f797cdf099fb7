/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure fusion without exposure times
//!
//! Every exposure gets a per pixel weight, the product of
//!
//! - contrast: absolute laplacian of the luma
//! - saturation: standard deviation across the color channels
//! - well-exposedness: how close each channel is to `0.5`
//!
//! each raised to a configurable power. Weights are normalized per pixel and the
//! exposures are blended level by level over laplacian pyramids, then the
//! blended pyramid is collapsed.
//!
//! The output is roughly in `[0,1]` but may overshoot slightly.
use log::debug;

use crate::errors::FusionErrors;
use crate::mathops::luminance;
use crate::pyramid::{
    collapse_pyramid, gaussian_pyramid, laplacian, max_level, to_laplacian_pyramid, Plane
};
use crate::radiance::{LdrFrame, RadianceImage};
use crate::traits::MergeTrait;

/// Added to every weight so that pixels where all
/// measures vanish still get an even blend
const WEIGHT_EPSILON: f32 = 1e-12;

/// Spread of the well-exposedness gaussian, `2*0.2^2`
const WELL_EXPOSED_SPREAD: f32 = 0.08;

/// Exposure fusion merge
#[derive(Copy, Clone, Debug)]
pub struct MergeMertens {
    contrast_weight:   f32,
    saturation_weight: f32,
    exposure_weight:   f32
}

impl Default for MergeMertens {
    fn default() -> Self {
        MergeMertens::new(1.0, 1.0, 0.0)
    }
}

impl MergeMertens {
    /// Create a new exposure fusion operation
    ///
    /// # Arguments
    /// - contrast_weight: exponent of the contrast measure
    /// - saturation_weight: exponent of the saturation measure
    /// - exposure_weight: exponent of the well-exposedness measure
    pub fn new(contrast_weight: f32, saturation_weight: f32, exposure_weight: f32) -> MergeMertens {
        MergeMertens {
            contrast_weight,
            saturation_weight,
            exposure_weight
        }
    }

    fn weight_map(&self, channels: &[Vec<f32>], width: usize, height: usize) -> Vec<f32> {
        let gray = Plane::new(luminance(channels), width, height);
        let contrast = laplacian(&gray);

        let mut weights = vec![0.0_f32; width * height];

        for (i, w) in weights.iter_mut().enumerate() {
            let mut weight = contrast.data[i].abs().powf(self.contrast_weight);

            // saturation is only defined for color images
            if channels.len() == 3 {
                let mean = channels.iter().map(|c| c[i]).sum::<f32>() / 3.0;
                let saturation = channels
                    .iter()
                    .map(|c| (c[i] - mean) * (c[i] - mean))
                    .sum::<f32>()
                    .sqrt();

                weight *= saturation.powf(self.saturation_weight);
            }
            let well_exposed = channels
                .iter()
                .map(|c| (-(c[i] - 0.5) * (c[i] - 0.5) / WELL_EXPOSED_SPREAD).exp())
                .product::<f32>();

            weight *= well_exposed.powf(self.exposure_weight);

            *w = weight + WEIGHT_EPSILON;
        }
        weights
    }
}

impl MergeTrait for MergeMertens {
    fn name(&self) -> &'static str {
        "mertens"
    }

    fn needs_exposure_times(&self) -> bool {
        false
    }

    fn merge_impl(&self, frames: &[LdrFrame], _: &[f32]) -> Result<RadianceImage, FusionErrors> {
        let (width, height) = frames[0].dimensions();
        let colorspace = frames[0].colorspace();
        let num_channels = frames[0].num_channels();

        let images: Vec<Vec<Vec<f32>>> = frames.iter().map(LdrFrame::to_unit_f32).collect();

        let mut weights: Vec<Vec<f32>> = images
            .iter()
            .map(|channels| self.weight_map(channels, width, height))
            .collect();

        let mut weight_sum = vec![0.0_f32; width * height];

        for weight in &weights {
            for (sum, w) in weight_sum.iter_mut().zip(weight) {
                *sum += w;
            }
        }
        let levels = max_level(width, height);
        debug!("Blending {} exposures over {} pyramid levels", frames.len(), levels + 1);

        // one result pyramid per channel
        let mut result: Vec<Vec<Plane>> = Vec::with_capacity(num_channels);

        for (channels, weight) in images.into_iter().zip(weights.iter_mut()) {
            for (w, sum) in weight.iter_mut().zip(&weight_sum) {
                *w /= sum;
            }
            let weight_pyramid =
                gaussian_pyramid(Plane::new(core::mem::take(weight), width, height), levels);

            for (c, channel) in channels.into_iter().enumerate() {
                let mut pyramid = gaussian_pyramid(Plane::new(channel, width, height), levels);
                to_laplacian_pyramid(&mut pyramid);

                for (level, w) in pyramid.iter_mut().zip(&weight_pyramid) {
                    for (value, weight) in level.data.iter_mut().zip(&w.data) {
                        *value *= weight;
                    }
                }
                if let Some(accumulated) = result.get_mut(c) {
                    for (acc, level) in accumulated.iter_mut().zip(&pyramid) {
                        acc.add_assign(level);
                    }
                } else {
                    result.push(pyramid);
                }
            }
        }
        let channels = result
            .into_iter()
            .map(|pyramid| collapse_pyramid(pyramid).data)
            .collect();

        RadianceImage::new(channels, width, height, colorspace)
    }
}
