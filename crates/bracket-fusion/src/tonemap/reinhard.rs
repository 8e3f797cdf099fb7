/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global photographic tonemapping
//!
//! Each value is compressed with `c / (c + adapt)` where `adapt` is a mix of the
//! pixel's own value, its luminance, and the image averages, raised to a key
//! derived from the log luminance distribution.
use crate::errors::FusionErrors;
use crate::mathops::{log_floor, luminance, mean, min_max, normalize};
use crate::radiance::RadianceImage;
use crate::tonemap::linear::linear_map;
use crate::traits::TonemapTrait;

/// Reinhard tonemap operator
#[derive(Copy, Clone, Debug)]
pub struct Reinhard {
    gamma:       f32,
    intensity:   f32,
    light_adapt: f32,
    color_adapt: f32
}

impl Default for Reinhard {
    fn default() -> Self {
        Reinhard::new(1.0, 0.0, 1.0, 0.0)
    }
}

impl Reinhard {
    /// Create a new Reinhard operator
    ///
    /// # Arguments
    /// - gamma: Gamma applied to the output
    /// - intensity: Result intensity, larger is brighter. Usually in `[-8,8]`
    /// - light_adapt: `1` adapts to the pixel value, `0` to the image average
    /// - color_adapt: `1` adapts channels independently, `0` uses luminance only
    pub fn new(gamma: f32, intensity: f32, light_adapt: f32, color_adapt: f32) -> Reinhard {
        Reinhard {
            gamma,
            intensity,
            light_adapt,
            color_adapt
        }
    }
}

impl TonemapTrait for Reinhard {
    fn name(&self) -> &'static str {
        "reinhard"
    }

    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        let mut output = image.clone();
        let channels = output.channels_mut();

        normalize(channels);

        let gray = luminance(channels);
        let log_gray = log_floor(&gray);

        let log_mean = mean(&log_gray);
        let (log_min, log_max) = min_max(&log_gray);

        // a flat image has no key, pick the middle
        let key = if log_max - log_min > f32::EPSILON {
            (log_max - log_mean) / (log_max - log_min)
        } else {
            0.5
        };
        let map_key = 0.3 + 0.7 * key.powf(1.4);
        let intensity = (-self.intensity).exp();

        let gray_mean = mean(&gray);
        let (la, ca) = (self.light_adapt, self.color_adapt);

        for channel in channels.iter_mut() {
            let global = ca * mean(channel) + (1.0 - ca) * gray_mean;

            for (c, g) in channel.iter_mut().zip(&gray) {
                let adapt = ca * *c + (1.0 - ca) * g;
                let adapt = la * adapt + (1.0 - la) * global;
                let adapt = (intensity * adapt).powf(map_key);

                let denominator = adapt + *c;

                *c = if denominator > 0.0 { *c / denominator } else { 0.0 };
            }
        }
        linear_map(channels, self.gamma);

        Ok(output)
    }
}
