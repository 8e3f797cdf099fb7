/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adaptive logarithmic mapping
//!
//! Luminance is compressed with a logarithm whose base varies between 2 and
//! 10 depending on how bright the pixel is relative to the image maximum,
//! `bias` controls how fast the base grows.
use crate::errors::FusionErrors;
use crate::mathops::{log_floor, luminance, map_luminance, mean, min_max, normalize};
use crate::radiance::RadianceImage;
use crate::tonemap::linear::linear_map;
use crate::traits::TonemapTrait;

/// Drago tonemap operator
#[derive(Copy, Clone, Debug)]
pub struct Drago {
    gamma:      f32,
    saturation: f32,
    bias:       f32
}

impl Default for Drago {
    fn default() -> Self {
        Drago::new(1.0, 1.0, 0.85)
    }
}

impl Drago {
    /// Create a new Drago operator
    ///
    /// # Arguments
    /// - gamma: Gamma applied to the output
    /// - saturation: Color saturation, `1` keeps the input saturation
    /// - bias: Value in `(0,1)`, usually `[0.7,0.9]`
    pub fn new(gamma: f32, saturation: f32, bias: f32) -> Drago {
        Drago {
            gamma,
            saturation,
            bias
        }
    }
}

impl TonemapTrait for Drago {
    fn name(&self) -> &'static str {
        "drago"
    }

    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        let mut output = image.clone();
        let channels = output.channels_mut();

        normalize(channels);

        let mut gray = luminance(channels);
        let log_mean = mean(&log_floor(&gray)).exp();
        gray.iter_mut().for_each(|x| *x /= log_mean);

        let (_, max) = min_max(&gray);

        if max <= 0.0 {
            channels.iter_mut().flatten().for_each(|x| *x = 0.0);
            return Ok(output);
        }
        let exponent = self.bias.ln() / 0.5_f32.ln();

        let map: Vec<f32> = gray
            .iter()
            .map(|g| {
                let base = (2.0 + 8.0 * (g / max).powf(exponent)).ln();
                (g + 1.0).ln() / base
            })
            .collect();

        map_luminance(channels, &gray, &map, self.saturation);
        linear_map(channels, self.gamma);

        Ok(output)
    }
}
