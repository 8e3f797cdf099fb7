/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::errors::FusionErrors;
use crate::mathops::{apply_gamma, normalize};
use crate::radiance::RadianceImage;
use crate::traits::TonemapTrait;

/// Normalize radiance to `[0,1]` and apply a gamma curve
///
/// Every other operator ends with this step
#[derive(Copy, Clone, Debug)]
pub struct Linear {
    gamma: f32
}

impl Default for Linear {
    fn default() -> Self {
        Linear::new(1.0)
    }
}

impl Linear {
    pub fn new(gamma: f32) -> Linear {
        Linear { gamma }
    }
}

/// Normalize by the global minimum and maximum then apply `x^(1/gamma)`
pub(crate) fn linear_map(channels: &mut [Vec<f32>], gamma: f32) {
    normalize(channels);
    apply_gamma(channels, gamma);
}

impl TonemapTrait for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        let mut output = image.clone();
        linear_map(output.channels_mut(), self.gamma);

        Ok(output)
    }
}
