/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Edge preserving tonemapping
//!
//! The log luminance is split into a base layer, obtained with a bilateral
//! filter, and a detail layer. Only the base layer is compressed so local
//! detail survives.
use crate::bilateral_filter::bilateral_filter;
use crate::errors::FusionErrors;
use crate::mathops::{apply_gamma, log_floor, luminance, map_luminance, min_max, normalize};
use crate::radiance::RadianceImage;
use crate::traits::TonemapTrait;

/// Durand tonemap operator
#[derive(Copy, Clone, Debug)]
pub struct Durand {
    gamma:       f32,
    contrast:    f32,
    saturation:  f32,
    sigma_space: f32,
    sigma_color: f32
}

impl Default for Durand {
    fn default() -> Self {
        Durand::new(1.0, 4.0, 1.0, 2.0, 2.0)
    }
}

impl Durand {
    /// Create a new Durand operator
    ///
    /// # Arguments
    /// - gamma: Gamma applied to the output
    /// - contrast: Ratio between the largest and smallest base layer value, in log space
    /// - saturation: Color saturation, `1` keeps the input saturation
    /// - sigma_space: Spatial sigma of the bilateral filter
    /// - sigma_color: Range sigma of the bilateral filter
    pub fn new(
        gamma: f32, contrast: f32, saturation: f32, sigma_space: f32, sigma_color: f32
    ) -> Durand {
        Durand {
            gamma,
            contrast,
            saturation,
            sigma_space,
            sigma_color
        }
    }
}

impl TonemapTrait for Durand {
    fn name(&self) -> &'static str {
        "durand"
    }

    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        let (width, height) = image.dimensions();
        let mut output = image.clone();
        let channels = output.channels_mut();

        normalize(channels);

        let gray = luminance(channels);
        let log_gray = log_floor(&gray);

        let base = bilateral_filter(&log_gray, width, height, self.sigma_color, self.sigma_space);
        let (min, max) = min_max(&base);

        let scale = if max - min > f32::EPSILON {
            self.contrast / (max - min)
        } else {
            1.0
        };
        let new_lum: Vec<f32> = base
            .iter()
            .zip(&log_gray)
            .map(|(b, l)| (b * (scale - 1.0) + l).exp())
            .collect();

        map_luminance(channels, &gray, &new_lum, self.saturation);
        // no renormalization here, the base layer range is already fixed
        apply_gamma(channels, self.gamma);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use zune_core::colorspace::ColorSpace;

    use crate::radiance::RadianceImage;
    use crate::tonemap::durand::Durand;
    use crate::traits::TonemapTrait;

    #[test]
    fn test_durand_compresses_range() {
        // a bright window on a dark wall
        let image = RadianceImage::from_fn(24, 24, ColorSpace::RGB, |x, y| {
            let v = if (8..16).contains(&x) && (8..16).contains(&y) { 500.0 } else { 0.5 };
            [v, v, v]
        });
        let output = Durand::default().tonemap(&image).unwrap();

        // edge pixels of the window may overshoot a little
        let (lo, hi) = output.min_max();
        assert!(lo >= 0.0);
        assert!(hi < 1.01, "{hi}");

        // the window is still brighter than the wall
        let red = &output.channels_ref()[0];
        assert!(red[12 * 24 + 12] > red[0]);
    }
}
