/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Planar image buffers
//!
//! An image here is represented as
//!
//! - separated channels
//!     - of one element type (`u8` for exposures, `f32` for radiance)
//!         - representing either an RGB or a Luma colorspace
//!             - with the same width and height
//!
//! Merge operations consume [`LdrFrame`]s and produce a [`RadianceImage`],
//! tonemap operations map a [`RadianceImage`] to another [`RadianceImage`]
//! whose values are meant to lie in `[0,1]`
use zune_core::colorspace::ColorSpace;

use crate::errors::FusionErrors;
use crate::mathops;

/// A planar image, one buffer per channel
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarImage<T> {
    channels:   Vec<Vec<T>>,
    width:      usize,
    height:     usize,
    colorspace: ColorSpace
}

/// An 8-bit exposure, input of merge operations
pub type LdrFrame = PlanarImage<u8>;

/// A floating point image, output of merge and tonemap operations
pub type RadianceImage = PlanarImage<f32>;

fn check_colorspace(colorspace: ColorSpace) -> Result<(), FusionErrors> {
    match colorspace {
        ColorSpace::RGB | ColorSpace::Luma => Ok(()),
        other => Err(FusionErrors::UnsupportedColorspace(other))
    }
}

impl<T: Copy + Default> PlanarImage<T> {
    /// Create a new image from separated channels
    ///
    /// # Errors
    /// - The colorspace is neither RGB nor Luma
    /// - The number of channels does not match the colorspace
    /// - A channel length is not `width*height`
    pub fn new(
        channels: Vec<Vec<T>>, width: usize, height: usize, colorspace: ColorSpace
    ) -> Result<PlanarImage<T>, FusionErrors> {
        check_colorspace(colorspace)?;

        if channels.len() != colorspace.num_components() {
            return Err(FusionErrors::ChannelsMisMatch(
                colorspace.num_components(),
                channels.len()
            ));
        }
        let expected = width * height;

        for channel in &channels {
            if channel.len() != expected {
                return Err(FusionErrors::BufferLength(expected, channel.len()));
            }
        }
        Ok(PlanarImage {
            channels,
            width,
            height,
            colorspace
        })
    }

    /// Create an image from interleaved pixels
    ///
    /// Pixels are expected to be interleaved according to the colorspace,
    /// i.e for RGB the layout is `[R,G,B,R,G,B]`
    pub fn from_interleaved(
        pixels: &[T], width: usize, height: usize, colorspace: ColorSpace
    ) -> Result<PlanarImage<T>, FusionErrors> {
        check_colorspace(colorspace)?;

        let components = colorspace.num_components();
        let expected = width * height * components;

        if pixels.len() != expected {
            return Err(FusionErrors::BufferLength(expected, pixels.len()));
        }
        let mut channels = vec![Vec::with_capacity(width * height); components];

        for pixel in pixels.chunks_exact(components) {
            for (channel, value) in channels.iter_mut().zip(pixel) {
                channel.push(*value);
            }
        }
        PlanarImage::new(channels, width, height, colorspace)
    }

    /// Create an image where every channel of every pixel is `value`
    pub fn fill(value: T, colorspace: ColorSpace, width: usize, height: usize) -> PlanarImage<T> {
        // only RGB and Luma are expected here, anything else
        // is treated as RGB
        let colorspace = match colorspace {
            ColorSpace::Luma => ColorSpace::Luma,
            _ => ColorSpace::RGB
        };
        PlanarImage {
            channels: vec![vec![value; width * height]; colorspace.num_components()],
            width,
            height,
            colorspace
        }
    }

    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Returns true if the image has no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn channels_ref(&self) -> &[Vec<T>] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [Vec<T>] {
        &mut self.channels
    }

    /// Interleave channels into one buffer
    pub fn to_interleaved(&self) -> Vec<T> {
        let components = self.channels.len();
        let mut output = vec![T::default(); self.width * self.height * components];

        for (c, channel) in self.channels.iter().enumerate() {
            for (out, value) in output.iter_mut().skip(c).step_by(components).zip(channel) {
                *out = *value;
            }
        }
        output
    }
}

impl PlanarImage<u8> {
    /// Convert the channels to `f32` in the range `[0,1]`
    pub fn to_unit_f32(&self) -> Vec<Vec<f32>> {
        self.channels
            .iter()
            .map(|c| c.iter().map(|x| f32::from(*x) / 255.0).collect())
            .collect()
    }
}

impl PlanarImage<f32> {
    /// Create a radiance image from a function
    ///
    /// The function receives the `x` and `y` offset and returns
    /// one value per channel, for Luma images only the first value is used
    pub fn from_fn<F>(width: usize, height: usize, colorspace: ColorSpace, func: F) -> RadianceImage
    where
        F: Fn(usize, usize) -> [f32; 3]
    {
        let colorspace = match colorspace {
            ColorSpace::Luma => ColorSpace::Luma,
            _ => ColorSpace::RGB
        };
        let components = colorspace.num_components();
        let mut channels = vec![Vec::with_capacity(width * height); components];

        for y in 0..height {
            for x in 0..width {
                let value = func(x, y);

                for (channel, v) in channels.iter_mut().zip(value) {
                    channel.push(v);
                }
            }
        }
        PlanarImage {
            channels,
            width,
            height,
            colorspace
        }
    }

    /// Return the minimum and maximum value across all channels
    pub fn min_max(&self) -> (f32, f32) {
        self.channels
            .iter()
            .map(|c| mathops::min_max(c))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |acc, (lo, hi)| {
                (acc.0.min(lo), acc.1.max(hi))
            })
    }

    /// Returns true if no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.channels.iter().flatten().all(|x| x.is_finite())
    }

    /// Narrow an image with values in `[0,1]` to interleaved 8-bit pixels
    ///
    /// Every value is clamped right before the cast, so values outside `[0,1]`
    /// saturate instead of wrapping around.
    pub fn to_u8_interleaved(&self) -> Vec<u8> {
        self.to_interleaved()
            .into_iter()
            .map(mathops::unit_to_u8)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use zune_core::colorspace::ColorSpace;

    use crate::radiance::{LdrFrame, RadianceImage};

    #[test]
    fn test_interleave_round_trip() {
        let pixels: Vec<u8> = (0..4 * 3 * 3).map(|x| x as u8).collect();
        let frame = LdrFrame::from_interleaved(&pixels, 4, 3, ColorSpace::RGB).unwrap();

        assert_eq!(frame.channels_ref()[0][..3], [0, 3, 6]);
        assert_eq!(frame.channels_ref()[2][..3], [2, 5, 8]);
        assert_eq!(frame.to_interleaved(), pixels);
    }

    #[test]
    fn test_wrong_length_is_an_error() {
        let pixels = vec![0_u8; 10];
        assert!(LdrFrame::from_interleaved(&pixels, 4, 3, ColorSpace::RGB).is_err());
    }

    #[test]
    fn test_unsupported_colorspace() {
        let channels = vec![vec![0.0_f32; 4]; 4];
        assert!(RadianceImage::new(channels, 2, 2, ColorSpace::RGBA).is_err());
    }

    #[test]
    fn test_narrowing_saturates() {
        let image = RadianceImage::from_interleaved(
            &[-0.5, 0.0, 0.5, 1.0, 1.5, f32::NAN],
            2,
            1,
            ColorSpace::RGB
        )
        .unwrap();

        assert_eq!(image.to_u8_interleaved(), [0, 0, 128, 255, 255, 0]);
    }
}
