/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image loader
//!
//! Decodes inputs into 8-bit RGB frames, the layout merge operations expect.
use std::path::{Path, PathBuf};

use bracket_fusion::radiance::LdrFrame;
use log::{debug, info};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_image::image::Image;

use crate::errors::HdrErrors;

fn read_error(path: &Path, reason: String) -> HdrErrors {
    HdrErrors::ImageRead {
        path: path.to_path_buf(),
        reason
    }
}

/// Replicate every gray value into R, G and B
pub fn replicate_gray(pixels: &[u8]) -> Vec<u8> {
    pixels.iter().flat_map(|x| [*x; 3]).collect()
}

/// Decode a file into an 8-bit RGB frame
///
/// - Gray images are promoted to RGB by replicating the channel
/// - Alpha is dropped
/// - Other colorspaces are converted to RGB
/// - Deeper images are converted to 8 bits
pub fn load_frame(path: &Path) -> Result<LdrFrame, HdrErrors> {
    let mut image = Image::open(path).map_err(|e| read_error(path, format!("{e:?}")))?;

    let (width, height) = image.dimensions();
    let colorspace = image.colorspace();

    debug!("{path:?}: decoded as {colorspace:?}, depth {:?}", image.depth());

    let target = match colorspace {
        ColorSpace::Luma | ColorSpace::LumaA => ColorSpace::Luma,
        _ => ColorSpace::RGB
    };
    if colorspace != target {
        image
            .convert_color(target)
            .map_err(|e| read_error(path, format!("{e:?}")))?;
    }
    if image.depth() != BitDepth::Eight {
        image
            .convert_depth(BitDepth::Eight)
            .map_err(|e| read_error(path, format!("{e:?}")))?;
    }
    // animated inputs only contribute their first frame
    let mut pixels = image
        .flatten_to_u8()
        .into_iter()
        .next()
        .ok_or_else(|| read_error(path, "image has no frames".to_string()))?;

    if target == ColorSpace::Luma {
        pixels = replicate_gray(&pixels);
    }
    LdrFrame::from_interleaved(&pixels, width, height, ColorSpace::RGB)
        .map_err(|e| read_error(path, format!("{e:?}")))
}

/// An input image together with its exposure time
pub struct Exposure {
    pub path:          PathBuf,
    pub frame:         LdrFrame,
    /// Exposure time in seconds, absent when the merge strategy doesn't need it
    pub exposure_time: Option<f32>
}

/// Decoded inputs, in the order they were configured
pub struct ExposureSet {
    exposures: Vec<Exposure>
}

impl ExposureSet {
    /// Decode every input
    ///
    /// # Errors
    /// Any input fails to decode, the error names the offending path
    pub fn load(inputs: Vec<(PathBuf, Option<f32>)>) -> Result<ExposureSet, HdrErrors> {
        let mut exposures = Vec::with_capacity(inputs.len());

        for (path, exposure_time) in inputs {
            let frame = load_frame(&path)?;
            let (width, height) = frame.dimensions();

            info!("Loaded {path:?} ({width}x{height})");

            exposures.push(Exposure {
                path,
                frame,
                exposure_time
            });
        }
        Ok(ExposureSet { exposures })
    }

    /// Check every frame has the dimensions of the first one
    ///
    /// # Errors
    /// [`HdrErrors::DimensionMismatch`] naming the first offending path
    pub fn check_dimensions(&self) -> Result<(), HdrErrors> {
        let Some(first) = self.exposures.first() else {
            return Ok(());
        };
        let expected = first.frame.dimensions();

        for exposure in &self.exposures[1..] {
            let found = exposure.frame.dimensions();

            if found != expected {
                return Err(HdrErrors::DimensionMismatch {
                    path: Some(exposure.path.clone()),
                    expected,
                    found
                });
            }
        }
        Ok(())
    }

    /// Split into frames and exposure times
    ///
    /// Times are only returned when every exposure has one
    pub fn into_parts(self) -> (Vec<LdrFrame>, Vec<f32>) {
        let times: Option<Vec<f32>> = self.exposures.iter().map(|e| e.exposure_time).collect();
        let frames = self.exposures.into_iter().map(|e| e.frame).collect();

        (frames, times.unwrap_or_default())
    }
}
