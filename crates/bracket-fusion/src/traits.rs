/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Traits implemented by merge and tonemap operations
//!
//! Operations implement the `*_impl` method only, the provided method
//! validates inputs before calling it and validates outputs after
use log::trace;

use crate::errors::FusionErrors;
use crate::radiance::{LdrFrame, RadianceImage};

/// This encapsulates a merge operation.
///
/// A merge operation fuses a set of differently exposed frames of the same
/// scene into a single radiance image
pub trait MergeTrait {
    /// Get the name of this operation
    fn name(&self) -> &'static str;

    /// Returns true if this operation uses exposure times
    ///
    /// Operations that do not need them still accept times,
    /// they are simply ignored
    fn needs_exposure_times(&self) -> bool;

    /// Fuse frames into a radiance image
    ///
    /// # Arguments
    /// - frames: Frames to fuse, all of the same dimensions and colorspace
    /// - times: Exposure time in seconds for each frame, may be empty if
    ///  [`needs_exposure_times`](MergeTrait::needs_exposure_times) returns false
    ///
    /// This is called after inputs are validated, implementors can assume
    /// there are at least two frames with matching dimensions and channels
    fn merge_impl(&self, frames: &[LdrFrame], times: &[f32]) -> Result<RadianceImage, FusionErrors>;

    /// Validate inputs and fuse frames into a radiance image
    ///
    /// # Errors
    /// - Less than two frames
    /// - Frames differ in dimensions or channel count
    /// - Exposure times are needed and their count differs from the frame count
    ///   or one of them is not strictly positive and finite
    /// - The operation produced NaN or infinite values
    fn merge(&self, frames: &[LdrFrame], times: &[f32]) -> Result<RadianceImage, FusionErrors> {
        if frames.len() < 2 {
            return Err(FusionErrors::NotEnoughImages(2, frames.len()));
        }
        let first = &frames[0];

        if first.is_empty() {
            return Err(FusionErrors::EmptyImage);
        }
        for frame in &frames[1..] {
            if frame.dimensions() != first.dimensions() {
                return Err(FusionErrors::DimensionsMisMatch(
                    first.dimensions(),
                    frame.dimensions()
                ));
            }
            if frame.num_channels() != first.num_channels() {
                return Err(FusionErrors::ChannelsMisMatch(
                    first.num_channels(),
                    frame.num_channels()
                ));
            }
        }
        if self.needs_exposure_times() {
            if times.len() != frames.len() {
                return Err(FusionErrors::ExposureCountMisMatch(frames.len(), times.len()));
            }
            for (pos, time) in times.iter().enumerate() {
                if !time.is_finite() || *time <= 0.0 {
                    return Err(FusionErrors::InvalidExposureTime(pos, *time));
                }
            }
        }
        trace!("Running merge operation {}", self.name());

        let radiance = self.merge_impl(frames, times)?;

        if !radiance.is_finite() {
            return Err(FusionErrors::NonFinite(self.name()));
        }
        Ok(radiance)
    }
}

/// This encapsulates a tonemap operation.
///
/// A tonemap operation compresses a radiance image into a displayable
/// image whose values are meant to lie in `[0,1]`.
///
/// Outputs may slightly overshoot that range, callers narrowing to
/// integers should clamp first
pub trait TonemapTrait {
    /// Get the name of this operation
    fn name(&self) -> &'static str;

    /// Tonemap a radiance image
    ///
    /// Called after the image is checked to be non-empty and finite
    fn tonemap_impl(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors>;

    /// Validate the input and tonemap it
    ///
    /// # Errors
    /// - The image is empty
    /// - The image contains NaN or infinite values
    /// - The operation produced NaN or infinite values
    fn tonemap(&self, image: &RadianceImage) -> Result<RadianceImage, FusionErrors> {
        if image.is_empty() {
            return Err(FusionErrors::EmptyImage);
        }
        if !image.is_finite() {
            return Err(FusionErrors::NonFinite("radiance input"));
        }
        trace!("Running tonemap operation {}", self.name());

        let output = self.tonemap_impl(image)?;

        if !output.is_finite() {
            return Err(FusionErrors::NonFinite(self.name()));
        }
        Ok(output)
    }
}
