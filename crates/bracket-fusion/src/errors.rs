/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during merging and tonemapping
use core::fmt::{Debug, Display, Formatter};

use zune_core::colorspace::ColorSpace;

/// All errors that can occur while fusing exposures or
/// tonemapping a radiance image
pub enum FusionErrors {
    /// Image dimensions do not match, expected `(width,height)` but found `(width,height)`
    DimensionsMisMatch((usize, usize), (usize, usize)),
    /// Number of channels does not match, expected and found
    ChannelsMisMatch(usize, usize),
    /// Buffer length does not match what the dimensions imply
    BufferLength(usize, usize),
    /// The colorspace cannot be stored in a planar image
    UnsupportedColorspace(ColorSpace),
    /// Number of images and exposure times differ, (images,times)
    ExposureCountMisMatch(usize, usize),
    /// Exposure time at index is zero, negative or not finite
    InvalidExposureTime(usize, f32),
    /// Not enough images to fuse, (required,found)
    NotEnoughImages(usize, usize),
    /// A parameter is out of range, (operation, parameter, value)
    InvalidParameter(&'static str, &'static str, f32),
    /// A parameter does not exist for an operation, (operation, parameter)
    UnknownParameter(&'static str, String),
    /// The operation produced NaN or infinite values
    NonFinite(&'static str),
    /// Image has zero width or height
    EmptyImage
}

impl Debug for FusionErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DimensionsMisMatch(expected, found) => {
                write!(
                    f,
                    "Dimensions mismatch, expected {}x{} but found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            Self::ChannelsMisMatch(expected, found) => {
                write!(f, "Expected {expected} channels but found {found}")
            }
            Self::BufferLength(expected, found) => {
                write!(f, "Expected buffer of length {expected} but found {found}")
            }
            Self::UnsupportedColorspace(colorspace) => {
                write!(
                    f,
                    "Unsupported colorspace {colorspace:?}, only RGB and Luma can be fused"
                )
            }
            Self::ExposureCountMisMatch(images, times) => {
                write!(f, "{images} images were given but {times} exposure times")
            }
            Self::InvalidExposureTime(index, value) => {
                write!(
                    f,
                    "Exposure time {value} at index {index} is invalid, exposure times must be positive and finite"
                )
            }
            Self::NotEnoughImages(required, found) => {
                write!(f, "At least {required} images are required, found {found}")
            }
            Self::InvalidParameter(operation, parameter, value) => {
                write!(
                    f,
                    "Invalid value {value} for parameter `{parameter}` of {operation}"
                )
            }
            Self::UnknownParameter(operation, parameter) => {
                write!(f, "Parameter `{parameter}` does not apply to {operation}")
            }
            Self::NonFinite(operation) => {
                write!(f, "{operation} produced non finite values")
            }
            Self::EmptyImage => write!(f, "Image has zero width or height")
        }
    }
}

impl Display for FusionErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for FusionErrors {}

#[cfg(test)]
mod tests {
    use zune_core::colorspace::ColorSpace;

    use crate::errors::FusionErrors;

    #[test]
    fn test_every_error_names_its_cause() {
        let errors = [
            (FusionErrors::DimensionsMisMatch((4, 2), (2, 4)), "4x2"),
            (FusionErrors::ChannelsMisMatch(3, 1), "3 channels"),
            (FusionErrors::BufferLength(12, 11), "12"),
            (FusionErrors::UnsupportedColorspace(ColorSpace::CMYK), "CMYK"),
            (FusionErrors::ExposureCountMisMatch(3, 2), "2 exposure times"),
            (FusionErrors::InvalidExposureTime(1, -1.0), "index 1"),
            (FusionErrors::NotEnoughImages(2, 1), "found 1"),
            (FusionErrors::InvalidParameter("drago", "bias", 2.0), "`bias`"),
            (FusionErrors::UnknownParameter("mantiuk", "sigma".to_string()), "`sigma`"),
            (FusionErrors::NonFinite("durand"), "durand"),
            (FusionErrors::EmptyImage, "zero width")
        ];
        for (err, cause) in errors {
            // no free form variants, every message carries structured context
            let message = match &err {
                FusionErrors::DimensionsMisMatch(..)
                | FusionErrors::ChannelsMisMatch(..)
                | FusionErrors::BufferLength(..)
                | FusionErrors::UnsupportedColorspace(_)
                | FusionErrors::ExposureCountMisMatch(..)
                | FusionErrors::InvalidExposureTime(..)
                | FusionErrors::NotEnoughImages(..)
                | FusionErrors::InvalidParameter(..)
                | FusionErrors::UnknownParameter(..)
                | FusionErrors::NonFinite(_)
                | FusionErrors::EmptyImage => err.to_string()
            };
            assert_eq!(message, format!("{err:?}"));
            assert!(message.contains(cause), "{message} lacks {cause}");
        }
    }
}
