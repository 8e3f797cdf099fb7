/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible while running the pipeline
//!
//! Every error is fatal, the only condition recovered from is a single image
//! missing its exposure time, which is skipped with a warning and never
//! surfaces as an error.
use core::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use bracket_fusion::errors::FusionErrors;

/// Pipeline stages, in the order they run
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Command line and config file parsing
    Configuring,
    /// Reading exposure metadata and decoding inputs
    Loading,
    Merging,
    Tonemapping,
    Writing,
    Done
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Stage::Configuring => "configuring",
            Stage::Loading => "loading",
            Stage::Merging => "merging",
            Stage::Tonemapping => "tonemapping",
            Stage::Writing => "writing",
            Stage::Done => "done"
        };
        write!(f, "{name}")
    }
}

pub enum HdrErrors {
    /// A file could not be opened, decoded, or its metadata is corrupt
    ImageRead { path: PathBuf, reason: String },
    /// Less than two images carry a usable exposure time
    InsufficientExposureData { found: usize },
    /// An image does not share the dimensions of the first one
    DimensionMismatch {
        path:     Option<PathBuf>,
        expected: (usize, usize),
        found:    (usize, usize)
    },
    Merge(FusionErrors),
    Tonemap(FusionErrors),
    /// Output could not be encoded or written
    OutputWrite { path: PathBuf, reason: String },
    /// Invalid configuration, detected before any stage runs
    Config(String)
}

impl HdrErrors {
    /// The stage this error ends the run in
    pub const fn stage(&self) -> Stage {
        match self {
            Self::ImageRead { .. } | Self::InsufficientExposureData { .. } => Stage::Loading,
            Self::DimensionMismatch { .. } | Self::Merge(_) => Stage::Merging,
            Self::Tonemap(_) => Stage::Tonemapping,
            Self::OutputWrite { .. } => Stage::Writing,
            Self::Config(_) => Stage::Configuring
        }
    }

    /// A stable identifier for the error kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ImageRead { .. } => "IMAGE_READ_ERROR",
            Self::InsufficientExposureData { .. } => "INSUFFICIENT_EXPOSURE_DATA",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::Merge(_) => "MERGE_ERROR",
            Self::Tonemap(_) => "TONEMAP_ERROR",
            Self::OutputWrite { .. } => "OUTPUT_WRITE_ERROR",
            Self::Config(_) => "CONFIG_ERROR"
        }
    }

    /// Convert an error from the merge stage
    ///
    /// Frames of different sizes are reported as [`HdrErrors::DimensionMismatch`],
    /// everything else as [`HdrErrors::Merge`]
    pub fn from_merge(error: FusionErrors) -> HdrErrors {
        match error {
            FusionErrors::DimensionsMisMatch(expected, found) => HdrErrors::DimensionMismatch {
                path: None,
                expected,
                found
            },
            error => HdrErrors::Merge(error)
        }
    }
}

impl Debug for HdrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} [{} stage]: ", self.kind(), self.stage())?;

        match self {
            Self::ImageRead { path, reason } => {
                write!(f, "Could not read {path:?}, reason: {reason}")
            }
            Self::InsufficientExposureData { found } => {
                write!(
                    f,
                    "Only {found} image(s) with a usable exposure time, at least 2 are needed"
                )
            }
            Self::DimensionMismatch {
                path: Some(path),
                expected,
                found
            } => {
                write!(
                    f,
                    "{path:?} is {}x{} but the first image is {}x{}",
                    found.0, found.1, expected.0, expected.1
                )
            }
            Self::DimensionMismatch {
                path: None,
                expected,
                found
            } => {
                write!(
                    f,
                    "Images differ in size, expected {}x{} but found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            Self::Merge(err) => write!(f, "{err:?}"),
            Self::Tonemap(err) => write!(f, "{err:?}"),
            Self::OutputWrite { path, reason } => {
                write!(f, "Could not write {path:?}, reason: {reason}")
            }
            Self::Config(reason) => write!(f, "{reason}")
        }
    }
}

impl Display for HdrErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for HdrErrors {}
