/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Run configuration
//!
//! A [`PipelineConfig`] is built once at startup, from a JSON file and/or the
//! command line, and passed by reference to [`run`](crate::workflow::run).
//! Nothing mutates it afterwards.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use bracket_fusion::merge::MergeStrategy;
use bracket_fusion::tonemap::TonemapOperator;
use serde::{Deserialize, Serialize};

use crate::errors::HdrErrors;

/// Output path used when none is configured
pub const DEFAULT_OUTPUT: &str = "output_hdr.jpg";

/// `ExposureTime`, a rational in seconds
pub const EXPOSURE_TIME_TAG: u16 = 33434;
/// `FNumber`, a rational
pub const F_NUMBER_TAG: u16 = 33437;
/// `PhotographicSensitivity`, formerly `ISOSpeedRatings`
pub const ISO_TAG: u16 = 34855;
/// `ShutterSpeedValue`, a signed rational in APEX units
pub const SHUTTER_SPEED_TAG: u16 = 37377;

/// EXIF tag numbers read by the exposure metadata reader
///
/// A number is looked up in the EXIF sub-IFD first and in IFD0 when the
/// sub-IFD does not carry it, so vendor tags stored in either are found.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifTags {
    pub exposure_time: u16,
    pub f_number:      u16,
    pub iso:           u16,
    pub shutter_speed: u16
}

impl Default for ExifTags {
    fn default() -> Self {
        ExifTags {
            exposure_time: EXPOSURE_TIME_TAG,
            f_number:      F_NUMBER_TAG,
            iso:           ISO_TAG,
            shutter_speed: SHUTTER_SPEED_TAG
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input exposures, in order
    pub inputs:                Vec<PathBuf>,
    /// Where the tonemapped image is written, the extension picks the format
    pub output:                PathBuf,
    pub merge:                 MergeStrategy,
    pub tonemap:               TonemapOperator,
    pub exif_tags:             ExifTags,
    /// Normalize exposure times to the aperture of the first image
    pub aperture_compensation: bool,
    /// Also write the merged radiance image, in Radiance `.hdr` format
    pub radiance_output:       Option<PathBuf>,
    /// Replace the output if it already exists
    pub overwrite:             bool
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            inputs:                Vec::new(),
            output:                PathBuf::from(DEFAULT_OUTPUT),
            merge:                 MergeStrategy::default(),
            tonemap:               TonemapOperator::default(),
            exif_tags:             ExifTags::default(),
            aperture_compensation: false,
            radiance_output:       None,
            overwrite:             false
        }
    }
}

impl PipelineConfig {
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> PipelineConfig {
        PipelineConfig {
            inputs,
            output,
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file
    ///
    /// Missing fields take their default value
    pub fn from_json_file(path: &Path) -> Result<PipelineConfig, HdrErrors> {
        let file = File::open(path)
            .map_err(|e| HdrErrors::Config(format!("Cannot open config {path:?}: {e}")))?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| HdrErrors::Config(format!("Invalid config {path:?}: {e}")))
    }

    /// Check the configuration for mistakes that do not need any file access
    pub fn validate(&self) -> Result<(), HdrErrors> {
        for input in &self.inputs {
            if input == &self.output {
                return Err(HdrErrors::Config(format!(
                    "Cannot use {input:?} as both input and output"
                )));
            }
            if Some(input) == self.radiance_output.as_ref() {
                return Err(HdrErrors::Config(format!(
                    "Cannot use {input:?} as both input and radiance output"
                )));
            }
        }
        if Some(&self.output) == self.radiance_output.as_ref() {
            return Err(HdrErrors::Config(
                "Tonemapped and radiance output cannot be the same file".to_string()
            ));
        }
        Ok(())
    }
}
