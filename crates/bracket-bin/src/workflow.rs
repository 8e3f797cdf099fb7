/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The pipeline
//!
//! Stages run once, in order, each consuming the previous stage's output
//!
//! Loading -> Merging -> Tonemapping -> Writing -> Done
//!
//! Any error ends the run in the stage it occurred in, nothing is retried
//! and no output is written. The radiance image and the final image are
//! both encoded under partial names and only renamed into place in the
//! writing stage.
use std::fs;
use std::path::PathBuf;

use bracket_fusion::mathops::{clamp_unit, scale};
use bracket_fusion::radiance::RadianceImage;
use log::{debug, info};

use crate::config::PipelineConfig;
use crate::errors::{HdrErrors, Stage};
use crate::exposure::read_exposure_times;
use crate::file_io::ExposureSet;
use crate::writer::{check_output_path, stage_ldr, stage_radiance, LDR_EXTENSIONS, RADIANCE_EXTENSION};

/// What a successful run did
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub output:         PathBuf,
    pub dimensions:     (usize, usize),
    /// Inputs that took part in the merge
    pub merged:         Vec<PathBuf>,
    /// Exposure times of the merged inputs, empty if the strategy ignores them
    pub exposure_times: Vec<f32>,
    pub merge:          &'static str,
    pub tonemap:        &'static str
}

fn enter(stage: Stage) {
    info!("Stage: {stage}");
}

/// Clamp to `[0,1]`, scale by `brightness`, then clamp again
///
/// Values handed to 8-bit narrowing afterwards are always within `[0,1]`
pub fn clamp_and_scale(image: &mut RadianceImage, brightness: f32) {
    for channel in image.channels_mut() {
        clamp_unit(channel);
        scale(channel, brightness);
        clamp_unit(channel);
    }
}

/// Run the whole pipeline
///
/// # Errors
/// See [`HdrErrors`], every error is fatal
pub fn run(config: &PipelineConfig) -> Result<RunSummary, HdrErrors> {
    config.validate()?;

    // fail before any decoding if the outputs can't be written
    check_output_path(&config.output, &LDR_EXTENSIONS, config.overwrite)?;

    if let Some(radiance_output) = &config.radiance_output {
        check_output_path(radiance_output, &[RADIANCE_EXTENSION], config.overwrite)?;
    }
    let merger = config.merge.to_merger().map_err(HdrErrors::Merge)?;
    let tonemapper = config.tonemap.to_tonemapper().map_err(HdrErrors::Tonemap)?;

    enter(Stage::Loading);

    let inputs: Vec<(PathBuf, Option<f32>)> = if merger.needs_exposure_times() {
        read_exposure_times(
            &config.inputs,
            &config.exif_tags,
            config.aperture_compensation
        )?
        .into_iter()
        .map(|entry| (entry.path, Some(entry.exposure_time)))
        .collect()
    } else {
        if config.inputs.len() < 2 {
            return Err(HdrErrors::InsufficientExposureData {
                found: config.inputs.len()
            });
        }
        config.inputs.iter().map(|path| (path.clone(), None)).collect()
    };
    let merged: Vec<PathBuf> = inputs.iter().map(|(path, _)| path.clone()).collect();

    let exposures = ExposureSet::load(inputs)?;

    enter(Stage::Merging);

    exposures.check_dimensions()?;

    let (frames, exposure_times) = exposures.into_parts();

    info!("Merging {} exposures with {}", frames.len(), merger.name());

    let radiance = merger
        .merge(&frames, &exposure_times)
        .map_err(HdrErrors::from_merge)?;
    drop(frames);

    let dimensions = radiance.dimensions();
    let (lo, hi) = radiance.min_max();
    debug!("Radiance range [{lo}, {hi}]");

    let staged_radiance = match &config.radiance_output {
        Some(path) => Some(stage_radiance(&radiance, path)?),
        None => None
    };

    enter(Stage::Tonemapping);

    info!("Tonemapping with {}", tonemapper.name());

    let mut ldr = tonemapper.tonemap(&radiance).map_err(HdrErrors::Tonemap)?;
    drop(radiance);

    clamp_and_scale(&mut ldr, config.tonemap.brightness());

    enter(Stage::Writing);

    let staged_ldr = stage_ldr(&ldr, &config.output)?;

    if let Some(staged) = staged_radiance {
        let path = staged.path().to_path_buf();
        staged.commit()?;
        info!("Wrote radiance image to {path:?}");

        if let Err(e) = staged_ldr.commit() {
            let _ = fs::remove_file(&path);
            return Err(e);
        }
    } else {
        staged_ldr.commit()?;
    }

    enter(Stage::Done);
    info!("Wrote HDR result to {:?}", config.output);

    Ok(RunSummary {
        output: config.output.clone(),
        dimensions,
        merged,
        exposure_times,
        merge: merger.name(),
        tonemap: tonemapper.name()
    })
}
