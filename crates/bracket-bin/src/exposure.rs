/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure metadata reader
//!
//! Exposure times come from the EXIF `ExposureTime` field, a rational in seconds.
//! If that field is absent the APEX `ShutterSpeedValue` is used instead.
//!
//! An image without any usable exposure time is skipped with a warning,
//! a file that cannot be opened or whose metadata is corrupt ends the run.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::ExifTags;
use crate::errors::HdrErrors;

/// Capture metadata of a single image
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExposureInfo {
    /// Exposure time in seconds
    pub exposure_time: Option<f32>,
    pub f_number:      Option<f32>,
    pub iso:           Option<u32>
}

/// An image with a usable exposure time
#[derive(Clone, Debug, PartialEq)]
pub struct ExposureEntry {
    pub path:          PathBuf,
    /// Exposure time in seconds, after aperture compensation if enabled
    pub exposure_time: f32,
    pub f_number:      Option<f32>
}

/// Look a tag number up in the EXIF sub-IFD first, then in IFD0
fn exif_field<'a>(exif: &'a Exif, number: u16) -> Option<&'a Field> {
    exif.get_field(Tag(Context::Exif, number), In::PRIMARY)
        .or_else(|| exif.get_field(Tag(Context::Tiff, number), In::PRIMARY))
}

/// First value of a numeric field, as a float
fn field_value(field: &Field) -> Option<f64> {
    match &field.value {
        Value::Rational(values) => values.first().map(|r| r.to_f64()),
        Value::SRational(values) => values.first().map(|r| r.to_f64()),
        Value::Float(values) => values.first().map(|x| f64::from(*x)),
        Value::Double(values) => values.first().copied(),
        value => value.get_uint(0).map(f64::from)
    }
}

/// Keep only strictly positive finite values
fn positive(value: Option<f64>) -> Option<f32> {
    value
        .map(|x| x as f32)
        .filter(|x| x.is_finite() && *x > 0.0)
}

/// Read capture metadata of one file
///
/// A file with no EXIF data at all yields an [`ExposureInfo`] with every field empty
///
/// # Errors
/// The file cannot be opened, or its metadata is present but corrupt
pub fn read_exposure_info(path: &Path, tags: &ExifTags) -> Result<ExposureInfo, HdrErrors> {
    let file = File::open(path).map_err(|e| HdrErrors::ImageRead {
        path:   path.to_path_buf(),
        reason: e.to_string()
    })?;

    let exif = match Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(ExposureInfo::default()),
        Err(e) => {
            return Err(HdrErrors::ImageRead {
                path:   path.to_path_buf(),
                reason: format!("corrupt metadata: {e}")
            })
        }
    };

    let mut exposure_time = positive(exif_field(&exif, tags.exposure_time).and_then(field_value));

    if exposure_time.is_none() {
        // APEX Tv, t = 2^-Tv
        let tv = exif_field(&exif, tags.shutter_speed).and_then(field_value);
        exposure_time = positive(tv.map(|tv| (-tv).exp2()));

        if exposure_time.is_some() {
            debug!("{path:?}: exposure time derived from shutter speed value");
        }
    }
    let f_number = positive(exif_field(&exif, tags.f_number).and_then(field_value));
    let iso = exif_field(&exif, tags.iso).and_then(|f| f.value.get_uint(0));

    Ok(ExposureInfo {
        exposure_time,
        f_number,
        iso
    })
}

/// Read exposure times of all inputs
///
/// Images without a usable exposure time are dropped from the returned
/// list, the order of the rest is kept.
///
/// When `aperture_compensation` is set, times are scaled by `(N_ref/N)^2`
/// where `N_ref` is the first known f-number, so that frames shot at
/// different apertures line up. Frames without an f-number are left alone.
///
/// # Errors
/// - A file cannot be opened or has corrupt metadata
/// - Less than two images have a usable exposure time
pub fn read_exposure_times(
    paths: &[PathBuf], tags: &ExifTags, aperture_compensation: bool
) -> Result<Vec<ExposureEntry>, HdrErrors> {
    let mut entries = Vec::with_capacity(paths.len());

    for path in paths {
        let info = read_exposure_info(path, tags)?;

        match info.exposure_time {
            Some(exposure_time) => {
                debug!(
                    "{path:?}: exposure {exposure_time}s, f-number {:?}, iso {:?}",
                    info.f_number, info.iso
                );
                entries.push(ExposureEntry {
                    path: path.clone(),
                    exposure_time,
                    f_number: info.f_number
                });
            }
            None => warn!("{path:?} has no usable exposure time, skipping it"),
        }
    }
    if entries.len() < 2 {
        return Err(HdrErrors::InsufficientExposureData {
            found: entries.len()
        });
    }
    if aperture_compensation {
        if let Some(reference) = entries.iter().find_map(|e| e.f_number) {
            info!("Compensating exposure times to f/{reference}");

            for entry in entries.iter_mut() {
                if let Some(n) = entry.f_number {
                    entry.exposure_time *= (reference / n) * (reference / n);
                }
            }
        }
    }
    Ok(entries)
}
