/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Output writer
//!
//! Images are first encoded to a hidden sibling file and only renamed into
//! place once every output of a run is encoded, a failed run never leaves
//! an output behind.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use bracket_fusion::radiance::RadianceImage;
use log::{debug, info};
use zune_image::image::Image;

use crate::errors::HdrErrors;

/// Extensions we can encode 8-bit images to
pub const LDR_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "ppm", "qoi", "jxl"];

/// Extension of the radiance dump
pub const RADIANCE_EXTENSION: &str = "hdr";

fn write_error(path: &Path, reason: impl Into<String>) -> HdrErrors {
    HdrErrors::OutputWrite {
        path:   path.to_path_buf(),
        reason: reason.into()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Check an output path can be written to before doing any work
///
/// # Errors
/// - The extension is not one of `allowed`
/// - The parent directory does not exist
/// - The path is a directory
/// - The file exists and `overwrite` is false
pub fn check_output_path(path: &Path, allowed: &[&str], overwrite: bool) -> Result<(), HdrErrors> {
    match extension(path) {
        Some(ext) if allowed.contains(&ext.as_str()) => (),
        Some(ext) if ext == "bmp" => {
            return Err(write_error(path, "bmp can be decoded but not encoded"));
        }
        Some(ext) => {
            return Err(write_error(
                path,
                format!("unknown extension `{ext}`, expected one of {allowed:?}")
            ));
        }
        None => {
            return Err(write_error(
                path,
                format!("no extension, expected one of {allowed:?}")
            ));
        }
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(write_error(path, format!("directory {parent:?} does not exist")));
        }
    }
    if path.is_dir() {
        return Err(write_error(path, "path is a directory"));
    }
    if path.exists() {
        if overwrite {
            info!("Overwriting path {path:?}");
        } else {
            return Err(write_error(
                path,
                "file exists, pass --yes to overwrite it"
            ));
        }
    }
    Ok(())
}

/// Sibling path used while encoding, keeps the (lowercased) extension
/// so the encoder is picked the same way
fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_stem().unwrap_or_default());
    name.push(".partial");

    if let Some(ext) = extension(path) {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// An encoded output waiting under its partial name
///
/// [`commit`](StagedOutput::commit) renames it into place, dropping it
/// without committing removes the partial file.
#[derive(Debug)]
pub struct StagedOutput {
    partial:   PathBuf,
    path:      PathBuf,
    committed: bool
}

impl StagedOutput {
    /// Final destination of this output
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the partial file to its final path
    ///
    /// # Errors
    /// If the rename fails, the partial file is removed
    pub fn commit(mut self) -> Result<(), HdrErrors> {
        fs::rename(&self.partial, &self.path).map_err(|e| write_error(&self.path, e.to_string()))?;
        self.committed = true;
        debug!("Renamed {:?} to {:?}", self.partial, self.path);
        Ok(())
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if !self.committed {
            debug!("Discarding {:?}", self.partial);
            let _ = fs::remove_file(&self.partial);
        }
    }
}

/// Encode `image` to the partial sibling of `path`
fn stage(image: &Image, path: &Path) -> Result<StagedOutput, HdrErrors> {
    let partial = partial_path(path);
    debug!("Encoding to {partial:?}");

    if let Err(e) = image.save(&partial) {
        let _ = fs::remove_file(&partial);
        return Err(write_error(path, format!("{e:?}")));
    }
    Ok(StagedOutput {
        partial,
        path: path.to_path_buf(),
        committed: false
    })
}

/// Narrow a clamped `[0,1]` image to 8 bits and encode it next to `path`
///
/// The format is picked from the extension of `path`, nothing is visible
/// at `path` until the returned output is committed
pub fn stage_ldr(image: &RadianceImage, path: &Path) -> Result<StagedOutput, HdrErrors> {
    check_output_path(path, &LDR_EXTENSIONS, true)?;

    let (width, height) = image.dimensions();
    let pixels = image.to_u8_interleaved();

    let output = Image::from_u8(&pixels, width, height, image.colorspace());

    stage(&output, path)
}

/// Encode a radiance image as a Radiance `.hdr` file next to `path`
pub fn stage_radiance(image: &RadianceImage, path: &Path) -> Result<StagedOutput, HdrErrors> {
    check_output_path(path, &[RADIANCE_EXTENSION], true)?;

    let (width, height) = image.dimensions();
    let output = Image::from_f32(&image.to_interleaved(), width, height, image.colorspace());

    stage(&output, path)
}
