/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use log::warn;

use crate::config::PipelineConfig;
use crate::errors::HdrErrors;
use crate::exposure::read_exposure_info;
use crate::serde::ProbeReport;

/// Probe input files, extract exposure metadata, and print to standard output.
///
/// Files that don't exist are skipped with a warning
pub fn probe_input_files(config: &PipelineConfig) -> Result<(), HdrErrors> {
    for path in &config.inputs {
        let Ok(metadata) = fs::metadata(path) else {
            warn!("Cannot probe {path:?}, file does not exist");
            continue;
        };
        let info = read_exposure_info(path, &config.exif_tags)?;
        let report = ProbeReport::new(path, metadata.len(), &info);

        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("Cannot serialize metadata of {path:?}: {e}")
        }
    }
    Ok(())
}
