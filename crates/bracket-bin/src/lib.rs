/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The `bracket` pipeline
//!
//! Reads exposure times from EXIF, decodes the exposures, merges them into a
//! radiance image, tonemaps it and writes an 8-bit image.
//!
//! [`workflow::run`] is the entry point for library use, [`main`] wraps it with
//! command line parsing and logging.
use std::ffi::OsString;
use std::process::exit;

use log::error;

mod cmd_args;
mod cmd_parsers;
pub mod config;
pub mod errors;
pub mod exposure;
pub mod file_io;
mod probe_files;
mod serde;
pub mod workflow;
pub mod writer;

/// Parse `args`, run the pipeline and return the process exit status
///
/// Returns `0` on success and `1` if configuration or any stage failed.
/// Usage errors and `--help` are reported by clap with its own status.
pub fn run_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone
{
    let options = match cmd_args::create_cmd_args().try_get_matches_from(args) {
        Ok(options) => options,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    cmd_parsers::global_options::setup_logger(&options);

    let result = cmd_parsers::parse_config(&options).and_then(|config| {
        if options.get_flag("probe") {
            probe_files::probe_input_files(&config)
        } else {
            workflow::run(&config).map(|_| ())
        }
    });

    match result {
        Ok(()) => 0,
        Err(err) => {
            println!();
            error!(" Could not complete workflow, reason {:?}", err);
            println!();
            1
        }
    }
}

pub fn main() {
    exit(run_from_args(std::env::args_os()));
}
