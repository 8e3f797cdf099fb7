/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};

/// Set up logging options
///
/// Defaults to info so that skipped images and the success message are shown
pub fn setup_logger(options: &ArgMatches) {
    let flag = |id: &str| options.get_flag(id);

    let log_level = if flag("debug") {
        Level::Debug
    } else if flag("trace") {
        Level::Trace
    } else if flag("warn") {
        Level::Warn
    } else {
        Level::Info
    };

    if let Err(e) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {e}");
        return;
    }
    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
