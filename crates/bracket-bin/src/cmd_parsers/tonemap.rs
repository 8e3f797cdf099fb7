/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use bracket_fusion::tonemap::TonemapOperator;
use clap::ArgMatches;
use log::debug;

use crate::cmd_args::TONEMAP_ARGS;
use crate::errors::HdrErrors;

/// Apply tonemap parameters passed on the command line to `operator`
///
/// Argument ids use dashes, parameter names use underscores
///
/// # Errors
/// A parameter was given that `operator` doesn't take
pub fn apply_parameters(options: &ArgMatches, operator: &mut TonemapOperator) -> Result<(), HdrErrors> {
    for (id, _) in TONEMAP_ARGS {
        if let Some(value) = options.get_one::<f32>(id) {
            let parameter = id.replace('-', "_");

            debug!("Setting {} parameter {parameter} to {value}", operator.name());

            operator.set_parameter(&parameter, *value).map_err(|e| {
                HdrErrors::Config(format!(
                    "{e:?}, {} accepts {:?}",
                    operator.name(),
                    operator.parameters()
                ))
            })?;
        }
    }
    Ok(())
}
