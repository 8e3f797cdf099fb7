/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use bracket_fusion::merge::MergeStrategy;
use clap::ArgMatches;
use log::debug;

use crate::cmd_args::MERGE_WEIGHT_ARGS;
use crate::errors::HdrErrors;

/// Apply `--*-weight` options to a strategy
///
/// # Errors
/// A weight was given but the strategy is not mertens
pub fn apply_weights(options: &ArgMatches, strategy: &mut MergeStrategy) -> Result<(), HdrErrors> {
    let name = strategy.name();

    for (id, _) in MERGE_WEIGHT_ARGS {
        let Some(value) = options.get_one::<f32>(id).copied() else {
            continue;
        };
        let MergeStrategy::Mertens {
            contrast_weight,
            saturation_weight,
            exposure_weight
        } = strategy
        else {
            return Err(HdrErrors::Config(format!(
                "--{id} only applies to the mertens strategy, current strategy is {name}"
            )));
        };
        debug!("Setting {id} to {value}");

        match id {
            "contrast-weight" => *contrast_weight = value,
            "saturation-weight" => *saturation_weight = value,
            _ => *exposure_weight = value
        }
    }
    Ok(())
}
