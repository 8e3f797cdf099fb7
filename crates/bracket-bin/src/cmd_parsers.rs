/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::ArgMatches;
use log::info;

use crate::cmd_args::arg_parsers::{IMergeStrategy, ITonemapOperator};
use crate::cmd_args::EXIF_TAG_ARGS;
use crate::config::PipelineConfig;
use crate::errors::HdrErrors;

pub mod global_options;
pub mod merge;
pub mod tonemap;

/// Returns true if `id` was passed on the command line
///
/// Values coming from defaults don't count, so they never override a config file
pub fn from_command_line(options: &ArgMatches, id: &str) -> bool {
    options.value_source(id) == Some(ValueSource::CommandLine)
}

/// Build the run configuration
///
/// Starts from the JSON file given by `--config`, if any, then applies every
/// option passed on the command line on top of it.
pub fn parse_config(options: &ArgMatches) -> Result<PipelineConfig, HdrErrors> {
    let mut config = match options.get_one::<PathBuf>("config") {
        Some(path) => {
            info!("Reading configuration from {path:?}");
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default()
    };

    if from_command_line(options, "in") {
        if let Some(inputs) = options.get_many::<PathBuf>("in") {
            config.inputs = inputs.cloned().collect();
        }
    }
    if let Some(output) = options.get_one::<PathBuf>("out") {
        config.output = output.clone();
    }
    if let Some(radiance_output) = options.get_one::<PathBuf>("radiance-output") {
        config.radiance_output = Some(radiance_output.clone());
    }
    if from_command_line(options, "yes") {
        info!("Overwriting existing files");
        config.overwrite = true;
    }
    if from_command_line(options, "aperture-compensation") {
        config.aperture_compensation = true;
    }

    if let Some(strategy) = options.get_one::<IMergeStrategy>("merge") {
        // keep weights from the config file if it picked the same strategy
        if strategy.to_strategy().name() != config.merge.name() {
            config.merge = strategy.to_strategy();
        }
    }
    merge::apply_weights(options, &mut config.merge)?;

    if let Some(operator) = options.get_one::<ITonemapOperator>("tonemap") {
        if operator.name() != config.tonemap.name() {
            config.tonemap = operator.to_operator();
        }
    }
    tonemap::apply_parameters(options, &mut config.tonemap)?;

    for (id, _) in EXIF_TAG_ARGS {
        if let Some(tag) = options.get_one::<u16>(id) {
            let tags = &mut config.exif_tags;

            match id {
                "exif-exposure-time-tag" => tags.exposure_time = *tag,
                "exif-f-number-tag" => tags.f_number = *tag,
                "exif-iso-tag" => tags.iso = *tag,
                _ => tags.shutter_speed = *tag
            }
        }
    }
    info!(
        "{} input(s), merge: {}, tonemap: {}",
        config.inputs.len(),
        config.merge.name(),
        config.tonemap.name()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use bracket_fusion::merge::MergeStrategy;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::parse_config;

    fn parse(args: &[&str]) -> Result<crate::config::PipelineConfig, crate::errors::HdrErrors> {
        let matches = create_cmd_args().try_get_matches_from(args).unwrap();
        parse_config(&matches)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["bracket", "-i", "a.jpg", "-i", "b.jpg"]).unwrap();

        assert_eq!(config.inputs, [PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(config.output, PathBuf::from("output_hdr.jpg"));
        assert_eq!(config.merge, MergeStrategy::Debevec);
        assert_eq!(config.tonemap.name(), "reinhard");
        assert!(!config.overwrite);
    }

    #[test]
    fn test_mantiuk_options() {
        let config = parse(&[
            "bracket", "-i", "a.jpg", "-i", "b.jpg", "--tonemap", "mantiuk", "--contrast", "1.0",
            "--saturation", "1.2", "--brightness", "0.7", "-y"
        ])
        .unwrap();

        assert_eq!(config.tonemap.name(), "mantiuk");
        assert!((config.tonemap.brightness() - 0.7).abs() < 1e-6);
        assert!(config.overwrite);
    }

    #[test]
    fn test_parameter_of_another_operator_is_rejected() {
        let err = parse(&["bracket", "-i", "a.jpg", "--tonemap", "reinhard", "--bias", "0.5"])
            .unwrap_err();
        assert_eq!(err.kind(), "CONFIG_ERROR");

        let err = parse(&["bracket", "-i", "a.jpg", "--contrast-weight", "2"]).unwrap_err();
        assert_eq!(err.kind(), "CONFIG_ERROR");
    }

    /// Removes a file even if the test panics
    struct RemoveOnDrop(PathBuf);

    impl Drop for RemoveOnDrop {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let path = std::env::temp_dir().join(format!(
            "bracket-cmd-parsers-config-{}.json",
            std::process::id()
        ));
        let _cleanup = RemoveOnDrop(path.clone());
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"{"inputs": ["x.jpg", "y.jpg"], "output": "file.png",
                 "merge": {"strategy": "mertens", "exposure_weight": 1.0}}"#
        )
        .unwrap();
        drop(file);

        let config = parse(&[
            "bracket",
            "--config",
            path.to_str().unwrap(),
            "-o",
            "cli.png",
            "--merge",
            "mertens",
            "--saturation-weight",
            "0.5"
        ])
        .unwrap();

        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.output, PathBuf::from("cli.png"));
        assert_eq!(
            config.merge,
            MergeStrategy::Mertens {
                contrast_weight:   1.0,
                saturation_weight: 0.5,
                exposure_weight:   1.0
            }
        );
    }
}
