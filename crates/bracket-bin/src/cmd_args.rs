/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

use crate::cmd_args::arg_parsers::{IMergeStrategy, ITonemapOperator};
use crate::cmd_args::help_strings::{
    APERTURE_HELP, BRIGHTNESS_HELP, CONFIG_HELP, MERGE_HELP, PROBE_HELP, TONEMAP_HELP
};

pub mod arg_parsers;
pub mod help_strings;

/// Tonemap parameters settable from the command line,
/// as (argument id, help)
pub static TONEMAP_ARGS: [(&str, &str); 10] = [
    ("gamma", "Gamma of the final curve, default 1.0"),
    ("intensity", "Result intensity in [-8, 8] (reinhard), default 0.0"),
    ("light-adapt", "Light adaptation in [0, 1] (reinhard), default 1.0"),
    ("color-adapt", "Chromatic adaptation in [0, 1] (reinhard), default 0.0"),
    ("saturation", "Color saturation (drago, durand, mantiuk), default 1.0"),
    ("bias", "Bias of the logarithm base in (0, 1) (drago), default 0.85"),
    ("contrast", "Contrast (durand: base layer ratio 4.0, mantiuk: scale 0.7)"),
    ("sigma-space", "Bilateral filter spatial sigma (durand), default 2.0"),
    ("sigma-color", "Bilateral filter range sigma (durand), default 2.0"),
    ("brightness", "Scale applied after tonemapping (mantiuk), default 1.0")
];

/// Mertens weights settable from the command line
pub static MERGE_WEIGHT_ARGS: [(&str, &str); 3] = [
    ("contrast-weight", "Exponent of the contrast measure (mertens), default 1.0"),
    ("saturation-weight", "Exponent of the saturation measure (mertens), default 1.0"),
    ("exposure-weight", "Exponent of the well-exposedness measure (mertens), default 0.0")
];

/// EXIF tag numbers settable from the command line
pub static EXIF_TAG_ARGS: [(&str, &str); 4] = [
    ("exif-exposure-time-tag", "Tag holding the exposure time, default 33434"),
    ("exif-f-number-tag", "Tag holding the f-number, default 33437"),
    ("exif-iso-tag", "Tag holding the ISO speed, default 34855"),
    ("exif-shutter-speed-tag", "Tag holding the APEX shutter speed, default 37377")
];

fn f32_arg(id: &'static str, help: &'static str, heading: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .help_heading(heading)
        .value_name("VALUE")
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f32))
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    let mut command = Command::new("bracket")
        .about("Merge differently exposed photographs of a scene into one tonemapped image")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input exposure, pass once per image")
            .help_heading("INPUT/OUTPUT")
            .action(ArgAction::Append)
            .value_parser(value_parser!(std::path::PathBuf))
            .required_unless_present("config"))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Output file, the format is picked from the extension [default: output_hdr.jpg]")
            .help_heading("INPUT/OUTPUT")
            .value_parser(value_parser!(std::path::PathBuf)))
        .arg(Arg::new("config")
            .long("config")
            .help("Read options from a JSON file")
            .long_help(CONFIG_HELP)
            .help_heading("INPUT/OUTPUT")
            .value_parser(value_parser!(std::path::PathBuf)))
        .arg(Arg::new("yes")
            .short('y')
            .long("yes")
            .help("Overwrite existing output files")
            .help_heading("INPUT/OUTPUT")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("probe")
            .long("probe")
            .help(PROBE_HELP)
            .help_heading("INPUT/OUTPUT")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("merge")
            .long("merge")
            .help("Fusion strategy used to merge exposures")
            .long_help(MERGE_HELP)
            .help_heading("MERGE")
            .value_parser(value_parser!(IMergeStrategy)))
        .arg(Arg::new("tonemap")
            .long("tonemap")
            .help("Tonemap operator")
            .long_help(TONEMAP_HELP)
            .help_heading("TONEMAP")
            .value_parser(value_parser!(ITonemapOperator)))
        .arg(Arg::new("aperture-compensation")
            .long("aperture-compensation")
            .help("Normalize exposure times to the aperture of the first image")
            .long_help(APERTURE_HELP)
            .help_heading("ADVANCED")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("radiance-output")
            .long("radiance-output")
            .help("Also write the merged radiance image, must end in .hdr")
            .help_heading("ADVANCED")
            .value_parser(value_parser!(std::path::PathBuf)))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about each stage, this is the default"));

    for (id, help) in MERGE_WEIGHT_ARGS {
        command = command.arg(f32_arg(id, help, "MERGE"));
    }
    for (id, help) in TONEMAP_ARGS {
        let arg = f32_arg(id, help, "TONEMAP");

        command = if id == "brightness" {
            command.arg(arg.long_help(BRIGHTNESS_HELP))
        } else {
            command.arg(arg)
        };
    }
    for (id, help) in EXIF_TAG_ARGS {
        command = command.arg(Arg::new(id)
            .long(id)
            .help(help)
            .help_heading("ADVANCED")
            .value_name("TAG")
            .value_parser(value_parser!(u16)));
    }
    command
}
