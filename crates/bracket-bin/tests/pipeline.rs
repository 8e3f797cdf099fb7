/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use bracket_bin::config::{ExifTags, PipelineConfig, EXPOSURE_TIME_TAG};
use bracket_bin::exposure::{read_exposure_info, read_exposure_times};
use bracket_bin::file_io::load_frame;
use bracket_bin::workflow::{clamp_and_scale, run};
use bracket_fusion::merge::MergeStrategy;
use bracket_fusion::radiance::RadianceImage;
use bracket_fusion::tonemap::TonemapOperator;
use jpeg_encoder::ColorType;
use xxhash_rust::xxh3::xxh3_128;
use zune_core::colorspace::ColorSpace;

use crate::common::*;

mod common;

#[test]
fn three_exposures_are_merged() {
    let dir = test_dir("three-exposures");
    let output = dir.join("out.jpg");

    let summary = run(&PipelineConfig::new(bracket(&dir), output.clone())).unwrap();

    assert!(output.exists());
    assert_eq!(summary.dimensions, (WIDTH, HEIGHT));
    assert_eq!(summary.merged.len(), 3);

    for (found, expected) in summary.exposure_times.iter().zip([1.0_f32 / 125.0, 1.0 / 60.0, 1.0 / 30.0]) {
        assert!((found - expected).abs() < 1e-6);
    }
    // the intermediate file is renamed away
    assert!(files_containing(&dir, ".partial").is_empty());
}

#[test]
fn image_without_exposure_time_is_skipped() {
    let dir = test_dir("skip-one");
    let inputs = vec![
        write_exposure(&dir, "a.jpg", Some((1, 125))),
        write_exposure(&dir, "b.jpg", None),
        write_exposure(&dir, "c.jpg", Some((1, 30)))
    ];
    let output = dir.join("out.png");

    let summary = run(&PipelineConfig::new(inputs.clone(), output.clone())).unwrap();

    assert!(output.exists());
    assert_eq!(summary.merged, [inputs[0].clone(), inputs[2].clone()]);
}

#[test]
fn single_exposure_time_is_insufficient() {
    let dir = test_dir("insufficient");
    let inputs = vec![
        write_exposure(&dir, "a.jpg", Some((1, 125))),
        write_exposure(&dir, "b.jpg", None)
    ];
    let output = dir.join("out.jpg");

    let err = run(&PipelineConfig::new(inputs, output.clone())).unwrap_err();

    assert_eq!(err.kind(), "INSUFFICIENT_EXPOSURE_DATA");
    assert!(!output.exists());
}

#[test]
fn unreadable_image_fails_the_run() {
    let dir = test_dir("unreadable");
    let mut inputs = bracket(&dir);
    inputs.push(dir.join("missing.jpg"));
    let output = dir.join("out.jpg");

    let err = run(&PipelineConfig::new(inputs, output.clone())).unwrap_err();

    assert_eq!(err.kind(), "IMAGE_READ_ERROR");
    assert!(format!("{err:?}").contains("missing.jpg"));
    assert!(!output.exists());
}

#[test]
fn corrupt_image_fails_the_run() {
    let dir = test_dir("corrupt");
    let corrupt = dir.join("corrupt.jpg");
    fs::write(&corrupt, b"definitely not a jpeg").unwrap();

    let mut inputs = bracket(&dir);
    inputs.push(corrupt);
    let output = dir.join("out.jpg");

    // mertens skips metadata, so the decoder is the one rejecting the file
    let mut config = PipelineConfig::new(inputs, output.clone());
    config.merge = MergeStrategy::mertens();

    let err = run(&config).unwrap_err();

    assert_eq!(err.kind(), "IMAGE_READ_ERROR");
    assert!(!output.exists());
}

#[test]
fn mismatched_dimensions_write_nothing() {
    let dir = test_dir("dimensions");
    let small = dir.join("small.jpg");

    let pixels = expose(&scene(WIDTH / 2, HEIGHT), 1.0 / 30.0);
    write_jpeg(&small, &pixels, WIDTH / 2, HEIGHT, &[exposure_time_field(1, 30)]);

    let inputs = vec![write_exposure(&dir, "a.jpg", Some((1, 125))), small];
    let output = dir.join("out.jpg");

    let err = run(&PipelineConfig::new(inputs, output.clone())).unwrap_err();

    assert_eq!(err.kind(), "DIMENSION_MISMATCH");
    assert!(format!("{err:?}").contains("small.jpg"));
    assert!(!output.exists());
}

#[test]
fn runs_are_byte_identical() {
    let dir = test_dir("idempotence");
    let inputs = bracket(&dir);

    let mut hashes = Vec::new();

    for name in ["first.jpg", "second.jpg"] {
        let output = dir.join(name);
        let mut config = PipelineConfig::new(inputs.clone(), output.clone());
        config.tonemap = TonemapOperator::from_name("durand").unwrap();

        run(&config).unwrap();
        hashes.push(xxh3_128(&fs::read(output).unwrap()));
    }
    assert_eq!(hashes[0], hashes[1]);
}

#[test]
fn existing_output_needs_overwrite() {
    let dir = test_dir("overwrite");
    let inputs = bracket(&dir);
    let output = dir.join("out.jpg");
    fs::write(&output, b"keep me").unwrap();

    let mut config = PipelineConfig::new(inputs, output.clone());

    let err = run(&config).unwrap_err();
    assert_eq!(err.kind(), "OUTPUT_WRITE_ERROR");
    assert_eq!(fs::read(&output).unwrap(), b"keep me");

    config.overwrite = true;
    run(&config).unwrap();
    assert_ne!(fs::read(&output).unwrap(), b"keep me");
}

#[test]
fn unsupported_output_extension() {
    let dir = test_dir("extension");
    let output = dir.join("out.bmp");

    let err = run(&PipelineConfig::new(bracket(&dir), output.clone())).unwrap_err();

    assert_eq!(err.kind(), "OUTPUT_WRITE_ERROR");
    assert!(!output.exists());
}

#[test]
fn mertens_ignores_missing_metadata() {
    let dir = test_dir("mertens");
    let inputs = vec![
        write_exposure(&dir, "a.jpg", None),
        write_exposure(&dir, "b.jpg", None)
    ];
    let output = dir.join("out.png");

    let mut config = PipelineConfig::new(inputs, output.clone());
    config.merge = MergeStrategy::mertens();
    config.tonemap = TonemapOperator::from_name("linear").unwrap();

    let summary = run(&config).unwrap();

    assert!(output.exists());
    assert_eq!(summary.merge, "mertens");
    assert!(summary.exposure_times.is_empty());
}

#[test]
fn every_operator_produces_output() {
    let dir = test_dir("operators");
    let inputs = bracket(&dir);

    for name in TonemapOperator::NAMES {
        let output = dir.join(format!("{name}.png"));
        let mut config = PipelineConfig::new(inputs.clone(), output.clone());
        config.tonemap = TonemapOperator::from_name(name).unwrap();

        let summary = run(&config).unwrap();

        assert_eq!(summary.tonemap, name);
        assert!(output.exists(), "{name} wrote nothing");
    }
}

#[test]
fn radiance_image_is_written() {
    let dir = test_dir("radiance");
    let output = dir.join("out.jpg");
    let radiance = dir.join("merged.hdr");

    let mut config = PipelineConfig::new(bracket(&dir), output.clone());
    config.radiance_output = Some(radiance.clone());

    run(&config).unwrap();

    assert!(output.exists());
    assert!(radiance.exists());
}

#[test]
fn shutter_speed_is_used_without_exposure_time() {
    let dir = test_dir("apex");
    let path = dir.join("apex.jpg");
    let pixels = expose(&scene(WIDTH, HEIGHT), 1.0 / 128.0);

    write_jpeg(&path, &pixels, WIDTH, HEIGHT, &[shutter_speed_field(7, 1)]);

    let info = read_exposure_info(&path, &ExifTags::default()).unwrap();
    assert!((info.exposure_time.unwrap() - 1.0 / 128.0).abs() < 1e-7);
}

#[test]
fn exposure_times_are_compensated_for_aperture() {
    let dir = test_dir("aperture");
    let pixels = expose(&scene(WIDTH, HEIGHT), 1.0 / 60.0);

    let wide = dir.join("wide.jpg");
    let narrow = dir.join("narrow.jpg");
    write_jpeg(&wide, &pixels, WIDTH, HEIGHT, &[exposure_time_field(1, 60), f_number_field(28, 10)]);
    write_jpeg(&narrow, &pixels, WIDTH, HEIGHT, &[exposure_time_field(1, 15), f_number_field(56, 10)]);

    let paths = [wide, narrow];
    let tags = ExifTags::default();

    let raw = read_exposure_times(&paths, &tags, false).unwrap();
    assert!((raw[1].exposure_time - 1.0 / 15.0).abs() < 1e-6);

    // f/5.6 lets in a quarter of the light of f/2.8
    let compensated = read_exposure_times(&paths, &tags, true).unwrap();
    assert!((compensated[0].exposure_time - 1.0 / 60.0).abs() < 1e-6);
    assert!((compensated[1].exposure_time - 1.0 / 60.0).abs() < 1e-6);
}

#[test]
fn mantiuk_with_brightness_is_deterministic() {
    // a gentle ramp of about five stops, red > green > blue
    let (width, height) = (16, 12);
    let radiance = RadianceImage::from_fn(width, height, ColorSpace::RGB, |x, y| {
        let stops = x as f32 * 0.25 + y as f32 * 0.125;
        let base = 0.02 * stops.exp2();
        [base, base * 0.8, base * 0.5]
    });

    let mut operator = TonemapOperator::from_name("mantiuk").unwrap();
    operator.set_parameter("contrast", 1.0).unwrap();
    operator.set_parameter("saturation", 1.2).unwrap();
    operator.set_parameter("brightness", 0.7).unwrap();

    let render = || {
        let mut image = operator.to_tonemapper().unwrap().tonemap(&radiance).unwrap();
        clamp_and_scale(&mut image, operator.brightness());
        image.to_u8_interleaved()
    };
    let first = render();
    let second = render();

    assert_eq!(first.len(), width * height * 3);
    assert_eq!(xxh3_128(&first), xxh3_128(&second));
    // brightness 0.7 caps every value at round(0.7 * 255)
    assert!(first.iter().all(|x| *x <= 179));

    // (x, y, [r, g, b])
    let expected: [(usize, usize, [u8; 3]); 6] = [
        (15, 0, [67, 51, 28]),
        (8, 6, [32, 24, 13]),
        (12, 3, [51, 39, 21]),
        (4, 9, [20, 15, 7]),
        (0, 11, [11, 8, 3]),
        (15, 11, [179, 136, 76])
    ];
    for (x, y, rgb) in expected {
        let offset = (y * width + x) * 3;
        let found = &first[offset..offset + 3];

        for (a, b) in found.iter().zip(rgb) {
            assert!(a.abs_diff(b) <= 1, "pixel ({x},{y}) is {found:?}, expected {rgb:?}");
        }
    }
}

#[test]
fn radiance_image_is_discarded_when_writing_fails() {
    let dir = test_dir("radiance-cleanup");
    let output = dir.join("out.jpg");
    let radiance = dir.join("merged.hdr");

    // a directory squatting on the encoder's scratch name makes the final
    // encode fail after the radiance image was produced
    fs::create_dir(dir.join(".out.partial.jpg")).unwrap();

    let mut config = PipelineConfig::new(bracket(&dir), output.clone());
    config.radiance_output = Some(radiance.clone());

    let err = run(&config).unwrap_err();

    assert_eq!(err.kind(), "OUTPUT_WRITE_ERROR");
    assert!(!output.exists());
    assert!(!radiance.exists());
    assert!(files_containing(&dir, "merged").is_empty());
}

#[test]
fn directory_output_is_rejected() {
    let dir = test_dir("directory-output");
    let output = dir.join("out.jpg");
    let radiance = dir.join("merged.hdr");
    fs::create_dir(&output).unwrap();

    let mut config = PipelineConfig::new(bracket(&dir), output.clone());
    config.radiance_output = Some(radiance.clone());
    config.overwrite = true;

    let err = run(&config).unwrap_err();

    assert_eq!(err.kind(), "OUTPUT_WRITE_ERROR");
    assert!(output.is_dir());
    assert!(!radiance.exists());
    assert!(files_containing(&dir, ".partial").is_empty());
}

#[test]
fn gray_and_rgba_inputs_are_promoted_to_rgb() {
    let dir = test_dir("promotion");
    let pixels = expose(&scene(WIDTH, HEIGHT), 1.0 / 60.0);

    let gray = dir.join("gray.jpg");
    write_jpeg_as(&gray, &to_gray(&pixels), WIDTH, HEIGHT, ColorType::Luma, &[]);

    let rgba = dir.join("rgba.png");
    write_rgba_png(&rgba, &with_alpha(&pixels, WIDTH), WIDTH, HEIGHT);

    let frame = load_frame(&gray).unwrap();
    assert_eq!(frame.colorspace(), ColorSpace::RGB);
    assert_eq!(frame.dimensions(), (WIDTH, HEIGHT));
    let [r, g, b] = frame.channels_ref() else {
        panic!("expected three channels");
    };
    assert_eq!(r, g);
    assert_eq!(g, b);

    // png is lossless, alpha is dropped and color is kept as is
    let frame = load_frame(&rgba).unwrap();
    assert_eq!(frame.colorspace(), ColorSpace::RGB);
    assert_eq!(frame.to_interleaved(), pixels);

    // both merge with a regular rgb exposure
    let inputs = vec![gray, rgba, write_exposure(&dir, "rgb.jpg", None)];
    let output = dir.join("out.png");

    let mut config = PipelineConfig::new(inputs, output.clone());
    config.merge = MergeStrategy::mertens();

    let summary = run(&config).unwrap();
    assert_eq!(summary.merged.len(), 3);
    assert!(output.exists());
}

#[test]
fn exposure_tags_are_read_from_ifd0() {
    let dir = test_dir("ifd0");
    let pixels = expose(&scene(WIDTH, HEIGHT), 1.0 / 60.0);

    // some cameras store capture fields in IFD0 instead of the EXIF sub-IFD
    let standard = dir.join("standard.jpg");
    write_jpeg(&standard, &pixels, WIDTH, HEIGHT, &[ifd0_rational_field(EXPOSURE_TIME_TAG, 1, 60)]);

    let info = read_exposure_info(&standard, &ExifTags::default()).unwrap();
    assert!((info.exposure_time.unwrap() - 1.0 / 60.0).abs() < 1e-7);

    // vendor tag numbers live in IFD0 too
    let vendor = dir.join("vendor.jpg");
    write_jpeg(&vendor, &pixels, WIDTH, HEIGHT, &[ifd0_rational_field(0xFDE8, 1, 250)]);

    let tags = ExifTags {
        exposure_time: 0xFDE8,
        ..ExifTags::default()
    };
    let info = read_exposure_info(&vendor, &tags).unwrap();
    assert!((info.exposure_time.unwrap() - 1.0 / 250.0).abs() < 1e-7);

    // the default tags don't pick up the vendor field
    let info = read_exposure_info(&vendor, &ExifTags::default()).unwrap();
    assert_eq!(info.exposure_time, None);
}
