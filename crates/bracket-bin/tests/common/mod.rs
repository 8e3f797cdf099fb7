/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fixture builder
//!
//! Exposures are rendered from one synthetic scene and encoded as JPEGs,
//! optionally carrying an EXIF segment with the exposure time and f-number.
#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use exif::experimental::Writer;
use exif::{Context, Field, In, Rational, SRational, Tag, Value};
use jpeg_encoder::{ColorType, Encoder};
use nanorand::{Rng, WyRand};
use zune_core::colorspace::ColorSpace;
use zune_image::image::Image;

pub const WIDTH: usize = 48;
pub const HEIGHT: usize = 32;

/// A fresh directory for one test, removed when dropped
///
/// Dropping also happens while a failing test unwinds
pub struct TestDir(PathBuf);

impl Deref for TestDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for TestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

pub fn test_dir(name: &str) -> TestDir {
    let dir = std::env::temp_dir().join(format!("bracket-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    TestDir(dir)
}

/// Names of files in `dir` containing `pattern`
pub fn files_containing(dir: &Path, pattern: &str) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.contains(pattern))
        .collect()
}

/// Scene radiance, interleaved RGB
///
/// A horizontal ramp spanning about six stops with some noise on top
pub fn scene(width: usize, height: usize) -> Vec<f32> {
    let mut noise = vec![0_u8; width * height * 3];
    WyRand::new_seed(42).fill(&mut noise);

    let mut radiance = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        for x in 0..width {
            let stops = 6.0 * x as f32 / width as f32 + 0.5 * y as f32 / height as f32;
            let base = 0.5 * stops.exp2();

            for c in 0..3 {
                let tint = [1.0, 0.8, 0.6][c];
                let grain = f32::from(noise[(y * width + x) * 3 + c]) / 255.0 * 0.1;
                radiance.push(base * tint * (1.0 + grain));
            }
        }
    }
    radiance
}

/// What a camera with a linear response records for `scene` at `time` seconds
pub fn expose(scene: &[f32], time: f32) -> Vec<u8> {
    scene
        .iter()
        .map(|x| (x * time * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

/// An APP1 payload with the given fields
pub fn exif_segment(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();

    for field in fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();

    let mut segment = b"Exif\0\0".to_vec();
    segment.extend_from_slice(buf.get_ref());
    segment
}

pub fn exposure_time_field(num: u32, denom: u32) -> Field {
    Field {
        tag:     Tag::ExposureTime,
        ifd_num: In::PRIMARY,
        value:   Value::Rational(vec![Rational { num, denom }])
    }
}

pub fn f_number_field(num: u32, denom: u32) -> Field {
    Field {
        tag:     Tag::FNumber,
        ifd_num: In::PRIMARY,
        value:   Value::Rational(vec![Rational { num, denom }])
    }
}

/// A rational field stored in IFD0 under an arbitrary tag number
pub fn ifd0_rational_field(number: u16, num: u32, denom: u32) -> Field {
    Field {
        tag:     Tag(Context::Tiff, number),
        ifd_num: In::PRIMARY,
        value:   Value::Rational(vec![Rational { num, denom }])
    }
}

pub fn shutter_speed_field(num: i32, denom: i32) -> Field {
    Field {
        tag:     Tag::ShutterSpeedValue,
        ifd_num: In::PRIMARY,
        value:   Value::SRational(vec![SRational { num, denom }])
    }
}

/// Encode RGB pixels to a JPEG at `path`
pub fn write_jpeg(path: &Path, pixels: &[u8], width: usize, height: usize, fields: &[Field]) {
    write_jpeg_as(path, pixels, width, height, ColorType::Rgb, fields);
}

/// Encode pixels laid out as `color` to a JPEG at `path`
pub fn write_jpeg_as(
    path: &Path, pixels: &[u8], width: usize, height: usize, color: ColorType, fields: &[Field]
) {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf, 95);

    if !fields.is_empty() {
        encoder.add_app_segment(1, &exif_segment(fields)).unwrap();
    }
    encoder
        .encode(pixels, width as u16, height as u16, color)
        .unwrap();

    fs::write(path, buf).unwrap();
}

/// Average of every RGB triplet, a gray rendition of an exposure
pub fn to_gray(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(3)
        .map(|p| ((u16::from(p[0]) + u16::from(p[1]) + u16::from(p[2])) / 3) as u8)
        .collect()
}

/// Append an alpha channel ramping along x
pub fn with_alpha(pixels: &[u8], width: usize) -> Vec<u8> {
    pixels
        .chunks_exact(3)
        .enumerate()
        .flat_map(|(i, p)| [p[0], p[1], p[2], ((i % width) * 255 / width) as u8])
        .collect()
}

/// Encode RGBA pixels to a PNG at `path`, PNG carries no EXIF here
pub fn write_rgba_png(path: &Path, pixels: &[u8], width: usize, height: usize) {
    Image::from_u8(pixels, width, height, ColorSpace::RGBA)
        .save(path)
        .unwrap();
}

/// Render and write one exposure of the shared scene
///
/// `time` is `(numerator, denominator)` in seconds, `None` writes no EXIF at all
pub fn write_exposure(dir: &Path, name: &str, time: Option<(u32, u32)>) -> PathBuf {
    let path = dir.join(name);
    let seconds = time.map_or(1.0 / 60.0, |(num, denom)| num as f32 / denom as f32);
    let pixels = expose(&scene(WIDTH, HEIGHT), seconds);

    let fields: Vec<Field> = time
        .map(|(num, denom)| vec![exposure_time_field(num, denom)])
        .unwrap_or_default();

    write_jpeg(&path, &pixels, WIDTH, HEIGHT, &fields);
    path
}

/// The three exposures [1/125, 1/60, 1/30]
pub fn bracket(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_exposure(dir, "short.jpg", Some((1, 125))),
        write_exposure(dir, "mid.jpg", Some((1, 60))),
        write_exposure(dir, "long.jpg", Some((1, 30)))
    ]
}
