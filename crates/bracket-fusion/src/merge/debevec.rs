/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure weighted fusion
//!
//! Every exposure votes for the radiance of a pixel with
//! `ln g(z) - ln t`, where `g` is the camera response and `t` the exposure
//! time. Votes are weighted with a hat function that trusts mid-tones
//! and distrusts values close to the sensor limits.
//!
//! The camera response is assumed linear, `g(z) = z` with `g(0) = g(1)`
//! so that black pixels do not produce `ln 0`
use log::debug;

use crate::errors::FusionErrors;
use crate::radiance::{LdrFrame, RadianceImage};
use crate::traits::MergeTrait;

/// Exposure weighted merge
#[derive(Default, Copy, Clone, Debug)]
pub struct MergeDebevec;

impl MergeDebevec {
    pub fn new() -> MergeDebevec {
        MergeDebevec
    }
}

/// `z + 1` for the lower half of the range, `256 - z` for the upper half
fn hat_weights() -> [f32; 256] {
    let mut weights = [0.0; 256];

    for (z, w) in weights.iter_mut().enumerate() {
        *w = if z < 128 { (z + 1) as f32 } else { (256 - z) as f32 };
    }
    weights
}

/// `ln g(z)` for a linear response
fn linear_log_response() -> [f32; 256] {
    let mut response = [0.0; 256];

    for (z, r) in response.iter_mut().enumerate() {
        *r = (z.max(1) as f32).ln();
    }
    response
}

impl MergeTrait for MergeDebevec {
    fn name(&self) -> &'static str {
        "debevec"
    }

    fn needs_exposure_times(&self) -> bool {
        true
    }

    fn merge_impl(&self, frames: &[LdrFrame], times: &[f32]) -> Result<RadianceImage, FusionErrors> {
        let (width, height) = frames[0].dimensions();
        let colorspace = frames[0].colorspace();
        let channels = frames[0].num_channels();
        let size = width * height;

        let weights = hat_weights();
        let log_response = linear_log_response();

        let mut result = vec![vec![0.0_f32; size]; channels];
        let mut weight_sum = vec![0.0_f32; size];
        let mut pixel_weight = vec![0.0_f32; size];

        for (frame, time) in frames.iter().zip(times) {
            let log_time = time.ln();
            debug!("Merging exposure with time {time}s");

            // per pixel weight is the mean of the channel weights
            pixel_weight.iter_mut().for_each(|x| *x = 0.0);

            for channel in frame.channels_ref() {
                for (w, z) in pixel_weight.iter_mut().zip(channel) {
                    *w += weights[usize::from(*z)];
                }
            }
            pixel_weight.iter_mut().for_each(|x| *x /= channels as f32);

            for (out, channel) in result.iter_mut().zip(frame.channels_ref()) {
                for ((r, z), w) in out.iter_mut().zip(channel).zip(&pixel_weight) {
                    *r += w * (log_response[usize::from(*z)] - log_time);
                }
            }
            for (sum, w) in weight_sum.iter_mut().zip(&pixel_weight) {
                *sum += w;
            }
        }
        // weights are at least 1 so the sum is never zero
        for channel in result.iter_mut() {
            for (r, sum) in channel.iter_mut().zip(&weight_sum) {
                *r = (*r / sum).exp();
            }
        }
        RadianceImage::new(result, width, height, colorspace)
    }
}
