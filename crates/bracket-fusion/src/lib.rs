/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Exposure fusion and tonemapping routines for `bracket`
//!
//! This crate turns a set of differently exposed 8-bit frames into a
//! floating point radiance image and compresses that radiance image back
//! into a displayable `[0,1]` range.
//!
//! It is split in two families of operations
//!
//! - merge operations implement [`MergeTrait`](crate::traits::MergeTrait)
//!     - [`MergeDebevec`](crate::merge::debevec::MergeDebevec): exposure weighted fusion, needs exposure times
//!     - [`MergeMertens`](crate::merge::mertens::MergeMertens): exposure fusion, ignores exposure times
//! - tonemap operations implement [`TonemapTrait`](crate::traits::TonemapTrait)
//!     - [`Linear`](crate::tonemap::linear::Linear)
//!     - [`Reinhard`](crate::tonemap::reinhard::Reinhard)
//!     - [`Drago`](crate::tonemap::drago::Drago)
//!     - [`Durand`](crate::tonemap::durand::Durand)
//!     - [`Mantiuk`](crate::tonemap::mantiuk::Mantiuk)
//!
//! Images are stored planar, one buffer per channel, see [`PlanarImage`](crate::radiance::PlanarImage)
//!
//! # Example
//! - Merge two synthetic exposures and tonemap them with Reinhard
//! ```
//! use zune_core::colorspace::ColorSpace;
//! use bracket_fusion::merge::debevec::MergeDebevec;
//! use bracket_fusion::radiance::LdrFrame;
//! use bracket_fusion::tonemap::reinhard::Reinhard;
//! use bracket_fusion::traits::{MergeTrait, TonemapTrait};
//!
//! let dark = LdrFrame::fill(40, ColorSpace::RGB, 16, 16);
//! let bright = LdrFrame::fill(160, ColorSpace::RGB, 16, 16);
//!
//! let radiance = MergeDebevec::new()
//!     .merge(&[dark, bright], &[1.0 / 60.0, 1.0 / 15.0])
//!     .unwrap();
//! let ldr = Reinhard::default().tonemap(&radiance).unwrap();
//! assert_eq!(ldr.dimensions(), (16, 16));
//! ```
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod bilateral_filter;
pub mod errors;
pub mod mathops;
pub mod merge;
pub mod pyramid;
pub mod radiance;
pub mod tonemap;
pub mod traits;
