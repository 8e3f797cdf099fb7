/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Merge operations, fusing exposures into a radiance image
//!
//! Two strategies exist
//!
//! - [`MergeDebevec`](debevec::MergeDebevec) weights each exposure by a hat function
//!   and divides out the exposure time, so it needs exposure times
//! - [`MergeMertens`](mertens::MergeMertens) blends exposures by contrast, saturation and
//!   well-exposedness over laplacian pyramids, exposure times are ignored
//!
//! [`MergeStrategy`] selects one of them from configuration.
use crate::errors::FusionErrors;
use crate::merge::debevec::MergeDebevec;
use crate::merge::mertens::MergeMertens;
use crate::traits::MergeTrait;

pub mod debevec;
pub mod mertens;

pub const DEFAULT_CONTRAST_WEIGHT: f32 = 1.0;
pub const DEFAULT_SATURATION_WEIGHT: f32 = 1.0;
pub const DEFAULT_EXPOSURE_WEIGHT: f32 = 0.0;

#[cfg(feature = "serde-support")]
const fn default_contrast_weight() -> f32 {
    DEFAULT_CONTRAST_WEIGHT
}
#[cfg(feature = "serde-support")]
const fn default_saturation_weight() -> f32 {
    DEFAULT_SATURATION_WEIGHT
}
#[cfg(feature = "serde-support")]
const fn default_exposure_weight() -> f32 {
    DEFAULT_EXPOSURE_WEIGHT
}

/// Fusion strategy to use when merging exposures
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "strategy", rename_all = "lowercase")
)]
pub enum MergeStrategy {
    /// Exposure weighted fusion with a linear camera response
    #[default]
    Debevec,
    /// Exposure fusion, the weights are exponents of the three quality measures
    Mertens {
        #[cfg_attr(feature = "serde-support", serde(default = "default_contrast_weight"))]
        contrast_weight:   f32,
        #[cfg_attr(feature = "serde-support", serde(default = "default_saturation_weight"))]
        saturation_weight: f32,
        #[cfg_attr(feature = "serde-support", serde(default = "default_exposure_weight"))]
        exposure_weight:   f32
    }
}

impl MergeStrategy {
    /// Mertens fusion with its default weights
    pub const fn mertens() -> MergeStrategy {
        MergeStrategy::Mertens {
            contrast_weight:   DEFAULT_CONTRAST_WEIGHT,
            saturation_weight: DEFAULT_SATURATION_WEIGHT,
            exposure_weight:   DEFAULT_EXPOSURE_WEIGHT
        }
    }

    /// Parse a strategy from its name, using default weights
    pub fn from_name(name: &str) -> Option<MergeStrategy> {
        match name.to_ascii_lowercase().as_str() {
            "debevec" => Some(MergeStrategy::Debevec),
            "mertens" => Some(MergeStrategy::mertens()),
            _ => None
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            MergeStrategy::Debevec => "debevec",
            MergeStrategy::Mertens { .. } => "mertens"
        }
    }

    /// Returns true if this strategy uses exposure times
    pub const fn needs_exposure_times(&self) -> bool {
        matches!(self, MergeStrategy::Debevec)
    }

    /// Create the merge operation for this strategy
    ///
    /// # Errors
    /// A Mertens weight is negative or not finite
    pub fn to_merger(&self) -> Result<Box<dyn MergeTrait>, FusionErrors> {
        match *self {
            MergeStrategy::Debevec => Ok(Box::new(MergeDebevec::new())),
            MergeStrategy::Mertens {
                contrast_weight,
                saturation_weight,
                exposure_weight
            } => {
                let weights = [
                    ("contrast_weight", contrast_weight),
                    ("saturation_weight", saturation_weight),
                    ("exposure_weight", exposure_weight)
                ];
                for (name, value) in weights {
                    if !value.is_finite() || value < 0.0 {
                        return Err(FusionErrors::InvalidParameter("mertens", name, value));
                    }
                }
                Ok(Box::new(MergeMertens::new(
                    contrast_weight,
                    saturation_weight,
                    exposure_weight
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::merge::MergeStrategy;

    #[test]
    fn test_strategy_from_name() {
        assert_eq!(MergeStrategy::from_name("Debevec"), Some(MergeStrategy::Debevec));
        assert_eq!(MergeStrategy::from_name("mertens"), Some(MergeStrategy::mertens()));
        assert_eq!(MergeStrategy::from_name("robertson"), None);
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let strategy = MergeStrategy::Mertens {
            contrast_weight:   1.0,
            saturation_weight: -1.0,
            exposure_weight:   0.0
        };
        assert!(strategy.to_merger().is_err());
        assert!(MergeStrategy::mertens().to_merger().is_ok());
    }

    #[cfg(feature = "serde-support")]
    #[test]
    fn test_strategy_deserializes_with_defaults() {
        let strategy: MergeStrategy =
            serde_json::from_str(r#"{"strategy":"mertens","exposure_weight":1.0}"#).unwrap();

        assert_eq!(
            strategy,
            MergeStrategy::Mertens {
                contrast_weight:   1.0,
                saturation_weight: 1.0,
                exposure_weight:   1.0
            }
        );
    }
}
