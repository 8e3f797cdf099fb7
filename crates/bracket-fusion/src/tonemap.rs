/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tonemap operators and their parameter records
//!
//! Every operator starts by linearly normalizing the radiance image to `[0,1]`
//! and ends with a `x^(1/gamma)` curve, what happens in between is operator specific.
//!
//! [`TonemapOperator`] pairs each operator with a parameter record whose fields are
//! all optional, a missing field means the operator default is used.
//!
//! | Operator | Parameters (default) |
//! |----------|----------------------|
//! | linear   | `gamma` (1.0) |
//! | reinhard | `gamma` (1.0), `intensity` (0.0), `light_adapt` (1.0), `color_adapt` (0.0) |
//! | drago    | `gamma` (1.0), `saturation` (1.0), `bias` (0.85) |
//! | durand   | `gamma` (1.0), `contrast` (4.0), `saturation` (1.0), `sigma_space` (2.0), `sigma_color` (2.0) |
//! | mantiuk  | `gamma` (1.0), `contrast` (0.7), `saturation` (1.0), `brightness` (1.0) |
//!
//! `brightness` is not used by the Mantiuk operator itself, it's a scale
//! factor the caller applies to the clamped output.
use crate::errors::FusionErrors;
use crate::tonemap::drago::Drago;
use crate::tonemap::durand::Durand;
use crate::tonemap::linear::Linear;
use crate::tonemap::mantiuk::Mantiuk;
use crate::tonemap::reinhard::Reinhard;
use crate::traits::TonemapTrait;

pub mod drago;
pub mod durand;
pub mod linear;
pub mod mantiuk;
pub mod reinhard;

/// Generate a parameter record with optional fields
/// and accessors returning the default for missing fields
macro_rules! options_struct {
    (
        $(#[$meta:meta])*
        $name:ident, $operator:literal, { $($field:ident : $default:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq)]
        #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            $(
                #[cfg_attr(feature = "serde-support", serde(skip_serializing_if = "Option::is_none"))]
                pub $field: Option<f32>,
            )+
        }

        impl $name {
            /// Names of the parameters this record accepts
            pub const PARAMETERS: &'static [&'static str] = &[$(stringify!($field)),+];

            $(
                #[doc = concat!("`", stringify!($field), "`, defaults to `", stringify!($default), "`")]
                pub fn $field(&self) -> f32 {
                    self.$field.unwrap_or($default)
                }
            )+

            /// Set a parameter by name
            ///
            /// # Errors
            /// The parameter is not part of this record
            pub fn set(&mut self, parameter: &str, value: f32) -> Result<(), FusionErrors> {
                match parameter {
                    $(stringify!($field) => self.$field = Some(value),)+
                    _ => return Err(FusionErrors::UnknownParameter($operator, parameter.to_string()))
                }
                Ok(())
            }

            fn present(&self) -> Vec<(&'static str, f32)> {
                let mut present = Vec::new();
                $(
                    if let Some(value) = self.$field {
                        present.push((stringify!($field), value));
                    }
                )+
                present
            }
        }
    };
}

options_struct!(
    /// Parameters of the [`Linear`] operator
    LinearOptions, "linear", { gamma: 1.0 }
);

options_struct!(
    /// Parameters of the [`Reinhard`] operator
    ReinhardOptions, "reinhard", {
        gamma: 1.0,
        intensity: 0.0,
        light_adapt: 1.0,
        color_adapt: 0.0
    }
);

options_struct!(
    /// Parameters of the [`Drago`] operator
    DragoOptions, "drago", {
        gamma: 1.0,
        saturation: 1.0,
        bias: 0.85
    }
);

options_struct!(
    /// Parameters of the [`Durand`] operator
    DurandOptions, "durand", {
        gamma: 1.0,
        contrast: 4.0,
        saturation: 1.0,
        sigma_space: 2.0,
        sigma_color: 2.0
    }
);

options_struct!(
    /// Parameters of the [`Mantiuk`] operator
    MantiukOptions, "mantiuk", {
        gamma: 1.0,
        contrast: 0.7,
        saturation: 1.0,
        brightness: 1.0
    }
);

/// A tonemap operator together with its parameters
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "operator", rename_all = "lowercase")
)]
pub enum TonemapOperator {
    Linear(LinearOptions),
    Reinhard(ReinhardOptions),
    Drago(DragoOptions),
    Durand(DurandOptions),
    Mantiuk(MantiukOptions)
}

impl Default for TonemapOperator {
    fn default() -> Self {
        TonemapOperator::Reinhard(ReinhardOptions::default())
    }
}

impl TonemapOperator {
    /// Names of all operators, in the order they are listed in help output
    pub const NAMES: [&'static str; 5] = ["linear", "reinhard", "drago", "durand", "mantiuk"];

    /// Create an operator with default parameters from its name
    pub fn from_name(name: &str) -> Option<TonemapOperator> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Some(TonemapOperator::Linear(LinearOptions::default())),
            "reinhard" => Some(TonemapOperator::Reinhard(ReinhardOptions::default())),
            "drago" => Some(TonemapOperator::Drago(DragoOptions::default())),
            "durand" => Some(TonemapOperator::Durand(DurandOptions::default())),
            "mantiuk" => Some(TonemapOperator::Mantiuk(MantiukOptions::default())),
            _ => None
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            TonemapOperator::Linear(_) => "linear",
            TonemapOperator::Reinhard(_) => "reinhard",
            TonemapOperator::Drago(_) => "drago",
            TonemapOperator::Durand(_) => "durand",
            TonemapOperator::Mantiuk(_) => "mantiuk"
        }
    }

    /// Names of the parameters accepted by this operator
    pub const fn parameters(&self) -> &'static [&'static str] {
        match self {
            TonemapOperator::Linear(_) => LinearOptions::PARAMETERS,
            TonemapOperator::Reinhard(_) => ReinhardOptions::PARAMETERS,
            TonemapOperator::Drago(_) => DragoOptions::PARAMETERS,
            TonemapOperator::Durand(_) => DurandOptions::PARAMETERS,
            TonemapOperator::Mantiuk(_) => MantiukOptions::PARAMETERS
        }
    }

    /// Set a parameter by name
    ///
    /// # Errors
    /// The parameter does not apply to this operator
    pub fn set_parameter(&mut self, parameter: &str, value: f32) -> Result<(), FusionErrors> {
        match self {
            TonemapOperator::Linear(options) => options.set(parameter, value),
            TonemapOperator::Reinhard(options) => options.set(parameter, value),
            TonemapOperator::Drago(options) => options.set(parameter, value),
            TonemapOperator::Durand(options) => options.set(parameter, value),
            TonemapOperator::Mantiuk(options) => options.set(parameter, value)
        }
    }

    /// Scale factor applied after tonemapping
    ///
    /// Only Mantiuk carries one, every other operator returns `1.0`
    pub fn brightness(&self) -> f32 {
        match self {
            TonemapOperator::Mantiuk(options) => options.brightness(),
            _ => 1.0
        }
    }

    fn present(&self) -> Vec<(&'static str, f32)> {
        match self {
            TonemapOperator::Linear(options) => options.present(),
            TonemapOperator::Reinhard(options) => options.present(),
            TonemapOperator::Drago(options) => options.present(),
            TonemapOperator::Durand(options) => options.present(),
            TonemapOperator::Mantiuk(options) => options.present()
        }
    }

    /// Check every parameter is in range
    ///
    /// # Errors
    /// - A parameter is NaN or infinite
    /// - `gamma` is not positive
    /// - An operator specific parameter is out of range
    pub fn validate(&self) -> Result<(), FusionErrors> {
        let name = self.name();

        for (parameter, value) in self.present() {
            if !value.is_finite() {
                return Err(FusionErrors::InvalidParameter(name, parameter, value));
            }
        }
        let check = |ok: bool, parameter: &'static str, value: f32| {
            if ok {
                Ok(())
            } else {
                Err(FusionErrors::InvalidParameter(name, parameter, value))
            }
        };
        match self {
            TonemapOperator::Linear(o) => {
                check(o.gamma() > 0.0, "gamma", o.gamma())?;
            }
            TonemapOperator::Reinhard(o) => {
                check(o.gamma() > 0.0, "gamma", o.gamma())?;
                let light = o.light_adapt();
                check((0.0..=1.0).contains(&light), "light_adapt", light)?;
                let color = o.color_adapt();
                check((0.0..=1.0).contains(&color), "color_adapt", color)?;
            }
            TonemapOperator::Drago(o) => {
                check(o.gamma() > 0.0, "gamma", o.gamma())?;
                check(o.bias() > 0.0 && o.bias() < 1.0, "bias", o.bias())?;
            }
            TonemapOperator::Durand(o) => {
                check(o.gamma() > 0.0, "gamma", o.gamma())?;
                check(o.contrast() > 0.0, "contrast", o.contrast())?;
                check(o.sigma_space() > 0.0, "sigma_space", o.sigma_space())?;
                check(o.sigma_color() > 0.0, "sigma_color", o.sigma_color())?;
            }
            TonemapOperator::Mantiuk(o) => {
                check(o.gamma() > 0.0, "gamma", o.gamma())?;
                check(o.contrast() > 0.0, "contrast", o.contrast())?;
                check(o.brightness() >= 0.0, "brightness", o.brightness())?;
            }
        }
        Ok(())
    }

    /// Validate parameters and create the operation
    ///
    /// # Errors
    /// See [`validate`](TonemapOperator::validate)
    pub fn to_tonemapper(&self) -> Result<Box<dyn TonemapTrait>, FusionErrors> {
        self.validate()?;

        let tonemapper: Box<dyn TonemapTrait> = match self {
            TonemapOperator::Linear(o) => Box::new(Linear::new(o.gamma())),
            TonemapOperator::Reinhard(o) => Box::new(Reinhard::new(
                o.gamma(),
                o.intensity(),
                o.light_adapt(),
                o.color_adapt()
            )),
            TonemapOperator::Drago(o) => {
                Box::new(Drago::new(o.gamma(), o.saturation(), o.bias()))
            }
            TonemapOperator::Durand(o) => Box::new(Durand::new(
                o.gamma(),
                o.contrast(),
                o.saturation(),
                o.sigma_space(),
                o.sigma_color()
            )),
            TonemapOperator::Mantiuk(o) => {
                Box::new(Mantiuk::new(o.gamma(), o.contrast(), o.saturation()))
            }
        };
        Ok(tonemapper)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::FusionErrors;
    use crate::tonemap::{MantiukOptions, ReinhardOptions, TonemapOperator};

    #[test]
    fn test_defaults() {
        let operator = TonemapOperator::default();
        assert_eq!(operator.name(), "reinhard");
        assert_eq!(operator.brightness(), 1.0);

        let options = MantiukOptions::default();
        assert_eq!(options.contrast(), 0.7);
        assert_eq!(options.gamma(), 1.0);
    }

    #[test]
    fn test_set_parameter() {
        let mut operator = TonemapOperator::from_name("mantiuk").unwrap();
        operator.set_parameter("brightness", 0.7).unwrap();
        assert_eq!(operator.brightness(), 0.7);

        assert!(matches!(
            operator.set_parameter("intensity", 1.0),
            Err(FusionErrors::UnknownParameter("mantiuk", _))
        ));
    }

    #[test]
    fn test_validation() {
        let bad_gamma = TonemapOperator::Reinhard(ReinhardOptions {
            gamma: Some(0.0),
            ..Default::default()
        });
        assert!(bad_gamma.to_tonemapper().is_err());

        let nan = TonemapOperator::Reinhard(ReinhardOptions {
            intensity: Some(f32::NAN),
            ..Default::default()
        });
        assert!(nan.validate().is_err());

        for name in TonemapOperator::NAMES {
            let operator = TonemapOperator::from_name(name).unwrap();
            assert_eq!(operator.name(), name);
            assert!(operator.to_tonemapper().is_ok());
        }
    }

    #[cfg(feature = "serde-support")]
    #[test]
    fn test_deserialize_tagged_operator() {
        let operator: TonemapOperator =
            serde_json::from_str(r#"{"operator":"mantiuk","contrast":1.0,"saturation":1.2}"#)
                .unwrap();

        assert_eq!(
            operator,
            TonemapOperator::Mantiuk(MantiukOptions {
                contrast: Some(1.0),
                saturation: Some(1.2),
                ..Default::default()
            })
        );
    }
}
