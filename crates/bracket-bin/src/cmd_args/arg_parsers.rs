/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use bracket_fusion::merge::MergeStrategy;
use bracket_fusion::tonemap::TonemapOperator;
use clap::builder::PossibleValue;
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IMergeStrategy {
    Debevec,
    Mertens
}

impl IMergeStrategy {
    /// The strategy with its default weights
    pub const fn to_strategy(self) -> MergeStrategy {
        match self {
            IMergeStrategy::Debevec => MergeStrategy::Debevec,
            IMergeStrategy::Mertens => MergeStrategy::mertens()
        }
    }
}

impl ValueEnum for IMergeStrategy {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Debevec, Self::Mertens]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Debevec => PossibleValue::new("debevec").help("Exposure weighted fusion"),
            Self::Mertens => PossibleValue::new("mertens").help("Exposure fusion, ignores exposure times")
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ITonemapOperator {
    Linear,
    Reinhard,
    Drago,
    Durand,
    Mantiuk
}

impl ITonemapOperator {
    pub const fn name(self) -> &'static str {
        match self {
            ITonemapOperator::Linear => "linear",
            ITonemapOperator::Reinhard => "reinhard",
            ITonemapOperator::Drago => "drago",
            ITonemapOperator::Durand => "durand",
            ITonemapOperator::Mantiuk => "mantiuk"
        }
    }

    /// The operator with every parameter at its default
    pub fn to_operator(self) -> TonemapOperator {
        TonemapOperator::from_name(self.name()).unwrap_or_default()
    }
}

impl ValueEnum for ITonemapOperator {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Linear,
            Self::Reinhard,
            Self::Drago,
            Self::Durand,
            Self::Mantiuk
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use crate::cmd_args::arg_parsers::ITonemapOperator;

    #[test]
    fn test_every_operator_maps_to_itself() {
        for operator in ITonemapOperator::value_variants() {
            assert_eq!(operator.to_operator().name(), operator.name());
        }
    }
}
