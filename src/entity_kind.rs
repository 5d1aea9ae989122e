// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `EntityKind` and `LoadType` enums, which classify
//! the entities of a grid.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Represents the electrical behaviour of a consumer.
///
/// The sign of a consumer's reactive power is determined entirely by its load
/// type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// Heating, lighting.  Draws no reactive power.
    Resistive,
    /// Motors, transformers.  Draws positive reactive power.
    Inductive,
    /// Capacitor banks.  Draws negative reactive power.
    Capacitive,
}

impl LoadType {
    /// Returns the short label shown on the consumer.
    pub fn label(&self) -> &'static str {
        match self {
            LoadType::Resistive => "CR",
            LoadType::Inductive => "CI",
            LoadType::Capacitive => "CC",
        }
    }
}

impl Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadType::Resistive => write!(f, "Resistive"),
            LoadType::Inductive => write!(f, "Inductive"),
            LoadType::Capacitive => write!(f, "Capacitive"),
        }
    }
}

/// Represents the kind of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Station,
    Consumer(LoadType),
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Station => write!(f, "Station"),
            EntityKind::Consumer(load_type) => write!(f, "{}Consumer", load_type),
        }
    }
}

/// Predicates for checking the kind of anything that has one.
pub(crate) trait KindPredicates {
    fn kind(&self) -> EntityKind;

    fn is_station(&self) -> bool {
        self.kind() == EntityKind::Station
    }

    fn is_consumer(&self) -> bool {
        matches!(self.kind(), EntityKind::Consumer(_))
    }
}
