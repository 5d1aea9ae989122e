// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the `Grid`.
//!
//! The values are injected into [`Grid::new`][crate::Grid::new] and can be
//! replaced later through [`Grid::set_config`][crate::Grid::set_config].  All
//! types implement `serde::Deserialize`, so an external configuration store
//! can produce them from whatever format it persists.

use serde::{Deserialize, Serialize};

use crate::{Error, LoadType};

/// Configuration options for the `Grid`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// The power factor assigned to new consumers of each load type.
    pub power_factors: PowerFactors,

    /// The coefficients of the voltage droop approximation.
    pub droop: VoltageDroop,

    /// The voltage thresholds used for classifying stations and consumers.
    pub thresholds: StatusThresholds,

    /// Rated capacity in MW used by [`Grid::add_default_station`].
    ///
    /// [`Grid::add_default_station`]: crate::Grid::add_default_station
    pub default_station_capacity: f64,

    /// Active power demand in MW used by [`Grid::add_default_consumer`].
    ///
    /// [`Grid::add_default_consumer`]: crate::Grid::add_default_consumer
    pub default_consumer_demand: f64,

    /// Nominal station voltage in kV.  Informational only, the voltage model
    /// works in per-unit values.
    pub nominal_voltage_kv: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            power_factors: PowerFactors::default(),
            droop: VoltageDroop::default(),
            thresholds: StatusThresholds::default(),
            default_station_capacity: 1000.0,
            default_consumer_demand: 5.0,
            nominal_voltage_kv: 110.0,
        }
    }
}

impl GridConfig {
    /// Checks that all values are usable by the electrical model.
    pub fn validate(&self) -> Result<(), Error> {
        for load_type in [LoadType::Resistive, LoadType::Inductive, LoadType::Capacitive] {
            validate_power_factor(self.power_factors.for_load_type(load_type))?;
        }
        self.thresholds.validate()?;

        let non_negative = [
            ("droop.loading_coefficient", self.droop.loading_coefficient),
            ("droop.reactive_coefficient", self.droop.reactive_coefficient),
            ("default_station_capacity", self.default_station_capacity),
            ("default_consumer_demand", self.default_consumer_demand),
            ("nominal_voltage_kv", self.nominal_voltage_kv),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(format!(
                    "{name} must be a finite non-negative number, got {value}."
                )));
            }
        }

        Ok(())
    }
}

/// Power factor per load type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerFactors {
    pub resistive: f64,
    pub inductive: f64,
    pub capacitive: f64,
}

impl Default for PowerFactors {
    fn default() -> Self {
        Self {
            resistive: 1.0,
            inductive: 0.8,
            capacitive: 0.9,
        }
    }
}

impl PowerFactors {
    /// Returns the configured power factor for the given load type.
    pub fn for_load_type(&self, load_type: LoadType) -> f64 {
        match load_type {
            LoadType::Resistive => self.resistive,
            LoadType::Inductive => self.inductive,
            LoadType::Capacitive => self.capacitive,
        }
    }
}

/// Coefficients of `V = 1 - loading * loading_coefficient - |Q| *
/// reactive_coefficient`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltageDroop {
    pub loading_coefficient: f64,
    pub reactive_coefficient: f64,
}

impl Default for VoltageDroop {
    fn default() -> Self {
        Self {
            loading_coefficient: 0.1,
            reactive_coefficient: 0.02,
        }
    }
}

/// Lower voltage bounds, in per-unit, of the `Healthy` and `Warning` tiers.
///
/// Anything below `warning_min` is `Critical`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub healthy_min: f64,
    pub warning_min: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            healthy_min: 0.97,
            warning_min: 0.95,
        }
    }
}

impl StatusThresholds {
    fn validate(&self) -> Result<(), Error> {
        if !self.healthy_min.is_finite() || !self.warning_min.is_finite() {
            return Err(Error::invalid_config("Status thresholds must be finite."));
        }
        if self.warning_min > self.healthy_min {
            return Err(Error::invalid_config(format!(
                "thresholds.warning_min ({}) can't be above thresholds.healthy_min ({}).",
                self.warning_min, self.healthy_min
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_power_factor(power_factor: f64) -> Result<(), Error> {
    if !(power_factor > 0.0 && power_factor <= 1.0) {
        return Err(Error::invalid_config(format!(
            "Power factor must be in (0, 1], got {power_factor}."
        )));
    }
    Ok(())
}
