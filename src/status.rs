// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Health classification shared by stations and consumers.
//!
//! The functions here are the only place where [`StatusThresholds`] are
//! compared against computed quantities, so station and consumer tiers can't
//! drift apart.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::config::StatusThresholds;

/// The health tier of an entity.
///
/// Variants are ordered from best to worst for connected entities, so the
/// worse of two tiers is their `max`.  `Unconnected` only ever applies to
/// consumers without a station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
    Unconnected,
}

impl Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Warning => write!(f, "Warning"),
            HealthStatus::Critical => write!(f, "Critical"),
            HealthStatus::Unconnected => write!(f, "Unconnected"),
        }
    }
}

/// Classifies a per-unit voltage.
///
/// `NaN` is treated as `Critical`.
pub fn classify_voltage(voltage_pu: f64, thresholds: &StatusThresholds) -> HealthStatus {
    if voltage_pu >= thresholds.healthy_min {
        HealthStatus::Healthy
    } else if voltage_pu >= thresholds.warning_min {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// Classifies a station from its voltage and loading fraction.
///
/// An overloaded station (`loading_fraction > 1`) is at least `Warning`,
/// whatever its voltage.
pub fn classify_station(
    voltage_pu: f64,
    loading_fraction: f64,
    thresholds: &StatusThresholds,
) -> HealthStatus {
    let by_voltage = classify_voltage(voltage_pu, thresholds);
    if is_overload(loading_fraction) {
        by_voltage.max(HealthStatus::Warning)
    } else {
        by_voltage
    }
}

/// Classifies a consumer from the voltage of its station, if it has one.
pub fn classify_consumer(
    station_voltage_pu: Option<f64>,
    thresholds: &StatusThresholds,
) -> HealthStatus {
    match station_voltage_pu {
        Some(voltage_pu) => classify_voltage(voltage_pu, thresholds),
        None => HealthStatus::Unconnected,
    }
}

pub(crate) fn is_overload(loading_fraction: f64) -> bool {
    loading_fraction > 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_tiers() {
        let t = StatusThresholds::default();

        assert_eq!(classify_voltage(1.0, &t), HealthStatus::Healthy);
        assert_eq!(classify_voltage(0.97, &t), HealthStatus::Healthy);
        assert_eq!(classify_voltage(0.9699, &t), HealthStatus::Warning);
        assert_eq!(classify_voltage(0.95, &t), HealthStatus::Warning);
        assert_eq!(classify_voltage(0.9499, &t), HealthStatus::Critical);
        assert_eq!(classify_voltage(-0.01, &t), HealthStatus::Critical);
        assert_eq!(classify_voltage(f64::NAN, &t), HealthStatus::Critical);
        assert_eq!(classify_voltage(f64::NEG_INFINITY, &t), HealthStatus::Critical);
    }

    #[test]
    fn test_overload_is_at_least_warning() {
        let t = StatusThresholds::default();

        assert_eq!(classify_station(1.0, 1.0, &t), HealthStatus::Healthy);
        assert_eq!(classify_station(1.0, 1.01, &t), HealthStatus::Warning);
        assert_eq!(classify_station(0.96, 1.5, &t), HealthStatus::Warning);
        assert_eq!(classify_station(0.90, 1.5, &t), HealthStatus::Critical);
        assert_eq!(classify_station(0.90, 0.2, &t), HealthStatus::Critical);
    }

    #[test]
    fn test_consumer_tiers() {
        let t = StatusThresholds::default();

        assert_eq!(classify_consumer(None, &t), HealthStatus::Unconnected);
        assert_eq!(classify_consumer(Some(0.99), &t), HealthStatus::Healthy);
        assert_eq!(classify_consumer(Some(0.96), &t), HealthStatus::Warning);
        assert_eq!(classify_consumer(Some(0.5), &t), HealthStatus::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = StatusThresholds {
            healthy_min: 0.99,
            warning_min: 0.90,
        };

        assert_eq!(classify_voltage(0.98, &t), HealthStatus::Warning);
        assert_eq!(classify_voltage(0.91, &t), HealthStatus::Warning);
        assert_eq!(classify_voltage(0.89, &t), HealthStatus::Critical);
    }
}
