// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The electrical state of a consumer.

use serde::Serialize;

use crate::config::{validate_power_factor, StatusThresholds};
use crate::status::{classify_consumer, HealthStatus};
use crate::{Error, LoadType};

/// An electrical load.
///
/// Reactive and apparent power are derived from the active demand, the load
/// type and the power factor, and are re-derived whenever any of those
/// change.  The station a consumer is connected to is not stored here, the
/// [`Grid`][crate::Grid] owns that relationship.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerConsumer {
    load_type: LoadType,
    active_power: f64,
    power_factor: f64,
    power_factor_overridden: bool,
    reactive_power: f64,
    status: HealthStatus,
}

/// A read-only projection of a consumer's state, for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConsumerSummary {
    pub load_type: LoadType,
    pub is_connected: bool,
    pub active_power: f64,
    pub reactive_power: f64,
    pub power_factor: f64,
    pub apparent_power: f64,
    pub actual_power_factor: f64,
    pub station_id: Option<u64>,
    pub station_voltage_pu: Option<f64>,
    pub status: HealthStatus,
}

/// Returns the reactive power in MVAr drawn by a load of the given type.
///
/// `Q = P * tan(acos(pf))`, positive for inductive and negative for
/// capacitive loads.  Resistive loads draw none, whatever their power factor.
pub fn reactive_power(load_type: LoadType, active_power: f64, power_factor: f64) -> f64 {
    match load_type {
        LoadType::Resistive => 0.0,
        LoadType::Inductive => active_power * power_factor.acos().tan(),
        LoadType::Capacitive => -active_power * power_factor.acos().tan(),
    }
}

fn validate_demand(active_power: f64) -> Result<(), Error> {
    if !active_power.is_finite() || active_power < 0.0 {
        return Err(Error::invalid_entity(format!(
            "Active power demand must be a finite non-negative number, got {active_power}."
        )));
    }
    Ok(())
}

impl PowerConsumer {
    /// Creates an unconnected consumer.
    pub(crate) fn try_new(
        load_type: LoadType,
        active_power: f64,
        power_factor: f64,
    ) -> Result<Self, Error> {
        validate_demand(active_power)?;
        validate_power_factor(power_factor)?;

        Ok(Self {
            load_type,
            active_power,
            power_factor,
            power_factor_overridden: false,
            reactive_power: reactive_power(load_type, active_power, power_factor),
            status: HealthStatus::Unconnected,
        })
    }

    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    /// Nominal active power demand in MW.
    pub fn active_power(&self) -> f64 {
        self.active_power
    }

    pub fn power_factor(&self) -> f64 {
        self.power_factor
    }

    /// Reactive power demand in MVAr.
    pub fn reactive_power(&self) -> f64 {
        self.reactive_power
    }

    /// Apparent power in MVA.
    pub fn apparent_power(&self) -> f64 {
        self.active_power.hypot(self.reactive_power)
    }

    /// The power factor as seen from `P / S`.  `1.0` for a consumer that
    /// draws nothing.
    pub fn actual_power_factor(&self) -> f64 {
        let apparent = self.apparent_power();
        if apparent > 0.0 {
            self.active_power / apparent
        } else {
            1.0
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Changes the demand and, if given, pins the power factor to a value
    /// that configuration changes won't override.
    pub(crate) fn set_demand(
        &mut self,
        active_power: f64,
        power_factor: Option<f64>,
    ) -> Result<(), Error> {
        validate_demand(active_power)?;
        if let Some(power_factor) = power_factor {
            validate_power_factor(power_factor)?;
            self.power_factor = power_factor;
            self.power_factor_overridden = true;
        }
        self.active_power = active_power;
        self.reactive_power = reactive_power(self.load_type, active_power, self.power_factor);
        Ok(())
    }

    /// Adopts a newly configured power factor for this load type, unless the
    /// power factor was set explicitly for this consumer.
    pub(crate) fn apply_configured_power_factor(&mut self, power_factor: f64) {
        if self.power_factor_overridden {
            return;
        }
        self.power_factor = power_factor;
        self.reactive_power = reactive_power(self.load_type, self.active_power, power_factor);
    }

    /// Re-derives the status from the effective voltage of the station this
    /// consumer is connected to, or `None` when unconnected.
    pub(crate) fn update_status(
        &mut self,
        station_voltage_pu: Option<f64>,
        thresholds: &StatusThresholds,
    ) -> HealthStatus {
        self.status = classify_consumer(station_voltage_pu, thresholds);
        self.status
    }

    pub(crate) fn summary(
        &self,
        station_id: Option<u64>,
        station_voltage_pu: Option<f64>,
    ) -> ConsumerSummary {
        ConsumerSummary {
            load_type: self.load_type,
            is_connected: station_id.is_some(),
            active_power: self.active_power,
            reactive_power: self.reactive_power,
            power_factor: self.power_factor,
            apparent_power: self.apparent_power(),
            actual_power_factor: self.actual_power_factor(),
            station_id,
            station_voltage_pu,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_reactive_power_sign() -> Result<(), Error> {
        let resistive = PowerConsumer::try_new(LoadType::Resistive, 50.0, 0.7)?;
        assert_eq!(resistive.reactive_power(), 0.0);
        assert_eq!(resistive.apparent_power(), 50.0);
        assert_eq!(resistive.actual_power_factor(), 1.0);

        let inductive = PowerConsumer::try_new(LoadType::Inductive, 60.0, 0.8)?;
        assert!((inductive.reactive_power() - 45.0).abs() < EPS);
        assert!((inductive.apparent_power() - 75.0).abs() < EPS);
        assert!((inductive.actual_power_factor() - 0.8).abs() < EPS);

        let capacitive = PowerConsumer::try_new(LoadType::Capacitive, 60.0, 0.8)?;
        assert!((capacitive.reactive_power() + 45.0).abs() < EPS);
        assert!(capacitive.apparent_power() >= capacitive.active_power());

        let idle = PowerConsumer::try_new(LoadType::Inductive, 0.0, 0.8)?;
        assert_eq!(idle.apparent_power(), 0.0);
        assert_eq!(idle.actual_power_factor(), 1.0);

        Ok(())
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PowerConsumer::try_new(LoadType::Inductive, -1.0, 0.8).is_err_and(|e| e
            == Error::invalid_entity(
                "Active power demand must be a finite non-negative number, got -1."
            )));
        assert!(PowerConsumer::try_new(LoadType::Inductive, f64::INFINITY, 0.8)
            .is_err_and(|e| e.kind() == ErrorKind::InvalidEntity));
        assert!(PowerConsumer::try_new(LoadType::Inductive, 1.0, 0.0)
            .is_err_and(|e| e.kind() == ErrorKind::InvalidConfig));
    }

    #[test]
    fn test_set_demand() -> Result<(), Error> {
        let mut consumer = PowerConsumer::try_new(LoadType::Inductive, 5.0, 0.8)?;

        consumer.set_demand(20.0, None)?;
        assert_eq!(consumer.active_power(), 20.0);
        assert!((consumer.reactive_power() - 15.0).abs() < EPS);

        assert!(consumer.set_demand(-3.0, None).is_err());
        assert_eq!(consumer.active_power(), 20.0);

        assert!(consumer.set_demand(30.0, Some(1.5)).is_err());
        assert_eq!(consumer.active_power(), 20.0);
        assert_eq!(consumer.power_factor(), 0.8);

        consumer.set_demand(20.0, Some(1.0))?;
        assert!(consumer.reactive_power().abs() < EPS);

        // An explicit power factor survives configuration changes.
        consumer.apply_configured_power_factor(0.6);
        assert_eq!(consumer.power_factor(), 1.0);

        Ok(())
    }

    #[test]
    fn test_apply_configured_power_factor() -> Result<(), Error> {
        let mut consumer = PowerConsumer::try_new(LoadType::Capacitive, 30.0, 0.9)?;
        consumer.apply_configured_power_factor(0.8);

        assert_eq!(consumer.power_factor(), 0.8);
        assert!((consumer.reactive_power() + 22.5).abs() < EPS);

        Ok(())
    }

    #[test]
    fn test_status() -> Result<(), Error> {
        let thresholds = StatusThresholds::default();
        let mut consumer = PowerConsumer::try_new(LoadType::Resistive, 5.0, 1.0)?;
        assert_eq!(consumer.status(), HealthStatus::Unconnected);

        assert_eq!(
            consumer.update_status(Some(0.99), &thresholds),
            HealthStatus::Healthy
        );
        assert_eq!(
            consumer.update_status(Some(0.95), &thresholds),
            HealthStatus::Warning
        );
        assert_eq!(
            consumer.update_status(Some(0.94), &thresholds),
            HealthStatus::Critical
        );
        assert_eq!(
            consumer.update_status(None, &thresholds),
            HealthStatus::Unconnected
        );

        let summary = consumer.summary(None, None);
        assert!(!summary.is_connected);
        assert_eq!(summary.status, HealthStatus::Unconnected);
        assert_eq!(summary.apparent_power, 5.0);

        Ok(())
    }
}
