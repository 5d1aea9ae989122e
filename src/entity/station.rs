// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The electrical state of a generating station.

use serde::Serialize;

use crate::config::{StatusThresholds, VoltageDroop};
use crate::status::{classify_station, is_overload, HealthStatus};
use crate::Error;

/// A generation source.
///
/// All aggregate fields are rebuilt from scratch by every recompute from the
/// demands of the consumers currently connected to the station, so they are
/// never out of step with the connection graph.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerStation {
    rated_capacity: f64,
    active_load: f64,
    reactive_load: f64,
    consumer_count: usize,
    loading_fraction: f64,
    voltage_pu: f64,
    analysed_voltage_pu: Option<f64>,
    status: HealthStatus,
}

/// A read-only projection of a station's state, for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationSummary {
    /// The voltage used for classification: the analysed voltage when one is
    /// available, the droop approximation otherwise.
    pub voltage_pu: f64,
    pub approximate_voltage_pu: f64,
    pub analysed_voltage_pu: Option<f64>,
    pub loading_fraction: f64,
    pub status: HealthStatus,
    pub connected_consumers: usize,
    pub rated_capacity: f64,
    pub active_load: f64,
    pub reactive_load: f64,
    pub available_capacity: f64,
    pub is_overloaded: bool,
}

/// Returns `active_load / rated_capacity`, never negative.
///
/// A station without capacity has a loading of `0` while idle and of `+inf`
/// as soon as anything draws from it.
pub fn loading_fraction(active_load: f64, rated_capacity: f64) -> f64 {
    if rated_capacity > 0.0 {
        (active_load / rated_capacity).max(0.0)
    } else if active_load > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// The per-unit voltage approximation
/// `1 - loading * loading_coefficient - |Q| * reactive_coefficient`.
///
/// This is a linear droop heuristic, not a load flow solution.
pub fn compute_voltage(loading_fraction: f64, reactive_load: f64, droop: &VoltageDroop) -> f64 {
    1.0 - (loading_fraction * droop.loading_coefficient)
        - (reactive_load.abs() * droop.reactive_coefficient)
}

fn validate_capacity(rated_capacity: f64) -> Result<(), Error> {
    if !rated_capacity.is_finite() || rated_capacity < 0.0 {
        return Err(Error::invalid_entity(format!(
            "Rated capacity must be a finite non-negative number, got {rated_capacity}."
        )));
    }
    Ok(())
}

impl PowerStation {
    /// Creates a station with nothing connected to it.
    pub(crate) fn try_new(rated_capacity: f64) -> Result<Self, Error> {
        validate_capacity(rated_capacity)?;
        Ok(Self {
            rated_capacity,
            active_load: 0.0,
            reactive_load: 0.0,
            consumer_count: 0,
            loading_fraction: 0.0,
            voltage_pu: 1.0,
            analysed_voltage_pu: None,
            status: HealthStatus::Healthy,
        })
    }

    /// Rated capacity in MW.
    pub fn rated_capacity(&self) -> f64 {
        self.rated_capacity
    }

    /// Sum of the active demand of all connected consumers, in MW.
    pub fn active_load(&self) -> f64 {
        self.active_load
    }

    /// Signed sum of the reactive demand of all connected consumers, in MVAr.
    pub fn reactive_load(&self) -> f64 {
        self.reactive_load
    }

    pub fn consumer_count(&self) -> usize {
        self.consumer_count
    }

    pub fn loading_fraction(&self) -> f64 {
        self.loading_fraction
    }

    /// The droop approximation of the station voltage.
    pub fn voltage_pu(&self) -> f64 {
        self.voltage_pu
    }

    /// The voltage reported by the network analysis, if any.
    pub fn analysed_voltage_pu(&self) -> Option<f64> {
        self.analysed_voltage_pu
    }

    /// The voltage that drives classification of the station and its
    /// consumers.
    pub fn effective_voltage_pu(&self) -> f64 {
        self.analysed_voltage_pu.unwrap_or(self.voltage_pu)
    }

    pub fn available_capacity(&self) -> f64 {
        (self.rated_capacity - self.active_load).max(0.0)
    }

    pub fn is_overloaded(&self) -> bool {
        is_overload(self.loading_fraction)
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    /// Returns the station's state without modifying anything.
    pub fn status_summary(&self) -> StationSummary {
        StationSummary {
            voltage_pu: self.effective_voltage_pu(),
            approximate_voltage_pu: self.voltage_pu,
            analysed_voltage_pu: self.analysed_voltage_pu,
            loading_fraction: self.loading_fraction,
            status: self.status,
            connected_consumers: self.consumer_count,
            rated_capacity: self.rated_capacity,
            active_load: self.active_load,
            reactive_load: self.reactive_load,
            available_capacity: self.available_capacity(),
            is_overloaded: self.is_overloaded(),
        }
    }

    /// Rebuilds the aggregates and the approximate voltage from the `(P, Q)`
    /// demands of the connected consumers.
    ///
    /// Any previously analysed voltage is dropped, as it belongs to the old
    /// load.
    pub(crate) fn aggregate(
        &mut self,
        loads: impl IntoIterator<Item = (f64, f64)>,
        droop: &VoltageDroop,
    ) {
        let mut active_load = 0.0;
        let mut reactive_load = 0.0;
        let mut consumer_count = 0;
        for (p, q) in loads {
            active_load += p;
            reactive_load += q;
            consumer_count += 1;
        }

        self.active_load = active_load;
        self.reactive_load = reactive_load;
        self.consumer_count = consumer_count;
        self.loading_fraction = loading_fraction(active_load, self.rated_capacity);
        self.voltage_pu = compute_voltage(self.loading_fraction, reactive_load, droop);
        self.analysed_voltage_pu = None;
    }

    pub(crate) fn set_analysed_voltage(&mut self, voltage_pu: Option<f64>) {
        self.analysed_voltage_pu = voltage_pu;
    }

    pub(crate) fn update_status(&mut self, thresholds: &StatusThresholds) -> HealthStatus {
        self.status = classify_station(
            self.effective_voltage_pu(),
            self.loading_fraction,
            thresholds,
        );
        self.status
    }
}
