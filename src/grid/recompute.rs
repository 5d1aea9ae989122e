// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Recomputation of the electrical state of the entities in a [`Grid`].
//!
//! A station's aggregates are always rebuilt from scratch, summing its
//! consumers' demands in ascending id order, so the result only depends on
//! the current connections and demands.  Recomputing twice without a
//! mutation in between gives bit-identical results.

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use crate::entity_kind::KindPredicates;
use crate::status::HealthStatus;
use crate::{Error, Grid, GridConfig, NetworkAnalysis};

/// The demand of one consumer connected to a station.
pub(crate) struct ConsumerLoad {
    pub(crate) index: NodeIndex,
    pub(crate) active_power: f64,
    pub(crate) reactive_power: f64,
}

impl Grid {
    /// Recomputes every station's voltage and status and every consumer's
    /// status.
    ///
    /// Mutations already recompute what they affect, so this is only needed
    /// after bulk changes made outside the grid, e.g. when a network analysis
    /// has new results.
    pub fn recompute_all(&mut self) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for index in indices {
            let entity = &self.graph[index];
            if entity.is_station() {
                self.recompute_station(index);
            } else if self.station_index_of(index).is_none() {
                self.update_consumer_status(index, None);
            }
        }
        tracing::debug!("Recomputed all {} entities.", self.graph.node_count());
    }

    /// Replaces the configuration and recomputes the whole grid.
    ///
    /// Consumers adopt the new power factor of their load type, unless theirs
    /// was set explicitly through [`update_demand`][Grid::update_demand].
    /// Returns an error, and keeps the old configuration, if the new one is
    /// invalid.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), Error> {
        config.validate()?;

        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for index in indices {
            if let Some(consumer) = self.graph[index].as_consumer_mut() {
                let power_factor = config.power_factors.for_load_type(consumer.load_type());
                consumer.apply_configured_power_factor(power_factor);
            }
        }
        self.config = config;
        tracing::info!("Applied new grid configuration.");

        self.recompute_all();
        Ok(())
    }

    /// Installs a network analysis to be consulted for station voltages, and
    /// recomputes the whole grid with it.
    pub fn set_network_analysis(&mut self, network_analysis: impl NetworkAnalysis + 'static) {
        self.network_analysis = Some(Box::new(network_analysis));
        self.recompute_all();
    }

    /// Removes the network analysis, falling back to the voltage
    /// approximation for every station.
    pub fn clear_network_analysis(&mut self) {
        if self.network_analysis.take().is_some() {
            self.recompute_all();
        }
    }

    /// Returns the demands of the consumers connected to the station at
    /// `station_index`, ordered by consumer id.
    pub(crate) fn consumer_loads(&self, station_index: NodeIndex) -> Vec<ConsumerLoad> {
        let mut consumers: Vec<(u64, ConsumerLoad)> = self
            .graph
            .neighbors_directed(station_index, Direction::Outgoing)
            .filter_map(|index| {
                let entity = &self.graph[index];
                entity.as_consumer().map(|consumer| {
                    (
                        entity.id(),
                        ConsumerLoad {
                            index,
                            active_power: consumer.active_power(),
                            reactive_power: consumer.reactive_power(),
                        },
                    )
                })
            })
            .collect();
        consumers.sort_unstable_by_key(|(id, _)| *id);
        consumers.into_iter().map(|(_, load)| load).collect()
    }

    /// Recomputes the station at `station_index`, then the status of each of
    /// its consumers.
    pub(crate) fn recompute_station(&mut self, station_index: NodeIndex) {
        let loads = self.consumer_loads(station_index);

        let entity = &mut self.graph[station_index];
        let station_id = entity.id();
        let Some(station) = entity.as_station_mut() else {
            tracing::error!("Entity {station_id} can't be recomputed as a station.");
            return;
        };

        let was_overloaded = station.is_overloaded();
        let previous_status = station.status();

        station.aggregate(
            loads.iter().map(|l| (l.active_power, l.reactive_power)),
            &self.config.droop,
        );

        if let Some(analysis) = &self.network_analysis {
            match analysis.station_voltage(station_id, station) {
                Some(voltage) if voltage.is_finite() => station.set_analysed_voltage(Some(voltage)),
                Some(voltage) => tracing::warn!(
                    "Ignoring non-finite analysed voltage {voltage} for Station:{station_id}."
                ),
                None => {}
            }
        }

        let status = station.update_status(&self.config.thresholds);
        let voltage = station.effective_voltage_pu();
        let loading = station.loading_fraction();

        tracing::debug!(
            "Recomputed Station:{station_id}: P={:.1}MW, Q={:.1}MVAr, V={voltage:.3}pu, {status}.",
            station.active_load(),
            station.reactive_load(),
        );

        match (was_overloaded, station.is_overloaded()) {
            (false, true) => tracing::warn!(
                "High loading at Station:{station_id}: {:.1}%.",
                loading * 100.0
            ),
            (true, false) => tracing::info!(
                "Station:{station_id} is no longer overloaded: {:.1}%.",
                loading * 100.0
            ),
            _ => {}
        }
        if status == HealthStatus::Critical && previous_status != HealthStatus::Critical {
            tracing::warn!("Low voltage at Station:{station_id}: {voltage:.2} pu.");
        }

        for load in loads {
            self.update_consumer_status(load.index, Some(voltage));
        }
    }

    /// Re-derives the status of the consumer at `consumer_index` from the
    /// effective voltage of its station, or `None` if it has none.
    pub(crate) fn update_consumer_status(
        &mut self,
        consumer_index: NodeIndex,
        station_voltage_pu: Option<f64>,
    ) {
        let entity = &mut self.graph[consumer_index];
        let consumer_id = entity.id();
        let Some(consumer) = entity.as_consumer_mut() else {
            tracing::error!("Entity {consumer_id} can't be updated as a consumer.");
            return;
        };

        let previous = consumer.status();
        let status = consumer.update_status(station_voltage_pu, &self.config.thresholds);
        if status == HealthStatus::Critical && previous != HealthStatus::Critical {
            if let Some(voltage) = station_voltage_pu {
                tracing::warn!("Low voltage at Consumer:{consumer_id}: {voltage:.2} pu.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::test_utils::GridBuilder;
    use crate::{Error, Grid, GridConfig, GridPosition, HealthStatus, LoadType, PowerStation};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_recompute_all_is_idempotent() -> Result<(), Error> {
        let mut builder = GridBuilder::new();
        let s1 = builder.station(100.0);
        let s2 = builder.station(40.0);
        for _ in 0..5 {
            let c = builder.inductive(7.3);
            builder.connect(c, s1);
        }
        for _ in 0..3 {
            let c = builder.capacitive(3.1);
            builder.connect(c, s2);
        }
        builder.resistive(1.0);
        let mut grid = builder.build()?;

        grid.recompute_all();
        let first: Vec<_> = grid
            .stations()
            .map(|(id, s)| (id, s.voltage_pu().to_bits(), s.status()))
            .collect();
        let first_consumers: Vec<_> = grid.consumers().map(|(id, c)| (id, c.status())).collect();

        grid.recompute_all();
        let second: Vec<_> = grid
            .stations()
            .map(|(id, s)| (id, s.voltage_pu().to_bits(), s.status()))
            .collect();
        let second_consumers: Vec<_> = grid.consumers().map(|(id, c)| (id, c.status())).collect();

        assert_eq!(first, second);
        assert_eq!(first_consumers, second_consumers);

        Ok(())
    }

    #[test]
    fn test_set_config() -> Result<(), Error> {
        let mut builder = GridBuilder::new();
        let station = builder.station(1000.0);
        let inductive = builder.inductive(30.0);
        let pinned = builder.inductive(30.0);
        builder.connect(inductive, station);
        builder.connect(pinned, station);
        let mut grid = builder.build()?;

        grid.update_demand(pinned.id(), 30.0, Some(1.0))?;
        assert!((grid.consumer(inductive.id())?.reactive_power() - 22.5).abs() < EPS);

        let mut config = GridConfig::default();
        config.power_factors.inductive = 0.6;
        grid.set_config(config)?;

        assert!((grid.consumer(inductive.id())?.reactive_power() - 40.0).abs() < EPS);
        assert_eq!(grid.consumer(pinned.id())?.power_factor(), 1.0);
        assert!((grid.station(station.id())?.reactive_load() - 40.0).abs() < EPS);

        let mut invalid = GridConfig::default();
        invalid.thresholds.warning_min = 2.0;
        assert!(grid.set_config(invalid).is_err());
        assert_eq!(grid.config().power_factors.inductive, 0.6);

        Ok(())
    }

    #[test]
    fn test_thresholds_from_config() -> Result<(), Error> {
        let mut grid = Grid::new(GridConfig::default())?;
        let station = grid.add_station(GridPosition::new(0, 0), 100.0)?;
        let consumer = grid.add_consumer(GridPosition::new(1, 0), LoadType::Resistive, 50.0)?;
        grid.connect(consumer, station)?;
        assert_eq!(grid.station(station)?.status(), HealthStatus::Warning);

        let mut config = GridConfig::default();
        config.thresholds.healthy_min = 0.95;
        config.thresholds.warning_min = 0.90;
        grid.set_config(config)?;

        assert_eq!(grid.station(station)?.status(), HealthStatus::Healthy);
        assert_eq!(grid.consumer(consumer)?.status(), HealthStatus::Healthy);

        Ok(())
    }

    #[test]
    fn test_network_analysis() -> Result<(), Error> {
        let mut grid = Grid::new(GridConfig::default())?;
        let station = grid.add_station(GridPosition::new(0, 0), 100.0)?;
        let other = grid.add_station(GridPosition::new(5, 0), 100.0)?;
        let c1 = grid.add_consumer(GridPosition::new(1, 0), LoadType::Resistive, 50.0)?;
        let c2 = grid.add_consumer(GridPosition::new(6, 0), LoadType::Resistive, 50.0)?;
        grid.connect(c1, station)?;
        grid.connect(c2, other)?;
        assert_eq!(grid.consumer(c1)?.status(), HealthStatus::Warning);

        grid.set_network_analysis(move |id: u64, s: &PowerStation| {
            (id == station).then(|| 1.0 - s.loading_fraction() * 0.01)
        });
        assert!(grid.has_network_analysis());

        let summary = grid.station_summary(station)?;
        assert_eq!(summary.analysed_voltage_pu, Some(0.995));
        assert_eq!(summary.voltage_pu, 0.995);
        assert_eq!(summary.approximate_voltage_pu, 0.95);
        assert_eq!(summary.status, HealthStatus::Healthy);
        assert_eq!(grid.consumer(c1)?.status(), HealthStatus::Healthy);

        // Stations the analysis doesn't know fall back to the approximation.
        assert_eq!(grid.station(other)?.analysed_voltage_pu(), None);
        assert_eq!(grid.consumer(c2)?.status(), HealthStatus::Warning);

        grid.clear_network_analysis();
        assert!(!grid.has_network_analysis());
        assert_eq!(grid.station(station)?.analysed_voltage_pu(), None);
        assert_eq!(grid.consumer(c1)?.status(), HealthStatus::Warning);

        Ok(())
    }

    #[test]
    fn test_non_finite_analysis_is_ignored() -> Result<(), Error> {
        let mut grid = Grid::with_network_analysis(GridConfig::default(), |_: u64, _: &PowerStation| {
            Some(f64::NAN)
        })?;
        let station = grid.add_station(GridPosition::new(0, 0), 100.0)?;
        let consumer = grid.add_consumer(GridPosition::new(1, 0), LoadType::Resistive, 50.0)?;
        grid.connect(consumer, station)?;

        assert_eq!(grid.station(station)?.analysed_voltage_pu(), None);
        assert_eq!(grid.station(station)?.status(), HealthStatus::Warning);

        Ok(())
    }
}
