// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating that the electrical state of a
//! [`Grid`][crate::Grid] is up to date with its connections.

use petgraph::Direction;

use crate::status::classify_consumer;
use crate::Error;

use super::GridValidator;

impl GridValidator<'_> {
    /// Validates that each station's aggregates are the sums over its
    /// connected consumers, and that each consumer's status matches its
    /// station's voltage.
    pub(super) fn validate_aggregates(&self) -> Result<(), Error> {
        let graph = &self.grid.graph;
        let thresholds = &self.grid.config.thresholds;

        for index in graph.node_indices() {
            let entity = &graph[index];

            if let Some(station) = entity.as_station() {
                let loads = self.grid.consumer_loads(index);
                let active: f64 = loads.iter().fold(0.0, |acc, l| acc + l.active_power);
                let reactive: f64 = loads.iter().fold(0.0, |acc, l| acc + l.reactive_power);

                if station.consumer_count() != loads.len()
                    || station.active_load() != active
                    || station.reactive_load() != reactive
                {
                    return Err(Error::invalid_graph(format!(
                        "{entity} has stale aggregates: {} consumers, P={}, Q={}; expected {} \
                         consumers, P={active}, Q={reactive}.",
                        station.consumer_count(),
                        station.active_load(),
                        station.reactive_load(),
                        loads.len(),
                    )));
                }
            } else if let Some(consumer) = entity.as_consumer() {
                let voltage = graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .and_then(|i| graph[i].as_station())
                    .map(|s| s.effective_voltage_pu());
                let expected = classify_consumer(voltage, thresholds);

                if consumer.status() != expected {
                    return Err(Error::invalid_graph(format!(
                        "{entity} has status {}, expected {expected}.",
                        consumer.status()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::test_utils::GridBuilder;
    use crate::{Error, ErrorKind};

    #[test]
    fn test_stale_aggregates() -> Result<(), Error> {
        let mut builder = GridBuilder::new();
        let s = builder.station(100.0);
        let c = builder.resistive(10.0);
        builder.connect(c, s);
        let mut grid = builder.build()?;
        grid.validate()?;

        // Bypass the connection methods so nothing is recomputed.
        let s_index = grid.index_of(s.id())?;
        let c_index = grid.index_of(c.id())?;
        if let Some(edge) = grid.graph.find_edge(s_index, c_index) {
            grid.graph.remove_edge(edge);
        }

        assert!(grid.validate().is_err_and(|e| e
            == Error::invalid_graph(
                "Station:1 has stale aggregates: 1 consumers, P=10, Q=0; expected 0 \
                 consumers, P=0, Q=0."
            )));

        grid.recompute_all();
        grid.validate()?;

        Ok(())
    }

    #[test]
    fn test_stale_consumer_status() -> Result<(), Error> {
        let mut builder = GridBuilder::new();
        let s = builder.station(100.0);
        let c = builder.resistive(10.0);
        let mut grid = builder.build()?;

        let s_index = grid.index_of(s.id())?;
        let c_index = grid.index_of(c.id())?;
        grid.graph.add_edge(s_index, c_index, ());
        grid.update_consumer_status(c_index, Some(0.99));

        assert!(grid
            .validate()
            .is_err_and(|e| e.kind() == ErrorKind::InvalidGraph));

        grid.recompute_all();
        grid.validate()?;

        Ok(())
    }
}
