// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for connecting and disconnecting consumers, and for changing
//! their demand.

use petgraph::stable_graph::NodeIndex;

use crate::entity_kind::KindPredicates;
use crate::{Error, Grid};

/// Connection management.
impl Grid {
    /// Connects the consumer with the given `consumer_id` to the station with
    /// the given `station_id`, then recomputes the station and its consumers.
    ///
    /// Returns an error if either entity doesn't exist or has the wrong kind,
    /// or if the consumer is already connected to any station.  Consumers are
    /// never moved implicitly, they have to be disconnected first.  The grid
    /// is unchanged on error.
    pub fn connect(&mut self, consumer_id: u64, station_id: u64) -> Result<(), Error> {
        let (consumer_index, station_index) = self
            .validate_connection(consumer_id, station_id)
            .inspect_err(|e| {
                tracing::warn!(
                    "Rejected connection of {consumer_id} to {station_id}: {e}"
                );
            })?;

        self.graph.add_edge(station_index, consumer_index, ());

        if let Some(consumer) = self.graph[consumer_index].as_consumer() {
            tracing::info!(
                "Connected {} to {} (P={:.1}MW, Q={:.1}MVAr).",
                self.graph[consumer_index],
                self.graph[station_index],
                consumer.active_power(),
                consumer.reactive_power()
            );
        }

        self.recompute_station(station_index);
        Ok(())
    }

    /// Same as [`connect`][Grid::connect], with the arguments in
    /// station-first order.
    pub fn connect_consumer(&mut self, station_id: u64, consumer_id: u64) -> Result<(), Error> {
        self.connect(consumer_id, station_id)
    }

    /// Disconnects the consumer with the given `consumer_id` from its
    /// station, and recomputes that station.
    ///
    /// Returns the id of the station the consumer was connected to.
    /// Disconnecting an unconnected consumer does nothing and returns
    /// `Ok(None)`.  Returns an error if the consumer doesn't exist.
    pub fn disconnect(&mut self, consumer_id: u64) -> Result<Option<u64>, Error> {
        self.consumer(consumer_id)?;
        let consumer_index = self.index_of(consumer_id)?;

        let Some(station_index) = self.station_index_of(consumer_index) else {
            return Ok(None);
        };
        self.detach(station_index, consumer_index);
        self.recompute_station(station_index);

        Ok(Some(self.graph[station_index].id()))
    }

    /// Disconnects the consumer with the given `consumer_id` if it is
    /// connected to the station with the given `station_id`.
    ///
    /// Returns `true` if a connection was removed.  Consumers of other
    /// stations are left alone.
    pub fn disconnect_consumer(&mut self, station_id: u64, consumer_id: u64) -> Result<bool, Error> {
        self.station(station_id)?;
        if self.station_of(consumer_id)? != Some(station_id) {
            return Ok(false);
        }
        Ok(self.disconnect(consumer_id)?.is_some())
    }

    /// Changes the active demand of the consumer with the given
    /// `consumer_id` and, if given, its power factor, then recomputes its
    /// station.
    ///
    /// A power factor given here sticks to the consumer across configuration
    /// changes.  Returns an error, leaving the consumer unchanged, if a value
    /// is out of range.
    pub fn update_demand(
        &mut self,
        consumer_id: u64,
        active_power: f64,
        power_factor: Option<f64>,
    ) -> Result<(), Error> {
        self.consumer(consumer_id)?;
        let consumer_index = self.index_of(consumer_id)?;

        if let Some(consumer) = self.graph[consumer_index].as_consumer_mut() {
            consumer.set_demand(active_power, power_factor)?;
            tracing::info!(
                "Updated demand of Consumer:{consumer_id} (P={:.1}MW, Q={:.1}MVAr).",
                consumer.active_power(),
                consumer.reactive_power()
            );
        }

        if let Some(station_index) = self.station_index_of(consumer_index) {
            self.recompute_station(station_index);
        }
        Ok(())
    }

    /// Removes the connection between the two entities and marks the
    /// consumer as unconnected, without recomputing the station.
    pub(crate) fn detach(&mut self, station_index: NodeIndex, consumer_index: NodeIndex) {
        if let Some(edge) = self.graph.find_edge(station_index, consumer_index) {
            self.graph.remove_edge(edge);
            tracing::info!(
                "Disconnected {} from {}.",
                self.graph[consumer_index],
                self.graph[station_index]
            );
        }
        self.update_consumer_status(consumer_index, None);
    }

    fn validate_connection(
        &self,
        consumer_id: u64,
        station_id: u64,
    ) -> Result<(NodeIndex, NodeIndex), Error> {
        if consumer_id == station_id {
            return Err(Error::invalid_connection(format!(
                "Connection:({station_id}, {consumer_id}) Can't connect an entity to itself."
            )));
        }
        let consumer_index = self.index_of(consumer_id)?;
        let station_index = self.index_of(station_id)?;

        let station = &self.graph[station_index];
        if !station.is_station() {
            return Err(Error::invalid_connection(format!(
                "Connection:({station_id}, {consumer_id}) {station} is not a Station."
            )));
        }
        let consumer = &self.graph[consumer_index];
        if !consumer.is_consumer() {
            return Err(Error::invalid_connection(format!(
                "Connection:({station_id}, {consumer_id}) {consumer} is not a Consumer."
            )));
        }

        if let Some(current) = self.station_index_of(consumer_index) {
            return Err(Error::already_connected(format!(
                "{} is already connected to {}.",
                consumer, self.graph[current]
            )));
        }

        Ok((consumer_index, station_index))
    }
}
