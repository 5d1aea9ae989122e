// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving entities and connections from a [`Grid`].

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use crate::entity::{ConsumerSummary, GridPosition, PowerConsumer, PowerStation, StationSummary};
use crate::iterators::{Connections, Entities, Neighbors};
use crate::{Entity, Error, Grid, GridConfig};

/// `Entity` and connection retrieval.
impl Grid {
    /// Returns the configuration the grid currently uses.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns `true` if a network analysis is installed.
    pub fn has_network_analysis(&self) -> bool {
        self.network_analysis.is_some()
    }

    /// Returns the entity with the given `entity_id`, if it exists.
    pub fn entity(&self, entity_id: u64) -> Result<&Entity, Error> {
        self.index_of(entity_id).map(|i| &self.graph[i])
    }

    /// Returns the station with the given `entity_id`.
    ///
    /// Returns an error if the id doesn't exist or belongs to a consumer.
    pub fn station(&self, entity_id: u64) -> Result<&PowerStation, Error> {
        let entity = self.entity(entity_id)?;
        entity.as_station().ok_or_else(|| {
            Error::invalid_entity(format!("{entity} is not a Station."))
        })
    }

    /// Returns the consumer with the given `entity_id`.
    ///
    /// Returns an error if the id doesn't exist or belongs to a station.
    pub fn consumer(&self, entity_id: u64) -> Result<&PowerConsumer, Error> {
        let entity = self.entity(entity_id)?;
        entity.as_consumer().ok_or_else(|| {
            Error::invalid_entity(format!("{entity} is not a Consumer."))
        })
    }

    /// Returns the entity placed at the given position, if any.
    pub fn entity_at(&self, position: GridPosition) -> Option<&Entity> {
        self.entities().find(|e| e.position() == position)
    }

    /// Returns an iterator over all entities in the grid.
    pub fn entities(&self) -> Entities<'_> {
        Entities {
            graph: &self.graph,
            iter: self.graph.node_indices(),
        }
    }

    /// Returns an iterator over the stations in the grid.
    pub fn stations(&self) -> impl Iterator<Item = (u64, &PowerStation)> + '_ {
        self.entities()
            .filter_map(|e| e.as_station().map(|s| (e.id(), s)))
    }

    /// Returns an iterator over the consumers in the grid.
    pub fn consumers(&self) -> impl Iterator<Item = (u64, &PowerConsumer)> + '_ {
        self.entities()
            .filter_map(|e| e.as_consumer().map(|c| (e.id(), c)))
    }

    /// Returns an iterator over the `(station_id, consumer_id)` pairs of all
    /// connections in the grid.
    pub fn connections(&self) -> Connections<'_> {
        Connections {
            graph: &self.graph,
            iter: self.graph.edge_indices(),
        }
    }

    /// Returns an iterator over the consumers connected to the station with
    /// the given `station_id`.
    ///
    /// Returns an error if the station does not exist.
    pub fn consumers_of(&self, station_id: u64) -> Result<Neighbors<'_>, Error> {
        self.station(station_id)?;
        let index = self.index_of(station_id)?;
        Ok(Neighbors {
            graph: &self.graph,
            iter: self.graph.neighbors_directed(index, Direction::Outgoing),
        })
    }

    /// Returns the id of the station the consumer with the given
    /// `consumer_id` is connected to, if any.
    ///
    /// Returns an error if the consumer does not exist.
    pub fn station_of(&self, consumer_id: u64) -> Result<Option<u64>, Error> {
        self.consumer(consumer_id)?;
        let index = self.index_of(consumer_id)?;
        Ok(self
            .station_index_of(index)
            .map(|station_index| self.graph[station_index].id()))
    }

    /// Returns the summary of the station with the given `station_id`.
    pub fn station_summary(&self, station_id: u64) -> Result<StationSummary, Error> {
        Ok(self.station(station_id)?.status_summary())
    }

    /// Returns the summary of the consumer with the given `consumer_id`.
    pub fn consumer_summary(&self, consumer_id: u64) -> Result<ConsumerSummary, Error> {
        let consumer = self.consumer(consumer_id)?;
        let station_id = self.station_of(consumer_id)?;
        let station_voltage = match station_id {
            Some(id) => Some(self.station(id)?.effective_voltage_pu()),
            None => None,
        };
        Ok(consumer.summary(station_id, station_voltage))
    }

    pub(crate) fn index_of(&self, entity_id: u64) -> Result<NodeIndex, Error> {
        self.node_indices.get(&entity_id).copied().ok_or_else(|| {
            Error::unknown_entity(format!("Entity with id {} not found.", entity_id))
        })
    }

    /// Returns the index of the station feeding the consumer at `index`.
    pub(crate) fn station_index_of(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .next()
    }
}
