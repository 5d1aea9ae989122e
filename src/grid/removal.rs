// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for removing entities from a [`Grid`].

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use crate::entity_kind::KindPredicates;
use crate::{Entity, Error, Grid};

/// Entity removal.
///
/// Removing an id that is not (or no longer) in the grid is a no-op, so UI
/// teardown sequences can't fail halfway.
impl Grid {
    /// Removes the station with the given `station_id`, after disconnecting
    /// all its consumers.
    ///
    /// Returns the removed station, or `None` if there was nothing to remove.
    /// Returns an error if the id belongs to a consumer.
    pub fn remove_station(&mut self, station_id: u64) -> Result<Option<Entity>, Error> {
        let Some(station_index) = self.node_indices.get(&station_id).copied() else {
            tracing::debug!("Station {station_id} already removed.");
            return Ok(None);
        };
        if !self.graph[station_index].is_station() {
            return Err(Error::invalid_entity(format!(
                "{} is not a Station.",
                self.graph[station_index]
            )));
        }

        let consumers: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(station_index, Direction::Outgoing)
            .collect();
        for consumer_index in consumers {
            self.detach(station_index, consumer_index);
        }

        Ok(self.unregister(station_id, station_index))
    }

    /// Removes the consumer with the given `consumer_id`, after disconnecting
    /// it from its station.
    ///
    /// Returns the removed consumer, or `None` if there was nothing to
    /// remove.  Returns an error if the id belongs to a station.
    pub fn remove_consumer(&mut self, consumer_id: u64) -> Result<Option<Entity>, Error> {
        let Some(consumer_index) = self.node_indices.get(&consumer_id).copied() else {
            tracing::debug!("Consumer {consumer_id} already removed.");
            return Ok(None);
        };
        if !self.graph[consumer_index].is_consumer() {
            return Err(Error::invalid_entity(format!(
                "{} is not a Consumer.",
                self.graph[consumer_index]
            )));
        }

        if let Some(station_index) = self.station_index_of(consumer_index) {
            self.detach(station_index, consumer_index);
            self.recompute_station(station_index);
        }

        Ok(self.unregister(consumer_id, consumer_index))
    }

    fn unregister(&mut self, entity_id: u64, index: NodeIndex) -> Option<Entity> {
        self.node_indices.remove(&entity_id);
        let entity = self.graph.remove_node(index);
        if let Some(entity) = &entity {
            tracing::info!("Removed {} from {}.", entity, entity.position());
        }
        entity
    }
}
