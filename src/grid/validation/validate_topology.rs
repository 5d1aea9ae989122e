// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating that the connections of a [`Grid`][crate::Grid]
//! form disjoint stars, each with a station at its center.

use crate::entity_kind::KindPredicates;
use crate::Error;

use super::GridValidator;

impl GridValidator<'_> {
    /// Validates that every id in the index points at the entity with that
    /// id, and that every entity is indexed.
    pub(super) fn validate_index(&self) -> Result<(), Error> {
        let graph = &self.grid.graph;
        for (&id, &index) in &self.grid.node_indices {
            match graph.node_weight(index) {
                Some(entity) if entity.id() == id => {}
                Some(entity) => {
                    return Err(Error::internal(format!(
                        "Entity ID {id} is indexed to {entity}."
                    )))
                }
                None => {
                    return Err(Error::internal(format!(
                        "Entity ID {id} is indexed to a removed node."
                    )))
                }
            }
        }
        if self.grid.node_indices.len() != graph.node_count() {
            return Err(Error::internal(format!(
                "{} entities in the graph, but {} in the index.",
                graph.node_count(),
                self.grid.node_indices.len()
            )));
        }
        Ok(())
    }

    /// Validates that all stations:
    ///  - don't have any predecessors,
    ///  - have only Consumers as successors.
    pub(super) fn validate_stations(&self) -> Result<(), Error> {
        let graph = &self.grid.graph;
        for index in graph.node_indices().filter(|&i| graph[i].is_station()) {
            self.ensure_root(index)?;
            self.ensure_on_successors(index, |n| n.is_consumer(), "Consumers")?;
        }
        Ok(())
    }

    /// Validates that all consumers:
    ///  - don't have any successors,
    ///  - have only Stations as predecessors,
    ///  - have at most one predecessor.
    pub(super) fn validate_consumers(&self) -> Result<(), Error> {
        let graph = &self.grid.graph;
        for index in graph.node_indices().filter(|&i| graph[i].is_consumer()) {
            self.ensure_leaf(index)?;
            self.ensure_on_predecessors(index, |n| n.is_station(), "Stations")?;
            self.ensure_at_most_one_predecessor(index)?;
        }
        Ok(())
    }
}
