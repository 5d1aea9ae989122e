// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the stations and consumers of a distribution
//! network, and the connections between them.

mod connection;
mod creation;
mod recompute;
mod removal;
mod retrieval;
mod validation;

pub mod iterators;

#[cfg(test)]
mod test_utils;

use crate::{Entity, GridConfig, NetworkAnalysis};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// `Entity`s stored in a `StableDiGraph` instance can be addressed with
/// `NodeIndex`es, which stay valid when other entities are removed.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any entity id, so
/// that nodes in the graph can be retrieved from their ids.
pub(crate) type NodeIndexMap = HashMap<u64, NodeIndex>;

/// The stations and consumers of a distribution network and the connections
/// between them.
///
/// Connections are edges from a station to a consumer.  The outgoing edges of
/// a station are its consumers, and the single incoming edge of a consumer
/// leads to its station, so both directions are views of the same edge set.
///
/// Every mutation recomputes the electrical state of the affected station and
/// its consumers before returning.
pub struct Grid {
    graph: StableDiGraph<Entity, ()>,
    node_indices: NodeIndexMap,
    next_id: u64,
    config: GridConfig,
    network_analysis: Option<Box<dyn NetworkAnalysis>>,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("entities", &self.graph.node_count())
            .field("connections", &self.graph.edge_count())
            .field("config", &self.config)
            .field("network_analysis", &self.network_analysis.is_some())
            .finish()
    }
}
