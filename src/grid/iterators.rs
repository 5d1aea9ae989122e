// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over entities and connections in a `Grid`.

use petgraph::stable_graph::{EdgeIndices, NodeIndices, StableDiGraph};

use crate::Entity;

/// An iterator over the entities in a `Grid`.
pub struct Entities<'a> {
    pub(crate) graph: &'a StableDiGraph<Entity, ()>,
    pub(crate) iter: NodeIndices<'a, Entity>,
}

impl<'a> Iterator for Entities<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}

/// An iterator over the connections in a `Grid`, as `(station_id,
/// consumer_id)` pairs.
pub struct Connections<'a> {
    pub(crate) graph: &'a StableDiGraph<Entity, ()>,
    pub(crate) iter: EdgeIndices<'a, ()>,
}

impl<'a> Iterator for Connections<'a> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().and_then(|e| {
            self.graph
                .edge_endpoints(e)
                .map(|(station, consumer)| (self.graph[station].id(), self.graph[consumer].id()))
        })
    }
}

/// An iterator over the neighbors of an entity in a `Grid`.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a StableDiGraph<Entity, ()>,
    pub(crate) iter: petgraph::stable_graph::Neighbors<'a, ()>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}
