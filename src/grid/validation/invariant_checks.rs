// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Helper methods for checking invariants of a [`Grid`][crate::Grid].

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use crate::{Entity, Error};

use super::GridValidator;

impl GridValidator<'_> {
    fn neighbors(
        &self,
        index: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = &Entity> + '_ {
        self.grid
            .graph
            .neighbors_directed(index, direction)
            .map(|i| &self.grid.graph[i])
    }

    /// Checks that the given node has no successors.
    pub(super) fn ensure_leaf(&self, index: NodeIndex) -> Result<(), Error> {
        if let Some(successor) = self.neighbors(index, Direction::Outgoing).next() {
            return Err(Error::invalid_graph(format!(
                "{} can't have any successors. Found {}.",
                self.grid.graph[index], successor
            )));
        }
        Ok(())
    }

    /// Checks that the given node has no predecessors.
    pub(super) fn ensure_root(&self, index: NodeIndex) -> Result<(), Error> {
        if let Some(predecessor) = self.neighbors(index, Direction::Incoming).next() {
            return Err(Error::invalid_graph(format!(
                "{} can't have any predecessors. Found {}.",
                self.grid.graph[index], predecessor
            )));
        }
        Ok(())
    }

    /// Checks that the given node has at most one predecessor.
    pub(super) fn ensure_at_most_one_predecessor(&self, index: NodeIndex) -> Result<(), Error> {
        let mut predecessors: Vec<String> = self
            .neighbors(index, Direction::Incoming)
            .map(|e| e.to_string())
            .collect();
        if predecessors.len() > 1 {
            predecessors.sort();
            return Err(Error::invalid_graph(format!(
                "{} can't have more than one predecessor. Found {}.",
                self.grid.graph[index],
                predecessors.join(", ")
            )));
        }
        Ok(())
    }

    /// Checks that the given predicate holds for all predecessors of the given node.
    pub(super) fn ensure_on_predecessors(
        &self,
        index: NodeIndex,
        predicate: impl Fn(&Entity) -> bool,
        failure_message: &str,
    ) -> Result<(), Error> {
        for predecessor in self.neighbors(index, Direction::Incoming) {
            if !predicate(predecessor) {
                return Err(Error::invalid_graph(format!(
                    "{} can only have predecessors that are {}. Found {}.",
                    self.grid.graph[index], failure_message, predecessor
                )));
            }
        }
        Ok(())
    }

    /// Checks that the given predicate holds for all successors of the given node.
    pub(super) fn ensure_on_successors(
        &self,
        index: NodeIndex,
        predicate: impl Fn(&Entity) -> bool,
        failure_message: &str,
    ) -> Result<(), Error> {
        for successor in self.neighbors(index, Direction::Outgoing) {
            if !predicate(successor) {
                return Err(Error::invalid_graph(format!(
                    "{} can only have successors that are {}. Found {}.",
                    self.grid.graph[index], failure_message, successor
                )));
            }
        }
        Ok(())
    }
}
