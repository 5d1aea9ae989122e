// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains the
//! `GridBuilder`, which can declaratively build grid configurations for use
//! in tests.

use crate::{Error, Grid, GridConfig, GridPosition, LoadType};

/// Represents an entity added to the `GridBuilder`.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub(crate) struct EntityHandle(u64);

impl EntityHandle {
    /// Returns the id of the entity.
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

enum Placement {
    Station(f64),
    Consumer(LoadType, f64),
}

/// A builder for creating grid configurations easily, for use in tests.
///
/// Entities get ids in the order they are added, starting from 1, and are
/// laid out along the x axis.
pub(crate) struct GridBuilder {
    config: GridConfig,
    placements: Vec<(u64, Placement)>,
    connections: Vec<(EntityHandle, EntityHandle)>,
    next_id: u64,
}

impl GridBuilder {
    /// Creates a new `GridBuilder` with the default configuration.
    pub(crate) fn new() -> Self {
        GridBuilder {
            config: GridConfig::default(),
            placements: Vec::new(),
            connections: Vec::new(),
            next_id: 1,
        }
    }

    fn place(&mut self, placement: Placement) -> EntityHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.placements.push((id, placement));
        EntityHandle(id)
    }

    /// Adds a station with the given capacity and returns its handle.
    pub(crate) fn station(&mut self, rated_capacity: f64) -> EntityHandle {
        self.place(Placement::Station(rated_capacity))
    }

    /// Adds a resistive consumer and returns its handle.
    pub(crate) fn resistive(&mut self, active_power: f64) -> EntityHandle {
        self.place(Placement::Consumer(LoadType::Resistive, active_power))
    }

    /// Adds an inductive consumer and returns its handle.
    pub(crate) fn inductive(&mut self, active_power: f64) -> EntityHandle {
        self.place(Placement::Consumer(LoadType::Inductive, active_power))
    }

    /// Adds a capacitive consumer and returns its handle.
    pub(crate) fn capacitive(&mut self, active_power: f64) -> EntityHandle {
        self.place(Placement::Consumer(LoadType::Capacitive, active_power))
    }

    /// Connects a consumer to a station.
    pub(crate) fn connect(&mut self, consumer: EntityHandle, station: EntityHandle) -> &mut Self {
        self.connections.push((consumer, station));
        self
    }

    /// Builds and returns the grid from the given entities and connections.
    pub(crate) fn build(self) -> Result<Grid, Error> {
        let mut grid = Grid::new(self.config)?;
        for (id, placement) in self.placements {
            let position = GridPosition::new(id as i32, 0);
            match placement {
                Placement::Station(capacity) => {
                    grid.insert_station(id, position, capacity)?;
                }
                Placement::Consumer(load_type, active_power) => {
                    grid.insert_consumer(id, position, load_type, active_power)?;
                }
            }
        }
        for (consumer, station) in self.connections {
            grid.connect(consumer.id(), station.id())?;
        }
        Ok(grid)
    }
}
