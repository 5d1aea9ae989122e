// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`Grid`] instances and registering entities in them.

use crate::entity::{EntityData, GridPosition, PowerConsumer, PowerStation};
use crate::{Entity, Error, GridConfig, LoadType, NetworkAnalysis};

use super::{Grid, NodeIndexMap};

/// `Grid` instantiation and entity registration.
impl Grid {
    /// Creates an empty [`Grid`] with the given configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: GridConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            graph: Default::default(),
            node_indices: NodeIndexMap::new(),
            next_id: 1,
            config,
            network_analysis: None,
        })
    }

    /// Creates an empty [`Grid`] that consults the given network analysis for
    /// station voltages.
    pub fn with_network_analysis(
        config: GridConfig,
        network_analysis: impl NetworkAnalysis + 'static,
    ) -> Result<Self, Error> {
        let mut grid = Self::new(config)?;
        grid.network_analysis = Some(Box::new(network_analysis));
        Ok(grid)
    }

    /// Adds a station with the given rated capacity in MW and returns its id.
    pub fn add_station(
        &mut self,
        position: GridPosition,
        rated_capacity: f64,
    ) -> Result<u64, Error> {
        let id = self.next_id;
        self.insert_station(id, position, rated_capacity)
    }

    /// Adds a station with the configured default capacity.
    pub fn add_default_station(&mut self, position: GridPosition) -> Result<u64, Error> {
        self.add_station(position, self.config.default_station_capacity)
    }

    /// Adds a consumer with the given active demand in MW and the configured
    /// power factor for its load type, and returns its id.
    pub fn add_consumer(
        &mut self,
        position: GridPosition,
        load_type: LoadType,
        active_power: f64,
    ) -> Result<u64, Error> {
        let id = self.next_id;
        self.insert_consumer(id, position, load_type, active_power)
    }

    /// Adds a consumer with the configured default demand.
    pub fn add_default_consumer(
        &mut self,
        position: GridPosition,
        load_type: LoadType,
    ) -> Result<u64, Error> {
        self.add_consumer(position, load_type, self.config.default_consumer_demand)
    }

    /// Adds a station with a caller-chosen id, e.g. when restoring a saved
    /// layout.
    ///
    /// Returns an error if the id is already taken.
    pub fn insert_station(
        &mut self,
        id: u64,
        position: GridPosition,
        rated_capacity: f64,
    ) -> Result<u64, Error> {
        self.ensure_free_id(id)?;
        let mut station = PowerStation::try_new(rated_capacity)?;
        station.update_status(&self.config.thresholds);

        self.register(Entity::new(id, position, EntityData::Station(station)));
        Ok(id)
    }

    /// Adds a consumer with a caller-chosen id.
    ///
    /// Returns an error if the id is already taken.
    pub fn insert_consumer(
        &mut self,
        id: u64,
        position: GridPosition,
        load_type: LoadType,
        active_power: f64,
    ) -> Result<u64, Error> {
        self.ensure_free_id(id)?;
        let power_factor = self.config.power_factors.for_load_type(load_type);
        let consumer = PowerConsumer::try_new(load_type, active_power, power_factor)?;

        self.register(Entity::new(id, position, EntityData::Consumer(consumer)));
        Ok(id)
    }

    fn ensure_free_id(&self, id: u64) -> Result<(), Error> {
        if self.node_indices.contains_key(&id) {
            tracing::warn!("Rejected registration of duplicate entity ID {id}.");
            return Err(Error::duplicate_id(format!(
                "Duplicate entity ID found: {id}"
            )));
        }
        Ok(())
    }

    fn register(&mut self, entity: Entity) {
        let id = entity.id();
        tracing::info!("Placed {} at {}.", entity, entity.position());

        let idx = self.graph.add_node(entity);
        self.node_indices.insert(id, idx);
        self.next_id = self.next_id.max(id.saturating_add(1));
    }
}
