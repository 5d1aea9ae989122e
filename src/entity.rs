// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The entities placed on a grid: a shared identity record with a
//! kind-specific electrical payload.

mod consumer;
mod station;

pub use consumer::{reactive_power, ConsumerSummary, PowerConsumer};
pub use station::{compute_voltage, loading_fraction, PowerStation, StationSummary};

use serde::{Deserialize, Serialize};

use crate::entity_kind::KindPredicates;
use crate::status::HealthStatus;
use crate::EntityKind;

/// A cell on the placement grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The kind-specific state of an [`Entity`].
#[derive(Clone, Debug, PartialEq)]
pub enum EntityData {
    Station(PowerStation),
    Consumer(PowerConsumer),
}

/// A station or consumer registered with a [`Grid`][crate::Grid].
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: u64,
    position: GridPosition,
    data: EntityData,
}

impl Entity {
    pub(crate) fn new(id: u64, position: GridPosition, data: EntityData) -> Self {
        Self { id, position, data }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    pub fn kind(&self) -> EntityKind {
        match &self.data {
            EntityData::Station(_) => EntityKind::Station,
            EntityData::Consumer(consumer) => EntityKind::Consumer(consumer.load_type()),
        }
    }

    /// The short label shown on the entity.
    pub fn label(&self) -> &'static str {
        match &self.data {
            EntityData::Station(_) => "PS",
            EntityData::Consumer(consumer) => consumer.load_type().label(),
        }
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    pub fn status(&self) -> HealthStatus {
        match &self.data {
            EntityData::Station(station) => station.status(),
            EntityData::Consumer(consumer) => consumer.status(),
        }
    }

    pub fn as_station(&self) -> Option<&PowerStation> {
        match &self.data {
            EntityData::Station(station) => Some(station),
            EntityData::Consumer(_) => None,
        }
    }

    pub fn as_consumer(&self) -> Option<&PowerConsumer> {
        match &self.data {
            EntityData::Consumer(consumer) => Some(consumer),
            EntityData::Station(_) => None,
        }
    }

    pub(crate) fn as_station_mut(&mut self) -> Option<&mut PowerStation> {
        match &mut self.data {
            EntityData::Station(station) => Some(station),
            EntityData::Consumer(_) => None,
        }
    }

    pub(crate) fn as_consumer_mut(&mut self) -> Option<&mut PowerConsumer> {
        match &mut self.data {
            EntityData::Consumer(consumer) => Some(consumer),
            EntityData::Station(_) => None,
        }
    }
}

impl KindPredicates for Entity {
    fn kind(&self) -> EntityKind {
        Entity::kind(self)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, LoadType};

    #[test]
    fn test_entity_accessors() -> Result<(), Error> {
        let station = Entity::new(
            1,
            GridPosition::new(3, -2),
            EntityData::Station(PowerStation::try_new(100.0)?),
        );
        assert_eq!(station.kind(), EntityKind::Station);
        assert_eq!(station.label(), "PS");
        assert_eq!(station.to_string(), "Station:1");
        assert_eq!(station.position().to_string(), "(3, -2)");
        assert!(station.is_station());
        assert!(station.as_consumer().is_none());
        assert_eq!(station.status(), HealthStatus::Healthy);

        let consumer = Entity::new(
            2,
            GridPosition::default(),
            EntityData::Consumer(PowerConsumer::try_new(LoadType::Capacitive, 5.0, 0.9)?),
        );
        assert_eq!(consumer.kind(), EntityKind::Consumer(LoadType::Capacitive));
        assert_eq!(consumer.label(), "CC");
        assert_eq!(consumer.to_string(), "CapacitiveConsumer:2");
        assert!(consumer.is_consumer());
        assert!(consumer.as_station().is_none());
        assert_eq!(consumer.status(), HealthStatus::Unconnected);

        Ok(())
    }
}
