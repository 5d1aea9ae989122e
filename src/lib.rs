// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy City Grid

This is a library for simulating a small electrical distribution network:
generating stations supply power to consumers over explicit connections, and
the operating state of the network (voltage, loading, reactive power) is
recomputed on every change and classified into health tiers.

It is the core of an interactive visualization.  Rendering and input
handling live elsewhere: they read entity state from a [`Grid`] to draw it,
and call into the [`Grid`] to place, connect, disconnect and remove
entities.

## The `Grid`

The main struct is [`Grid`], which owns all entities and the connections
between them.  Entities are created with [`add_station`][Grid::add_station]
and [`add_consumer`][Grid::add_consumer], and connected with
[`connect`][Grid::connect].  A consumer is connected to at most one station
at a time, so the connections always form disjoint stars around stations.

Every mutation recomputes the affected station and its consumers before
returning, so the state read from the grid is never stale.

## Electrical model

- A consumer's reactive power is `Q = P * tan(acos(pf))`: positive for
  inductive loads, negative for capacitive loads, and zero for resistive
  loads.
- A station's per-unit voltage is approximated as
  `V = 1 - loading * 0.1 - |Q_total| * 0.02`, where `loading` is the
  connected active demand divided by the rated capacity.
- Stations and consumers are classified as [`Healthy`][HealthStatus::Healthy]
  at `V >= 0.97`, [`Warning`][HealthStatus::Warning] at `0.95 <= V < 0.97`
  and [`Critical`][HealthStatus::Critical] below that.  Overloaded stations
  are at least `Warning`, and consumers without a station are
  [`Unconnected`][HealthStatus::Unconnected].

All coefficients, thresholds and power factors come from the injected
[`GridConfig`].  An optional [`NetworkAnalysis`] can supply more accurate
station voltages.

## Example

```
use energy_city_grid::{Grid, GridConfig, GridPosition, HealthStatus, LoadType};

let mut grid = Grid::new(GridConfig::default())?;
let station = grid.add_station(GridPosition::new(0, 0), 100.0)?;
let heater = grid.add_consumer(GridPosition::new(1, 0), LoadType::Resistive, 50.0)?;

grid.connect(heater, station)?;
let summary = grid.station_summary(station)?;
assert_eq!(summary.loading_fraction, 0.5);
assert_eq!(summary.status, HealthStatus::Warning);

grid.disconnect(heater)?;
assert_eq!(grid.consumer(heater)?.status(), HealthStatus::Unconnected);
# Ok::<(), energy_city_grid::Error>(())
```
*/

mod config;
pub use config::{GridConfig, PowerFactors, StatusThresholds, VoltageDroop};

mod entity;
pub use entity::{
    compute_voltage, loading_fraction, reactive_power, ConsumerSummary, Entity, EntityData,
    GridPosition, PowerConsumer, PowerStation, StationSummary,
};

mod entity_kind;
pub use entity_kind::{EntityKind, LoadType};

mod grid;
pub use grid::{iterators, Grid};

mod network_analysis;
pub use network_analysis::NetworkAnalysis;

mod status;
pub use status::{classify_consumer, classify_station, classify_voltage, HealthStatus};

mod error;
pub use error::{Error, ErrorKind};
