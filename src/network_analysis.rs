// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the trait through which an external network analysis
//! can supply station voltages.

use crate::PowerStation;

/**
This trait can be implemented by a more rigorous network analysis (a power
flow engine, a database of measured values) to override the voltage droop
approximation of the stations.

It is consulted on every recompute of a station, after the station's load
has been aggregated.  If it returns `Some(voltage)`, that voltage is used to
classify the station and its consumers.  If it returns `None`, or if no
analysis is installed in the [`Grid`][crate::Grid], the approximation is
used.  Non-finite voltages are ignored.

<details>
<summary>Example implementation backed by precomputed bus voltages:</summary>

```
use std::collections::HashMap;
use energy_city_grid::{NetworkAnalysis, PowerStation};

struct SolvedVoltages(HashMap<u64, f64>);

impl NetworkAnalysis for SolvedVoltages {
    fn station_voltage(&self, station_id: u64, _station: &PowerStation) -> Option<f64> {
        self.0.get(&station_id).copied()
    }
}
```

</details>

Closures with the same signature implement the trait too.
*/
pub trait NetworkAnalysis: Send + Sync {
    /// Returns the per-unit voltage of the station with the given id, if the
    /// analysis has one for the station's current load.
    fn station_voltage(&self, station_id: u64, station: &PowerStation) -> Option<f64>;
}

impl<F> NetworkAnalysis for F
where
    F: Fn(u64, &PowerStation) -> Option<f64> + Send + Sync,
{
    fn station_voltage(&self, station_id: u64, station: &PowerStation) -> Option<f64> {
        self(station_id, station)
    }
}
