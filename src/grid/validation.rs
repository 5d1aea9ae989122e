// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating a [`Grid`].

mod invariant_checks;
mod validate_aggregates;
mod validate_topology;

use crate::{Error, Grid};

pub(crate) struct GridValidator<'a> {
    grid: &'a Grid,
}

impl Grid {
    /// Checks the invariants of the grid:
    ///
    /// - the id index and the graph agree,
    /// - connections only run from a station to a consumer,
    /// - no consumer is connected to more than one station,
    /// - station aggregates and consumer statuses match the current
    ///   connections and demands.
    ///
    /// The public mutation methods maintain these invariants, so this is
    /// mainly useful in tests and after bulk changes.
    pub fn validate(&self) -> Result<(), Error> {
        let validator = GridValidator { grid: self };

        validator.validate_index()?;
        validator.validate_stations()?;
        validator.validate_consumers()?;
        validator.validate_aggregates()?;

        Ok(())
    }
}
