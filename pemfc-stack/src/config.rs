//! Construction-time configuration of a stack.
//!
//! Every struct derives `Serialize`/`Deserialize`. Dimensional fields are
//! `uom` quantities and serialize as plain numbers in SI base units, so a
//! whole stack can be described in a TOML or JSON document.
//!
//! Each config has a `validate` method. Models call it in their
//! constructors, so a model that exists holds a physically meaningful
//! configuration.

mod cell;
mod channel;
mod half_cell;
mod stack;

pub use cell::{CellConfig, LayerConductivity, MembraneConfig, MembraneKind, ThermalConductivities};
pub use channel::ChannelConfig;
pub use half_cell::{HalfCellConfig, LossSwitches};
pub use stack::{CouplingSwitches, StackConfig};

use pemfc_core::constraint::StrictlyPositive;
use serde::{Deserialize, Serialize};
use uom::si::{electric_current_density::ampere_per_square_meter, f64::ElectricCurrentDensity};

use crate::ConfigError;

/// Discretization shared by every channel of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discretization {
    /// Number of nodes along each channel; there is one element less.
    pub nodes: usize,
    /// Mean current density the stack is operated at.
    ///
    /// Inlet reactant flows are sized from it and the stoichiometry.
    pub target_current_density: ElectricCurrentDensity,
}

impl Discretization {
    /// Number of elements along each channel.
    #[must_use]
    pub fn elements(&self) -> usize {
        self.nodes.saturating_sub(1)
    }

    /// Target current density in A/m².
    #[must_use]
    pub(crate) fn target(&self) -> f64 {
        self.target_current_density.get::<ampere_per_square_meter>()
    }

    /// Checks the node count and the target current density.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if there are fewer than two nodes or the
    /// target current density is not strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes < 2 {
            return Err(ConfigError::TooFewNodes { nodes: self.nodes });
        }
        StrictlyPositive::new(self.target_current_density)
            .map_err(ConfigError::field("discretization.target_current_density"))?;
        Ok(())
    }
}
