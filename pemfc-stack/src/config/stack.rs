use pemfc_core::constraint::{NonNegative, StrictlyPositive};
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{HeatTransfer, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use super::{CellConfig, Discretization};
use crate::ConfigError;

/// Coupling phases run by each stack update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingSwitches {
    /// Redistribute reactant flow over the cells through the manifolds.
    ///
    /// Only takes effect for stacks with more than one cell.
    pub flow_distribution: bool,
    /// Redistribute current density along and across cells.
    pub current_density: bool,
    /// Solve the layer and fluid temperature field.
    pub temperature: bool,
}

impl Default for CouplingSwitches {
    fn default() -> Self {
        Self {
            flow_distribution: true,
            current_density: true,
            temperature: true,
        }
    }
}

/// Configuration of a stack of identical cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub cell_count: usize,
    /// Inlet stoichiometry of the cathode header.
    pub cathode_stoichiometry: f64,
    /// Inlet stoichiometry of the anode header.
    pub anode_stoichiometry: f64,
    /// Convection coefficient between the stack walls and the environment.
    pub environment_heat_transfer: HeatTransfer,
    pub environment_temperature: ThermodynamicTemperature,
    pub coolant_temperature: ThermodynamicTemperature,
    #[serde(default)]
    pub coupling: CouplingSwitches,
    pub discretization: Discretization,
    pub cell: CellConfig,
}

impl StackConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_count == 0 {
            return Err(ConfigError::Empty {
                field: "cell_count",
            });
        }
        StrictlyPositive::new(self.cathode_stoichiometry)
            .map_err(ConfigError::field("cathode_stoichiometry"))?;
        StrictlyPositive::new(self.anode_stoichiometry)
            .map_err(ConfigError::field("anode_stoichiometry"))?;
        NonNegative::new(self.environment_heat_transfer)
            .map_err(ConfigError::field("environment_heat_transfer"))?;
        StrictlyPositive::new(self.environment_temperature.get::<kelvin>())
            .map_err(ConfigError::field("environment_temperature"))?;
        StrictlyPositive::new(self.coolant_temperature.get::<kelvin>())
            .map_err(ConfigError::field("coolant_temperature"))?;
        self.discretization.validate()?;
        self.cell.validate()
    }
}
