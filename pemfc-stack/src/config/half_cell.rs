use pemfc_core::constraint::{NonNegative, StrictlyPositive, UnitInterval};
use pemfc_thermo::units::{DiffusionCoefficient, VolumetricCurrentDensity};
use serde::{Deserialize, Serialize};
use uom::si::f64::{ElectricPotential, ElectricalConductivity, Length};

use super::ChannelConfig;
use crate::{ConfigError, Electrode};

/// Voltage-loss terms included in an electrode's total loss.
///
/// A disabled term is reported as exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossSwitches {
    pub activation: bool,
    pub cl_diffusion: bool,
    pub gdl_diffusion: bool,
}

impl Default for LossSwitches {
    fn default() -> Self {
        Self {
            activation: true,
            cl_diffusion: true,
            gdl_diffusion: true,
        }
    }
}

impl LossSwitches {
    /// All terms disabled.
    #[must_use]
    pub fn none() -> Self {
        Self {
            activation: false,
            cl_diffusion: false,
            gdl_diffusion: false,
        }
    }
}

/// Configuration of one electrode and its reactant channel.
///
/// The electrochemical parameters follow the catalyst-layer performance
/// model of Kulikovsky (2013).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfCellConfig {
    pub electrode: Electrode,
    pub channel: ChannelConfig,
    /// Parallel channels per cell.
    pub channel_count: usize,
    pub cell_width: Length,
    pub cell_length: Length,
    pub gdl_thickness: Length,
    pub bpp_thickness: Length,
    pub cl_thickness: Length,
    pub exchange_current_density: VolumetricCurrentDensity,
    pub cl_proton_conductivity: ElectricalConductivity,
    pub cl_diffusion_coefficient: DiffusionCoefficient,
    pub gdl_diffusion_coefficient: DiffusionCoefficient,
    pub tafel_slope: ElectricPotential,
    /// Reactant mole fraction of the dry inlet gas; the rest is inert.
    pub inlet_reactant_fraction: f64,
    #[serde(default)]
    pub losses: LossSwitches,
}

impl HalfCellConfig {
    /// Thickness of the gas diffusion electrode (GDL plus catalyst layer).
    #[must_use]
    pub fn gde_thickness(&self) -> Length {
        self.gdl_thickness + self.cl_thickness
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.channel.validate()?;
        if self.channel_count == 0 {
            return Err(ConfigError::Empty {
                field: "channel_count",
            });
        }
        StrictlyPositive::new(self.cell_width).map_err(ConfigError::field("cell_width"))?;
        StrictlyPositive::new(self.cell_length).map_err(ConfigError::field("cell_length"))?;
        StrictlyPositive::new(self.gdl_thickness).map_err(ConfigError::field("gdl_thickness"))?;
        NonNegative::new(self.bpp_thickness).map_err(ConfigError::field("bpp_thickness"))?;
        StrictlyPositive::new(self.cl_thickness).map_err(ConfigError::field("cl_thickness"))?;
        StrictlyPositive::new(self.exchange_current_density)
            .map_err(ConfigError::field("exchange_current_density"))?;
        StrictlyPositive::new(self.cl_proton_conductivity)
            .map_err(ConfigError::field("cl_proton_conductivity"))?;
        StrictlyPositive::new(self.cl_diffusion_coefficient)
            .map_err(ConfigError::field("cl_diffusion_coefficient"))?;
        StrictlyPositive::new(self.gdl_diffusion_coefficient)
            .map_err(ConfigError::field("gdl_diffusion_coefficient"))?;
        StrictlyPositive::new(self.tafel_slope).map_err(ConfigError::field("tafel_slope"))?;
        StrictlyPositive::new(self.inlet_reactant_fraction)
            .map_err(ConfigError::field("inlet_reactant_fraction"))?;
        UnitInterval::new(self.inlet_reactant_fraction)
            .map_err(ConfigError::field("inlet_reactant_fraction"))?;
        Ok(())
    }
}
