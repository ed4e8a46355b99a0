use pemfc_core::constraint::{NonNegative, StrictlyPositive};
use pemfc_thermo::units::DiffusionCoefficient;
use serde::{Deserialize, Serialize};
use uom::si::f64::{
    ElectricPotential, ElectricalConductivity, ElectricalResistivity, Length, MolarConcentration,
    ThermalConductivity,
};

use super::HalfCellConfig;
use crate::{ConfigError, Electrode};

/// Membrane technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembraneKind {
    /// Phosphoric-acid doped membrane operated above 100 °C.
    ///
    /// Conducts without liquid water, so no water crosses the membrane.
    HighTemperature,
    /// Perfluorosulfonic-acid membrane operated below 100 °C.
    ///
    /// Conductivity and water transport depend on the membrane water
    /// content.
    LowTemperature,
}

/// Membrane properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneConfig {
    pub kind: MembraneKind,
    pub thickness: Length,
    /// Area-specific resistance at 0 K of the high-temperature law
    /// `r = r₀ − k·T`, in Ω·cm².
    pub basic_resistance: f64,
    /// Temperature slope `k` of the high-temperature law, in Ω·cm²/K.
    pub temperature_coefficient: f64,
    /// Concentration of acid groups in the dry membrane.
    pub acid_concentration: MolarConcentration,
    /// Water diffusion coefficient inside the membrane.
    pub water_diffusion_coefficient: DiffusionCoefficient,
    /// Electro-osmotic drag coefficient of a fully hydrated membrane
    /// (`λ = 22`).
    pub drag_coefficient: f64,
}

impl MembraneConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        StrictlyPositive::new(self.thickness).map_err(ConfigError::field("membrane.thickness"))?;
        NonNegative::new(self.basic_resistance)
            .map_err(ConfigError::field("membrane.basic_resistance"))?;
        NonNegative::new(self.temperature_coefficient)
            .map_err(ConfigError::field("membrane.temperature_coefficient"))?;
        NonNegative::new(self.acid_concentration)
            .map_err(ConfigError::field("membrane.acid_concentration"))?;
        NonNegative::new(self.water_diffusion_coefficient)
            .map_err(ConfigError::field("membrane.water_diffusion_coefficient"))?;
        NonNegative::new(self.drag_coefficient)
            .map_err(ConfigError::field("membrane.drag_coefficient"))?;
        Ok(())
    }
}

/// Through-plane and in-plane thermal conductivity of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerConductivity {
    pub through_plane: ThermalConductivity,
    pub in_plane: ThermalConductivity,
}

/// Thermal conductivities of the cell layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalConductivities {
    pub bipolar_plate: LayerConductivity,
    pub gde: LayerConductivity,
    pub membrane: LayerConductivity,
}

impl ThermalConductivities {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, layer) in [
            ("thermal.bipolar_plate", self.bipolar_plate),
            ("thermal.gde", self.gde),
            ("thermal.membrane", self.membrane),
        ] {
            StrictlyPositive::new(layer.through_plane).map_err(ConfigError::field(field))?;
            StrictlyPositive::new(layer.in_plane).map_err(ConfigError::field(field))?;
        }
        Ok(())
    }
}

/// Configuration of one cell: two half-cells, the membrane, and the
/// electrical and thermal properties of the layers between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellConfig {
    pub cathode: HalfCellConfig,
    pub anode: HalfCellConfig,
    pub membrane: MembraneConfig,
    pub bipolar_plate_resistivity: ElectricalResistivity,
    /// Electronic conductivity of the gas diffusion electrodes.
    pub gde_conductivity: ElectricalConductivity,
    pub thermal: ThermalConductivities,
    /// Open-circuit voltage at 298.15 K.
    pub open_circuit_voltage: ElectricPotential,
}

impl CellConfig {
    /// Half-cell configuration on the `electrode` side.
    #[must_use]
    pub fn half_cell(&self, electrode: Electrode) -> &HalfCellConfig {
        match electrode {
            Electrode::Cathode => &self.cathode,
            Electrode::Anode => &self.anode,
        }
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range field, or
    /// [`ConfigError::ElectrodeMismatch`] if a half-cell is on the wrong side.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (expected, half_cell) in [
            (Electrode::Cathode, &self.cathode),
            (Electrode::Anode, &self.anode),
        ] {
            if half_cell.electrode != expected {
                return Err(ConfigError::ElectrodeMismatch {
                    expected,
                    found: half_cell.electrode,
                });
            }
            half_cell.validate()?;
        }
        self.membrane.validate()?;
        NonNegative::new(self.bipolar_plate_resistivity)
            .map_err(ConfigError::field("bipolar_plate_resistivity"))?;
        StrictlyPositive::new(self.gde_conductivity)
            .map_err(ConfigError::field("gde_conductivity"))?;
        self.thermal.validate()?;
        StrictlyPositive::new(self.open_circuit_voltage)
            .map_err(ConfigError::field("open_circuit_voltage"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::length::meter;

    use crate::test_support;

    #[test]
    fn swapped_half_cells_are_rejected() {
        let mut config = test_support::cell(MembraneKind::HighTemperature);
        std::mem::swap(&mut config.cathode, &mut config.anode);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ElectrodeMismatch {
                expected: Electrode::Cathode,
                found: Electrode::Anode,
            })
        ));
    }

    #[test]
    fn membrane_needs_thickness() {
        let mut config = test_support::cell(MembraneKind::LowTemperature);
        assert!(config.validate().is_ok());
        config.membrane.thickness = Length::new::<meter>(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Field {
                field: "membrane.thickness",
                ..
            })
        ));
    }
}
