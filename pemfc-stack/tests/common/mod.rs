#![allow(dead_code)]

use pemfc_stack::{Electrode, HalfCellModel, MembraneKind, StackConfig};
use pemfc_thermo::{FittedGasProperties, GasPropertyProvider, constants::GAS_CONSTANT};
use uom::si::{f64::ThermodynamicTemperature, pressure::pascal, thermodynamic_temperature::kelvin};

/// Operating temperature of the low-temperature variant, K.
pub const LOW_TEMPERATURE: f64 = 343.15;

/// The high-temperature stack described in `data/stack.toml`.
pub fn stack_config() -> StackConfig {
    toml::from_str(include_str!("../data/stack.toml")).expect("stack.toml is a valid stack")
}

/// The same stack with a humidified low-temperature membrane.
pub fn low_temperature_config() -> StackConfig {
    let mut config = stack_config();
    let temperature = ThermodynamicTemperature::new::<kelvin>(LOW_TEMPERATURE);
    config.cell.membrane.kind = MembraneKind::LowTemperature;
    config.coolant_temperature = temperature;
    for half_cell in [&mut config.cell.cathode, &mut config.cell.anode] {
        half_cell.channel.inlet_temperature = temperature;
        half_cell.channel.inlet_humidity = 0.9;
    }
    config
}

/// A half-cell of `config` running on its own.
pub fn half_cell(
    config: &StackConfig,
    electrode: Electrode,
    stoichiometry: f64,
) -> HalfCellModel<FittedGasProperties> {
    let mut model = HalfCellModel::new(
        config.cell.half_cell(electrode),
        &config.discretization,
        stoichiometry,
        FittedGasProperties,
    )
    .expect("valid half-cell");
    model.set_pem_type(config.cell.membrane.kind);
    model
}

/// Saturation concentration of water vapour at `t` K, mol/m³.
pub fn saturation_concentration(t: f64) -> f64 {
    let p_sat = FittedGasProperties
        .saturation_pressure(ThermodynamicTemperature::new::<kelvin>(t))
        .get::<pascal>();
    p_sat / (GAS_CONSTANT * t)
}
