use pemfc_core::FlowDirection;
use pemfc_thermo::{Gas, units::SpecificGasConstant};
use uom::si::{
    area::square_meter,
    electric_potential::volt,
    electrical_conductivity::siemens_per_meter,
    diffusion_coefficient::square_meter_per_second,
    length::meter,
    molar_mass::kilogram_per_mole,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::{Discretization, Electrode, HalfCellConfig, LossSwitches};

/// Nusselt number of laminar flow at constant wall temperature.
pub(super) const NUSSELT: f64 = 3.66;

/// Half-cell configuration reduced to SI numbers, with derived geometry.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Params {
    pub electrode: Electrode,
    pub direction: FlowDirection,
    pub nodes: usize,
    pub valence: f64,
    pub gases: [Gas; 3],
    /// Molar mass per species, kg/mol.
    pub molar_mass: [f64; 3],
    /// Specific gas constant per species, J/(kg·K).
    pub gas_constant: [f64; 3],
    /// Inert-to-reactant mole ratio of the dry inlet gas.
    pub inert_ratio: f64,
    pub target_current_density: f64,

    pub channel_count: usize,
    pub dx: f64,
    pub cross_area: f64,
    pub hydraulic_diameter: f64,
    pub bends: f64,
    pub bend_loss_coefficient: f64,
    pub inlet_temperature: f64,
    pub inlet_humidity: f64,
    pub outlet_pressure: f64,
    /// Active area served by one channel, m².
    pub active_area: f64,
    /// Active area served by one channel element, m².
    pub active_area_dx: f64,

    pub gdl_thickness: f64,
    pub cl_thickness: f64,
    pub gde_thickness: f64,
    pub bpp_thickness: f64,
    pub tafel_slope: f64,
    pub cl_proton_conductivity: f64,
    pub cl_diffusion: f64,
    pub gdl_diffusion: f64,
    /// Kinetic current density `√(2·j*·σ·b)`, A/m².
    pub i_sigma: f64,
    /// Characteristic current density `σ·b / l_cl`, A/m².
    pub i_char: f64,
    pub losses: LossSwitches,
}

impl Params {
    pub(super) fn new(config: &HalfCellConfig, discretization: &Discretization) -> Self {
        let electrode = config.electrode;
        let gases = [electrode.reactant(), Gas::WaterVapor, Gas::Nitrogen];
        let molar_mass = gases.map(|gas| gas.molar_mass().get::<kilogram_per_mole>());
        let gas_constant = gases.map(|gas| {
            let r: SpecificGasConstant = gas.gas_constant();
            r.get::<joule_per_kilogram_kelvin>()
        });

        let nodes = discretization.nodes;
        let channel = &config.channel;
        let active_area = (config.cell_width * config.cell_length).get::<square_meter>()
            / config.channel_count as f64;

        let tafel_slope = config.tafel_slope.get::<volt>();
        let cl_proton_conductivity = config.cl_proton_conductivity.get::<siemens_per_meter>();
        let cl_thickness = config.cl_thickness.get::<meter>();
        let exchange_current_density = config.exchange_current_density.value;

        Self {
            electrode,
            direction: electrode.flow_direction(),
            nodes,
            valence: electrode.valence(),
            gases,
            molar_mass,
            gas_constant,
            inert_ratio: (1.0 - config.inlet_reactant_fraction) / config.inlet_reactant_fraction,
            target_current_density: discretization.target(),
            channel_count: config.channel_count,
            dx: channel.dx(nodes).get::<meter>(),
            cross_area: channel.cross_area().get::<square_meter>(),
            hydraulic_diameter: channel.hydraulic_diameter().get::<meter>(),
            bends: f64::from(channel.bends),
            bend_loss_coefficient: channel.bend_loss_coefficient,
            inlet_temperature: channel.inlet_temperature.get::<kelvin>(),
            inlet_humidity: channel.inlet_humidity,
            outlet_pressure: channel.outlet_pressure.get::<pascal>(),
            active_area,
            active_area_dx: active_area / (nodes - 1) as f64,
            gdl_thickness: config.gdl_thickness.get::<meter>(),
            cl_thickness,
            gde_thickness: config.gde_thickness().get::<meter>(),
            bpp_thickness: config.bpp_thickness.get::<meter>(),
            tafel_slope,
            cl_proton_conductivity,
            cl_diffusion: config.cl_diffusion_coefficient.get::<square_meter_per_second>(),
            gdl_diffusion: config.gdl_diffusion_coefficient.get::<square_meter_per_second>(),
            i_sigma: (2.0 * exchange_current_density * cl_proton_conductivity * tafel_slope).sqrt(),
            i_char: cl_proton_conductivity * tafel_slope / cl_thickness,
            losses: config.losses,
        }
    }

    /// Number of elements.
    pub(super) fn elements(&self) -> usize {
        self.nodes - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::test_support;

    #[test]
    fn cathode_parameters() {
        let params = Params::new(&test_support::cathode(), &test_support::discretization());
        assert_eq!(params.direction, FlowDirection::Forward);
        assert_relative_eq!(params.active_area, 1.0e-3, max_relative = 1e-12);
        assert_relative_eq!(params.active_area_dx, 1.0e-4, max_relative = 1e-12);
        assert_relative_eq!(params.inert_ratio, 0.79 / 0.21, max_relative = 1e-12);
        assert_relative_eq!(params.i_char, 9000.0, max_relative = 1e-12);
        assert_relative_eq!(
            params.i_sigma,
            (2.0 * 2.3e3 * 3.0 * 0.03_f64).sqrt(),
            max_relative = 1e-12
        );
        assert_relative_eq!(params.molar_mass[0], 0.032);
    }

    #[test]
    fn anode_reacts_hydrogen() {
        let params = Params::new(&test_support::anode(), &test_support::discretization());
        assert_eq!(params.gases[0], Gas::Hydrogen);
        assert_eq!(params.direction, FlowDirection::Backward);
        assert_relative_eq!(params.inert_ratio, 1.0);
    }
}
