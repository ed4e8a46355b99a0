//! Composition, thermophysical properties and mass flows of the channel
//! fluid.

use ndarray::{Array1, Zip};
use pemfc_core::discretize::differences;
use pemfc_thermo::{
    GasPropertyProvider,
    constants::{GAS_CONSTANT, LIQUID_WATER_CP},
    mixture,
};
use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use super::{ChannelState, Params, Species, mass_balance::saturation_pressure};

/// Mass and mole fractions from the gas-phase concentrations.
pub(super) fn fractions(params: &Params, state: &mut ChannelState) {
    for node in 0..params.nodes {
        let con = state.concentration.column(node);
        let total = con.sum();
        let moles: [f64; 3] = if total > 0.0 {
            std::array::from_fn(|k| con[k] / total)
        } else {
            [0.0; 3]
        };
        let masses = mixture::mass_fractions(&moles, &params.molar_mass);
        for k in 0..3 {
            state.mole_fraction[[k, node]] = moles[k];
            state.mass_fraction[[k, node]] = masses[k];
        }
    }
}

/// Heat capacity, viscosity and thermal conductivity of each species.
pub(super) fn species_properties(
    params: &Params,
    provider: &impl GasPropertyProvider,
    state: &mut ChannelState,
) {
    for node in 0..params.nodes {
        let t = ThermodynamicTemperature::new::<kelvin>(state.temperature[node]);
        let p = Pressure::new::<pascal>(state.pressure[node]);
        for (k, &gas) in params.gases.iter().enumerate() {
            state.species_heat_capacity[[k, node]] = provider
                .heat_capacity(gas, t)
                .get::<joule_per_kilogram_kelvin>();
            state.species_viscosity[[k, node]] = provider.viscosity(gas, t).get::<pascal_second>();
            state.species_conductivity[[k, node]] = provider
                .thermal_conductivity(gas, t, p)
                .get::<watt_per_meter_kelvin>();
        }
    }
}

fn column(array: &ndarray::Array2<f64>, node: usize) -> [f64; 3] {
    std::array::from_fn(|k| array[[k, node]])
}

/// Mixture gas constant, heat capacity, viscosity, conductivity, density and
/// Prandtl number.
///
/// A node without any gas is evaluated as pure inert gas.
pub(super) fn mixture_properties(params: &Params, state: &mut ChannelState) {
    let inert: [f64; 3] = std::array::from_fn(|k| f64::from(k == Species::Inert.index()));
    for node in 0..params.nodes {
        let (mass, moles) = match column(&state.mole_fraction, node) {
            moles if moles.iter().sum::<f64>() > 0.0 => {
                (column(&state.mass_fraction, node), moles)
            }
            _ => (inert, inert),
        };
        let cp = column(&state.species_heat_capacity, node);
        let mu = column(&state.species_viscosity, node);
        let lambda = column(&state.species_conductivity, node);

        let r_gas = mixture::mass_weighted(&mass, &params.gas_constant);
        let cp_gas = mixture::mass_weighted(&mass, &cp);
        let mu_gas = mixture::wilke_viscosity(&moles, &mu, &params.molar_mass);
        let lambda_gas =
            mixture::mason_saxena_conductivity(&moles, &lambda, &mu, &params.molar_mass);

        state.gas_constant[node] = r_gas;
        state.heat_capacity[node] = cp_gas;
        state.viscosity[node] = mu_gas;
        state.conductivity[node] = lambda_gas;
        state.density[node] = state.pressure[node] / (r_gas * state.temperature[node]);
        state.prandtl[node] = mu_gas * cp_gas / lambda_gas;
    }
}

/// Relative humidity of the gas phase.
pub(super) fn relative_humidity(provider: &impl GasPropertyProvider, state: &mut ChannelState) {
    let water = state.concentration.row(Species::Water.index());
    Zip::from(&mut state.humidity)
        .and(water)
        .and(&state.temperature)
        .for_each(|rh, &c_w, &t| {
            *rh = c_w * GAS_CONSTANT * t / saturation_pressure(provider, t);
        });
}

/// Mean channel velocity from the ideal-gas volume flow.
pub(super) fn velocity(params: &Params, state: &mut ChannelState) {
    Zip::from(&mut state.velocity)
        .and(&state.gas_flow)
        .and(&state.temperature)
        .and(&state.pressure)
        .for_each(|u, &q, &t, &p| *u = q * GAS_CONSTANT * t / (p * params.cross_area));
}

/// Gas, reactant, liquid and vapour mass flows and their changes per
/// element.
pub(super) fn mass_flows(params: &Params, state: &mut ChannelState) {
    let [r, w, _] = Species::ALL.map(Species::index);
    let m_water = params.molar_mass[w];

    state.gas_mass_flow = &state.velocity * &state.density * params.cross_area;
    state.reactant_mass_flow = state.molar_flow.row(r).mapv(|n| n * params.molar_mass[r]);
    state.liquid_water_mass_flow = state.liquid_water_flow.mapv(|n| n * m_water);
    state.vapour_mass_flow = (&state.molar_flow.row(w) - &state.liquid_water_flow) * m_water;
    state.reactant_mass_flow_delta = differences(state.reactant_mass_flow.view()).mapv(f64::abs);
    state.vapour_mass_flow_delta = differences(state.vapour_mass_flow.view()).mapv(f64::abs);
    state.fluid_mass_flow = &state.gas_mass_flow + &state.liquid_water_mass_flow;
}

/// Heat capacity of the two-phase fluid and its heat-capacity flow.
///
/// A node without any flow takes the gas heat capacity.
pub(super) fn fluid_heat_capacity(state: &mut ChannelState) {
    let mut cp_fluid = Array1::zeros(state.nodes());
    Zip::from(&mut cp_fluid)
        .and(&state.gas_mass_flow)
        .and(&state.liquid_water_mass_flow)
        .and(&state.fluid_mass_flow)
        .and(&state.heat_capacity)
        .for_each(|cp, &m_gas, &m_liq, &m_fluid, &cp_gas| {
            *cp = if m_fluid > 0.0 {
                (m_gas * cp_gas + m_liq * LIQUID_WATER_CP) / m_fluid
            } else {
                cp_gas
            };
        });
    state.fluid_heat_capacity_flow = &state.fluid_mass_flow * &cp_fluid;
    state.fluid_heat_capacity = cp_fluid;
}
