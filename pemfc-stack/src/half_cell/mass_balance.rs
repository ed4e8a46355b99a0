//! Species molar flows and gas-phase concentrations.

use log::trace;
use ndarray::{Array1, ArrayViewMut1, Zip, s};
use pemfc_core::{FlowDirection, discretize::node_to_element};
use pemfc_thermo::{
    GasPropertyProvider,
    constants::{FARADAY, GAS_CONSTANT},
};
use uom::si::{f64::ThermodynamicTemperature, pressure::pascal, thermodynamic_temperature::kelvin};

use super::{
    ChannelState, Inputs, Params, Species, WaterRegime,
    regime::{DEPLETION_FLOOR, DRY_OUT_FLOOR},
};
use crate::{Electrode, MembraneKind};

pub(super) fn fluid_temperature_elements(state: &mut ChannelState) {
    state.temperature_element = node_to_element(state.temperature.view());
}

/// Reactant flow at the inlet, sized from the stoichiometry and the target
/// current density.
pub(super) fn inlet_reactant_flow(params: &Params, inputs: &Inputs) -> f64 {
    inputs.stoichiometry * params.target_current_density * params.active_area
        / (params.valence * FARADAY)
}

/// Integrates the consumption from the inlet downstream, clamped at zero.
pub(super) fn reactant_flow(params: &Params, inputs: &Inputs, state: &mut ChannelState) {
    let n = params.nodes;
    let inlet_flow = inlet_reactant_flow(params, inputs);
    let consumed = params.direction.cumulative(inputs.current_density.view())
        * (params.active_area_dx / (params.valence * FARADAY));

    let mut flow = Array1::from_elem(n, inlet_flow);
    downstream_slice(params, &mut flow).zip_mut_with(&consumed, |f, c| *f -= c);
    flow.mapv_inplace(|f| f.max(0.0));
    state
        .molar_flow
        .row_mut(Species::Reactant.index())
        .assign(&flow);
}

/// Water from inlet humidification, production and membrane cross-flux,
/// plus the inert flow.
///
/// Water is zeroed wherever the reactant is exhausted. On the cathode a
/// water flow falling below [`DRY_OUT_FLOOR`] freezes every downstream node
/// at the last node above it.
pub(super) fn water_flow(
    params: &Params,
    inputs: &Inputs,
    provider: &impl GasPropertyProvider,
    state: &mut ChannelState,
) {
    let n = params.nodes;
    let inlet = params.direction.inlet(n);
    let reactant = state.molar_flow.row(Species::Reactant.index()).to_owned();
    let inlet_reactant = reactant[inlet];

    let p_sat = saturation_pressure(provider, params.inlet_temperature);
    let vapour = params.inlet_humidity * p_sat;
    let inlet_water = inlet_reactant * (1.0 + params.inert_ratio) * vapour
        / (inputs.outlet_pressure - vapour);

    let mut added = Array1::<f64>::zeros(n - 1);
    if params.electrode == Electrode::Cathode {
        added += &(params.direction.cumulative(inputs.current_density.view())
            * (params.active_area_dx / (params.valence * FARADAY * 0.5)));
    }
    if inputs.membrane == MembraneKind::LowTemperature {
        let crossed =
            params.direction.cumulative(inputs.water_cross_flux.view()) * params.active_area_dx;
        match params.electrode {
            Electrode::Cathode => added += &crossed,
            Electrode::Anode => added -= &crossed,
        }
    }

    let mut water = Array1::from_elem(n, inlet_water);
    downstream_slice(params, &mut water).zip_mut_with(&added, |w, a| *w += a);
    Zip::from(&mut water).and(&reactant).for_each(|w, &r| {
        *w = if r > DEPLETION_FLOOR { w.max(0.0) } else { 0.0 };
    });

    state.water = WaterRegime::Nominal;
    if params.electrode == Electrode::Cathode {
        freeze_dry_out(params, &mut water, state);
    }

    state.molar_flow.row_mut(Species::Water.index()).assign(&water);
    state
        .molar_flow
        .row_mut(Species::Inert.index())
        .fill(inlet_reactant * params.inert_ratio);
}

fn freeze_dry_out(params: &Params, water: &mut Array1<f64>, state: &mut ChannelState) {
    let order: Vec<usize> = params.direction.nodes_downstream(params.nodes).collect();
    let Some(pos) = order
        .iter()
        .skip(1)
        .position(|&node| water[node] < DRY_OUT_FLOOR)
    else {
        return;
    };

    // `pos` counts from the first node after the inlet.
    let at_node = order[pos];
    let frozen = water[at_node];
    for &node in &order[pos + 1..] {
        water[node] = frozen;
    }
    trace!("{:?} channel dried out downstream of node {at_node}", params.electrode);
    state.water = WaterRegime::DriedOut { at_node };
}

/// Gas-phase concentrations from the ideal-gas law at the previous
/// pressure, capped at the saturation concentration of water.
///
/// Above saturation the excess water is liquid and the remaining partial
/// pressure is split between reactant and inert in their flow ratio.
pub(super) fn concentrations(
    params: &Params,
    provider: &impl GasPropertyProvider,
    state: &mut ChannelState,
) {
    let [r, w, i] = Species::ALL.map(Species::index);
    for node in 0..params.nodes {
        let rt = GAS_CONSTANT * state.temperature[node];
        let p = state.pressure[node];
        let flows = state.molar_flow.column(node);
        let total = flows.sum();
        let mut con = state.concentration.column_mut(node);
        if total <= 0.0 {
            con.fill(0.0);
            continue;
        }

        let p_sat = saturation_pressure(provider, state.temperature[node]);
        let water = p / rt * flows[w] / total;
        if water >= p_sat / rt {
            let dry = flows[r] + flows[i];
            let (x_r, x_i) = if dry > 0.0 {
                (flows[r] / dry, flows[i] / dry)
            } else {
                (0.0, 0.0)
            };
            con[r] = (p - p_sat) / rt * x_r;
            con[i] = (p - p_sat) / rt * x_i;
            con[w] = p_sat / rt;
        } else {
            let scale = p / rt / total;
            con[r] = scale * flows[r];
            con[i] = scale * flows[i];
            con[w] = water;
        }
    }
    state.reactant_concentration_element = node_to_element(state.concentration.row(r));
}

/// Nodes downstream of the inlet, aligned with the element array.
///
/// Element `k` feeds node `k + 1` in a forward channel and node `k` in a
/// backward channel.
fn downstream_slice<'a>(params: &Params, nodes: &'a mut Array1<f64>) -> ArrayViewMut1<'a, f64> {
    match params.direction {
        FlowDirection::Forward => nodes.slice_mut(s![1..]),
        FlowDirection::Backward => nodes.slice_mut(s![..-1]),
    }
}

pub(super) fn saturation_pressure(provider: &impl GasPropertyProvider, temperature: f64) -> f64 {
    provider
        .saturation_pressure(ThermodynamicTemperature::new::<kelvin>(temperature))
        .get::<pascal>()
}
