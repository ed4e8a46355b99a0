//! Liquid water, gas-phase flow and condensation.

use ndarray::Axis;
use pemfc_core::discretize::{differences, element_to_node};

use super::{ChannelState, Params, Species};
use crate::Electrode;

/// Water flow in excess of what the gas phase can carry as vapour.
///
/// The vapour flow is the dry-gas flow scaled by the vapour-to-dry-gas
/// concentration ratio. Below saturation this reproduces the water flow and
/// the liquid flow is zero.
pub(super) fn liquid_water_flow(state: &mut ChannelState) {
    let [r, w, i] = Species::ALL.map(Species::index);
    let flows = &state.molar_flow;
    let con = &state.concentration;
    for (node, liquid) in state.liquid_water_flow.iter_mut().enumerate() {
        let dry = con[[r, node]] + con[[i, node]];
        let vapour = if dry > 0.0 {
            con[[w, node]] / dry * (flows[[r, node]] + flows[[i, node]])
        } else {
            0.0
        };
        *liquid = (flows[[w, node]] - vapour).max(0.0);
    }
}

/// Total gas-phase molar flow.
pub(super) fn gas_flow(state: &mut ChannelState) {
    state.gas_flow = state.molar_flow.sum_axis(Axis(0)) - &state.liquid_water_flow;
}

/// Condensation rate at the nodes, positive where liquid water forms along
/// the flow direction.
pub(super) fn condensation_rate(params: &Params, state: &mut ChannelState) {
    let rate = element_to_node(differences(state.liquid_water_flow.view()).view());
    state.condensation_rate = match params.electrode {
        Electrode::Cathode => rate,
        Electrode::Anode => -rate,
    };
}
