//! Reynolds number, wall heat transfer and the channel pressure profile.

use std::f64::consts::PI;

use ndarray::{Array1, Zip, s};
use pemfc_core::{
    FlowDirection,
    discretize::{node_to_element, ramp},
};

use super::{ChannelState, Inputs, Params, params::NUSSELT};

pub(super) fn reynolds(params: &Params, state: &mut ChannelState) {
    Zip::from(&mut state.reynolds)
        .and(&state.density)
        .and(&state.velocity)
        .and(&state.viscosity)
        .for_each(|re, &rho, &u, &mu| *re = rho * u * params.hydraulic_diameter / mu);
}

/// Laminar heat-transfer coefficient and the convective conductance of one
/// node spacing of channel wall.
pub(super) fn heat_transfer(params: &Params, state: &mut ChannelState) {
    let d_h = params.hydraulic_diameter;
    state.heat_transfer_coefficient = state.conductivity.mapv(|lambda| lambda * NUSSELT / d_h);
    state.convective_conductance = state
        .heat_transfer_coefficient
        .mapv(|alpha| alpha * PI * params.dx * d_h);
}

/// Bend loss per element `ζ·ρ̄·ū²/2 · bends / (n − 1)`.
pub(super) fn bend_pressure_drop(params: &Params, state: &mut ChannelState) {
    let rho = state.density.mean().unwrap_or(0.0);
    let u = state.velocity.mean().unwrap_or(0.0);
    state.bend_pressure_drop =
        params.bend_loss_coefficient * rho * u * u * params.bends / params.elements() as f64 * 0.5;
}

/// Pressure profile integrated upstream from the outlet.
///
/// Friction follows Hagen-Poiseuille, `dp/dx = 32/d_h · ρu²/Re`; an
/// element with a non-positive Reynolds number carries no friction. The
/// bend losses are added as a linear ramp that vanishes next to the
/// outlet.
pub(super) fn pressure(params: &Params, inputs: &Inputs, state: &mut ChannelState) {
    let n = params.nodes;
    let rho = node_to_element(state.density.view());
    let u = node_to_element(state.velocity.view());
    let re = node_to_element(state.reynolds.view());

    let mut friction = Array1::zeros(n - 1);
    Zip::from(&mut friction)
        .and(&rho)
        .and(&u)
        .and(&re)
        .for_each(|f, &rho, &u, &re| {
            if re > 0.0 {
                *f = rho * u * u / re;
            }
        });

    // Integrating against the flow accumulates from the outlet.
    let upstream = params.direction.reversed().cumulative(friction.view())
        * (32.0 / params.hydraulic_diameter * params.dx);
    let total_bends = state.bend_pressure_drop * n as f64;
    let p_out = inputs.outlet_pressure;

    let outlet = params.direction.outlet(n);
    state.pressure[outlet] = p_out;
    match params.direction {
        FlowDirection::Forward => {
            let profile = upstream + ramp(total_bends, 0.0, n - 1) + p_out;
            state.pressure.slice_mut(s![..n - 1]).assign(&profile);
        }
        FlowDirection::Backward => {
            let profile = upstream + ramp(0.0, total_bends, n - 1) + p_out;
            state.pressure.slice_mut(s![1..]).assign(&profile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    use crate::{Discretization, Electrode, test_support};

    fn setup(electrode: Electrode, nodes: usize) -> (Params, Inputs, ChannelState) {
        let config = match electrode {
            Electrode::Cathode => test_support::cathode(),
            Electrode::Anode => test_support::anode(),
        };
        let discretization = Discretization {
            nodes,
            ..test_support::discretization()
        };
        let params = Params::new(&config, &discretization);
        let inputs = Inputs::new(&params, 2.0);
        let mut state = ChannelState::new(nodes, 350.0, params.outlet_pressure);
        state.density.fill(1.0);
        state.velocity.fill(2.0);
        state.viscosity.fill(2.0e-5);
        state.conductivity.fill(0.03);
        (params, inputs, state)
    }

    #[test]
    fn laminar_heat_transfer() {
        let (params, _, mut state) = setup(Electrode::Cathode, 3);
        reynolds(&params, &mut state);
        heat_transfer(&params, &mut state);

        assert_relative_eq!(state.reynolds[0], 100.0, max_relative = 1e-12);
        assert_relative_eq!(
            state.heat_transfer_coefficient[1],
            0.03 * 3.66 / 1.0e-3,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            state.convective_conductance[2],
            0.03 * 3.66 * PI * params.dx,
            max_relative = 1e-12
        );
    }

    #[test]
    fn bend_drop_uses_channel_averages() {
        let (params, _, mut state) = setup(Electrode::Cathode, 5);
        state.velocity = array![1.0, 2.0, 3.0, 4.0, 5.0];
        bend_pressure_drop(&params, &mut state);
        assert_relative_eq!(
            state.bend_pressure_drop,
            0.1 * 9.0 * 48.0 / 4.0 * 0.5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn cathode_pressure_falls_toward_last_node() {
        let (params, inputs, mut state) = setup(Electrode::Cathode, 5);
        reynolds(&params, &mut state);
        bend_pressure_drop(&params, &mut state);
        pressure(&params, &inputs, &mut state);

        let p = &state.pressure;
        assert_eq!(p[4], inputs.outlet_pressure);
        assert!(p.windows(2).into_iter().all(|w| w[0] > w[1]));

        // Uniform flow: each element adds the same friction loss.
        let per_element = 32.0 * 2.0e-5 * 2.0 / (1.0e-3 * 1.0e-3) * params.dx;
        let bends = state.bend_pressure_drop * 5.0;
        assert_relative_eq!(
            p[0],
            inputs.outlet_pressure + 4.0 * per_element + bends,
            max_relative = 1e-12
        );
        assert_relative_eq!(p[3], inputs.outlet_pressure + per_element, max_relative = 1e-12);
    }

    #[test]
    fn anode_pressure_is_anchored_at_node_zero() {
        let (params, mut inputs, mut state) = setup(Electrode::Anode, 4);
        inputs.outlet_pressure = 150_000.0;
        reynolds(&params, &mut state);
        bend_pressure_drop(&params, &mut state);
        pressure(&params, &inputs, &mut state);

        let p = &state.pressure;
        assert_eq!(p[0], 150_000.0);
        assert!(p.windows(2).into_iter().all(|w| w[0] < w[1]));
    }

    #[test]
    fn stagnant_channel_has_no_friction() {
        let (params, inputs, mut state) = setup(Electrode::Cathode, 3);
        state.velocity.fill(0.0);
        reynolds(&params, &mut state);
        bend_pressure_drop(&params, &mut state);
        pressure(&params, &inputs, &mut state);
        assert!(state.pressure.iter().all(|&p| p == inputs.outlet_pressure));
    }
}
