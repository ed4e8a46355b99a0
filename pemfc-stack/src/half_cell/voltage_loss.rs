//! Electrode voltage losses after Kulikovsky (2013).
//!
//! All quantities live on the elements. The bulk concentration of an element
//! is taken at its lower-index node, the local concentration is the element
//! average.

use std::f64::consts::PI;

use log::trace;
use ndarray::{Array1, Zip, s};
use pemfc_thermo::constants::FARADAY;

use super::{
    ChannelState, Inputs, Params, Species, TransportRegime, regime::MASS_TRANSPORT_SENTINEL,
};

/// Transport parameter `var = 1 − i / (i_lim · c_ele / c_bulk)` and `i²`.
///
/// `i_lim = 4F·c_bulk·D_gdl / l_gdl` is the current density at which the
/// GDL can no longer supply reactant.
pub(super) fn support_parameters(params: &Params, inputs: &Inputs, state: &mut ChannelState) {
    let n = params.nodes;
    let bulk = state
        .concentration
        .slice(s![Species::Reactant.index(), ..n - 1])
        .to_owned();
    let limiting = &bulk * (4.0 * FARADAY * params.gdl_diffusion / params.gdl_thickness);

    let mut var = Array1::zeros(n - 1);
    Zip::from(&mut var)
        .and(&inputs.current_density)
        .and(&limiting)
        .and(&state.reactant_concentration_element)
        .and(&bulk)
        .for_each(|v, &i, &i_lim, &c_ele, &c_bulk| {
            *v = 1.0 - i / (i_lim * c_ele / c_bulk);
        });
    state.transport_parameter = var;
    state.current_density_squared = inputs.current_density.mapv(|i| i * i);
}

/// Activation loss `b·asinh((i/i_σ)² / (2·(c_ele/c_bulk)·(1 − exp(−i/(2·i*)))))`.
///
/// The correlation is 0/0 at zero current; the loss is zero there.
pub(super) fn activation_loss(
    params: &Params,
    inputs: &Inputs,
    state: &ChannelState,
) -> Array1<f64> {
    let n = params.nodes;
    let bulk = state.concentration.slice(s![Species::Reactant.index(), ..n - 1]);
    let mut loss = Array1::zeros(n - 1);
    Zip::from(&mut loss)
        .and(&inputs.current_density)
        .and(&state.reactant_concentration_element)
        .and(bulk)
        .for_each(|loss, &i, &c_ele, &c_bulk| {
            if i == 0.0 {
                return;
            }
            let ratio = (i / params.i_sigma).powi(2);
            let denom = 2.0 * (c_ele / c_bulk) * (1.0 - (-i / (2.0 * params.i_char)).exp());
            *loss = params.tafel_slope * (ratio / denom).asinh();
        });
    loss
}

/// Catalyst-layer transport loss, divided by the transport parameter.
///
/// With `î = i/i*`, `β = √(2î) / (1 + √(1.12·î)·exp(√(2î))) + π·î / (2 + î)`
/// and the loss is
/// `σ·b² / (4F·D_cl·c_ele) · (î − log₁₀(1 + i² / (i*²·β²))) / var`.
pub(super) fn cl_diffusion_loss(
    params: &Params,
    inputs: &Inputs,
    state: &ChannelState,
) -> Array1<f64> {
    let scale = params.cl_proton_conductivity * params.tafel_slope.powi(2)
        / (4.0 * FARADAY * params.cl_diffusion);
    let mut loss = Array1::zeros(params.elements());
    Zip::from(&mut loss)
        .and(&inputs.current_density)
        .and(&state.current_density_squared)
        .and(&state.reactant_concentration_element)
        .and(&state.transport_parameter)
        .for_each(|loss, &i, &i_sq, &c_ele, &var| {
            if i == 0.0 {
                return;
            }
            let i_hat = i / params.i_char;
            let root = (2.0 * i_hat).sqrt();
            let beta =
                root / (1.0 + (1.12 * i_hat).sqrt() * root.exp()) + PI * i_hat / (2.0 + i_hat);
            let log_term = (1.0 + i_sq / (params.i_char.powi(2) * beta.powi(2))).log10();
            *loss = scale / c_ele * (i_hat - log_term) / var;
        });
    loss
}

/// GDL transport loss `−b·log₁₀(var)`.
///
/// Once the correlation turns non-finite the limiting current has been
/// reached: that element and all following ones are set to
/// [`MASS_TRANSPORT_SENTINEL`].
pub(super) fn gdl_diffusion_loss(
    params: &Params,
    state: &ChannelState,
) -> (Array1<f64>, TransportRegime) {
    let mut loss = state
        .transport_parameter
        .mapv(|var| -params.tafel_slope * var.log10());
    match loss.iter().position(|v| !v.is_finite()) {
        Some(from_element) => {
            loss.slice_mut(s![from_element..]).fill(MASS_TRANSPORT_SENTINEL);
            (loss, TransportRegime::MassTransportLimited { from_element })
        }
        None => (loss, TransportRegime::Nominal),
    }
}

/// Evaluates the three loss terms and sums the enabled ones.
pub(super) fn electrode_loss(params: &Params, inputs: &Inputs, state: &mut ChannelState) {
    let elements = params.elements();
    let switches = params.losses;
    let enabled = |on: bool, loss: Array1<f64>| if on { loss } else { Array1::zeros(elements) };

    state.activation_loss = enabled(switches.activation, activation_loss(params, inputs, state));
    state.cl_diffusion_loss =
        enabled(switches.cl_diffusion, cl_diffusion_loss(params, inputs, state));

    let (gdl, regime) = gdl_diffusion_loss(params, state);
    if switches.gdl_diffusion {
        if let TransportRegime::MassTransportLimited { from_element } = regime {
            trace!("{:?} mass-transport limited from element {from_element}", params.electrode);
        }
        state.gdl_diffusion_loss = gdl;
        state.transport = regime;
    } else {
        state.gdl_diffusion_loss = Array1::zeros(elements);
        state.transport = TransportRegime::Nominal;
    }

    state.voltage_loss =
        &state.activation_loss + &state.cl_diffusion_loss + &state.gdl_diffusion_loss;
}
