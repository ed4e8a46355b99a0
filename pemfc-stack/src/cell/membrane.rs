//! Membrane resistance and water transport.

use ndarray::{Array1, Zip};
use pemfc_thermo::constants::FARADAY;
use uom::si::{
    diffusion_coefficient::square_meter_per_second, length::meter,
    molar_concentration::mole_per_cubic_meter,
};

use crate::{MembraneConfig, MembraneKind};

/// Water content of a fully hydrated membrane, molecules per acid group.
const SATURATED_WATER_CONTENT: f64 = 22.0;

/// Lower bound on the membrane conductivity, S/m.
///
/// Keeps the resistance finite for a dry membrane.
const MIN_CONDUCTIVITY: f64 = 1.0e-3;

/// Per-element state of the membrane after a cell update.
#[derive(Debug, Clone, PartialEq)]
pub struct MembraneState {
    pub kind: MembraneKind,
    /// Membrane temperature, K.
    pub temperature: Array1<f64>,
    /// Mean water content `λ` across the membrane. Zero for high-temperature
    /// membranes.
    pub water_content: Array1<f64>,
    /// Area-specific resistance, Ω·m².
    pub resistance: Array1<f64>,
    /// Water flux toward the cathode, mol/(m²·s).
    pub water_cross_flux: Array1<f64>,
}

impl MembraneState {
    pub(crate) fn new(kind: MembraneKind, elements: usize, temperature: f64) -> Self {
        Self {
            kind,
            temperature: Array1::from_elem(elements, temperature),
            water_content: Array1::zeros(elements),
            resistance: Array1::zeros(elements),
            water_cross_flux: Array1::zeros(elements),
        }
    }
}

/// Springer water-content isotherm `λ(a)` at water activity `a`.
///
/// The activity is clamped to `[0, 1]`; liquid-equilibrated membranes are
/// not modelled.
#[must_use]
pub(crate) fn water_content(activity: f64) -> f64 {
    let a = activity.clamp(0.0, 1.0);
    0.043 + 17.81 * a - 39.85 * a * a + 36.0 * a * a * a
}

/// Springer conductivity in S/m at water content `lambda` and temperature
/// `t` in K.
#[must_use]
pub(crate) fn conductivity(lambda: f64, t: f64) -> f64 {
    let sigma = (0.5139 * lambda - 0.326) * (1268.0 * (1.0 / 303.0 - 1.0 / t)).exp();
    sigma.max(MIN_CONDUCTIVITY)
}

/// Updates resistance, water content and water cross-flux of the membrane.
///
/// `humidity` holds the cathode and anode gas humidity on the elements;
/// it is ignored for high-temperature membranes.
pub(crate) fn update(
    config: &MembraneConfig,
    humidity: [&Array1<f64>; 2],
    current_density: &Array1<f64>,
    state: &mut MembraneState,
) {
    let thickness = config.thickness.get::<meter>();
    match config.kind {
        MembraneKind::HighTemperature => {
            let (r0, k) = (config.basic_resistance, config.temperature_coefficient);
            // Ω·cm² to Ω·m².
            state.resistance = state.temperature.mapv(|t| ((r0 - k * t) * 1.0e-4).max(0.0));
            state.water_content.fill(0.0);
            state.water_cross_flux.fill(0.0);
        }
        MembraneKind::LowTemperature => {
            let [cathode, anode] = humidity;
            let diffusion = config.water_diffusion_coefficient.get::<square_meter_per_second>()
                * config.acid_concentration.get::<mole_per_cubic_meter>()
                / thickness;
            let drag = config.drag_coefficient / SATURATED_WATER_CONTENT;

            Zip::from(&mut state.resistance)
                .and(&mut state.water_content)
                .and(&state.temperature)
                .and(cathode)
                .and(anode)
                .for_each(|r, lambda, &t, &rh_ca, &rh_an| {
                    *lambda = 0.5 * (water_content(rh_ca) + water_content(rh_an));
                    *r = thickness / conductivity(*lambda, t);
                });

            // Drag carries water with the protons, back-diffusion returns it.
            Zip::from(&mut state.water_cross_flux)
                .and(&state.water_content)
                .and(current_density)
                .and(cathode)
                .and(anode)
                .for_each(|flux, &lambda, &i, &rh_ca, &rh_an| {
                    let gradient = water_content(rh_ca) - water_content(rh_an);
                    *flux = drag * lambda * i / FARADAY - diffusion * gradient;
                });
        }
    }
}
