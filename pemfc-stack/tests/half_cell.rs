mod common;

use approx::assert_relative_eq;
use ndarray::Array1;
use pemfc_stack::{
    Electrode, HalfCellModel, LossSwitches, MASS_TRANSPORT_SENTINEL, Species, TransportRegime,
    WaterRegime,
};
use pemfc_thermo::{FittedGasProperties, constants::FARADAY};

use common::{half_cell, low_temperature_config, saturation_concentration, stack_config};

const ELECTRODES: [Electrode; 2] = [Electrode::Cathode, Electrode::Anode];

/// Flows are non-negative and no node holds more vapour than saturation.
fn assert_physical(model: &HalfCellModel<FittedGasProperties>) {
    let state = model.state();
    for species in Species::ALL {
        let flow = state.molar_flow_of(species);
        assert!(flow.iter().all(|&f| f >= 0.0), "{species:?} flow {flow}");
    }
    let water = state.concentration.row(Species::Water.index());
    for (node, &c) in water.iter().enumerate() {
        let cap = saturation_concentration(state.temperature[node]);
        assert!(c <= cap * (1.0 + 1e-12), "node {node}: {c} > {cap}");
    }
}

#[test]
fn sweeps_stay_physical() {
    for config in [stack_config(), low_temperature_config()] {
        for electrode in ELECTRODES {
            let mut model = half_cell(&config, electrode, 2.0);
            model.update();
            model.update();
            assert_physical(&model);
        }
    }
}

#[test]
fn single_element_reactant_balance() {
    let mut config = stack_config();
    config.discretization.nodes = 2;
    let mut model = half_cell(&config, Electrode::Cathode, 2.0);
    model
        .set_current_density(Array1::from_elem(1, 4500.0).view())
        .unwrap();
    model.update();

    // One channel of ten covers a tenth of the cell.
    let area = 0.1 * 0.1 / 10.0;
    let inlet = 2.0 * 6000.0 * area / (4.0 * FARADAY);
    let flow = model.state().molar_flow_of(Species::Reactant);
    assert_relative_eq!(flow[0], inlet, max_relative = 1e-12);
    assert_relative_eq!(flow[1], inlet - 4500.0 * area / (4.0 * FARADAY), max_relative = 1e-12);

    // Drawing more than the inlet supplies clamps the outlet at zero.
    model
        .set_current_density(Array1::from_elem(1, 13_000.0).view())
        .unwrap();
    model.update();
    assert_eq!(model.state().molar_flow_of(Species::Reactant)[1], 0.0);
    assert_physical(&model);
}

#[test]
fn voltage_loss_is_the_sum_of_enabled_terms() {
    let switches = [
        LossSwitches::default(),
        LossSwitches {
            activation: false,
            ..LossSwitches::default()
        },
        LossSwitches {
            cl_diffusion: false,
            ..LossSwitches::default()
        },
        LossSwitches {
            gdl_diffusion: false,
            ..LossSwitches::default()
        },
        LossSwitches::none(),
    ];
    for losses in switches {
        for electrode in ELECTRODES {
            let mut config = stack_config();
            config.cell.cathode.losses = losses;
            config.cell.anode.losses = losses;
            let mut model = half_cell(&config, electrode, 2.0);
            model.update();

            let state = model.state();
            let sum = &state.activation_loss + &state.cl_diffusion_loss + &state.gdl_diffusion_loss;
            assert_eq!(state.voltage_loss, sum);
            for (enabled, term) in [
                (losses.activation, &state.activation_loss),
                (losses.cl_diffusion, &state.cl_diffusion_loss),
                (losses.gdl_diffusion, &state.gdl_diffusion_loss),
            ] {
                if !enabled {
                    assert!(term.iter().all(|&v| v == 0.0));
                }
            }
        }
    }
}

#[test]
fn disabled_losses_vanish_at_any_current_density() {
    let mut config = stack_config();
    config.cell.cathode.losses = LossSwitches::none();
    let mut model = half_cell(&config, Electrode::Cathode, 2.0);
    for i in [0.0, 2500.0, 6000.0, 9000.0] {
        model.set_current_density(Array1::from_elem(10, i).view()).unwrap();
        model.update();
        assert!(model.state().voltage_loss.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn limiting_current_substitutes_the_sentinel() {
    let config = stack_config();
    let mut model = half_cell(&config, Electrode::Cathode, 1.05);
    model.update();

    let state = model.state();
    let TransportRegime::MassTransportLimited { from_element } = state.transport else {
        panic!("expected a mass-transport limit, got {:?}", state.transport);
    };
    assert!(state.gdl_diffusion_loss.iter().all(|v| v.is_finite()));
    assert!(state.voltage_loss.iter().all(|v| v.is_finite()));
    for k in from_element..10 {
        assert_eq!(state.gdl_diffusion_loss[k], MASS_TRANSPORT_SENTINEL);
    }
    for k in 0..from_element {
        assert!(state.gdl_diffusion_loss[k] < MASS_TRANSPORT_SENTINEL);
    }
}

#[test]
fn dried_out_cathode_freezes_downstream_water() {
    let config = low_temperature_config();
    let mut model = half_cell(&config, Electrode::Cathode, 2.0);
    // Strong back-diffusion pulls water into the anode.
    model
        .set_water_cross_flux(Array1::from_elem(10, -0.2).view())
        .unwrap();
    model.update();

    let state = model.state();
    let WaterRegime::DriedOut { at_node } = state.water else {
        panic!("expected dry-out, got {:?}", state.water);
    };
    let water = state.molar_flow_of(Species::Water);
    for node in at_node + 1..water.len() {
        assert_eq!(water[node], water[at_node]);
    }
    assert_physical(&model);

    // Without the cross-flux the cathode stays wet.
    model.set_water_cross_flux(Array1::zeros(10).view()).unwrap();
    model.update();
    assert_eq!(model.state().water, WaterRegime::Nominal);
}
