//! Ready-made configurations for unit tests.
//!
//! The high-temperature cell runs at 433.15 K on dry gases; the
//! low-temperature cell runs at 343.15 K on gases humidified to 90 %.

use pemfc_thermo::units::{DiffusionCoefficient, ampere_per_cubic_meter};
use uom::si::{
    electric_current_density::ampere_per_square_meter,
    electric_potential::volt,
    electrical_conductivity::siemens_per_meter,
    electrical_resistivity::ohm_meter,
    f64::{
        ElectricCurrentDensity, ElectricPotential, ElectricalConductivity, ElectricalResistivity,
        HeatTransfer, Length, MolarConcentration, Pressure, ThermalConductivity,
        ThermodynamicTemperature,
    },
    heat_transfer::watt_per_square_meter_kelvin,
    diffusion_coefficient::square_meter_per_second,
    length::{meter, micrometer, millimeter},
    molar_concentration::mole_per_cubic_meter,
    pressure::pascal,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::{
    CellConfig, ChannelConfig, Discretization, Electrode, HalfCellConfig, LossSwitches,
    MembraneConfig, MembraneKind, StackConfig,
    config::{CouplingSwitches, LayerConductivity, ThermalConductivities},
};

pub(crate) const NODES: usize = 11;
pub(crate) const TARGET_CURRENT_DENSITY: f64 = 6000.0;

pub(crate) fn diffusion(value: f64) -> DiffusionCoefficient {
    DiffusionCoefficient::new::<square_meter_per_second>(value)
}

pub(crate) fn temperature(kind: MembraneKind) -> f64 {
    match kind {
        MembraneKind::HighTemperature => 433.15,
        MembraneKind::LowTemperature => 343.15,
    }
}

pub(crate) fn discretization() -> Discretization {
    Discretization {
        nodes: NODES,
        target_current_density: ElectricCurrentDensity::new::<ampere_per_square_meter>(
            TARGET_CURRENT_DENSITY,
        ),
    }
}

pub(crate) fn channel() -> ChannelConfig {
    ChannelConfig {
        length: Length::new::<meter>(0.65),
        width: Length::new::<millimeter>(1.0),
        height: Length::new::<millimeter>(1.0),
        bends: 48,
        bend_loss_coefficient: 0.1,
        outlet_pressure: Pressure::new::<pascal>(101_325.0),
        inlet_temperature: ThermodynamicTemperature::new::<kelvin>(433.15),
        inlet_humidity: 0.0,
    }
}

fn half_cell(electrode: Electrode) -> HalfCellConfig {
    let (exchange_current_density, inlet_reactant_fraction) = match electrode {
        Electrode::Cathode => (2.3e3, 0.21),
        Electrode::Anode => (0.817e9, 0.5),
    };
    HalfCellConfig {
        electrode,
        channel: channel(),
        channel_count: 10,
        cell_width: Length::new::<meter>(0.1),
        cell_length: Length::new::<meter>(0.1),
        gdl_thickness: Length::new::<micrometer>(260.0),
        bpp_thickness: Length::new::<millimeter>(2.0),
        cl_thickness: Length::new::<micrometer>(10.0),
        exchange_current_density: ampere_per_cubic_meter(exchange_current_density),
        cl_proton_conductivity: ElectricalConductivity::new::<siemens_per_meter>(3.0),
        cl_diffusion_coefficient: diffusion(1.36e-8),
        gdl_diffusion_coefficient: diffusion(2.59e-6),
        tafel_slope: ElectricPotential::new::<volt>(0.03),
        inlet_reactant_fraction,
        losses: LossSwitches::default(),
    }
}

/// High-temperature cathode on dry air.
pub(crate) fn cathode() -> HalfCellConfig {
    half_cell(Electrode::Cathode)
}

/// High-temperature anode on dry diluted hydrogen.
pub(crate) fn anode() -> HalfCellConfig {
    half_cell(Electrode::Anode)
}

/// Half-cell configured for `kind`.
pub(crate) fn half_cell_for(electrode: Electrode, kind: MembraneKind) -> HalfCellConfig {
    let mut config = half_cell(electrode);
    if kind == MembraneKind::LowTemperature {
        config.channel.inlet_temperature =
            ThermodynamicTemperature::new::<kelvin>(temperature(kind));
        config.channel.inlet_humidity = 0.9;
    }
    config
}

fn layer(value: f64) -> LayerConductivity {
    LayerConductivity {
        through_plane: ThermalConductivity::new::<watt_per_meter_kelvin>(value),
        in_plane: ThermalConductivity::new::<watt_per_meter_kelvin>(value),
    }
}

pub(crate) fn cell(kind: MembraneKind) -> CellConfig {
    CellConfig {
        cathode: half_cell_for(Electrode::Cathode, kind),
        anode: half_cell_for(Electrode::Anode, kind),
        membrane: MembraneConfig {
            kind,
            thickness: Length::new::<micrometer>(50.0),
            basic_resistance: 0.33,
            temperature_coefficient: 7.0e-4,
            acid_concentration: MolarConcentration::new::<mole_per_cubic_meter>(1.2e3),
            water_diffusion_coefficient: diffusion(2.0e-10),
            drag_coefficient: 2.5,
        },
        bipolar_plate_resistivity: ElectricalResistivity::new::<ohm_meter>(2.0e-6),
        gde_conductivity: ElectricalConductivity::new::<siemens_per_meter>(500.0),
        thermal: ThermalConductivities {
            bipolar_plate: layer(100.0),
            gde: layer(1.0),
            membrane: layer(0.26),
        },
        open_circuit_voltage: ElectricPotential::new::<volt>(1.229),
    }
}

pub(crate) fn stack(kind: MembraneKind, cell_count: usize) -> StackConfig {
    StackConfig {
        cell_count,
        cathode_stoichiometry: 2.0,
        anode_stoichiometry: 1.5,
        environment_heat_transfer: HeatTransfer::new::<watt_per_square_meter_kelvin>(5.0),
        environment_temperature: ThermodynamicTemperature::new::<kelvin>(293.15),
        coolant_temperature: ThermodynamicTemperature::new::<kelvin>(temperature(kind)),
        coupling: CouplingSwitches::default(),
        discretization: discretization(),
        cell: cell(kind),
    }
}
