use ndarray::{Array1, Array2, ArrayView1};

use super::{TransportRegime, WaterRegime};

/// Species tracked in a reactant channel.
///
/// Per-species arrays are `[3, nodes]` with one row per species, in the
/// order of [`Species::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Oxygen at the cathode, hydrogen at the anode.
    Reactant,
    Water,
    /// Nitrogen.
    Inert,
}

impl Species {
    pub const ALL: [Self; 3] = [Self::Reactant, Self::Water, Self::Inert];

    /// Row of this species in the per-species arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Reactant => 0,
            Self::Water => 1,
            Self::Inert => 2,
        }
    }
}

/// Everything a half-cell sweep computes.
///
/// Node arrays have `nodes` entries, element arrays `nodes - 1`.
/// Units are SI throughout; flows are per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    // Temperature and composition.
    /// Fluid temperature at the nodes, K. Set by the thermal coupling.
    pub temperature: Array1<f64>,
    /// Fluid temperature on the elements, K.
    pub temperature_element: Array1<f64>,
    /// Molar flow per species, mol/s.
    pub molar_flow: Array2<f64>,
    /// Gas-phase molar concentration per species, mol/m³.
    pub concentration: Array2<f64>,
    /// Reactant concentration on the elements, mol/m³.
    pub reactant_concentration_element: Array1<f64>,
    pub mass_fraction: Array2<f64>,
    pub mole_fraction: Array2<f64>,

    // Electrochemistry, on the elements.
    /// `1 − i / i_lim`, scaled by the local concentration ratio.
    pub transport_parameter: Array1<f64>,
    pub current_density_squared: Array1<f64>,
    pub activation_loss: Array1<f64>,
    pub cl_diffusion_loss: Array1<f64>,
    pub gdl_diffusion_loss: Array1<f64>,
    /// Sum of the enabled loss terms, V.
    pub voltage_loss: Array1<f64>,

    // Phase change.
    /// Liquid water molar flow, mol/s.
    pub liquid_water_flow: Array1<f64>,
    /// Gas-phase molar flow, mol/s.
    pub gas_flow: Array1<f64>,
    /// Molar condensation rate, mol/s; positive where water condenses.
    pub condensation_rate: Array1<f64>,

    // Species and mixture properties.
    pub species_heat_capacity: Array2<f64>,
    pub species_viscosity: Array2<f64>,
    pub species_conductivity: Array2<f64>,
    pub gas_constant: Array1<f64>,
    pub heat_capacity: Array1<f64>,
    pub viscosity: Array1<f64>,
    pub conductivity: Array1<f64>,
    pub density: Array1<f64>,
    pub prandtl: Array1<f64>,
    pub humidity: Array1<f64>,

    // Flow.
    pub velocity: Array1<f64>,
    pub gas_mass_flow: Array1<f64>,
    pub reactant_mass_flow: Array1<f64>,
    pub liquid_water_mass_flow: Array1<f64>,
    pub vapour_mass_flow: Array1<f64>,
    /// Reactant mass consumed over each element, kg/s.
    pub reactant_mass_flow_delta: Array1<f64>,
    /// Vapour mass change over each element, kg/s.
    pub vapour_mass_flow_delta: Array1<f64>,
    /// Gas plus liquid mass flow, kg/s.
    pub fluid_mass_flow: Array1<f64>,
    /// Heat capacity of gas plus liquid, J/(kg·K).
    pub fluid_heat_capacity: Array1<f64>,
    /// Heat-capacity flow `ṁ·cp` of the fluid, W/K.
    pub fluid_heat_capacity_flow: Array1<f64>,
    pub reynolds: Array1<f64>,
    /// Convection coefficient between fluid and channel wall, W/(m²·K).
    pub heat_transfer_coefficient: Array1<f64>,
    /// Convective conductance over one node spacing, W/K.
    pub convective_conductance: Array1<f64>,
    /// Pressure drop contributed by the bends per element, Pa.
    pub bend_pressure_drop: f64,
    pub pressure: Array1<f64>,

    pub transport: TransportRegime,
    pub water: WaterRegime,
}

impl ChannelState {
    /// State before the first sweep: uniform temperature and pressure, no
    /// flow.
    pub(crate) fn new(nodes: usize, temperature: f64, pressure: f64) -> Self {
        let elements = nodes - 1;
        let species = Species::ALL.len();
        let node = || Array1::zeros(nodes);
        let element = || Array1::zeros(elements);
        let per_species = || Array2::zeros((species, nodes));
        Self {
            temperature: Array1::from_elem(nodes, temperature),
            temperature_element: Array1::from_elem(elements, temperature),
            molar_flow: per_species(),
            concentration: per_species(),
            reactant_concentration_element: element(),
            mass_fraction: per_species(),
            mole_fraction: per_species(),
            transport_parameter: element(),
            current_density_squared: element(),
            activation_loss: element(),
            cl_diffusion_loss: element(),
            gdl_diffusion_loss: element(),
            voltage_loss: element(),
            liquid_water_flow: node(),
            gas_flow: node(),
            condensation_rate: node(),
            species_heat_capacity: per_species(),
            species_viscosity: per_species(),
            species_conductivity: per_species(),
            gas_constant: node(),
            heat_capacity: node(),
            viscosity: Array1::from_elem(nodes, 1.0e-5),
            conductivity: node(),
            density: Array1::ones(nodes),
            prandtl: node(),
            humidity: node(),
            velocity: node(),
            gas_mass_flow: node(),
            reactant_mass_flow: node(),
            liquid_water_mass_flow: node(),
            vapour_mass_flow: node(),
            reactant_mass_flow_delta: element(),
            vapour_mass_flow_delta: element(),
            fluid_mass_flow: node(),
            fluid_heat_capacity: node(),
            fluid_heat_capacity_flow: node(),
            reynolds: node(),
            heat_transfer_coefficient: node(),
            convective_conductance: node(),
            bend_pressure_drop: 0.0,
            pressure: Array1::from_elem(nodes, pressure),
            transport: TransportRegime::Nominal,
            water: WaterRegime::Nominal,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.pressure.len()
    }

    /// Molar flow of `species` at every node.
    #[must_use]
    pub fn molar_flow_of(&self, species: Species) -> ArrayView1<'_, f64> {
        self.molar_flow.row(species.index())
    }

    /// Gas-phase concentration of `species` at every node.
    #[must_use]
    pub fn concentration_of(&self, species: Species) -> ArrayView1<'_, f64> {
        self.concentration.row(species.index())
    }
}
