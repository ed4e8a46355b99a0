//! One reactant channel: the cathode or the anode side of a cell.
//!
//! [`HalfCellModel::update`] runs a single explicit sweep over the channel.
//! Each stage reads what the previous stages wrote into the
//! [`ChannelState`]:
//!
//! | stage | module          | computes                                        |
//! |-------|-----------------|-------------------------------------------------|
//! | 1–3   | `mass_balance`  | element temperature, molar flows, concentrations |
//! | 4–5   | `voltage_loss`  | transport parameter, electrode voltage losses   |
//! | 6–8   | `phase`         | liquid water, gas flow, condensation            |
//! | 9–15  | `properties`    | composition, mixture properties, mass flows     |
//! | 16–19 | `hydraulics`    | Reynolds number, heat transfer, pressure        |
//!
//! The sweep is not iterated internally. Coupling quantities (current
//! density, temperatures, stoichiometry, outlet pressure) are injected
//! through the setters between sweeps.

mod hydraulics;
mod mass_balance;
mod params;
mod phase;
mod properties;
mod regime;
mod state;
mod voltage_loss;

pub use regime::{DRY_OUT_FLOOR, MASS_TRANSPORT_SENTINEL, TransportRegime, WaterRegime};
pub use state::{ChannelState, Species};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1};
use pemfc_core::constraint::StrictlyPositive;
use pemfc_thermo::GasPropertyProvider;

use self::params::Params;
use crate::{ConfigError, Discretization, Electrode, HalfCellConfig, MembraneKind, ShapeError};

/// Number of cell layers whose temperature a half-cell holds.
///
/// The cathode holds its plate, its electrode and the membrane; the anode
/// holds its electrode and its plate.
#[must_use]
pub(crate) fn layer_count(electrode: Electrode) -> usize {
    match electrode {
        Electrode::Cathode => 3,
        Electrode::Anode => 2,
    }
}

/// Boundary inputs of a sweep, set by the cell and the stack.
#[derive(Debug, Clone, PartialEq)]
struct Inputs {
    /// Current density on the elements, A/m².
    pub current_density: Array1<f64>,
    /// Water flux through the membrane toward the cathode, mol/(m²·s).
    pub water_cross_flux: Array1<f64>,
    pub stoichiometry: f64,
    pub membrane: MembraneKind,
    /// Layer temperatures at the nodes, K.
    pub layer_temperature: Array2<f64>,
    /// Pressure at the channel outlet, Pa.
    pub outlet_pressure: f64,
}

impl Inputs {
    /// Uniform operation at the target current density and the inlet
    /// temperature, with no water crossing the membrane.
    fn new(params: &Params, stoichiometry: f64) -> Self {
        let elements = params.elements();
        Self {
            current_density: Array1::from_elem(elements, params.target_current_density),
            water_cross_flux: Array1::zeros(elements),
            stoichiometry,
            membrane: MembraneKind::HighTemperature,
            layer_temperature: Array2::from_elem(
                (layer_count(params.electrode), params.nodes),
                params.inlet_temperature,
            ),
            outlet_pressure: params.outlet_pressure,
        }
    }
}

/// Steady-state model of one reactant channel with its electrode.
#[derive(Debug, Clone)]
pub struct HalfCellModel<P> {
    config: HalfCellConfig,
    params: Params,
    inputs: Inputs,
    state: ChannelState,
    provider: P,
}

impl<P: GasPropertyProvider> HalfCellModel<P> {
    /// Creates a half-cell operating uniformly at the target current
    /// density.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid, the
    /// stoichiometry is not strictly positive, or the humidified inlet gas
    /// would be supersaturated at the outlet pressure.
    pub fn new(
        config: &HalfCellConfig,
        discretization: &Discretization,
        stoichiometry: f64,
        provider: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        discretization.validate()?;
        StrictlyPositive::new(stoichiometry).map_err(ConfigError::field("stoichiometry"))?;

        let params = Params::new(config, discretization);
        let vapour_pressure = params.inlet_humidity
            * mass_balance::saturation_pressure(&provider, params.inlet_temperature);
        if vapour_pressure >= params.outlet_pressure {
            return Err(ConfigError::SupersaturatedInlet {
                vapour_pressure,
                outlet_pressure: params.outlet_pressure,
            });
        }

        let inputs = Inputs::new(&params, stoichiometry);
        let state =
            ChannelState::new(params.nodes, params.inlet_temperature, params.outlet_pressure);
        Ok(Self {
            config: *config,
            params,
            inputs,
            state,
            provider,
        })
    }

    /// Runs one sweep over the channel.
    pub fn update(&mut self) {
        let params = &self.params;
        let inputs = &self.inputs;
        let provider = &self.provider;
        let state = &mut self.state;

        mass_balance::fluid_temperature_elements(state);
        mass_balance::reactant_flow(params, inputs, state);
        mass_balance::water_flow(params, inputs, provider, state);
        mass_balance::concentrations(params, provider, state);

        voltage_loss::support_parameters(params, inputs, state);
        voltage_loss::electrode_loss(params, inputs, state);

        phase::liquid_water_flow(state);
        phase::gas_flow(state);
        phase::condensation_rate(params, state);

        properties::fractions(params, state);
        properties::species_properties(params, provider, state);
        properties::mixture_properties(params, state);
        properties::relative_humidity(provider, state);
        properties::velocity(params, state);
        properties::mass_flows(params, state);
        properties::fluid_heat_capacity(state);

        hydraulics::reynolds(params, state);
        hydraulics::heat_transfer(params, state);
        hydraulics::bend_pressure_drop(params, state);
        hydraulics::pressure(params, inputs, state);
    }
}

impl<P> HalfCellModel<P> {
    /// Sets the current density on the elements, in A/m².
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] unless there is one value per element.
    pub fn set_current_density(
        &mut self,
        current_density: ArrayView1<'_, f64>,
    ) -> Result<(), ShapeError> {
        ShapeError::check("current density", self.params.elements(), current_density.len())?;
        self.inputs.current_density.assign(&current_density);
        Ok(())
    }

    /// Sets the membrane water flux toward the cathode, in mol/(m²·s).
    ///
    /// Only low-temperature membranes carry it into the water balance.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] unless there is one value per element.
    pub fn set_water_cross_flux(&mut self, flux: ArrayView1<'_, f64>) -> Result<(), ShapeError> {
        ShapeError::check("water cross flux", self.params.elements(), flux.len())?;
        self.inputs.water_cross_flux.assign(&flux);
        Ok(())
    }

    /// Sets the layer temperatures at the nodes, one row per layer.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the row count does not match
    /// [`HalfCellModel::layer_temperature`] or a row is not one value per
    /// node.
    pub fn set_layer_temperature(
        &mut self,
        temperature: ArrayView2<'_, f64>,
    ) -> Result<(), ShapeError> {
        let (rows, nodes) = self.inputs.layer_temperature.dim();
        ShapeError::check("layer temperature rows", rows, temperature.nrows())?;
        ShapeError::check("layer temperature", nodes, temperature.ncols())?;
        self.inputs.layer_temperature.assign(&temperature);
        Ok(())
    }

    /// Sets the fluid temperature at the nodes, in K.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] unless there is one value per node.
    pub fn set_fluid_temperature(
        &mut self,
        temperature: ArrayView1<'_, f64>,
    ) -> Result<(), ShapeError> {
        ShapeError::check("fluid temperature", self.params.nodes, temperature.len())?;
        self.state.temperature.assign(&temperature);
        Ok(())
    }

    pub fn set_stoichiometry(&mut self, stoichiometry: f64) {
        self.inputs.stoichiometry = stoichiometry;
    }

    pub fn set_pem_type(&mut self, membrane: MembraneKind) {
        self.inputs.membrane = membrane;
    }

    /// Sets the pressure at the channel outlet, in Pa.
    pub fn set_outlet_pressure(&mut self, pressure: f64) {
        self.inputs.outlet_pressure = pressure;
    }

    /// Results of the last sweep.
    #[must_use]
    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &HalfCellConfig {
        &self.config
    }

    #[must_use]
    pub fn electrode(&self) -> Electrode {
        self.params.electrode
    }

    #[must_use]
    pub fn nodes(&self) -> usize {
        self.params.nodes
    }

    /// Node where the gas enters the channel.
    #[must_use]
    pub fn inlet_node(&self) -> usize {
        self.params.direction.inlet(self.params.nodes)
    }

    /// Node where the gas leaves the channel.
    #[must_use]
    pub fn outlet_node(&self) -> usize {
        self.params.direction.outlet(self.params.nodes)
    }

    #[must_use]
    pub fn current_density(&self) -> ArrayView1<'_, f64> {
        self.inputs.current_density.view()
    }

    #[must_use]
    pub fn water_cross_flux(&self) -> ArrayView1<'_, f64> {
        self.inputs.water_cross_flux.view()
    }

    /// Cross-flux storage, written by the owning cell, which shares the
    /// element count.
    pub(crate) fn water_cross_flux_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.inputs.water_cross_flux.view_mut()
    }

    #[must_use]
    pub fn layer_temperature(&self) -> ArrayView2<'_, f64> {
        self.inputs.layer_temperature.view()
    }

    #[must_use]
    pub fn stoichiometry(&self) -> f64 {
        self.inputs.stoichiometry
    }

    #[must_use]
    pub fn outlet_pressure(&self) -> f64 {
        self.inputs.outlet_pressure
    }

    #[must_use]
    pub fn pem_type(&self) -> MembraneKind {
        self.inputs.membrane
    }

    /// Reactant molar flow entering the channel at the current
    /// stoichiometry, mol/s.
    #[must_use]
    pub fn inlet_reactant_flow(&self) -> f64 {
        mass_balance::inlet_reactant_flow(&self.params, &self.inputs)
    }
}
