//! Cells in series, coupled through the manifolds, the current collectors
//! and the temperature field.

mod aggregate;

pub use aggregate::{ElectrodeAggregate, StackAggregate};

use log::{debug, warn};
use ndarray::{Array2, ArrayView2, s};
use pemfc_core::CouplingSolver;
use pemfc_thermo::{FittedGasProperties, GasPropertyProvider};
use uom::si::{
    heat_transfer::watt_per_square_meter_kelvin, pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::{
    CellModel, ConfigError, Electrode, LAYERS, PerElectrode, ShapeError, StackConfig, StackError,
    coupling::{
        ElectricalInput, ElectricalOutput, LinearizedCoupling, ManifoldInput, ManifoldOutput,
        ParallelChannelManifold, ThermalInput, ThermalOutput, WallTemperatureField,
    },
};

/// Convergence criteria reported by the coupling solvers in one update.
///
/// A criterion is `None` when its phase did not run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CouplingCriteria {
    pub cathode_manifold: Option<f64>,
    pub anode_manifold: Option<f64>,
    pub electrical: Option<f64>,
    pub thermal: Option<f64>,
}

impl CouplingCriteria {
    #[must_use]
    pub fn manifold(&self, electrode: Electrode) -> Option<f64> {
        match electrode {
            Electrode::Cathode => self.cathode_manifold,
            Electrode::Anode => self.anode_manifold,
        }
    }

    fn manifold_mut(&mut self, electrode: Electrode) -> &mut Option<f64> {
        match electrode {
            Electrode::Cathode => &mut self.cathode_manifold,
            Electrode::Anode => &mut self.anode_manifold,
        }
    }
}

/// How a call to [`StackModel::update`] ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateOutcome {
    /// Every cell was updated and the enabled coupling phases ran.
    Completed { criteria: CouplingCriteria },
    /// A cell produced a non-positive voltage.
    ///
    /// Cells after `failed_cell` were not updated in this call, and the
    /// aggregate and coupling fields still hold the values of the last
    /// completed update.
    Aborted { failed_cell: usize },
}

/// A stack of identical cells and the solvers that couple them.
///
/// The manifolds `M` redistribute reactant flow across cells, the
/// electrical solver `E` redistributes current density, and the thermal
/// solver `T` returns the layer and fluid temperatures. Each call to
/// [`update`](Self::update) runs every phase once; repeated calls move the
/// stack toward a consistent operating point.
#[derive(Debug, Clone)]
pub struct StackModel<
    P,
    M = ParallelChannelManifold,
    E = LinearizedCoupling,
    T = WallTemperatureField,
> {
    config: StackConfig,
    cells: Vec<CellModel<P>>,
    manifolds: PerElectrode<M>,
    electrical: E,
    thermal: T,
    aggregate: StackAggregate,
    current_density: Array2<f64>,
    previous_current_density: Array2<f64>,
    criteria: CouplingCriteria,
}

impl StackModel<FittedGasProperties> {
    /// Creates a stack with the fitted gas properties and the reference
    /// coupling solvers.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_reference_solvers(config: &StackConfig) -> Result<Self, ConfigError> {
        let inlet = PerElectrode::new(
            config.cell.cathode.channel.inlet_temperature.get::<kelvin>(),
            config.cell.anode.channel.inlet_temperature.get::<kelvin>(),
        );
        let thermal = WallTemperatureField::new(
            config.coolant_temperature.get::<kelvin>(),
            config.environment_temperature.get::<kelvin>(),
            inlet,
        );
        Self::new(
            config,
            FittedGasProperties,
            PerElectrode::new(ParallelChannelManifold::new(), ParallelChannelManifold::new()),
            LinearizedCoupling::default(),
            thermal,
        )
    }
}

impl<P, M, E, T> StackModel<P, M, E, T>
where
    P: GasPropertyProvider + Clone,
    M: CouplingSolver<Input = ManifoldInput, Output = ManifoldOutput>,
    E: CouplingSolver<Input = ElectricalInput, Output = ElectricalOutput>,
    T: CouplingSolver<Input = ThermalInput, Output = ThermalOutput>,
{
    /// Creates `config.cell_count` cells at the header stoichiometries,
    /// all carrying the target current density.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(
        config: &StackConfig,
        provider: P,
        manifolds: PerElectrode<M>,
        electrical: E,
        thermal: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let stoichiometry =
            PerElectrode::new(config.cathode_stoichiometry, config.anode_stoichiometry);
        let environment = config
            .environment_heat_transfer
            .get::<watt_per_square_meter_kelvin>();
        let cells = (0..config.cell_count)
            .map(|_| {
                CellModel::new(
                    &config.cell,
                    &config.discretization,
                    stoichiometry,
                    environment,
                    provider.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let discretization = &config.discretization;
        let current_density = Array2::from_elem(
            (config.cell_count, discretization.elements()),
            discretization.target(),
        );

        Ok(Self {
            config: *config,
            cells,
            manifolds,
            electrical,
            thermal,
            aggregate: StackAggregate::zeros(config.cell_count, discretization.nodes),
            previous_current_density: current_density.clone(),
            current_density,
            criteria: CouplingCriteria::default(),
        })
    }

    /// Runs one pass over the cells and the enabled coupling phases.
    ///
    /// Cells are updated in index order. The first failing cell aborts the
    /// call: later cells keep their previous state and no aggregation or
    /// coupling takes place.
    ///
    /// # Errors
    ///
    /// Returns a [`StackError`] if a coupling solver fails or returns a
    /// field that does not fit the stack.
    pub fn update(&mut self) -> Result<UpdateOutcome, StackError> {
        self.criteria = CouplingCriteria::default();

        for (k, cell) in self.cells.iter_mut().enumerate() {
            cell.set_current_density(self.current_density.row(k))?;
            cell.update();
            if cell.failed() {
                warn!("cell {k} has a non-positive voltage, aborting the stack update");
                return Ok(UpdateOutcome::Aborted { failed_cell: k });
            }
        }
        self.aggregate = StackAggregate::collect(&self.cells, self.config.discretization.nodes);

        let switches = self.config.coupling;
        if switches.flow_distribution && self.cells.len() > 1 {
            for electrode in [Electrode::Cathode, Electrode::Anode] {
                self.distribute_flow(electrode)?;
            }
        }
        self.previous_current_density.assign(&self.current_density);
        if switches.current_density {
            self.redistribute_current()?;
        }
        if switches.temperature {
            self.solve_temperature()?;
        }

        Ok(UpdateOutcome::Completed {
            criteria: self.criteria,
        })
    }

    fn distribute_flow(&mut self, electrode: Electrode) -> Result<(), StackError> {
        let header = self.config.cell.half_cell(electrode);
        let input = ManifoldInput {
            electrode,
            header_stoichiometry: match electrode {
                Electrode::Cathode => self.config.cathode_stoichiometry,
                Electrode::Anode => self.config.anode_stoichiometry,
            },
            header_outlet_pressure: header.channel.outlet_pressure.get::<pascal>(),
            boundary: self.aggregate.electrodes.get(electrode).clone(),
        };
        let output = self
            .manifolds
            .get_mut(electrode)
            .solve(&input)
            .map_err(|source| StackError::Manifold {
                electrode,
                source: Box::new(source),
            })?;

        let cells = self.cells.len();
        ShapeError::check("manifold stoichiometry", cells, output.stoichiometry.len())?;
        ShapeError::check("manifold outlet pressure", cells, output.outlet_pressure.len())?;
        for (cell, (&stoichiometry, &pressure)) in self
            .cells
            .iter_mut()
            .zip(output.stoichiometry.iter().zip(&output.outlet_pressure))
        {
            cell.set_stoichiometry(electrode, stoichiometry);
            cell.set_outlet_pressure(electrode, pressure);
        }

        debug!("{electrode:?} manifold criterion {:.3e}", output.criterion);
        *self.criteria.manifold_mut(electrode) = Some(output.criterion);
        Ok(())
    }

    fn redistribute_current(&mut self) -> Result<(), StackError> {
        let input = ElectricalInput {
            target_current_density: self.config.discretization.target(),
            current_density: self.current_density.clone(),
            voltage_loss: self.aggregate.voltage_loss.clone(),
            resistance: self.aggregate.resistance.clone(),
        };
        let output = self
            .electrical
            .solve(&input)
            .map_err(|source| StackError::Electrical(Box::new(source)))?;

        let (cells, elements) = self.current_density.dim();
        ShapeError::check("current density rows", cells, output.current_density.nrows())?;
        ShapeError::check("current density", elements, output.current_density.ncols())?;
        self.current_density = output.current_density;

        debug!("electrical criterion {:.3e}", output.criterion);
        self.criteria.electrical = Some(output.criterion);
        Ok(())
    }

    fn solve_temperature(&mut self) -> Result<(), StackError> {
        let Some(conductance) = self.cells.first().map(|cell| *cell.conductance()) else {
            return Ok(());
        };
        let electrodes = self.aggregate.electrodes.each_ref();
        let input = ThermalInput {
            conductance,
            convective_conductance: electrodes.map(|_, e| e.convective_conductance.clone()),
            heat_capacity_flow: electrodes.map(|_, e| e.heat_capacity_flow.clone()),
            condensation: electrodes.map(|_, e| e.condensation.clone()),
            voltage_loss: electrodes.map(|_, e| e.voltage_loss.clone()),
            current: self.aggregate.current.clone(),
            omega: self.aggregate.omega.clone(),
            fluid_temperature: electrodes.map(|_, e| e.fluid_temperature.clone()),
        };
        let output = self
            .thermal
            .solve(&input)
            .map_err(|source| StackError::Thermal(Box::new(source)))?;

        let cells = self.cells.len();
        let (found_cells, layers, _) = output.layer_temperature.dim();
        ShapeError::check("layer temperature cells", cells, found_cells)?;
        ShapeError::check("layer temperature layers", LAYERS.len(), layers)?;
        for fluid in [&output.fluid_temperature.cathode, &output.fluid_temperature.anode] {
            ShapeError::check("fluid temperature rows", cells, fluid.nrows())?;
        }
        for (k, cell) in self.cells.iter_mut().enumerate() {
            cell.set_layer_temperature(output.layer_temperature.slice(s![k, .., ..]))?;
            for electrode in [Electrode::Cathode, Electrode::Anode] {
                let fluid = output.fluid_temperature.get(electrode).row(k);
                cell.set_fluid_temperature(electrode, fluid)?;
            }
        }

        debug!("thermal criterion {:.3e} K", output.criterion);
        self.criteria.thermal = Some(output.criterion);
        Ok(())
    }
}

impl<P, M, E, T> StackModel<P, M, E, T> {
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    #[must_use]
    pub fn cells(&self) -> &[CellModel<P>] {
        &self.cells
    }

    /// Cell `index`, if the stack has one.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&CellModel<P>> {
        self.cells.get(index)
    }

    /// Quantities gathered by the last completed update.
    #[must_use]
    pub fn aggregate(&self) -> &StackAggregate {
        &self.aggregate
    }

    /// Current density the cells carry in the next update, `[cells, elements]`.
    #[must_use]
    pub fn current_density(&self) -> ArrayView2<'_, f64> {
        self.current_density.view()
    }

    /// Current density the cells carried before the last electrical
    /// coupling.
    #[must_use]
    pub fn previous_current_density(&self) -> ArrayView2<'_, f64> {
        self.previous_current_density.view()
    }

    /// Criteria reported during the last update.
    #[must_use]
    pub fn criteria(&self) -> CouplingCriteria {
        self.criteria
    }

    #[must_use]
    pub fn manifold(&self, electrode: Electrode) -> &M {
        self.manifolds.get(electrode)
    }

    #[must_use]
    pub fn electrical(&self) -> &E {
        &self.electrical
    }

    #[must_use]
    pub fn thermal(&self) -> &T {
        &self.thermal
    }
}
