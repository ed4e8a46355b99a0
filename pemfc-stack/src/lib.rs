//! Steady-state model of a proton-exchange-membrane fuel cell stack.
//!
//! The model is layered leaves first:
//!
//! - [`HalfCellModel`] integrates one reactant channel (cathode or anode)
//!   in a single ordered sweep over its nodes and elements.
//! - [`CellModel`] pairs a cathode and an anode, adds the membrane, and
//!   derives the cell voltage and its failure flag.
//! - [`StackModel`] updates all cells in order, aggregates their boundary
//!   quantities, and drives the manifold, electrical and thermal coupling
//!   solvers.
//!
//! A converged operating point is reached by calling [`StackModel::update`]
//! repeatedly, which [`simulation::run`] does until the coupling criteria
//! fall below their tolerances.
//!
//! # Example
//!
//! ```no_run
//! use pemfc_stack::{StackConfig, StackModel, simulation};
//!
//! # fn load() -> StackConfig { unimplemented!() }
//! let config: StackConfig = load();
//! let mut stack = StackModel::with_reference_solvers(&config)?;
//! let solution = simulation::run(&mut stack, &simulation::Config::default(), ())?;
//! println!("{:?} after {} iterations", solution.status, solution.iters);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coupling;
pub mod simulation;

mod cell;
mod electrode;
mod error;
mod half_cell;
mod stack;

#[cfg(test)]
mod test_support;

pub use cell::{CellModel, LAYERS, LayerConductance, MembraneState};
pub use config::{
    CellConfig, ChannelConfig, Discretization, HalfCellConfig, LossSwitches, MembraneConfig,
    MembraneKind, StackConfig,
};
pub use electrode::{Electrode, PerElectrode};
pub use error::{ConfigError, ShapeError, StackError};
pub use half_cell::{
    ChannelState, DRY_OUT_FLOOR, HalfCellModel, MASS_TRANSPORT_SENTINEL, Species, TransportRegime,
    WaterRegime,
};
pub use stack::{CouplingCriteria, ElectrodeAggregate, StackAggregate, StackModel, UpdateOutcome};
