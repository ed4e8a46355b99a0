//! Stack-wide collaborators and the data they exchange with the stack.
//!
//! The stack owns one solver per coupling domain and calls it through the
//! [`CouplingSolver`] contract once per update. Each `*Input` is built from
//! the freshly aggregated cell quantities and each `*Output` carries the
//! redistributed field together with the solver's convergence criterion.
//!
//! The solvers in this module are simple reference implementations. Any
//! other type implementing [`CouplingSolver`] with the same input and output
//! types can be plugged into a [`StackModel`](crate::StackModel).

mod electrical;
mod manifold;
mod thermal;

pub use electrical::{ElectricalError, ElectricalInput, ElectricalOutput, LinearizedCoupling};
pub use manifold::{ManifoldError, ManifoldInput, ManifoldOutput, ParallelChannelManifold};
pub use pemfc_core::CouplingSolver;
pub use thermal::{ThermalError, ThermalInput, ThermalOutput, WallTemperatureField};
