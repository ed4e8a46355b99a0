//! Gas and water property modeling for PEM fuel cell channels.
//!
//! The channel solver only needs a handful of pure functions of temperature
//! and pressure: heat capacity, viscosity and thermal conductivity of each
//! gas, and the saturation pressure of water.
//! These are defined by the [`GasPropertyProvider`] trait; the
//! [`FittedGasProperties`] provider implements it with standard correlations.

pub mod constants;
pub mod mixture;
pub mod units;

mod fitted;
mod gas;
mod provider;

pub use fitted::FittedGasProperties;
pub use gas::Gas;
pub use provider::GasPropertyProvider;
