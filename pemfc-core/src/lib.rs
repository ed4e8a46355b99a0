//! Numerical building blocks shared by the PEM fuel cell stack model.
//!
//! Nothing in this crate knows about electrochemistry.
//! It provides type-level numeric constraints for validating configuration,
//! the node/element discretization used along a reactant channel, the
//! call contract implemented by the stack's coupling solvers, and the
//! observer hook of iterative drivers.

pub mod constraint;
pub mod coupling;
pub mod discretize;
pub mod observe;

pub use coupling::CouplingSolver;
pub use discretize::FlowDirection;
pub use observe::Observer;
