use std::error::Error as StdError;

use pemfc_core::constraint::ConstraintError;
use thiserror::Error;

use crate::Electrode;

/// A configuration that cannot describe a physical stack.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid `{field}`")]
    Field {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("a channel needs at least 2 nodes, got {nodes}")]
    TooFewNodes { nodes: usize },

    #[error("`{field}` must be at least 1")]
    Empty { field: &'static str },

    #[error("expected a {expected:?} half-cell, got {found:?}")]
    ElectrodeMismatch { expected: Electrode, found: Electrode },

    #[error(
        "inlet vapour pressure {vapour_pressure} Pa reaches the outlet pressure {outlet_pressure} Pa"
    )]
    SupersaturatedInlet {
        vapour_pressure: f64,
        outlet_pressure: f64,
    },
}

impl ConfigError {
    /// Wraps a constraint violation of `field`.
    pub(crate) fn field(field: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Field { field, source }
    }
}

/// A runtime input whose length does not match the discretization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("`{what}` has {found} entries, expected {expected}")]
pub struct ShapeError {
    pub what: &'static str,
    pub expected: usize,
    pub found: usize,
}

impl ShapeError {
    /// Checks that `found == expected`.
    pub(crate) fn check(what: &'static str, expected: usize, found: usize) -> Result<(), Self> {
        if found == expected {
            Ok(())
        } else {
            Err(Self {
                what,
                expected,
                found,
            })
        }
    }
}

/// Errors surfaced by [`StackModel::update`](crate::StackModel::update).
///
/// Physical infeasibility is not an error: a failing cell aborts the update
/// and is reported through [`UpdateOutcome`](crate::UpdateOutcome).
#[derive(Debug, Error)]
pub enum StackError {
    #[error("{electrode:?} manifold solver failed")]
    Manifold {
        electrode: Electrode,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("electrical coupling solver failed")]
    Electrical(#[source] Box<dyn StdError + Send + Sync>),

    #[error("thermal solver failed")]
    Thermal(#[source] Box<dyn StdError + Send + Sync>),

    #[error("coupling result does not fit the stack")]
    Shape(#[from] ShapeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_check() {
        assert!(ShapeError::check("current density", 4, 4).is_ok());
        let err = ShapeError::check("current density", 4, 3).unwrap_err();
        assert_eq!(err.to_string(), "`current density` has 3 entries, expected 4");
    }

    #[test]
    fn field_errors_keep_their_source() {
        let err = ConfigError::field("length")(ConstraintError::Zero);
        assert_eq!(err.to_string(), "invalid `length`");
        assert!(err.source().is_some());
    }
}
