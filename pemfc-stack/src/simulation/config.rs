use crate::CouplingCriteria;

/// Iteration limit and tolerances of the outer fixed-point loop.
///
/// A criterion counts as converged when it is at or below its tolerance.
/// Phases that did not run report no criterion and never hold the loop
/// back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_iters: usize,
    /// Largest relative stoichiometry change between updates.
    pub manifold_tol: f64,
    /// Largest current density change relative to the target.
    pub electrical_tol: f64,
    /// Largest fluid temperature change, K.
    pub thermal_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 200,
            manifold_tol: 1e-4,
            electrical_tol: 1e-5,
            thermal_tol: 1e-3,
        }
    }
}

impl Config {
    /// Checks that every tolerance is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid tolerance.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.manifold_tol.is_finite() || self.manifold_tol < 0.0 {
            return Err("manifold_tol must be finite and non-negative");
        }
        if !self.electrical_tol.is_finite() || self.electrical_tol < 0.0 {
            return Err("electrical_tol must be finite and non-negative");
        }
        if !self.thermal_tol.is_finite() || self.thermal_tol < 0.0 {
            return Err("thermal_tol must be finite and non-negative");
        }
        Ok(())
    }

    /// Whether every reported criterion is within its tolerance.
    #[must_use]
    pub fn is_converged(&self, criteria: &CouplingCriteria) -> bool {
        let within = |criterion: Option<f64>, tol: f64| criterion.is_none_or(|c| c <= tol);
        within(criteria.cathode_manifold, self.manifold_tol)
            && within(criteria.anode_manifold, self.manifold_tol)
            && within(criteria.electrical, self.electrical_tol)
            && within(criteria.thermal, self.thermal_tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_or_nan_tolerances() {
        assert!(Config::default().validate().is_ok());
        let config = Config {
            thermal_tol: -1.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err("thermal_tol must be finite and non-negative"));
        let config = Config {
            electrical_tol: f64::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_criteria_do_not_block_convergence() {
        let config = Config::default();
        assert!(config.is_converged(&CouplingCriteria::default()));

        let criteria = CouplingCriteria {
            electrical: Some(1e-6),
            thermal: Some(0.5),
            ..CouplingCriteria::default()
        };
        assert!(!config.is_converged(&criteria));
        assert!(config.is_converged(&CouplingCriteria {
            thermal: Some(1e-3),
            ..criteria
        }));
    }
}
