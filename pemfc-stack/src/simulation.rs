//! Repeated stack updates until the coupling solvers agree.
//!
//! [`StackModel::update`] runs each coupling phase once. [`run`] calls it
//! until the criteria reported by the enabled phases are all within the
//! tolerances of a [`Config`], the iteration limit is reached, or a cell
//! fails.

mod config;
mod error;
mod solution;

pub use config::Config;
pub use error::Error;
pub use solution::{Solution, Status};

use log::debug;
use pemfc_core::{CouplingSolver, Observer};
use pemfc_thermo::GasPropertyProvider;

use crate::{
    CouplingCriteria, StackModel, UpdateOutcome,
    coupling::{
        ElectricalInput, ElectricalOutput, ManifoldInput, ManifoldOutput, ThermalInput,
        ThermalOutput,
    },
};

/// Control actions an observer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration.
    StopEarly,
}

/// Emitted after every completed stack update.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Iteration counter, starting at 1.
    pub iter: usize,
    pub criteria: &'a CouplingCriteria,
}

/// Updates `stack` until it converges.
///
/// The observer sees the criteria of every completed update before the
/// convergence check.
///
/// # Errors
///
/// Returns an error if the config is invalid or a stack update fails.
pub fn run<P, M, E, T, Obs>(
    stack: &mut StackModel<P, M, E, T>,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    P: GasPropertyProvider + Clone,
    M: CouplingSolver<Input = ManifoldInput, Output = ManifoldOutput>,
    E: CouplingSolver<Input = ElectricalInput, Output = ElectricalOutput>,
    T: CouplingSolver<Input = ThermalInput, Output = ThermalOutput>,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let mut criteria = CouplingCriteria::default();
    for iter in 1..=config.max_iters {
        criteria = match stack.update()? {
            UpdateOutcome::Completed { criteria } => criteria,
            UpdateOutcome::Aborted { failed_cell } => {
                return Ok(Solution {
                    status: Status::Aborted { cell: failed_cell },
                    iters: iter,
                    criteria,
                });
            }
        };
        debug!(
            "iteration {iter}: manifold {:?}/{:?}, electrical {:?}, thermal {:?}",
            criteria.cathode_manifold,
            criteria.anode_manifold,
            criteria.electrical,
            criteria.thermal
        );

        let event = Event {
            iter,
            criteria: &criteria,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                iters: iter,
                criteria,
            });
        }

        if config.is_converged(&criteria) {
            return Ok(Solution {
                status: Status::Converged,
                iters: iter,
                criteria,
            });
        }
    }

    Ok(Solution {
        status: Status::MaxIters,
        iters: config.max_iters,
        criteria,
    })
}
