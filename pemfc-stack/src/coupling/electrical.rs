use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};
use pemfc_core::{
    CouplingSolver,
    constraint::{ConstraintError, StrictlyPositive},
};
use thiserror::Error;

use crate::ShapeError;

/// Relaxation factor used by [`LinearizedCoupling::default`].
const DEFAULT_RELAXATION: f64 = 0.5;

/// Per-cell electrical state gathered after the cell updates.
///
/// All arrays are `[cells, elements]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricalInput {
    /// Mean current density every cell must carry, A/m².
    pub target_current_density: f64,
    pub current_density: Array2<f64>,
    /// Electrode losses plus ohmic drop, V.
    pub voltage_loss: Array2<f64>,
    /// Linearized area-specific resistance, Ω·m².
    pub resistance: Array2<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElectricalOutput {
    /// Current density for the next update, A/m².
    pub current_density: Array2<f64>,
    /// Largest change in current density relative to the target.
    pub criterion: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElectricalError {
    #[error("relaxation factor must lie in (0, 1], got {0}")]
    Relaxation(f64),

    #[error("invalid target current density")]
    Target(#[source] ConstraintError),

    #[error("cell {cell} element {element} has resistance {value}")]
    Resistance {
        cell: usize,
        element: usize,
        value: f64,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Equalizes the voltage along each cell with a linearized loss model.
///
/// Every element is treated as `loss(i') ≈ loss(i) + r·(i' − i)`. The new
/// current density makes this loss uniform along the cell while keeping
/// its mean at the target. Negative currents are clipped and the result is
/// rescaled before under-relaxation blends it with the incoming field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearizedCoupling {
    relaxation: f64,
}

impl Default for LinearizedCoupling {
    fn default() -> Self {
        Self {
            relaxation: DEFAULT_RELAXATION,
        }
    }
}

impl LinearizedCoupling {
    /// # Errors
    ///
    /// Returns [`ElectricalError::Relaxation`] unless `0 < relaxation ≤ 1`.
    pub fn new(relaxation: f64) -> Result<Self, ElectricalError> {
        if relaxation > 0.0 && relaxation <= 1.0 {
            Ok(Self { relaxation })
        } else {
            Err(ElectricalError::Relaxation(relaxation))
        }
    }

    #[must_use]
    pub fn relaxation(&self) -> f64 {
        self.relaxation
    }

    /// Writes the relaxed current density of one cell into `out`.
    fn redistribute(
        &self,
        target: f64,
        current_density: ArrayView1<'_, f64>,
        voltage_loss: ArrayView1<'_, f64>,
        resistance: ArrayView1<'_, f64>,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        let n = current_density.len() as f64;
        let conductance_sum: f64 = resistance.iter().map(|r| 1.0 / r).sum();
        let weighted_loss: f64 = Zip::from(&voltage_loss)
            .and(&resistance)
            .fold(0.0, |acc, &v, &r| acc + v / r);
        let common_loss =
            (n * target - current_density.sum() + weighted_loss) / conductance_sum;

        Zip::from(&mut out)
            .and(&current_density)
            .and(&voltage_loss)
            .and(&resistance)
            .for_each(|new, &i, &v, &r| *new = (i + (common_loss - v) / r).max(0.0));

        let total = out.sum();
        if total > 0.0 {
            out *= n * target / total;
        } else {
            out.fill(target);
        }

        let omega = self.relaxation;
        Zip::from(&mut out)
            .and(&current_density)
            .for_each(|new, &i| *new = i + omega * (*new - i));
    }
}

impl CouplingSolver for LinearizedCoupling {
    type Input = ElectricalInput;
    type Output = ElectricalOutput;
    type Error = ElectricalError;

    fn solve(&mut self, input: &ElectricalInput) -> Result<ElectricalOutput, ElectricalError> {
        let target = input.target_current_density;
        StrictlyPositive::new(target).map_err(ElectricalError::Target)?;

        let (cells, elements) = input.current_density.dim();
        for (what, field) in [
            ("voltage loss", &input.voltage_loss),
            ("resistance", &input.resistance),
        ] {
            ShapeError::check(what, cells, field.nrows())?;
            ShapeError::check(what, elements, field.ncols())?;
        }
        if let Some(((cell, element), &value)) = input
            .resistance
            .indexed_iter()
            .find(|(_, r)| !(r.is_finite() && **r > 0.0))
        {
            return Err(ElectricalError::Resistance {
                cell,
                element,
                value,
            });
        }

        let mut current_density = Array2::zeros((cells, elements));
        for (k, out) in current_density.rows_mut().into_iter().enumerate() {
            self.redistribute(
                target,
                input.current_density.row(k),
                input.voltage_loss.row(k),
                input.resistance.row(k),
                out,
            );
        }

        let criterion = Zip::from(&current_density)
            .and(&input.current_density)
            .fold(0.0_f64, |max, &new, &old| max.max((new - old).abs()))
            / target;

        Ok(ElectricalOutput {
            current_density,
            criterion,
        })
    }
}
