use ndarray::{Array1, Zip};
use pemfc_core::CouplingSolver;
use thiserror::Error;

use crate::{Electrode, ElectrodeAggregate};

/// Boundary quantities of one electrode's channels, handed to the manifold.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifoldInput {
    pub electrode: Electrode,
    /// Stoichiometry of the header feeding all cells.
    pub header_stoichiometry: f64,
    /// Pressure at the outlet header, Pa.
    pub header_outlet_pressure: f64,
    pub boundary: ElectrodeAggregate,
}

/// Per-cell inlet conditions proposed by the manifold.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifoldOutput {
    pub stoichiometry: Array1<f64>,
    /// Channel outlet pressure of each cell, Pa.
    pub outlet_pressure: Array1<f64>,
    /// Largest relative stoichiometry change since the previous call.
    pub criterion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ManifoldError {
    #[error("the manifold feeds no cells")]
    NoCells,

    #[error("cell {cell} has hydraulic conductance {value}")]
    Conductance { cell: usize, value: f64 },
}

/// Parallel channels between two ideal headers.
///
/// Each cell is treated as a linear hydraulic resistance: the ratio of its
/// inlet gas flow to its channel pressure drop. The header flow is split in
/// proportion to these conductances, so cells with a lower pressure drop
/// receive more reactant. Both headers are lossless, so every channel
/// discharges at the header outlet pressure.
#[derive(Debug, Clone, Default)]
pub struct ParallelChannelManifold {
    previous: Option<Array1<f64>>,
}

impl ParallelChannelManifold {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CouplingSolver for ParallelChannelManifold {
    type Input = ManifoldInput;
    type Output = ManifoldOutput;
    type Error = ManifoldError;

    fn solve(&mut self, input: &ManifoldInput) -> Result<ManifoldOutput, ManifoldError> {
        let boundary = &input.boundary;
        let cells = boundary.gas_flow.ncols();
        if cells == 0 {
            return Err(ManifoldError::NoCells);
        }

        let conductance = Zip::from(boundary.gas_flow.row(0))
            .and(boundary.pressure.row(0))
            .and(boundary.pressure.row(1))
            .map_collect(|&flow, &p_in, &p_out| flow / (p_in - p_out));
        if let Some((cell, &value)) = conductance
            .iter()
            .enumerate()
            .find(|(_, g)| !(g.is_finite() && **g > 0.0))
        {
            return Err(ManifoldError::Conductance { cell, value });
        }

        let scale = input.header_stoichiometry * cells as f64 / conductance.sum();
        let stoichiometry = conductance.mapv(|g| g * scale);

        let previous = match self.previous.take() {
            Some(previous) if previous.len() == cells => previous,
            _ => Array1::from_elem(cells, input.header_stoichiometry),
        };
        let criterion = Zip::from(&stoichiometry)
            .and(&previous)
            .fold(0.0_f64, |max, &new, &old| max.max(((new - old) / old).abs()));
        self.previous = Some(stoichiometry.clone());

        Ok(ManifoldOutput {
            stoichiometry,
            outlet_pressure: Array1::from_elem(cells, input.header_outlet_pressure),
            criterion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    /// Boundary of cells with the given inlet flows and channel pressure
    /// drops.
    fn input(flows: &[f64], drops: &[f64]) -> ManifoldInput {
        let cells = flows.len();
        let zeros = || Array2::zeros((2, cells));
        let nodes = || Array2::zeros((cells, 3));
        let mut pressure = Array2::from_elem((2, cells), 101_325.0);
        let mut gas_flow = zeros();
        for k in 0..cells {
            pressure[[0, k]] += drops[k];
            gas_flow[[0, k]] = flows[k];
        }
        ManifoldInput {
            electrode: Electrode::Cathode,
            header_stoichiometry: 2.0,
            header_outlet_pressure: 101_325.0,
            boundary: ElectrodeAggregate {
                gas_flow,
                fluid_mass_flow: zeros(),
                gas_mass_flow: zeros(),
                fluid_heat_capacity: zeros(),
                viscosity: zeros(),
                pressure,
                gas_constant: zeros(),
                temperature: zeros(),
                condensation: nodes(),
                convective_conductance: nodes(),
                heat_capacity_flow: nodes(),
                fluid_temperature: nodes(),
                voltage_loss: Array2::zeros((cells, 2)),
            },
        }
    }

    #[test]
    fn identical_channels_share_evenly() {
        let mut manifold = ParallelChannelManifold::new();
        let out = manifold.solve(&input(&[1.0e-3; 3], &[1000.0; 3])).unwrap();
        for &s in &out.stoichiometry {
            assert_relative_eq!(s, 2.0, max_relative = 1e-12);
        }
        assert_eq!(out.outlet_pressure, array![101_325.0, 101_325.0, 101_325.0]);
        assert!(out.criterion < 1e-12);
    }

    #[test]
    fn open_channels_take_more_flow() {
        let mut manifold = ParallelChannelManifold::new();
        let out = manifold
            .solve(&input(&[1.0e-3, 1.0e-3], &[1000.0, 3000.0]))
            .unwrap();
        assert_relative_eq!(out.stoichiometry[0], 3.0, max_relative = 1e-12);
        assert_relative_eq!(out.stoichiometry[1], 1.0, max_relative = 1e-12);
        assert_relative_eq!(out.stoichiometry.mean().unwrap(), 2.0, max_relative = 1e-12);
        assert_relative_eq!(out.criterion, 0.5, max_relative = 1e-12);

        // The criterion is measured against the previous call.
        let again = manifold
            .solve(&input(&[1.0e-3, 1.0e-3], &[1000.0, 3000.0]))
            .unwrap();
        assert_eq!(again.criterion, 0.0);
    }

    #[test]
    fn rejects_channels_without_pressure_drop() {
        let mut manifold = ParallelChannelManifold::new();
        let err = manifold
            .solve(&input(&[1.0e-3, 1.0e-3], &[1000.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, ManifoldError::Conductance { cell: 1, .. }));
        assert!(matches!(
            manifold.solve(&input(&[], &[])),
            Err(ManifoldError::NoCells)
        ));
    }
}
