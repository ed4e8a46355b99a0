use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{CellModel, Electrode, HalfCellModel, PerElectrode};

/// Boundary quantities of one electrode across all cells.
///
/// Inlet/outlet arrays are `[2, cells]` with row 0 at the channel inlet and
/// row 1 at the channel outlet. Node arrays are `[cells, nodes]`, element
/// arrays `[cells, elements]`. Flows and conductances cover all parallel
/// channels of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrodeAggregate {
    /// Gas-phase molar flow, mol/s.
    pub gas_flow: Array2<f64>,
    /// Gas plus liquid mass flow, kg/s.
    pub fluid_mass_flow: Array2<f64>,
    pub gas_mass_flow: Array2<f64>,
    pub fluid_heat_capacity: Array2<f64>,
    pub viscosity: Array2<f64>,
    pub pressure: Array2<f64>,
    pub gas_constant: Array2<f64>,
    pub temperature: Array2<f64>,

    /// Condensation rate, mol/s.
    pub condensation: Array2<f64>,
    /// Fluid-to-wall conductance, W/K.
    pub convective_conductance: Array2<f64>,
    /// Fluid heat-capacity flow, W/K.
    pub heat_capacity_flow: Array2<f64>,
    /// Fluid temperature, K.
    pub fluid_temperature: Array2<f64>,

    /// Electrode voltage loss, V.
    pub voltage_loss: Array2<f64>,
}

impl ElectrodeAggregate {
    fn zeros(cells: usize, nodes: usize) -> Self {
        let ends = || Array2::zeros((2, cells));
        let node = || Array2::zeros((cells, nodes));
        Self {
            gas_flow: ends(),
            fluid_mass_flow: ends(),
            gas_mass_flow: ends(),
            fluid_heat_capacity: ends(),
            viscosity: ends(),
            pressure: ends(),
            gas_constant: ends(),
            temperature: ends(),
            condensation: node(),
            convective_conductance: node(),
            heat_capacity_flow: node(),
            fluid_temperature: node(),
            voltage_loss: Array2::zeros((cells, nodes - 1)),
        }
    }

    fn record<P>(&mut self, cell: usize, half_cell: &HalfCellModel<P>) {
        let state = half_cell.state();
        let channels = half_cell.config().channel_count as f64;
        let ends = [half_cell.inlet_node(), half_cell.outlet_node()];

        let ends_of = |target: &mut Array2<f64>, values: ArrayView1<'_, f64>, scale: f64| {
            for (row, &node) in ends.iter().enumerate() {
                target[[row, cell]] = values[node] * scale;
            }
        };
        ends_of(&mut self.gas_flow, state.gas_flow.view(), channels);
        ends_of(&mut self.fluid_mass_flow, state.fluid_mass_flow.view(), channels);
        ends_of(&mut self.gas_mass_flow, state.gas_mass_flow.view(), channels);
        ends_of(&mut self.fluid_heat_capacity, state.fluid_heat_capacity.view(), 1.0);
        ends_of(&mut self.viscosity, state.viscosity.view(), 1.0);
        ends_of(&mut self.pressure, state.pressure.view(), 1.0);
        ends_of(&mut self.gas_constant, state.gas_constant.view(), 1.0);
        ends_of(&mut self.temperature, state.temperature.view(), 1.0);

        self.condensation
            .row_mut(cell)
            .assign(&(&state.condensation_rate * channels));
        self.convective_conductance
            .row_mut(cell)
            .assign(&(&state.convective_conductance * channels));
        self.heat_capacity_flow
            .row_mut(cell)
            .assign(&(&state.fluid_heat_capacity_flow * channels));
        self.fluid_temperature.row_mut(cell).assign(&state.temperature);
        self.voltage_loss.row_mut(cell).assign(&state.voltage_loss);
    }
}

/// Stack-wide fields gathered from all cells after the per-cell phase.
///
/// Rebuilt from scratch on every stack update. Element arrays are
/// `[cells, elements]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackAggregate {
    pub electrodes: PerElectrode<ElectrodeAggregate>,
    /// Current density, A/m².
    pub current_density: Array2<f64>,
    /// Current of each element, A.
    pub current: Array2<f64>,
    /// Cell voltage, V.
    pub voltage: Array2<f64>,
    /// Electrode losses plus ohmic drop, V.
    pub voltage_loss: Array2<f64>,
    /// Linearized area-specific resistance, Ω·m².
    pub resistance: Array2<f64>,
    /// Membrane resistance, Ω.
    pub omega: Array2<f64>,
}

impl StackAggregate {
    pub(crate) fn zeros(cells: usize, nodes: usize) -> Self {
        let element = || Array2::zeros((cells, nodes - 1));
        Self {
            electrodes: PerElectrode::new(
                ElectrodeAggregate::zeros(cells, nodes),
                ElectrodeAggregate::zeros(cells, nodes),
            ),
            current_density: element(),
            current: element(),
            voltage: element(),
            voltage_loss: element(),
            resistance: element(),
            omega: element(),
        }
    }

    /// Gathers the boundary quantities of `cells`, in index order.
    pub(crate) fn collect<P>(cells: &[CellModel<P>], nodes: usize) -> Self {
        let mut aggregate = Self::zeros(cells.len(), nodes);
        for (k, cell) in cells.iter().enumerate() {
            for electrode in [Electrode::Cathode, Electrode::Anode] {
                aggregate
                    .electrodes
                    .get_mut(electrode)
                    .record(k, cell.half_cell(electrode));
            }
            aggregate.current_density.row_mut(k).assign(&cell.current_density());
            aggregate
                .current
                .row_mut(k)
                .assign(&(&cell.current_density() * cell.element_area()));
            aggregate.voltage.row_mut(k).assign(&cell.voltage());
            aggregate.voltage_loss.row_mut(k).assign(&cell.voltage_loss());
            aggregate.resistance.row_mut(k).assign(&cell.resistance());
            aggregate.omega.row_mut(k).assign(&cell.omega());
        }
        aggregate
    }

    #[must_use]
    pub fn cells(&self) -> usize {
        self.voltage.nrows()
    }

    /// Mean voltage of each cell, V.
    #[must_use]
    pub fn cell_voltage(&self) -> Array1<f64> {
        self.voltage
            .mean_axis(Axis(1))
            .unwrap_or_else(|| Array1::zeros(self.cells()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use pemfc_thermo::FittedGasProperties;

    use crate::{MembraneKind, test_support};

    fn cells(count: usize) -> Vec<CellModel<FittedGasProperties>> {
        (0..count)
            .map(|_| {
                let mut cell = CellModel::new(
                    &test_support::cell(MembraneKind::HighTemperature),
                    &test_support::discretization(),
                    PerElectrode::new(2.0, 1.5),
                    5.0,
                    FittedGasProperties,
                )
                .unwrap();
                cell.update();
                cell
            })
            .collect()
    }

    #[test]
    fn rows_follow_flow_direction() {
        let cells = cells(2);
        let aggregate = StackAggregate::collect(&cells, test_support::NODES);
        let cathode = &aggregate.electrodes.cathode;
        let anode = &aggregate.electrodes.anode;

        // Cathode gas enters at node 0, anode gas at the last node.
        let ca = cells[0].cathode().state();
        let an = cells[0].anode().state();
        assert_relative_eq!(cathode.pressure[[0, 0]], ca.pressure[0]);
        assert_relative_eq!(cathode.pressure[[1, 0]], ca.pressure[10]);
        assert_relative_eq!(anode.pressure[[0, 1]], an.pressure[10]);
        assert_relative_eq!(anode.pressure[[1, 1]], an.pressure[0]);
        assert!(cathode.pressure[[0, 0]] > cathode.pressure[[1, 0]]);
    }

    #[test]
    fn flows_cover_all_channels() {
        let cells = cells(1);
        let aggregate = StackAggregate::collect(&cells, test_support::NODES);
        let state = cells[0].cathode().state();
        assert_relative_eq!(
            aggregate.electrodes.cathode.gas_flow[[0, 0]],
            10.0 * state.gas_flow[0],
            max_relative = 1e-12
        );
        assert_relative_eq!(
            aggregate.electrodes.cathode.convective_conductance[[0, 3]],
            10.0 * state.convective_conductance[3],
            max_relative = 1e-12
        );
        assert_relative_eq!(aggregate.current[[0, 0]], 6000.0 * 1.0e-3, max_relative = 1e-12);
        assert_eq!(aggregate.voltage.row(0), cells[0].voltage());
    }
}
