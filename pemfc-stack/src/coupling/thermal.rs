use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayViewMut1, ArrayViewMut2, Zip, s};
use pemfc_core::CouplingSolver;
use pemfc_thermo::constants::ENTHALPY_OF_VAPORIZATION;
use thiserror::Error;

use crate::{Electrode, LAYERS, LayerConductance, PerElectrode, ShapeError};

/// Rows of the solved layers: cathode GDE, membrane, anode GDE.
const SOLVED_LAYERS: [usize; 3] = [1, 2, 3];

/// Heat sources and conductances of all cells.
///
/// Node arrays are `[cells, nodes]`, element arrays `[cells, elements]`.
/// Conductances and flows cover all channels of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalInput {
    /// Layer conductances of one element, identical for every cell.
    pub conductance: LayerConductance,
    /// Fluid-to-wall conductance over one node spacing, W/K.
    pub convective_conductance: PerElectrode<Array2<f64>>,
    /// Fluid heat-capacity flow, W/K.
    pub heat_capacity_flow: PerElectrode<Array2<f64>>,
    /// Condensation rate, mol/s.
    pub condensation: PerElectrode<Array2<f64>>,
    /// Electrode voltage loss, V.
    pub voltage_loss: PerElectrode<Array2<f64>>,
    /// Current of each element, A.
    pub current: Array2<f64>,
    /// Membrane resistance of each element, Ω.
    pub omega: Array2<f64>,
    /// Fluid temperature from the last cell update, K.
    pub fluid_temperature: PerElectrode<Array2<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThermalOutput {
    /// Temperature of every layer at the nodes, `[cells, layers, nodes]`, K.
    pub layer_temperature: Array3<f64>,
    /// Fluid temperature at the nodes, `[cells, nodes]`, K.
    pub fluid_temperature: PerElectrode<Array2<f64>>,
    /// Largest fluid temperature change against the input, K.
    pub criterion: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThermalError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("non-finite temperature in cell {cell} at node {node}")]
    NonFinite { cell: usize, node: usize },
}

/// Layer temperatures from a through-plane resistance network, fluid
/// temperatures marched along the channels.
///
/// Both bipolar plates are held at the coolant temperature. At each node
/// the two gas diffusion electrodes and the membrane form a chain of
/// conductances between the plates, with heat lost to the environment
/// through the exposed edges. In-plane conduction links each of these three
/// layers to itself at the neighboring nodes. Reaction and ohmic heat is released in the
/// electrodes, condensation heat in the electrode on its side, and ohmic
/// membrane heat in the membrane. Element sources are split evenly between
/// their two nodes.
///
/// Each channel is then integrated from its inlet, with the fluid relaxing
/// toward the mean of the plate and electrode temperatures on its side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallTemperatureField {
    coolant: f64,
    environment: f64,
    inlet: PerElectrode<f64>,
}

impl WallTemperatureField {
    /// All temperatures in K.
    #[must_use]
    pub fn new(coolant: f64, environment: f64, inlet: PerElectrode<f64>) -> Self {
        Self {
            coolant,
            environment,
            inlet,
        }
    }

    fn check(input: &ThermalInput) -> Result<(usize, usize), ShapeError> {
        let (cells, elements) = input.current.dim();
        let nodes = elements + 1;
        ShapeError::check("membrane resistance", elements, input.omega.ncols())?;
        ShapeError::check("membrane resistance rows", cells, input.omega.nrows())?;
        for electrode in [Electrode::Cathode, Electrode::Anode] {
            for (what, field, expected) in [
                ("convective conductance", input.convective_conductance.get(electrode), nodes),
                ("heat capacity flow", input.heat_capacity_flow.get(electrode), nodes),
                ("condensation", input.condensation.get(electrode), nodes),
                ("fluid temperature", input.fluid_temperature.get(electrode), nodes),
                ("electrode voltage loss", input.voltage_loss.get(electrode), elements),
            ] {
                ShapeError::check(what, expected, field.ncols())?;
                ShapeError::check(what, cells, field.nrows())?;
            }
        }
        Ok((cells, nodes))
    }

    /// Solves the three inner layers of one cell at every node.
    fn layers(&self, input: &ThermalInput, cell: usize, mut out: ArrayViewMut2<'_, f64>) {
        let k = &input.conductance;
        let nodes = out.ncols();
        let current = input.current.row(cell);
        let omega = input.omega.row(cell);

        // Half of each element's heat goes to each of its nodes.
        let to_nodes = |element: &dyn Fn(usize) -> f64| -> Vec<f64> {
            (0..nodes)
                .map(|j| {
                    let left = if j > 0 { element(j - 1) } else { 0.0 };
                    let right = if j + 1 < nodes { element(j) } else { 0.0 };
                    0.5 * (left + right)
                })
                .collect()
        };
        let electrode_heat = |electrode: Electrode| {
            let loss = input.voltage_loss.get(electrode).row(cell);
            let condensation = input.condensation.get(electrode).row(cell);
            let reaction = to_nodes(&|e| loss[e] * current[e]);
            (0..nodes)
                .map(|j| reaction[j] + ENTHALPY_OF_VAPORIZATION * condensation[j])
                .collect::<Vec<_>>()
        };
        let source = [
            electrode_heat(Electrode::Cathode),
            to_nodes(&|e| current[e] * current[e] * omega[e]),
            electrode_heat(Electrode::Anode),
        ];

        let plate = [2.0 * k.through_plane[1], 2.0 * k.through_plane[3]];
        let inner = [
            series(2.0 * k.through_plane[1], 2.0 * k.through_plane[2]),
            series(2.0 * k.through_plane[2], 2.0 * k.through_plane[3]),
        ];
        let environment = SOLVED_LAYERS.map(|layer| k.environment[layer]);
        let in_plane = SOLVED_LAYERS.map(|layer| k.in_plane[layer]);

        // Unknowns are ordered node by node: `index = 3·node + layer`.
        let width = SOLVED_LAYERS.len();
        let index = |node: usize, layer: usize| width * node + layer;
        let mut matrix = Array2::zeros((width * nodes, width * nodes));
        let mut rhs = Array1::zeros(width * nodes);

        for j in 0..nodes {
            let weight = if j == 0 || j + 1 == nodes { 0.5 } else { 1.0 };
            for (layer, g_plate) in [(0, plate[0]), (2, plate[1])] {
                let i = index(j, layer);
                matrix[[i, i]] += weight * g_plate;
                rhs[i] += weight * g_plate * self.coolant;
            }
            for layer in 0..width {
                let i = index(j, layer);
                matrix[[i, i]] += weight * environment[layer];
                rhs[i] += weight * environment[layer] * self.environment + source[layer][j];
            }
            couple(&mut matrix, index(j, 0), index(j, 1), weight * inner[0]);
            couple(&mut matrix, index(j, 1), index(j, 2), weight * inner[1]);
            if j + 1 < nodes {
                for layer in 0..width {
                    couple(&mut matrix, index(j, layer), index(j + 1, layer), in_plane[layer]);
                }
            }
        }
        solve_banded(matrix, &mut rhs, width);

        for j in 0..nodes {
            for (layer, &row) in SOLVED_LAYERS.iter().enumerate() {
                out[[row, j]] = rhs[index(j, layer)];
            }
        }
        out.row_mut(0).fill(self.coolant);
        out.row_mut(LAYERS.len() - 1).fill(self.coolant);
    }

    /// Marches one channel from its inlet.
    fn fluid(
        &self,
        electrode: Electrode,
        wall: ArrayView1<'_, f64>,
        conductance: ArrayView1<'_, f64>,
        heat_capacity_flow: ArrayView1<'_, f64>,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        let mut previous: Option<usize> = None;
        for j in electrode.flow_direction().nodes_downstream(wall.len()) {
            out[j] = match previous {
                None => *self.inlet.get(electrode),
                Some(p) if heat_capacity_flow[p] > 0.0 => {
                    wall[j] + (out[p] - wall[j]) * (-conductance[j] / heat_capacity_flow[p]).exp()
                }
                Some(_) => wall[j],
            };
            previous = Some(j);
        }
    }
}

impl CouplingSolver for WallTemperatureField {
    type Input = ThermalInput;
    type Output = ThermalOutput;
    type Error = ThermalError;

    fn solve(&mut self, input: &ThermalInput) -> Result<ThermalOutput, ThermalError> {
        let (cells, nodes) = Self::check(input)?;

        let mut layer_temperature = Array3::zeros((cells, LAYERS.len(), nodes));
        let mut fluid_temperature =
            PerElectrode::new(Array2::zeros((cells, nodes)), Array2::zeros((cells, nodes)));

        for cell in 0..cells {
            self.layers(input, cell, layer_temperature.slice_mut(s![cell, .., ..]));
            let layers = layer_temperature.slice(s![cell, .., ..]);
            let non_finite = layers
                .columns()
                .into_iter()
                .position(|column| column.iter().any(|t| !t.is_finite()));
            if let Some(node) = non_finite {
                return Err(ThermalError::NonFinite { cell, node });
            }

            for (electrode, rows) in [(Electrode::Cathode, [0, 1]), (Electrode::Anode, [3, 4])] {
                let wall = (&layers.row(rows[0]) + &layers.row(rows[1])) * 0.5;
                self.fluid(
                    electrode,
                    wall.view(),
                    input.convective_conductance.get(electrode).row(cell),
                    input.heat_capacity_flow.get(electrode).row(cell),
                    fluid_temperature.get_mut(electrode).row_mut(cell),
                );
            }
        }

        let mut criterion = 0.0_f64;
        for electrode in [Electrode::Cathode, Electrode::Anode] {
            Zip::from(fluid_temperature.get(electrode))
                .and(input.fluid_temperature.get(electrode))
                .for_each(|&new, &old| criterion = criterion.max((new - old).abs()));
        }

        Ok(ThermalOutput {
            layer_temperature,
            fluid_temperature,
            criterion,
        })
    }
}

/// Two conductances in series.
fn series(a: f64, b: f64) -> f64 {
    a * b / (a + b)
}

/// Adds a conductance `g` between unknowns `a` and `b`.
fn couple(matrix: &mut Array2<f64>, a: usize, b: usize, g: f64) {
    matrix[[a, a]] += g;
    matrix[[b, b]] += g;
    matrix[[a, b]] -= g;
    matrix[[b, a]] -= g;
}

/// Solves `a·x = b` by Gaussian elimination, leaving the solution in `b`.
///
/// Every nonzero of `a` lies within `band` of the diagonal, so elimination
/// never leaves the band. The conductance matrix is diagonally dominant and
/// needs no pivoting.
fn solve_banded(mut a: Array2<f64>, b: &mut Array1<f64>, band: usize) {
    let n = b.len();
    for col in 0..n {
        let last = (col + band).min(n - 1);
        let pivot = a[[col, col]];
        for r in col + 1..=last {
            let factor = a[[r, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..=last {
                a[[r, c]] -= factor * a[[col, c]];
            }
            b[r] -= factor * b[col];
        }
    }
    for i in (0..n).rev() {
        let last = (i + band).min(n - 1);
        let mut rhs = b[i];
        for j in i + 1..=last {
            rhs -= a[[i, j]] * b[j];
        }
        b[i] = rhs / a[[i, i]];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    const CELLS: usize = 2;
    const NODES: usize = 4;

    fn conductance() -> LayerConductance {
        LayerConductance {
            through_plane: [50.0, 4.0, 5.0, 4.0, 50.0],
            in_plane: [200.0, 0.5, 0.2, 0.5, 200.0],
            environment: [0.0; 5],
        }
    }

    fn input() -> ThermalInput {
        let node = |value: f64| Array2::from_elem((CELLS, NODES), value);
        let element = |value: f64| Array2::from_elem((CELLS, NODES - 1), value);
        ThermalInput {
            conductance: conductance(),
            convective_conductance: PerElectrode::new(node(0.1), node(0.1)),
            heat_capacity_flow: PerElectrode::new(node(0.05), node(0.02)),
            condensation: PerElectrode::new(node(0.0), node(0.0)),
            voltage_loss: PerElectrode::new(element(0.0), element(0.0)),
            current: element(0.0),
            omega: element(0.0),
            fluid_temperature: PerElectrode::new(node(340.0), node(340.0)),
        }
    }

    fn field() -> WallTemperatureField {
        WallTemperatureField::new(340.0, 293.15, PerElectrode::new(330.0, 350.0))
    }

    #[test]
    fn banded_solve() {
        // [2 -1 0; -1 2 -1; 0 -1 2] x = [1 0 1] has x = [1 1 1].
        let a = array![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]];
        let mut b = array![1.0, 0.0, 1.0];
        solve_banded(a, &mut b, 1);
        for &x in &b {
            assert_relative_eq!(x, 1.0, max_relative = 1e-12);
        }

        // Wider band with a coupling two rows apart.
        let a = array![[4.0, -1.0, -1.0], [-1.0, 4.0, -1.0], [-1.0, -1.0, 4.0]];
        let mut b = array![2.0, 2.0, 2.0];
        solve_banded(a, &mut b, 2);
        for &x in &b {
            assert_relative_eq!(x, 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn without_heat_the_layers_sit_at_coolant_temperature() {
        let out = field().solve(&input()).unwrap();
        assert_eq!(out.layer_temperature.dim(), (CELLS, 5, NODES));
        for &t in &out.layer_temperature {
            assert_relative_eq!(t, 340.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn membrane_heat_peaks_in_the_membrane() {
        let mut input = input();
        input.current.fill(6.0);
        input.omega.fill(0.01);
        let out = field().solve(&input).unwrap();

        // Interior node: 0.36 W into the membrane, two symmetric paths.
        let path = 1.0 / (1.0 / 8.0 + 1.0 / series(8.0, 10.0));
        let expected = 340.0 + 0.36 / (2.0 * path);
        assert_relative_eq!(out.layer_temperature[[0, 2, 1]], expected, max_relative = 1e-12);
        assert!(out.layer_temperature[[0, 1, 1]] < expected);
        assert_relative_eq!(
            out.layer_temperature[[0, 1, 1]],
            out.layer_temperature[[0, 3, 1]],
            max_relative = 1e-12
        );
    }

    #[test]
    fn in_plane_conduction_spreads_a_hot_spot() {
        let mut input = input();
        input.current.column_mut(0).fill(6.0);
        input.omega.fill(0.01);
        let spread = field().solve(&input).unwrap();
        input.conductance.in_plane = [0.0; 5];
        let isolated = field().solve(&input).unwrap();

        let membrane = |out: &ThermalOutput, node: usize| out.layer_temperature[[0, 2, node]];
        assert_relative_eq!(membrane(&isolated, 3), 340.0, max_relative = 1e-12);
        assert!(membrane(&spread, 3) > 340.0);
        assert!(membrane(&spread, 0) < membrane(&isolated, 0));

        // All of the 0.36 W still leaves through the plates.
        let k = conductance();
        let to_plates: f64 = (0..NODES)
            .map(|j| {
                let weight = if j == 0 || j + 1 == NODES { 0.5 } else { 1.0 };
                let t: ndarray::ArrayView1<f64> = spread.layer_temperature.slice(s![0, .., j]);
                let cathode = k.through_plane[1] * (t[1] - 340.0);
                let anode = k.through_plane[3] * (t[3] - 340.0);
                weight * 2.0 * (cathode + anode)
            })
            .sum();
        assert_relative_eq!(to_plates, 0.36, max_relative = 1e-9);
    }

    #[test]
    fn fluid_relaxes_toward_the_wall_from_its_inlet() {
        let out = field().solve(&input()).unwrap();
        let cathode = out.fluid_temperature.cathode.row(0);
        let anode = out.fluid_temperature.anode.row(0);

        assert_eq!(cathode[0], 330.0);
        assert_relative_eq!(cathode[1], 340.0 - 10.0 * (-2.0_f64).exp(), max_relative = 1e-12);
        assert!(cathode.windows(2).into_iter().all(|w| w[0] < w[1]));

        assert_eq!(anode[NODES - 1], 350.0);
        assert_relative_eq!(
            anode[NODES - 2],
            340.0 + 10.0 * (-5.0_f64).exp(),
            max_relative = 1e-12
        );
        assert_relative_eq!(out.criterion, 10.0, max_relative = 1e-12);
    }

    #[test]
    fn stagnant_fluid_takes_the_wall_temperature() {
        let mut input = input();
        input.heat_capacity_flow.cathode.fill(0.0);
        let out = field().solve(&input).unwrap();
        assert_eq!(out.fluid_temperature.cathode[[1, 0]], 330.0);
        assert_relative_eq!(out.fluid_temperature.cathode[[1, 1]], 340.0, max_relative = 1e-12);
    }

    #[test]
    fn rejects_mismatched_fields() {
        let mut input = input();
        input.omega = Array2::zeros((CELLS, NODES));
        assert!(matches!(field().solve(&input), Err(ThermalError::Shape(_))));
    }
}
