//! A membrane electrode assembly between two bipolar half plates.

mod membrane;

pub use membrane::MembraneState;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip, s};
use pemfc_core::discretize::node_to_element;
use pemfc_thermo::{GasPropertyProvider, constants::REFERENCE_TEMPERATURE};
use uom::si::{
    area::square_meter, electric_potential::volt, electrical_conductivity::siemens_per_meter,
    electrical_resistivity::ohm_meter, length::meter, thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::{
    CellConfig, ConfigError, Discretization, Electrode, HalfCellModel, PerElectrode, ShapeError,
    config::LayerConductivity, half_cell::layer_count,
};

/// Temperature coefficient of the open-circuit voltage, V/K.
const OCV_TEMPERATURE_COEFFICIENT: f64 = 8.5e-4;

/// Cell layers from the cathode plate to the anode plate.
///
/// Per-layer arrays of a cell have one row per layer in this order.
pub const LAYERS: [&str; 5] = [
    "cathode plate",
    "cathode gde",
    "membrane",
    "anode gde",
    "anode plate",
];

/// Row of the membrane in the layer arrays.
pub(crate) const MEMBRANE_LAYER: usize = 2;

/// Thermal conductances of the cell layers for one element, W/K.
///
/// Each array is ordered like [`LAYERS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConductance {
    /// Through the thickness of each layer.
    pub through_plane: [f64; 5],
    /// Along the channel, over one node spacing.
    pub in_plane: [f64; 5],
    /// From the exposed layer edges to the environment.
    pub environment: [f64; 5],
}

impl LayerConductance {
    fn new(
        config: &CellConfig,
        discretization: &Discretization,
        environment_heat_transfer: f64,
    ) -> Self {
        let elements = discretization.elements() as f64;
        let cathode = &config.cathode;
        let width = cathode.cell_width.get::<meter>();
        let length = cathode.cell_length.get::<meter>();
        let area_dx = width * length / elements;
        let dx = length / elements;

        let thickness = [
            cathode.bpp_thickness,
            cathode.gde_thickness(),
            config.membrane.thickness,
            config.anode.gde_thickness(),
            config.anode.bpp_thickness,
        ]
        .map(|th| th.get::<meter>());
        let thermal = &config.thermal;
        let conductivity: [LayerConductivity; 5] = [
            thermal.bipolar_plate,
            thermal.gde,
            thermal.membrane,
            thermal.gde,
            thermal.bipolar_plate,
        ];

        let perimeter = 2.0 * (width + length);
        Self {
            through_plane: std::array::from_fn(|k| {
                conductivity[k].through_plane.get::<watt_per_meter_kelvin>() * area_dx
                    / thickness[k]
            }),
            in_plane: std::array::from_fn(|k| {
                conductivity[k].in_plane.get::<watt_per_meter_kelvin>() * thickness[k] * width / dx
            }),
            environment: thickness
                .map(|th| environment_heat_transfer * perimeter * th / elements),
        }
    }
}

/// One cell: a cathode and an anode channel separated by the membrane.
///
/// The cell owns the layer temperatures and hands each half-cell the rows
/// on its side: the cathode gets its plate, its electrode and the membrane,
/// the anode gets its electrode and its plate.
#[derive(Debug, Clone)]
pub struct CellModel<P> {
    config: CellConfig,
    half_cells: PerElectrode<HalfCellModel<P>>,
    membrane: MembraneState,
    conductance: LayerConductance,
    /// Active area of one element, m².
    area_dx: f64,
    layer_temperature: Array2<f64>,
    open_circuit_voltage: Array1<f64>,
    ohmic_resistance: Array1<f64>,
    voltage_loss: Array1<f64>,
    voltage: Array1<f64>,
    resistance: Array1<f64>,
    omega: Array1<f64>,
    failed: bool,
}

impl<P: GasPropertyProvider + Clone> CellModel<P> {
    /// Creates a cell at the cathode inlet temperature.
    ///
    /// `environment_heat_transfer` is the convection coefficient to the
    /// surroundings in W/(m²·K).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the cell configuration is invalid or
    /// either half-cell cannot be built.
    pub fn new(
        config: &CellConfig,
        discretization: &Discretization,
        stoichiometry: PerElectrode<f64>,
        environment_heat_transfer: f64,
        provider: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut cathode = HalfCellModel::new(
            &config.cathode,
            discretization,
            stoichiometry.cathode,
            provider.clone(),
        )?;
        let mut anode =
            HalfCellModel::new(&config.anode, discretization, stoichiometry.anode, provider)?;
        for half_cell in [&mut cathode, &mut anode] {
            half_cell.set_pem_type(config.membrane.kind);
        }

        let nodes = discretization.nodes;
        let elements = discretization.elements();
        let temperature = config.cathode.channel.inlet_temperature.get::<kelvin>();
        let area_dx = (config.cathode.cell_width * config.cathode.cell_length).get::<square_meter>()
            / elements as f64;

        Ok(Self {
            config: *config,
            half_cells: PerElectrode::new(cathode, anode),
            membrane: MembraneState::new(config.membrane.kind, elements, temperature),
            conductance: LayerConductance::new(config, discretization, environment_heat_transfer),
            area_dx,
            layer_temperature: Array2::from_elem((LAYERS.len(), nodes), temperature),
            open_circuit_voltage: Array1::zeros(elements),
            ohmic_resistance: Array1::zeros(elements),
            voltage_loss: Array1::zeros(elements),
            voltage: Array1::zeros(elements),
            resistance: Array1::zeros(elements),
            omega: Array1::zeros(elements),
            failed: false,
        })
    }

    /// Updates both half-cells, the membrane and the cell voltage.
    ///
    /// The water cross-flux computed here is fed to the half-cells on the
    /// next update.
    pub fn update(&mut self) {
        let PerElectrode { cathode, anode } = &mut self.half_cells;
        cathode.update();
        anode.update();

        self.membrane.temperature = node_to_element(self.layer_temperature.row(MEMBRANE_LAYER));
        let humidity = [&*cathode, &*anode].map(|h| node_to_element(h.state().humidity.view()));
        let current_density = cathode.current_density().to_owned();
        membrane::update(
            &self.config.membrane,
            [&humidity[0], &humidity[1]],
            &current_density,
            &mut self.membrane,
        );
        for half_cell in [&mut *cathode, &mut *anode] {
            half_cell
                .water_cross_flux_mut()
                .assign(&self.membrane.water_cross_flux);
        }

        let e_ref = self.config.open_circuit_voltage.get::<volt>();
        self.open_circuit_voltage = self
            .membrane
            .temperature
            .mapv(|t| e_ref - OCV_TEMPERATURE_COEFFICIENT * (t - REFERENCE_TEMPERATURE));

        let (cathode_cfg, anode_cfg) = (&self.config.cathode, &self.config.anode);
        let plates = (cathode_cfg.bpp_thickness + anode_cfg.bpp_thickness).get::<meter>();
        let gdes = (cathode_cfg.gde_thickness() + anode_cfg.gde_thickness()).get::<meter>();
        let series = self.config.bipolar_plate_resistivity.get::<ohm_meter>() * plates
            + gdes / self.config.gde_conductivity.get::<siemens_per_meter>();
        self.ohmic_resistance = &self.membrane.resistance + series;

        let electrode_loss = &cathode.state().voltage_loss + &anode.state().voltage_loss;
        self.voltage_loss = &electrode_loss + &(&current_density * &self.ohmic_resistance);
        self.voltage = &self.open_circuit_voltage - &self.voltage_loss;
        self.failed = self.voltage.iter().any(|&v| !v.is_finite() || v <= 0.0);

        Zip::from(&mut self.resistance)
            .and(&electrode_loss)
            .and(&current_density)
            .and(&self.ohmic_resistance)
            .for_each(|r, &loss, &i, &r_ohmic| {
                *r = if i > 0.0 { loss / i + r_ohmic } else { r_ohmic };
            });
        self.omega = self.membrane.resistance.mapv(|r| r / self.area_dx);
    }
}

impl<P> CellModel<P> {
    /// Sets the current density of both electrodes, in A/m².
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] unless there is one value per element.
    pub fn set_current_density(
        &mut self,
        current_density: ArrayView1<'_, f64>,
    ) -> Result<(), ShapeError> {
        self.half_cells.cathode.set_current_density(current_density)?;
        self.half_cells.anode.set_current_density(current_density)
    }

    /// Sets the temperatures of all layers at the nodes, one row per entry
    /// of [`LAYERS`].
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the array is not `[5, nodes]`.
    pub fn set_layer_temperature(
        &mut self,
        temperature: ArrayView2<'_, f64>,
    ) -> Result<(), ShapeError> {
        let (rows, nodes) = self.layer_temperature.dim();
        ShapeError::check("layer temperature rows", rows, temperature.nrows())?;
        ShapeError::check("layer temperature", nodes, temperature.ncols())?;
        self.layer_temperature.assign(&temperature);

        let split = layer_count(Electrode::Cathode);
        self.half_cells
            .cathode
            .set_layer_temperature(temperature.slice(s![..split, ..]))?;
        self.half_cells
            .anode
            .set_layer_temperature(temperature.slice(s![split.., ..]))
    }

    /// Sets the fluid temperature of one channel at the nodes, in K.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] unless there is one value per node.
    pub fn set_fluid_temperature(
        &mut self,
        electrode: Electrode,
        temperature: ArrayView1<'_, f64>,
    ) -> Result<(), ShapeError> {
        self.half_cells.get_mut(electrode).set_fluid_temperature(temperature)
    }

    pub fn set_stoichiometry(&mut self, electrode: Electrode, stoichiometry: f64) {
        self.half_cells.get_mut(electrode).set_stoichiometry(stoichiometry);
    }

    pub fn set_outlet_pressure(&mut self, electrode: Electrode, pressure: f64) {
        self.half_cells.get_mut(electrode).set_outlet_pressure(pressure);
    }

    #[must_use]
    pub fn half_cell(&self, electrode: Electrode) -> &HalfCellModel<P> {
        self.half_cells.get(electrode)
    }

    #[must_use]
    pub fn cathode(&self) -> &HalfCellModel<P> {
        &self.half_cells.cathode
    }

    #[must_use]
    pub fn anode(&self) -> &HalfCellModel<P> {
        &self.half_cells.anode
    }

    #[must_use]
    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    #[must_use]
    pub fn membrane(&self) -> &MembraneState {
        &self.membrane
    }

    #[must_use]
    pub fn conductance(&self) -> &LayerConductance {
        &self.conductance
    }

    /// Active area of one element, m².
    #[must_use]
    pub fn element_area(&self) -> f64 {
        self.area_dx
    }

    #[must_use]
    pub fn current_density(&self) -> ArrayView1<'_, f64> {
        self.half_cells.cathode.current_density()
    }

    #[must_use]
    pub fn layer_temperature(&self) -> ArrayView2<'_, f64> {
        self.layer_temperature.view()
    }

    #[must_use]
    pub fn open_circuit_voltage(&self) -> ArrayView1<'_, f64> {
        self.open_circuit_voltage.view()
    }

    /// Ohmic area-specific resistance of membrane, plates and electrodes,
    /// Ω·m².
    #[must_use]
    pub fn ohmic_resistance(&self) -> ArrayView1<'_, f64> {
        self.ohmic_resistance.view()
    }

    /// Electrode losses plus the ohmic drop, V.
    #[must_use]
    pub fn voltage_loss(&self) -> ArrayView1<'_, f64> {
        self.voltage_loss.view()
    }

    #[must_use]
    pub fn voltage(&self) -> ArrayView1<'_, f64> {
        self.voltage.view()
    }

    /// Linearized area-specific resistance `loss / i + r_ohmic`, Ω·m².
    ///
    /// Elements without current report the ohmic resistance alone.
    #[must_use]
    pub fn resistance(&self) -> ArrayView1<'_, f64> {
        self.resistance.view()
    }

    /// Membrane resistance of each element, Ω.
    #[must_use]
    pub fn omega(&self) -> ArrayView1<'_, f64> {
        self.omega.view()
    }

    /// Whether the last update produced a non-positive or non-finite
    /// voltage on any element.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use pemfc_thermo::FittedGasProperties;

    use crate::{MembraneKind, Species, test_support};

    fn cell(kind: MembraneKind) -> CellModel<FittedGasProperties> {
        CellModel::new(
            &test_support::cell(kind),
            &test_support::discretization(),
            PerElectrode::new(2.0, 1.5),
            5.0,
            FittedGasProperties,
        )
        .unwrap()
    }

    #[test]
    fn nominal_cell_has_positive_voltage() {
        for kind in [MembraneKind::HighTemperature, MembraneKind::LowTemperature] {
            let mut cell = cell(kind);
            cell.update();
            assert!(!cell.failed(), "{kind:?} cell failed");

            let expected = &cell.open_circuit_voltage() - &cell.voltage_loss();
            assert_eq!(cell.voltage(), expected);
            assert!(cell.voltage().iter().all(|&v| v > 0.0 && v < 1.229));
            assert!(cell.resistance().iter().all(|&r| r > 0.0));
        }
    }

    #[test]
    fn open_circuit_voltage_follows_membrane_temperature() {
        let mut cell = cell(MembraneKind::HighTemperature);
        let mut layers = Array2::from_elem((5, test_support::NODES), 433.15);
        layers.row_mut(MEMBRANE_LAYER).fill(298.15);
        cell.set_layer_temperature(layers.view()).unwrap();
        cell.update();
        assert!(cell.open_circuit_voltage().iter().all(|&e| (e - 1.229).abs() < 1e-12));

        assert_eq!(cell.cathode().layer_temperature().nrows(), 3);
        assert_eq!(cell.anode().layer_temperature().row(0)[0], 433.15);
    }

    #[test]
    fn loss_includes_ohmic_drop() {
        let mut cell = cell(MembraneKind::HighTemperature);
        cell.update();
        let electrode = &cell.cathode().state().voltage_loss + &cell.anode().state().voltage_loss;
        for k in 0..10 {
            let ohmic = 6000.0 * cell.ohmic_resistance()[k];
            assert_relative_eq!(cell.voltage_loss()[k], electrode[k] + ohmic, max_relative = 1e-12);
            assert_relative_eq!(
                cell.resistance()[k],
                electrode[k] / 6000.0 + cell.ohmic_resistance()[k],
                max_relative = 1e-12
            );
        }
        assert_relative_eq!(
            cell.omega()[0],
            cell.membrane().resistance[0] / 1.0e-3,
            max_relative = 1e-12
        );
    }

    #[test]
    fn idle_elements_report_ohmic_resistance() {
        let mut cell = cell(MembraneKind::HighTemperature);
        let mut i = Array1::from_elem(10, 6000.0);
        i[4] = 0.0;
        cell.set_current_density(i.view()).unwrap();
        cell.update();
        assert_eq!(cell.resistance()[4], cell.ohmic_resistance()[4]);
    }

    #[test]
    fn choked_cell_fails() {
        let mut cell = cell(MembraneKind::HighTemperature);
        cell.set_stoichiometry(Electrode::Cathode, 1.05);
        cell.update();
        assert!(cell.failed());
        assert!(cell.voltage().iter().any(|&v| v <= 0.0));
    }

    #[test]
    fn low_temperature_cell_moves_water() {
        let mut cell = cell(MembraneKind::LowTemperature);
        cell.update();
        let flux = cell.membrane().water_cross_flux.clone();
        assert!(flux.iter().any(|&j| j != 0.0));
        assert_eq!(cell.cathode().water_cross_flux(), flux);
        assert_eq!(cell.anode().water_cross_flux(), flux);

        // The second update carries the flux into the water balance.
        let before = cell.cathode().state().molar_flow_of(Species::Water).to_owned();
        cell.update();
        let after = cell.cathode().state().molar_flow_of(Species::Water);
        assert_ne!(before, after);
    }

    #[test]
    fn conductances_scale_with_geometry() {
        let cell = cell(MembraneKind::HighTemperature);
        let k = cell.conductance();
        // GDE: 270 µm at 1 W/(m·K) over 1e-3 m².
        assert_relative_eq!(k.through_plane[1], 1.0e-3 / 270.0e-6, max_relative = 1e-12);
        assert_eq!(k.through_plane[1], k.through_plane[3]);
        assert_relative_eq!(k.environment[0], 5.0 * 0.4 * 2.0e-3 / 10.0, max_relative = 1e-12);
    }
}
