//! Quantity types that `uom` does not provide out of the box.
//!
//! Values of these types are built from a unit of a quantity with the same
//! dimension, e.g. a [`DiffusionCoefficient`] from
//! `uom::si::diffusion_coefficient::square_meter_per_second`.

use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{ElectricCurrentDensity, Length},
        electric_current_density::ampere_per_square_meter,
        length::meter,
    },
    typenum::{N1, N2, N3, P1, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Volumetric current density, A/m³ in SI.
///
/// The exchange current density of a porous catalyst layer is defined per
/// unit volume of the layer.
pub type VolumetricCurrentDensity = Quantity<ISQ<N3, Z0, Z0, P1, Z0, Z0, Z0>, SI<f64>, f64>;

/// Binary diffusion coefficient, m²/s in SI.
pub type DiffusionCoefficient = Quantity<ISQ<P2, Z0, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Creates a volumetric current density from a value in A/m³.
#[must_use]
pub fn ampere_per_cubic_meter(value: f64) -> VolumetricCurrentDensity {
    ElectricCurrentDensity::new::<ampere_per_square_meter>(value) / Length::new::<meter>(1.0)
}
