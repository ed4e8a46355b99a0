//! Correlation-based gas and water properties.
//!
//! | property             | correlation                                  |
//! |----------------------|----------------------------------------------|
//! | heat capacity        | Shomate polynomial (NIST Webbook)            |
//! | viscosity            | Sutherland's law                             |
//! | thermal conductivity | power law `λ₀·(T/T₀)ⁿ`                        |
//! | saturation pressure  | IAPWS-IF97 region 4 saturation-pressure line |
//!
//! The fits target the 300–500 K window fuel cell channels operate in.

use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{
        DynamicViscosity, Pressure, SpecificHeatCapacity, ThermalConductivity,
        ThermodynamicTemperature,
    },
    molar_mass::kilogram_per_mole,
    pressure::megapascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::{Gas, GasPropertyProvider};

/// Property provider backed by closed-form fits.
///
/// Thermal conductivities of dilute gases are independent of pressure in
/// this range, so the pressure argument is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FittedGasProperties;

/// Shomate coefficients `[A, B, C, D, E]` for `cp = A + B·t + C·t² + D·t³ + E/t²`,
/// with `t = T / 1000` and `cp` in J/(mol·K).
fn shomate(gas: Gas) -> [f64; 5] {
    match gas {
        Gas::Oxygen => [31.322_34, -20.235_31, 57.866_44, -36.506_24, -0.007_374],
        Gas::Hydrogen => [33.066_178, -11.363_417, 11.432_816, -2.772_874, -0.158_558],
        Gas::Nitrogen => [28.986_41, 1.853_978, -9.647_459, 16.635_37, 0.000_117],
        Gas::WaterVapor => [30.092, 6.832_514, 6.793_435, -2.534_48, 0.082_139],
    }
}

/// Sutherland parameters `(μ₀ [Pa·s], T₀ [K], S [K])`.
fn sutherland(gas: Gas) -> (f64, f64, f64) {
    match gas {
        Gas::Oxygen => (20.18e-6, 292.25, 127.0),
        Gas::Hydrogen => (8.76e-6, 293.85, 72.0),
        Gas::Nitrogen => (17.81e-6, 300.55, 111.0),
        Gas::WaterVapor => (11.2e-6, 350.0, 1064.0),
    }
}

/// Power-law parameters `(λ₀ [W/(m·K)], T₀ [K], n)`.
fn conductivity_law(gas: Gas) -> (f64, f64, f64) {
    match gas {
        Gas::Oxygen => (0.0263, 300.0, 0.86),
        Gas::Hydrogen => (0.183, 300.0, 0.73),
        Gas::Nitrogen => (0.0259, 300.0, 0.81),
        Gas::WaterVapor => (0.0248, 373.15, 1.25),
    }
}

/// IAPWS-IF97 saturation pressure in MPa for a temperature in K.
fn if97_saturation_pressure(t: f64) -> f64 {
    const N: [f64; 10] = [
        0.116_705_214_527_67e4,
        -0.724_213_167_032_06e6,
        -0.170_738_469_400_92e2,
        0.120_208_247_024_70e5,
        -0.323_255_503_223_33e7,
        0.149_151_086_135_30e2,
        -0.482_326_573_615_91e4,
        0.405_113_405_420_57e6,
        -0.238_555_575_678_49,
        0.650_175_348_447_98e3,
    ];

    let theta = t + N[8] / (t - N[9]);
    let a = theta * theta + N[0] * theta + N[1];
    let b = N[2] * theta * theta + N[3] * theta + N[4];
    let c = N[5] * theta * theta + N[6] * theta + N[7];
    (2.0 * c / (-b + (b * b - 4.0 * a * c).sqrt())).powi(4)
}

impl GasPropertyProvider for FittedGasProperties {
    fn heat_capacity(&self, gas: Gas, t: ThermodynamicTemperature) -> SpecificHeatCapacity {
        let [a, b, c, d, e] = shomate(gas);
        let tt = t.get::<kelvin>() / 1000.0;
        let cp_molar = a + b * tt + c * tt * tt + d * tt.powi(3) + e / (tt * tt);
        let m = gas.molar_mass().get::<kilogram_per_mole>();
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp_molar / m)
    }

    fn viscosity(&self, gas: Gas, t: ThermodynamicTemperature) -> DynamicViscosity {
        let (mu_0, t_0, s) = sutherland(gas);
        let t = t.get::<kelvin>();
        let mu = mu_0 * (t_0 + s) / (t + s) * (t / t_0).powf(1.5);
        DynamicViscosity::new::<pascal_second>(mu)
    }

    fn thermal_conductivity(
        &self,
        gas: Gas,
        t: ThermodynamicTemperature,
        _p: Pressure,
    ) -> ThermalConductivity {
        let (lambda_0, t_0, n) = conductivity_law(gas);
        let lambda = lambda_0 * (t.get::<kelvin>() / t_0).powf(n);
        ThermalConductivity::new::<watt_per_meter_kelvin>(lambda)
    }

    fn saturation_pressure(&self, t: ThermodynamicTemperature) -> Pressure {
        Pressure::new::<megapascal>(if97_saturation_pressure(t.get::<kelvin>()))
    }
}
