use uom::si::f64::{
    DynamicViscosity, Pressure, SpecificHeatCapacity, ThermalConductivity,
    ThermodynamicTemperature,
};

use crate::Gas;

/// Pure property functions of a single gas and of water.
///
/// Implementations must be deterministic and side-effect free; the channel
/// solver calls them for every node on every sweep.
/// Out-of-range inputs are not rejected, they simply extrapolate the
/// underlying correlation.
pub trait GasPropertyProvider {
    /// Specific isobaric heat capacity of `gas` at temperature `t`.
    fn heat_capacity(&self, gas: Gas, t: ThermodynamicTemperature) -> SpecificHeatCapacity;

    /// Dynamic viscosity of `gas` at temperature `t`.
    fn viscosity(&self, gas: Gas, t: ThermodynamicTemperature) -> DynamicViscosity;

    /// Thermal conductivity of `gas` at temperature `t` and pressure `p`.
    fn thermal_conductivity(
        &self,
        gas: Gas,
        t: ThermodynamicTemperature,
        p: Pressure,
    ) -> ThermalConductivity;

    /// Saturation pressure of water at temperature `t`.
    fn saturation_pressure(&self, t: ThermodynamicTemperature) -> Pressure;
}

impl<P: GasPropertyProvider + ?Sized> GasPropertyProvider for &P {
    fn heat_capacity(&self, gas: Gas, t: ThermodynamicTemperature) -> SpecificHeatCapacity {
        (**self).heat_capacity(gas, t)
    }

    fn viscosity(&self, gas: Gas, t: ThermodynamicTemperature) -> DynamicViscosity {
        (**self).viscosity(gas, t)
    }

    fn thermal_conductivity(
        &self,
        gas: Gas,
        t: ThermodynamicTemperature,
        p: Pressure,
    ) -> ThermalConductivity {
        (**self).thermal_conductivity(gas, t, p)
    }

    fn saturation_pressure(&self, t: ThermodynamicTemperature) -> Pressure {
        (**self).saturation_pressure(t)
    }
}
