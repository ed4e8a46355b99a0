use pemfc_core::constraint::{NonNegative, StrictlyPositive, UnitInterval};
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Area, Length, Pressure, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use crate::ConfigError;

/// Geometry and boundary conditions of one reactant channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub length: Length,
    pub width: Length,
    pub height: Length,
    /// Number of 180° bends of a serpentine channel.
    pub bends: u32,
    /// Loss coefficient `ζ` of a single bend.
    pub bend_loss_coefficient: f64,
    /// Pressure at the channel outlet, held by the manifold.
    pub outlet_pressure: Pressure,
    pub inlet_temperature: ThermodynamicTemperature,
    /// Relative humidity of the inlet gas, in `[0, 1]`.
    pub inlet_humidity: f64,
}

impl ChannelConfig {
    /// Node spacing for a channel with `nodes` nodes.
    #[must_use]
    pub fn dx(&self, nodes: usize) -> Length {
        self.length / (nodes.saturating_sub(1).max(1) as f64)
    }

    #[must_use]
    pub fn cross_area(&self) -> Area {
        self.width * self.height
    }

    /// Hydraulic diameter `2wh / (w + h)` of the rectangular cross-section.
    #[must_use]
    pub fn hydraulic_diameter(&self) -> Length {
        self.width * self.height * 2.0 / (self.width + self.height)
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        StrictlyPositive::new(self.length).map_err(ConfigError::field("channel.length"))?;
        StrictlyPositive::new(self.width).map_err(ConfigError::field("channel.width"))?;
        StrictlyPositive::new(self.height).map_err(ConfigError::field("channel.height"))?;
        NonNegative::new(self.bend_loss_coefficient)
            .map_err(ConfigError::field("channel.bend_loss_coefficient"))?;
        StrictlyPositive::new(self.outlet_pressure)
            .map_err(ConfigError::field("channel.outlet_pressure"))?;
        StrictlyPositive::new(self.inlet_temperature.get::<kelvin>())
            .map_err(ConfigError::field("channel.inlet_temperature"))?;
        UnitInterval::new(self.inlet_humidity)
            .map_err(ConfigError::field("channel.inlet_humidity"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{area::square_meter, length::meter};

    use crate::test_support;

    #[test]
    fn derived_geometry() {
        let channel = test_support::channel();
        let d_h = channel.hydraulic_diameter().get::<meter>();
        assert_relative_eq!(d_h, 1.0e-3, max_relative = 1e-12);
        assert_relative_eq!(
            channel.cross_area().get::<square_meter>(),
            1.0e-6,
            max_relative = 1e-12
        );
        assert_relative_eq!(channel.dx(11).get::<meter>(), 0.065, max_relative = 1e-12);
    }

    #[test]
    fn humidity_is_a_fraction() {
        let mut channel = test_support::channel();
        channel.inlet_humidity = 1.2;
        assert!(matches!(
            channel.validate(),
            Err(ConfigError::Field {
                field: "channel.inlet_humidity",
                ..
            })
        ));
    }
}
