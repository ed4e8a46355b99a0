use serde::{Deserialize, Serialize};
use uom::si::{f64::MolarMass, molar_mass::gram_per_mole};

use crate::{constants::GAS_CONSTANT, units::SpecificGasConstant};

/// Gases that appear in the reactant channels.
///
/// The cathode carries oxygen diluted in nitrogen, the anode carries hydrogen
/// diluted in nitrogen; both carry water vapour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gas {
    Oxygen,
    Hydrogen,
    Nitrogen,
    WaterVapor,
}

impl Gas {
    /// Molar mass of the gas.
    #[must_use]
    pub fn molar_mass(self) -> MolarMass {
        let g_per_mol = match self {
            Self::Oxygen => 32.0,
            Self::Hydrogen => 2.0,
            Self::Nitrogen => 28.0,
            Self::WaterVapor => 18.0,
        };
        MolarMass::new::<gram_per_mole>(g_per_mol)
    }

    /// Specific gas constant `R / M`.
    #[must_use]
    pub fn gas_constant(self) -> SpecificGasConstant {
        use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;

        let m = self.molar_mass().get::<uom::si::molar_mass::kilogram_per_mole>();
        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(GAS_CONSTANT / m)
    }
}
