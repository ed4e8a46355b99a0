use pemfc_core::FlowDirection;
use pemfc_thermo::Gas;
use serde::{Deserialize, Serialize};

/// Side of the membrane a half-cell sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Electrode {
    Cathode,
    Anode,
}

impl Electrode {
    /// Gas consumed at this electrode.
    #[must_use]
    pub fn reactant(self) -> Gas {
        match self {
            Self::Cathode => Gas::Oxygen,
            Self::Anode => Gas::Hydrogen,
        }
    }

    /// Electrons transferred per reactant molecule.
    #[must_use]
    pub fn valence(self) -> f64 {
        match self {
            Self::Cathode => 4.0,
            Self::Anode => 2.0,
        }
    }

    /// Gas flow direction along the node indices.
    ///
    /// The channels run in counter-flow: the cathode inlet is node 0, the
    /// anode inlet is the last node.
    #[must_use]
    pub fn flow_direction(self) -> FlowDirection {
        match self {
            Self::Cathode => FlowDirection::Forward,
            Self::Anode => FlowDirection::Backward,
        }
    }
}

/// One value per electrode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerElectrode<T> {
    pub cathode: T,
    pub anode: T,
}

impl<T> PerElectrode<T> {
    pub fn new(cathode: T, anode: T) -> Self {
        Self { cathode, anode }
    }

    /// Value for `electrode`.
    pub fn get(&self, electrode: Electrode) -> &T {
        match electrode {
            Electrode::Cathode => &self.cathode,
            Electrode::Anode => &self.anode,
        }
    }

    /// Mutable value for `electrode`.
    pub fn get_mut(&mut self, electrode: Electrode) -> &mut T {
        match electrode {
            Electrode::Cathode => &mut self.cathode,
            Electrode::Anode => &mut self.anode,
        }
    }

    /// Applies `f` to both values.
    pub fn map<U>(self, mut f: impl FnMut(Electrode, T) -> U) -> PerElectrode<U> {
        PerElectrode {
            cathode: f(Electrode::Cathode, self.cathode),
            anode: f(Electrode::Anode, self.anode),
        }
    }

    /// Borrows both values.
    pub fn each_ref(&self) -> PerElectrode<&T> {
        PerElectrode {
            cathode: &self.cathode,
            anode: &self.anode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_flow_channels() {
        assert_eq!(Electrode::Cathode.flow_direction(), FlowDirection::Forward);
        assert_eq!(Electrode::Anode.flow_direction(), FlowDirection::Backward);
        assert_eq!(Electrode::Cathode.reactant(), Gas::Oxygen);
        assert_eq!(Electrode::Anode.valence(), 2.0);
    }

    #[test]
    fn map_passes_electrode() {
        let doubled = PerElectrode::new(1, 2).map(|electrode, v| match electrode {
            Electrode::Cathode => v * 10,
            Electrode::Anode => v * 100,
        });
        assert_eq!(doubled, PerElectrode::new(10, 200));
        assert_eq!(*doubled.get(Electrode::Anode), 200);
    }
}
