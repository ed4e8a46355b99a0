/// Mass-transport state of the gas diffusion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportRegime {
    #[default]
    Nominal,
    /// The GDL diffusion correlation broke down at `from_element`: the
    /// local current density reached the limiting current density.
    ///
    /// Every element from `from_element` on carries the sentinel
    /// [`MASS_TRANSPORT_SENTINEL`] as GDL diffusion loss.
    MassTransportLimited { from_element: usize },
}

/// Water balance state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterRegime {
    #[default]
    Nominal,
    /// Water flow fell below [`DRY_OUT_FLOOR`] downstream of `at_node`.
    ///
    /// All nodes downstream of `at_node` carry the water flow of `at_node`.
    DriedOut { at_node: usize },
}

/// Voltage loss substituted once the GDL diffusion loss is non-finite.
pub const MASS_TRANSPORT_SENTINEL: f64 = 1.0e50;

/// Water molar flow below which the channel counts as dried out, mol/s.
pub const DRY_OUT_FLOOR: f64 = 1.0e-49;

/// Reactant molar flow below which the reactant counts as exhausted, mol/s.
pub(crate) const DEPLETION_FLOOR: f64 = 1.0e-50;
