/// A stateful solver that redistributes a stack-wide field.
///
/// The stack model owns one instance per coupling domain (manifold flow
/// distribution, electrical current redistribution, thermal field) and calls
/// it once per outer update with freshly aggregated cell quantities.
///
/// Unlike a pure model, a coupling solver takes `&mut self`: its internal
/// convergence state (previous solution, relaxation history) persists and
/// accumulates across repeated calls. The convergence criterion it reports
/// is part of its `Output`, so the outer fixed-point loop can be driven and
/// tested from the outside.
///
/// Instances are long-lived and tied to one stack; they are not meant to be
/// shared between stacks.
pub trait CouplingSolver {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Solves the coupling problem for the given aggregated input.
    ///
    /// # Errors
    ///
    /// Each solver defines its own `Error` type for inputs it cannot handle
    /// (mismatched shapes, non-finite fields, failed inner iterations).
    fn solve(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}
