use std::cmp::Ordering;

use num_traits::{One, Zero};

use super::{Constrained, Constraint, ConstraintError};

/// Types with a zero and a one, usable with [`UnitInterval`].
pub trait UnitBounds: PartialOrd + Zero + One {}

impl UnitBounds for f64 {}
impl UnitBounds for f32 {}

/// Marker type enforcing that a value lies in the closed unit interval `0 ≤ x ≤ 1`.
///
/// Relative humidities and mole fractions are validated with this marker.
///
/// # Examples
///
/// ```
/// use pemfc_core::constraint::{ConstraintError, UnitInterval};
///
/// assert!(UnitInterval::new(0.21).is_ok());
/// assert!(UnitInterval::new(1.0).is_ok());
/// assert_eq!(UnitInterval::new(1.5), Err(ConstraintError::AboveMaximum));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_inside() {
        assert!(UnitInterval::new(0.0).is_ok());
        assert!(UnitInterval::new(1.0).is_ok());
    }

    #[test]
    fn out_of_range() {
        assert_eq!(UnitInterval::new(-0.01), Err(ConstraintError::BelowMinimum));
        assert_eq!(UnitInterval::new(1.01), Err(ConstraintError::AboveMaximum));
        assert_eq!(
            UnitInterval::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }
}
