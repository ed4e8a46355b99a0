//! Mixing rules for ideal-gas mixtures of `N` species.
//!
//! All functions work on plain SI values so they can be applied node by node
//! to the arrays a channel model keeps.
//! Species with a zero mole fraction contribute nothing, and a mixture whose
//! fractions are all zero evaluates to zero.

/// Wilke interaction parameter `Φ_ij`.
fn wilke_phi(mu_i: f64, mu_j: f64, m_i: f64, m_j: f64) -> f64 {
    let num = (1.0 + (mu_i / mu_j).sqrt() * (m_j / m_i).powf(0.25)).powi(2);
    num / (8.0 * (1.0 + m_i / m_j)).sqrt()
}

/// Weighted sum `Σᵢ xᵢ·aᵢ / Σⱼ xⱼ·Φᵢⱼ` shared by the viscosity and
/// conductivity rules.
fn wilke_sum<const N: usize>(
    mole_fractions: &[f64; N],
    values: &[f64; N],
    viscosities: &[f64; N],
    molar_masses: &[f64; N],
) -> f64 {
    (0..N)
        .filter(|&i| mole_fractions[i] > 0.0)
        .map(|i| {
            let denom: f64 = (0..N)
                .map(|j| {
                    mole_fractions[j]
                        * wilke_phi(
                            viscosities[i],
                            viscosities[j],
                            molar_masses[i],
                            molar_masses[j],
                        )
                })
                .sum();
            mole_fractions[i] * values[i] / denom
        })
        .sum()
}

/// Mixture dynamic viscosity by Wilke's rule.
///
/// Viscosities in Pa·s; molar masses in any consistent unit.
#[must_use]
pub fn wilke_viscosity<const N: usize>(
    mole_fractions: &[f64; N],
    viscosities: &[f64; N],
    molar_masses: &[f64; N],
) -> f64 {
    wilke_sum(mole_fractions, viscosities, viscosities, molar_masses)
}

/// Mixture thermal conductivity by the Mason-Saxena form of the
/// Wassiljewa equation, which reuses Wilke's viscosity-based `Φ_ij`.
#[must_use]
pub fn mason_saxena_conductivity<const N: usize>(
    mole_fractions: &[f64; N],
    conductivities: &[f64; N],
    viscosities: &[f64; N],
    molar_masses: &[f64; N],
) -> f64 {
    wilke_sum(mole_fractions, conductivities, viscosities, molar_masses)
}

/// Mass-fraction-weighted average, used for gas constant and heat capacity.
#[must_use]
pub fn mass_weighted<const N: usize>(mass_fractions: &[f64; N], values: &[f64; N]) -> f64 {
    mass_fractions.iter().zip(values).map(|(w, v)| w * v).sum()
}

/// Converts mole fractions to mass fractions.
///
/// Returns all zeros if the mixture is empty.
#[must_use]
pub fn mass_fractions<const N: usize>(
    mole_fractions: &[f64; N],
    molar_masses: &[f64; N],
) -> [f64; N] {
    let total: f64 = mole_fractions.iter().zip(molar_masses).map(|(x, m)| x * m).sum();
    if total <= 0.0 {
        return [0.0; N];
    }
    std::array::from_fn(|i| mole_fractions[i] * molar_masses[i] / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const AIR_M: [f64; 2] = [0.032, 0.028];
    const AIR_X: [f64; 2] = [0.21, 0.79];

    #[test]
    fn pure_species_is_unchanged() {
        let mu = wilke_viscosity(&[1.0, 0.0], &[2.0e-5, 1.8e-5], &AIR_M);
        assert_relative_eq!(mu, 2.0e-5, max_relative = 1e-12);

        let k = mason_saxena_conductivity(&[0.0, 1.0], &[0.026, 0.025], &[2.0e-5, 1.8e-5], &AIR_M);
        assert_relative_eq!(k, 0.025, max_relative = 1e-12);
    }

    #[test]
    fn identical_species_mix_to_themselves() {
        let mu = wilke_viscosity(&[0.3, 0.7], &[1.5e-5, 1.5e-5], &[0.028, 0.028]);
        assert_relative_eq!(mu, 1.5e-5, max_relative = 1e-12);
    }

    #[test]
    fn air_viscosity_lies_between_components() {
        let mu_o2 = 2.06e-5;
        let mu_n2 = 1.79e-5;
        let mu = wilke_viscosity(&AIR_X, &[mu_o2, mu_n2], &AIR_M);
        assert!(mu > mu_n2 && mu < mu_o2);
        // Tabulated dry air at 300 K.
        assert_relative_eq!(mu, 1.85e-5, max_relative = 1e-2);
    }

    #[test]
    fn hydrogen_dominates_conductivity_less_than_linearly() {
        let x = [0.5, 0.5];
        let k =
            mason_saxena_conductivity(&x, &[0.183, 0.0259], &[8.9e-6, 1.78e-5], &[0.002, 0.028]);
        let linear = 0.5 * 0.183 + 0.5 * 0.0259;
        assert!(k > 0.0259 && k < linear);
    }

    #[test]
    fn mass_fractions_sum_to_one() {
        let w = mass_fractions(&[0.2, 0.1, 0.7], &[0.032, 0.018, 0.028]);
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(w[0], 0.2 * 0.032 / 0.0278, max_relative = 1e-12);
        assert_eq!(mass_fractions(&[0.0, 0.0], &AIR_M), [0.0, 0.0]);
    }

    #[test]
    fn empty_mixture_is_zero() {
        assert_eq!(wilke_viscosity(&[0.0, 0.0], &[1.0e-5, 2.0e-5], &AIR_M), 0.0);
        assert_relative_eq!(mass_weighted(&[0.25, 0.75], &[1000.0, 2000.0]), 1750.0);
    }
}
