//! Physical constants in SI units.

/// Faraday constant, C/mol.
pub const FARADAY: f64 = 96_485.332_12;

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Specific heat capacity of liquid water, J/(kg·K).
pub const LIQUID_WATER_CP: f64 = 4_182.0;

/// Standard reference temperature, K.
pub const REFERENCE_TEMPERATURE: f64 = 298.15;

/// Molar enthalpy of vaporization of water, J/mol.
pub const ENTHALPY_OF_VAPORIZATION: f64 = 45.4e3;
