//! Shared numeric constants.

/// Tolerance used to gate pricing decisions against floating-point noise.
pub const EPSILON: f64 = 2.2204460492503131e-15;

/// Stand-in for "no upper bound" on an uncapacitated transportation arc.
pub const INFINITY: f64 = f64::MAX;
