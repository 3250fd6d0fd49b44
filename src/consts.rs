use std::f64::consts::PI;

/// Packing fraction of a hexagonal close-packed disc lattice, pi / (2 sqrt 3).
pub const HEX_CLOSE_PACKING: f64 = PI / (2.0 * 1.732_050_807_568_877_2);

/// Relative slack on contact comparisons when checking a whole configuration.
/// Lattice neighbours placed at exactly contact distance must not read as overlaps
/// after sqrt(3) rounding. Trial moves are tested without it.
pub const CONTACT_TOLERANCE: f64 = 1e-10;

/// Upper bound on the B/A radius ratio, keeping the A block capacity small enough to count.
pub const MAX_RADIUS_RATIO: f64 = 1e6;

// step tuning
pub const TUNING_TRIAL_POINTS: usize = 11;
pub const TUNING_ACCEPTANCE_SLACK: f64 = 0.005;
pub const TUNING_MIN_DELTA_FACTOR: f64 = 0.01;
