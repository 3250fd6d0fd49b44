use crate::Prng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use xyzvec::XYVec;

pub type DimVec = XYVec<f64>;
pub type PosDifference = DimVec;
pub type Position = DimVec;

/// Shape of the trial displacement distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplacementKernel {
    /// Each axis drawn from [0, max). Always kicks up and to the right before wrapping.
    #[default]
    Forward,
    /// Each axis drawn from [-max, max).
    Symmetric,
}

// x is drawn before y; keep it that way or seeded runs stop reproducing
pub fn random_displacement(
    rng: &mut Prng,
    max_distance: f64,
    kernel: DisplacementKernel,
) -> PosDifference {
    let lower = match kernel {
        DisplacementKernel::Forward => 0.0,
        DisplacementKernel::Symmetric => -max_distance,
    };
    let x: f64 = rng.random_range(lower..max_distance);
    let y: f64 = rng.random_range(lower..max_distance);
    DimVec::new([x, y])
}
