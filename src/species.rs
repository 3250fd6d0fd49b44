use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which population a disc belongs to. Monodisperse systems only use `A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    A,
    B,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::A, Species::B];

    pub fn index(self) -> usize {
        match self {
            Species::A => 0,
            Species::B => 1,
        }
    }

    pub fn other(self) -> Species {
        match self {
            Species::A => Species::B,
            Species::B => Species::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::A => "A",
            Species::B => "B",
        }
    }
}

/// How the A-B contact distance is formed from the two radii.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    /// `sigma_a + sigma_b`
    Additive,
    /// `2 * sqrt(sigma_a * sigma_b)`
    #[default]
    NonAdditive,
}

/// Radii and squared hard-disc contact distances for every species pair.
///
/// Like species touch at twice their radius. Unlike species use the
/// non-additive distance `2 * sqrt(sigma_a * sigma_b)` unless built with
/// [`Interaction::Additive`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGeometry {
    sigma: [f64; 2],
    interaction: Interaction,
    hd_aa: f64,
    hd_ab: f64,
    hd_bb: f64,
}

impl SpeciesGeometry {
    pub fn new(sigma_a: f64, sigma_b: f64) -> Self {
        Self::with_interaction(sigma_a, sigma_b, Interaction::NonAdditive)
    }

    pub fn with_interaction(sigma_a: f64, sigma_b: f64, interaction: Interaction) -> Self {
        let sigma_ab = match interaction {
            Interaction::Additive => sigma_a + sigma_b,
            Interaction::NonAdditive => 2.0 * (sigma_a * sigma_b).sqrt(),
        };
        Self {
            sigma: [sigma_a, sigma_b],
            interaction,
            hd_aa: (2.0 * sigma_a) * (2.0 * sigma_a),
            hd_ab: sigma_ab * sigma_ab,
            hd_bb: (2.0 * sigma_b) * (2.0 * sigma_b),
        }
    }

    /// Single species; B mirrors A so every threshold is defined.
    pub fn monodisperse(sigma: f64) -> Self {
        Self::new(sigma, sigma)
    }

    pub fn radius(&self, s: Species) -> f64 {
        self.sigma[s.index()]
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn min_radius(&self) -> f64 {
        self.sigma[0].min(self.sigma[1])
    }

    pub fn disc_area(&self, s: Species) -> f64 {
        let r = self.radius(s);
        PI * r * r
    }

    /// Squared contact distance for the (unordered) pair.
    pub fn hard_disc_sqd(&self, s: Species, t: Species) -> f64 {
        match (s, t) {
            (Species::A, Species::A) => self.hd_aa,
            (Species::B, Species::B) => self.hd_bb,
            _ => self.hd_ab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_threshold_is_non_additive() {
        let g = SpeciesGeometry::new(1.0, 4.0);
        assert_eq!(g.hard_disc_sqd(Species::A, Species::A), 4.0);
        assert_eq!(g.hard_disc_sqd(Species::B, Species::B), 64.0);
        // 2 * sqrt(1 * 4) = 4, not 1 + 4
        assert_eq!(g.hard_disc_sqd(Species::A, Species::B), 16.0);
        assert_eq!(g.hard_disc_sqd(Species::B, Species::A), 16.0);
    }

    #[test]
    fn additive_cross_threshold_sums_radii() {
        let g = SpeciesGeometry::with_interaction(1.0, 4.0, Interaction::Additive);
        assert_eq!(g.interaction(), Interaction::Additive);
        assert_eq!(g.hard_disc_sqd(Species::A, Species::B), 25.0);
        // like pairs do not depend on the rule
        assert_eq!(g.hard_disc_sqd(Species::A, Species::A), 4.0);
        assert_eq!(g.hard_disc_sqd(Species::B, Species::B), 64.0);
    }
}
