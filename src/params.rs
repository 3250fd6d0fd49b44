use quickcheck::{Arbitrary, Gen};
use serde::{Deserialize, Serialize};

use crate::consts::{HEX_CLOSE_PACKING, MAX_RADIUS_RATIO};
use crate::error::{HdmcError, Result};
use crate::position::DisplacementKernel;
use crate::species::{Interaction, Species, SpeciesGeometry};

/// Particle system to build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SystemParams {
    /// One species on a hexagonal lattice. `num_particles` must be a perfect square.
    Monodisperse {
        num_particles: usize,
        radius: f64,
        packing_fraction: f64,
    },
    /// Two species on a block lattice. A has radius 1, B has `radius_ratio`.
    Binary {
        num_particles: usize,
        number_fraction_a: f64,
        radius_ratio: f64,
        packing_fraction: f64,
        #[serde(default)]
        interaction: Interaction,
    },
}

impl SystemParams {
    pub fn num_particles(&self) -> usize {
        match *self {
            SystemParams::Monodisperse { num_particles, .. } => num_particles,
            SystemParams::Binary { num_particles, .. } => num_particles,
        }
    }

    pub fn packing_fraction(&self) -> f64 {
        match *self {
            SystemParams::Monodisperse {
                packing_fraction, ..
            } => packing_fraction,
            SystemParams::Binary {
                packing_fraction, ..
            } => packing_fraction,
        }
    }
}

/// Search for a trial distance that hits a target acceptance ratio before the main run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningParams {
    pub target_acceptance: f64,
    pub max_iterations: usize,
    pub sweeps_per_trial: usize,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            target_acceptance: 0.3,
            max_iterations: 100,
            sweeps_per_trial: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    pub seed: u64,
    // production moves, unless `production_sweeps` is set
    pub num_moves: usize,
    // moves per particle
    pub equilibration_sweeps: usize,
    pub production_sweeps: Option<usize>,
    // moves between progress reports / trajectory frames
    pub report_every: usize,
    // in units of the A radius
    pub max_trial_distance: f64,
    pub displacement: DisplacementKernel,
    // chance that a trial move is a two-particle swap instead of a translation
    pub swap_probability: f64,
    pub system: SystemParams,
    pub tuning: Option<TuningParams>,
}

impl Default for InputParams {
    fn default() -> Self {
        let system = SystemParams::Monodisperse {
            num_particles: 400,
            radius: 1.0,
            packing_fraction: 0.7,
        };

        Self {
            seed: 1337,
            num_moves: 1_000_000,
            equilibration_sweeps: 0,
            production_sweeps: None,
            report_every: 10_000,
            max_trial_distance: 0.1,
            displacement: DisplacementKernel::Forward,
            swap_probability: 0.0,
            system,
            tuning: None,
        }
    }
}

fn config_err<T>(msg: impl Into<String>) -> Result<T> {
    Err(HdmcError::Config(msg.into()))
}

fn check_positive(name: &str, x: f64) -> Result<()> {
    if !(x.is_finite() && x > 0.0) {
        return config_err(format!("{name} must be positive and finite, got {x}"));
    }
    Ok(())
}

fn check_packing_fraction(phi: f64) -> Result<()> {
    if !(phi > 0.0 && phi <= 1.0) {
        return config_err(format!("packing fraction must be in (0, 1], got {phi}"));
    }
    Ok(())
}

/// Side length of the square lattice of `n` particles, if `n` is a perfect square.
pub fn exact_square_dim(n: usize) -> Option<usize> {
    let mut dim = (n as f64).sqrt().floor() as usize;
    // guard against sqrt rounding on large n
    while dim * dim > n {
        dim -= 1;
    }
    while (dim + 1) * (dim + 1) <= n {
        dim += 1;
    }
    (dim * dim == n).then_some(dim)
}

impl InputParams {
    /// Well-formedness check. Nothing gets built from parameters that fail it.
    pub fn check(&self) -> Result<()> {
        if self.system.num_particles() == 0 {
            return config_err("num_particles must be at least 1");
        }
        check_packing_fraction(self.system.packing_fraction())?;
        check_positive("max_trial_distance", self.max_trial_distance)?;
        if self.report_every == 0 {
            return config_err("report_every must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return config_err(format!(
                "swap_probability must be in [0, 1], got {}",
                self.swap_probability
            ));
        }

        match self.system {
            SystemParams::Monodisperse {
                num_particles,
                radius,
                packing_fraction,
            } => {
                check_positive("radius", radius)?;
                let Some(dim) = exact_square_dim(num_particles) else {
                    return config_err(format!(
                        "hexagonal lattice needs a perfect square particle count, got {num_particles}"
                    ));
                };
                // with an odd row count the last row sits straight under row 0
                // across the wrap, only sqrt(3) * sf * sigma away
                let odd_row_limit = 0.75 * HEX_CLOSE_PACKING;
                if dim > 1 && dim % 2 == 1 && packing_fraction > odd_row_limit {
                    return config_err(format!(
                        "hexagonal lattice with an odd row count ({dim}) only fits up to \
                         packing fraction {odd_row_limit:.4}, got {packing_fraction}"
                    ));
                }
            }
            SystemParams::Binary {
                number_fraction_a,
                radius_ratio,
                ..
            } => {
                check_positive("radius_ratio", radius_ratio)?;
                if !(1.0..=MAX_RADIUS_RATIO).contains(&radius_ratio) {
                    return config_err(format!(
                        "radius_ratio (B/A) must be in [1, {MAX_RADIUS_RATIO}], got {radius_ratio}"
                    ));
                }
                if !(0.0..=1.0).contains(&number_fraction_a) {
                    return config_err(format!(
                        "number_fraction_a must be in [0, 1], got {number_fraction_a}"
                    ));
                }
            }
        }

        if let Some(tuning) = &self.tuning {
            let t = tuning.target_acceptance;
            if !(t > 0.0 && t < 1.0) {
                return config_err(format!("target_acceptance must be in (0, 1), got {t}"));
            }
            if tuning.sweeps_per_trial == 0 {
                return config_err("sweeps_per_trial must be at least 1");
            }
        }
        Ok(())
    }

    /// Validates and derives species geometry, counts and cell area.
    pub fn derive(&self) -> Result<SystemGeometry> {
        self.check()?;
        let geometry = match self.system {
            SystemParams::Monodisperse {
                num_particles,
                radius,
                packing_fraction,
            } => SystemGeometry::new(
                [num_particles, 0],
                SpeciesGeometry::monodisperse(radius),
                packing_fraction,
            ),
            SystemParams::Binary {
                num_particles,
                number_fraction_a,
                radius_ratio,
                packing_fraction,
                interaction,
            } => {
                let n_a = (num_particles as f64 * number_fraction_a).floor() as usize;
                let n_a = n_a.min(num_particles);
                SystemGeometry::new(
                    [n_a, num_particles - n_a],
                    SpeciesGeometry::with_interaction(1.0, radius_ratio, interaction),
                    packing_fraction,
                )
            }
        };
        Ok(geometry)
    }

    pub fn equilibration_moves(&self) -> usize {
        self.equilibration_sweeps * self.system.num_particles()
    }

    /// Production run length, from sweeps when given, otherwise `num_moves`.
    pub fn production_moves(&self) -> usize {
        match self.production_sweeps {
            Some(sweeps) => sweeps * self.system.num_particles(),
            None => self.num_moves,
        }
    }

    /// Trial distance in absolute units.
    pub fn scaled_max_trial_distance(&self) -> f64 {
        let sigma_a = match self.system {
            SystemParams::Monodisperse { radius, .. } => radius,
            SystemParams::Binary { .. } => 1.0,
        };
        self.max_trial_distance * sigma_a
    }
}

/// Quantities derived once from validated input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemGeometry {
    counts: [usize; 2],
    species: SpeciesGeometry,
    packing_fraction: f64,
    cell_area: f64,
}

impl SystemGeometry {
    pub fn new(counts: [usize; 2], species: SpeciesGeometry, packing_fraction: f64) -> Self {
        let disc_area: f64 = Species::ALL
            .iter()
            .map(|&s| counts[s.index()] as f64 * species.disc_area(s))
            .sum();
        Self {
            counts,
            species,
            packing_fraction,
            cell_area: disc_area / packing_fraction,
        }
    }

    pub fn count(&self, s: Species) -> usize {
        self.counts[s.index()]
    }

    pub fn num_particles(&self) -> usize {
        self.counts[0] + self.counts[1]
    }

    pub fn species(&self) -> &SpeciesGeometry {
        &self.species
    }

    pub fn packing_fraction(&self) -> f64 {
        self.packing_fraction
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_area
    }

    pub fn cell_length(&self) -> f64 {
        self.cell_area.sqrt()
    }

    pub fn partial_packing_fraction(&self, s: Species) -> f64 {
        self.count(s) as f64 * self.species.disc_area(s) / self.cell_area
    }

    /// Share of the packing fraction carried by B.
    pub fn composition(&self) -> f64 {
        self.partial_packing_fraction(Species::B) / self.packing_fraction
    }
}

// for arbitrary trait
fn usize_in_range(g: &mut Gen, min: usize, max: usize) -> usize {
    if min == max {
        return max;
    }
    let x = usize::arbitrary(g);
    let r = x % (max - min) + min;
    assert!(r >= min && r < max);
    r
}

fn f64_in_range(g: &mut Gen, min: f64, max: f64) -> f64 {
    let mut r = f64::INFINITY;
    while !(r.is_finite() && r >= min && r < max) {
        let x = f64::arbitrary(g).abs();
        r = x % (max - min) + min;
    }
    r
}

// small, dilute-to-moderate systems so property tests stay fast
impl Arbitrary for InputParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let system = if bool::arbitrary(g) {
            let dim = usize_in_range(g, 2, 9);
            SystemParams::Monodisperse {
                num_particles: dim * dim,
                radius: f64_in_range(g, 0.5, 2.0),
                packing_fraction: f64_in_range(g, 0.05, 0.85),
            }
        } else {
            SystemParams::Binary {
                num_particles: usize_in_range(g, 2, 80),
                number_fraction_a: f64_in_range(g, 0.0, 1.0),
                radius_ratio: f64_in_range(g, 1.0, 3.0),
                packing_fraction: f64_in_range(g, 0.05, 0.5),
                interaction: if bool::arbitrary(g) {
                    Interaction::Additive
                } else {
                    Interaction::NonAdditive
                },
            }
        };

        let displacement = if bool::arbitrary(g) {
            DisplacementKernel::Forward
        } else {
            DisplacementKernel::Symmetric
        };

        Self {
            seed: u64::arbitrary(g),
            num_moves: usize_in_range(g, 0, 500),
            equilibration_sweeps: 0,
            production_sweeps: None,
            report_every: 100,
            max_trial_distance: f64_in_range(g, 0.01, 2.0),
            displacement,
            swap_probability: f64_in_range(g, 0.0, 0.5),
            system,
            tuning: None,
        }
    }
}
