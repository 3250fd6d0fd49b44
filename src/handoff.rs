use serde::Serialize;

use crate::{
    particle::Particles,
    position::Position,
    simbox::SimBox,
    species::{Species, SpeciesGeometry},
};

/// Borrowed final configuration for downstream tessellation / network analysis.
///
/// At handoff every position lies in [0, L) and no two discs overlap.
#[derive(Debug, Clone, Copy)]
pub struct Handoff<'a> {
    simbox: &'a SimBox,
    species: &'a SpeciesGeometry,
    particles: &'a Particles,
}

impl<'a> Handoff<'a> {
    pub fn new(simbox: &'a SimBox, species: &'a SpeciesGeometry, particles: &'a Particles) -> Self {
        Self {
            simbox,
            species,
            particles,
        }
    }

    pub fn box_extents(&self) -> [f64; 2] {
        [self.simbox.width(), self.simbox.height()]
    }

    pub fn positions(&self, s: Species) -> &'a [Position] {
        self.particles.positions(s)
    }

    pub fn radius(&self, s: Species) -> f64 {
        self.species.radius(s)
    }

    pub fn snapshot(&self) -> Snapshot {
        let coords = |s: Species| -> Vec<[f64; 2]> {
            self.positions(s).iter().map(|p| [p.x(), p.y()]).collect()
        };
        Snapshot {
            box_extents: self.box_extents(),
            radius_a: self.radius(Species::A),
            radius_b: self.radius(Species::B),
            coords_a: coords(Species::A),
            coords_b: coords(Species::B),
        }
    }
}

/// Owned, serializable copy of a handoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub box_extents: [f64; 2],
    pub radius_a: f64,
    pub radius_b: f64,
    pub coords_a: Vec<[f64; 2]>,
    pub coords_b: Vec<[f64; 2]>,
}

/// Implemented by whatever consumes finished configurations.
pub trait AnalysisHandoff {
    type Output;
    fn analyse(&mut self, handoff: &Handoff<'_>) -> Self::Output;
}
