use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::species::Species;

/// Global particle index. A particles come first, then B.
pub type ParticleId = usize;

#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    id: ParticleId,
    species: Species,
    pos: Position,
}

impl Particle {
    pub fn new(id: ParticleId, species: Species, pos: Position) -> Self {
        Self { id, species, pos }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn pos(&self) -> Position {
        self.pos
    }
}

/// Coordinate store: one ordered position sequence per species.
/// Counts are fixed at construction, only positions ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particles {
    positions: [Vec<Position>; 2],
}

impl Particles {
    pub fn new(a: Vec<Position>, b: Vec<Position>) -> Self {
        Self { positions: [a, b] }
    }

    pub fn num_particles(&self) -> usize {
        self.positions[0].len() + self.positions[1].len()
    }

    pub fn count(&self, s: Species) -> usize {
        self.positions[s.index()].len()
    }

    pub fn positions(&self, s: Species) -> &[Position] {
        &self.positions[s.index()]
    }

    /// Maps a global id onto (species, index within species).
    pub fn locate(&self, p_id: ParticleId) -> (Species, usize) {
        let n_a = self.count(Species::A);
        if p_id < n_a {
            (Species::A, p_id)
        } else {
            (Species::B, p_id - n_a)
        }
    }

    pub fn pos(&self, s: Species, idx: usize) -> Position {
        self.positions[s.index()][idx]
    }

    pub fn update_pos(&mut self, s: Species, idx: usize, new_pos: Position) {
        self.positions[s.index()][idx] = new_pos;
    }

    pub fn particle(&self, p_id: ParticleId) -> Particle {
        let (s, idx) = self.locate(p_id);
        Particle::new(p_id, s, self.pos(s, idx))
    }

    pub fn iter(&self) -> ParticleIterator<'_> {
        ParticleIterator::new(self)
    }
}

pub struct ParticleIterator<'a> {
    particles: &'a Particles,
    index: usize,
}

impl<'a> ParticleIterator<'a> {
    fn new(particles: &'a Particles) -> Self {
        Self {
            particles,
            index: 0,
        }
    }
}

impl Iterator for ParticleIterator<'_> {
    type Item = Particle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.particles.num_particles() {
            return None;
        }
        let p = self.particles.particle(self.index);
        self.index += 1;
        Some(p)
    }
}
