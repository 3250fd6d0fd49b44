use crate::handoff::Handoff;
use crate::overlap::{first_overlap, has_overlap, Membership};
use crate::params::SystemGeometry;
use crate::particle::{ParticleId, Particles};
use crate::position::{random_displacement, DisplacementKernel, PosDifference, Position};
use crate::simbox::SimBox;
use crate::species::Species;
use crate::stats::RunStats;
use crate::Prng;
use rand::Rng;

/// Trial move parameters. The trial distance is in absolute units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McParams {
    max_trial_distance: f64,
    kernel: DisplacementKernel,
    swap_probability: f64,
}

impl McParams {
    pub fn new(max_trial_distance: f64, kernel: DisplacementKernel) -> Self {
        Self {
            max_trial_distance,
            kernel,
            swap_probability: 0.0,
        }
    }

    pub fn with_swap_probability(mut self, swap_probability: f64) -> Self {
        self.swap_probability = swap_probability;
        self
    }

    pub fn swap_probability(&self) -> f64 {
        self.swap_probability
    }

    pub fn max_trial_distance(&self) -> f64 {
        self.max_trial_distance
    }

    pub fn kernel(&self) -> DisplacementKernel {
        self.kernel
    }
}

// single particle move, lives for one trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposedMove {
    p_id: ParticleId,
    species: Species,
    idx: usize,
    prev_pos: Position,
    new_pos: Position,
}

impl ProposedMove {
    pub fn p_id(&self) -> ParticleId {
        self.p_id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn prev_pos(&self) -> Position {
        self.prev_pos
    }

    pub fn new_pos(&self) -> Position {
        self.new_pos
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    Rejected,
}

/// Simulation context: cell, species geometry, coordinate store and move parameters.
/// The engine is the only thing that mutates the store.
#[derive(Debug, Clone)]
pub struct Hdmc {
    simbox: SimBox,
    geometry: SystemGeometry,
    particles: Particles,
    params: McParams,
    lifetime_stats: RunStats,
}

impl Hdmc {
    pub fn new(
        simbox: SimBox,
        geometry: SystemGeometry,
        particles: Particles,
        params: McParams,
    ) -> Self {
        Self {
            simbox,
            geometry,
            particles,
            params,
            lifetime_stats: RunStats::new(),
        }
    }

    pub fn simbox(&self) -> &SimBox {
        &self.simbox
    }

    pub fn geometry(&self) -> &SystemGeometry {
        &self.geometry
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn params(&self) -> &McParams {
        &self.params
    }

    /// Every attempt and accept since construction, tuning included.
    pub fn lifetime_stats(&self) -> &RunStats {
        &self.lifetime_stats
    }

    pub fn set_max_trial_distance(&mut self, max_trial_distance: f64) {
        self.params.max_trial_distance = max_trial_distance;
    }

    pub fn choose_random_p_id(&self, rng: &mut Prng) -> ParticleId {
        assert_ne!(self.particles.num_particles(), 0);
        rng.random_range(0..self.particles.num_particles())
    }

    /// Builds the move record for displacing `p_id` by `delta`, wrapped into the box.
    pub fn propose_move(&self, p_id: ParticleId, delta: PosDifference) -> ProposedMove {
        let (species, idx) = self.particles.locate(p_id);
        let prev_pos = self.particles.pos(species, idx);
        let new_pos = self.simbox.map_pos_into_box(prev_pos + delta);
        ProposedMove {
            p_id,
            species,
            idx,
            prev_pos,
            new_pos,
        }
    }

    /// Exchanges the positions of `p_i` and `p_j`, then displaces each by its own delta.
    pub fn propose_swap(
        &self,
        p_i: ParticleId,
        p_j: ParticleId,
        delta_i: PosDifference,
        delta_j: PosDifference,
    ) -> [ProposedMove; 2] {
        let (species_i, idx_i) = self.particles.locate(p_i);
        let (species_j, idx_j) = self.particles.locate(p_j);
        let pos_i = self.particles.pos(species_i, idx_i);
        let pos_j = self.particles.pos(species_j, idx_j);
        [
            ProposedMove {
                p_id: p_i,
                species: species_i,
                idx: idx_i,
                prev_pos: pos_i,
                new_pos: self.simbox.map_pos_into_box(pos_j + delta_i),
            },
            ProposedMove {
                p_id: p_j,
                species: species_j,
                idx: idx_j,
                prev_pos: pos_j,
                new_pos: self.simbox.map_pos_into_box(pos_i + delta_j),
            },
        ]
    }

    fn random_delta(&self, rng: &mut Prng) -> PosDifference {
        random_displacement(rng, self.params.max_trial_distance, self.params.kernel)
    }

    // swaps need a second particle; with swaps off nothing extra is drawn
    fn choose_swap(&self, rng: &mut Prng) -> bool {
        self.params.swap_probability > 0.0
            && self.particles.num_particles() > 1
            && rng.random::<f64>() < self.params.swap_probability
    }

    fn move_overlaps(&self, mov: &ProposedMove) -> bool {
        has_overlap(
            &self.simbox,
            self.geometry.species(),
            &self.particles,
            mov.species,
            mov.new_pos,
            Membership::Member,
        )
    }

    /// Writes the proposed position into the store, then keeps it or rolls it back.
    pub fn attempt_move(&mut self, mov: &ProposedMove) -> MoveOutcome {
        self.particles.update_pos(mov.species, mov.idx, mov.new_pos);

        if self.move_overlaps(mov) {
            self.particles.update_pos(mov.species, mov.idx, mov.prev_pos);
            MoveOutcome::Rejected
        } else {
            MoveOutcome::Accepted
        }
    }

    /// Writes both halves of a swap, then keeps them or rolls both back.
    /// The pair itself is tested too, since both new positions are in the store.
    pub fn attempt_swap(&mut self, movs: &[ProposedMove; 2]) -> MoveOutcome {
        for mov in movs {
            self.particles.update_pos(mov.species, mov.idx, mov.new_pos);
        }

        if movs.iter().any(|mov| self.move_overlaps(mov)) {
            for mov in movs {
                self.particles.update_pos(mov.species, mov.idx, mov.prev_pos);
            }
            MoveOutcome::Rejected
        } else {
            MoveOutcome::Accepted
        }
    }

    pub fn step(&mut self, rng: &mut Prng, stats: &mut RunStats) -> MoveOutcome {
        stats.record_attempt();
        self.lifetime_stats.record_attempt();

        // 1. Choose a particle
        let p_id = self.choose_random_p_id(rng);
        let outcome = if self.choose_swap(rng) {
            stats.record_swap_attempt();
            self.lifetime_stats.record_swap_attempt();
            // 2. Choose a partner
            let mut p_j = p_id;
            while p_j == p_id {
                p_j = self.choose_random_p_id(rng);
            }
            // 3. Choose displacements
            let delta_i = self.random_delta(rng);
            let delta_j = self.random_delta(rng);
            let movs = self.propose_swap(p_id, p_j, delta_i, delta_j);
            let outcome = self.attempt_swap(&movs);
            if outcome == MoveOutcome::Accepted {
                stats.record_swap_accept();
                self.lifetime_stats.record_swap_accept();
            }
            outcome
        } else {
            // 2. Choose a displacement
            let delta = self.random_delta(rng);
            let mov = self.propose_move(p_id, delta);
            self.attempt_move(&mov)
        };

        if outcome == MoveOutcome::Accepted {
            stats.record_accept();
            self.lifetime_stats.record_accept();
        }
        outcome
    }

    pub fn step_n(&mut self, n: usize, rng: &mut Prng) -> RunStats {
        let mut run_stats = RunStats::new();
        for _ in 0..n {
            self.step(rng, &mut run_stats);
        }
        log::debug!(
            "Successful moves: {:?}/{:?}",
            run_stats.num_accepts(),
            run_stats.num_attempts()
        );
        run_stats
    }

    pub fn has_overlaps(&self) -> bool {
        first_overlap(&self.simbox, self.geometry.species(), &self.particles).is_some()
    }

    // run a bunch of checks on the simulation to make sure it looks good
    // O(n^2), so only used around runs and in tests
    pub fn well_formed(&self) -> bool {
        for s in Species::ALL {
            if self.particles.count(s) != self.geometry.count(s) {
                log::error!("Particle count for {:?} changed", s);
                return false;
            }
        }

        for p in self.particles.iter() {
            if !self.simbox.pos_in_box(p.pos()) {
                log::error!("Pos not in box!: {:?}", p);
                return false;
            }
        }

        if let Some((s, idx)) =
            first_overlap(&self.simbox, self.geometry.species(), &self.particles)
        {
            log::error!("Sim has overlaps! First at {:?} {}", s, idx);
            return false;
        }

        true
    }

    /// Read-only view handed to downstream analysis.
    pub fn handoff(&self) -> Handoff<'_> {
        Handoff::new(&self.simbox, self.geometry.species(), &self.particles)
    }
}
