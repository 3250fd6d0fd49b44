//! Overlap-free starting configurations.
//!
//! Monodisperse systems sit on a hexagonal lattice scaled to the requested
//! packing fraction. Binary systems are tiled with square blocks, each holding
//! either a small square grid of A discs or a single B disc.

use std::f64::consts::PI;

use crate::{
    error::{HdmcError, Result},
    overlap::first_overlap,
    params::{exact_square_dim, SystemGeometry, SystemParams},
    particle::Particles,
    position::Position,
    simbox::SimBox,
    species::{Species, SpeciesGeometry},
};

/// Builds the starting configuration for `system` and checks it for overlaps.
pub fn build_lattice(
    system: &SystemParams,
    geometry: &SystemGeometry,
) -> Result<(SimBox, Particles)> {
    let (simbox, particles) = match *system {
        SystemParams::Monodisperse {
            num_particles,
            radius,
            packing_fraction,
        } => hexagonal_lattice(num_particles, radius, packing_fraction)?,
        SystemParams::Binary { .. } => block_lattice(geometry)?,
    };

    if let Some((species, index)) = first_overlap(&simbox, geometry.species(), &particles) {
        return Err(HdmcError::LatticeOverlap { species, index });
    }
    log::info!("Initial lattice is overlap free");
    Ok((simbox, particles))
}

/// Hexagonal lattice of `n = dim * dim` discs of radius `sigma` at packing fraction `phi`.
///
/// Nearest neighbours sit `2 * sigma * sf` apart with
/// `sf = sqrt(pi / (2 sqrt(3) phi))`, so the lattice is only overlap free for
/// `phi` up to hexagonal close packing.
pub fn hexagonal_lattice(n: usize, sigma: f64, phi: f64) -> Result<(SimBox, Particles)> {
    let dim = exact_square_dim(n).ok_or_else(|| {
        HdmcError::Config(format!(
            "hexagonal lattice needs a perfect square particle count, got {n}"
        ))
    })?;

    let sqrt3 = 3.0_f64.sqrt();
    let sf = (PI / (2.0 * sqrt3 * phi)).sqrt();
    let dx = sigma * 2.0 * sf;
    let dy = sigma * sqrt3 * sf;
    let simbox = SimBox::new([dim as f64 * dx, dim as f64 * dy]);

    let mut positions = Vec::with_capacity(n);
    for i in 0..dim {
        // odd rows are staggered by half a column
        let x_offset = if i % 2 == 0 { 0.0 } else { 0.5 * dx };
        let y = i as f64 * dy;
        for j in 0..dim {
            positions.push(Position::new([j as f64 * dx + x_offset, y]));
        }
    }

    log::info!(
        "Hexagonal lattice: {dim}x{dim}, spacing ({dx:.4}, {dy:.4}), box {:.4} x {:.4}",
        simbox.width(),
        simbox.height()
    );
    Ok((simbox, Particles::new(positions, Vec::new())))
}

/// Block bookkeeping for the binary packer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockPlan {
    pub capacity: [usize; 2],
    pub full_blocks: [usize; 2],
    pub remainder: [usize; 2],
    pub total_blocks: usize,
}

impl BlockPlan {
    pub fn new(n_a: usize, n_b: usize, radius_ratio: f64) -> Self {
        let a_side = radius_ratio.floor() as usize;
        let capacity = [a_side * a_side, 1];
        let counts = [n_a, n_b];
        let full_blocks = [counts[0] / capacity[0], counts[1] / capacity[1]];
        let remainder = [counts[0] % capacity[0], counts[1] % capacity[1]];
        let needed = full_blocks[0] + full_blocks[1] + remainder[0] + remainder[1];
        let side = (needed as f64).sqrt().ceil() as usize;
        Self {
            capacity,
            full_blocks,
            remainder,
            total_blocks: side * side,
        }
    }

    pub fn blocks_per_side(&self) -> usize {
        (self.total_blocks as f64).sqrt().round() as usize
    }

    pub fn spacer_blocks(&self) -> usize {
        self.total_blocks
            - self.full_blocks[0]
            - self.full_blocks[1]
            - self.remainder[0]
            - self.remainder[1]
    }

    /// Area the blocks need if each one is as wide as a B disc.
    pub fn needed_area(&self, species: &SpeciesGeometry) -> f64 {
        let d_b = 2.0 * species.radius(Species::B);
        self.total_blocks as f64 * d_b * d_b
    }
}

// first `count` offsets of a `side * side` grid filling one block of width `block_dim`, row by row
fn sub_lattice(side: usize, block_dim: f64, count: usize) -> impl Iterator<Item = Position> {
    let delta = block_dim / side as f64;
    (0..count.min(side * side)).map(move |k| {
        let (i, j) = (k / side, k % side);
        Position::new([j as f64 * delta, i as f64 * delta])
    })
}

/// Block lattice for a binary system in a square cell.
///
/// Blocks are handed out A, B, A, B, ... in row order. Once one species has
/// been fully placed the other takes every following block until it is done;
/// whatever is left over stays empty.
pub fn block_lattice(geometry: &SystemGeometry) -> Result<(SimBox, Particles)> {
    let species = geometry.species();
    let n_a = geometry.count(Species::A);
    let n_b = geometry.count(Species::B);
    let radius_ratio = species.radius(Species::B) / species.radius(Species::A);
    let plan = BlockPlan::new(n_a, n_b, radius_ratio);

    log::info!(
        "Block lattice: full blocks A={} B={}, remainder A={} B={}, spacers {}",
        plan.full_blocks[0],
        plan.full_blocks[1],
        plan.remainder[0],
        plan.remainder[1],
        plan.spacer_blocks()
    );

    let needed = plan.needed_area(species);
    let available = geometry.cell_area();
    if !(needed < available) {
        return Err(HdmcError::LatticeOverflow { needed, available });
    }

    let simbox = SimBox::square(geometry.cell_length());
    let side = plan.blocks_per_side();
    let block_dim = (available / plan.total_blocks as f64).sqrt();
    let block_side = [radius_ratio.floor() as usize, 1];

    let mut positions: [Vec<Position>; 2] = [Vec::with_capacity(n_a), Vec::with_capacity(n_b)];
    let mut remaining = [n_a, n_b];
    let mut next = Species::A;
    for i in 0..side {
        for j in 0..side {
            let s = if remaining[next.index()] > 0 {
                next
            } else if remaining[next.other().index()] > 0 {
                next.other()
            } else {
                // spacer
                continue;
            };

            let origin = Position::new([j as f64 * block_dim, i as f64 * block_dim]);
            let placed = remaining[s.index()].min(plan.capacity[s.index()]);
            for offset in sub_lattice(block_side[s.index()], block_dim, placed) {
                positions[s.index()].push(simbox.map_pos_into_box(origin + offset));
            }
            remaining[s.index()] -= placed;
            next = s.other();
        }
    }
    debug_assert_eq!(remaining, [0, 0]);

    let [a, b] = positions;
    Ok((simbox, Particles::new(a, b)))
}
