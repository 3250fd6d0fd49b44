use crate::{
    consts::CONTACT_TOLERANCE,
    particle::Particles,
    position::Position,
    simbox::SimBox,
    species::{Species, SpeciesGeometry},
};

/// Whether the queried position is already written into the store.
/// A member sees itself at distance 0 in its own species group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Member,
    Candidate,
}

// counts discs in `positions` closer than `cutoff_sqd`, stopping once the count exceeds `allowed`
fn group_overlaps(
    simbox: &SimBox,
    positions: &[Position],
    pos: Position,
    cutoff_sqd: f64,
    allowed: usize,
) -> bool {
    let mut matches = 0;
    for &other in positions {
        if simbox.dist_sqd(other, pos) < cutoff_sqd {
            matches += 1;
            if matches > allowed {
                return true;
            }
        }
    }
    false
}

/// Reports whether a disc of `species` at `pos` intersects anything in `particles`.
///
/// The candidate's own species group is scanned first and the other group only
/// if the first one is clear. Assumes every position is already wrapped into the box.
/// Contact comparisons are strict: `d^2 < (contact distance)^2` is an overlap.
pub fn has_overlap(
    simbox: &SimBox,
    geometry: &SpeciesGeometry,
    particles: &Particles,
    species: Species,
    pos: Position,
    membership: Membership,
) -> bool {
    overlaps_with_slack(simbox, geometry, particles, species, pos, membership, 0.0)
}

fn overlaps_with_slack(
    simbox: &SimBox,
    geometry: &SpeciesGeometry,
    particles: &Particles,
    species: Species,
    pos: Position,
    membership: Membership,
    slack: f64,
) -> bool {
    let own_allowance = match membership {
        Membership::Member => 1,
        Membership::Candidate => 0,
    };

    let own = species;
    if group_overlaps(
        simbox,
        particles.positions(own),
        pos,
        geometry.hard_disc_sqd(species, own) * (1.0 - slack),
        own_allowance,
    ) {
        return true;
    }

    let other = species.other();
    group_overlaps(
        simbox,
        particles.positions(other),
        pos,
        geometry.hard_disc_sqd(species, other) * (1.0 - slack),
        0,
    )
}

/// Finds the first stored disc that overlaps any other, scanning A before B.
///
/// Discs placed at exactly the contact distance pass, within [`CONTACT_TOLERANCE`].
pub fn first_overlap(
    simbox: &SimBox,
    geometry: &SpeciesGeometry,
    particles: &Particles,
) -> Option<(Species, usize)> {
    for s in Species::ALL {
        for (idx, &pos) in particles.positions(s).iter().enumerate() {
            let member = Membership::Member;
            let slack = CONTACT_TOLERANCE;
            if overlaps_with_slack(simbox, geometry, particles, s, pos, member, slack) {
                return Some((s, idx));
            }
        }
    }
    None
}
