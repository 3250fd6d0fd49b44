use error::{HdmcError, Result};
use hdmc::{Hdmc, McParams};
use lattice::build_lattice;
use params::InputParams;
use species::Species;
use stats::RunStats;

pub mod cli;
pub mod consts;
pub mod error;
pub mod handoff;
pub mod hdmc;
pub mod io;
pub mod lattice;
pub mod overlap;
pub mod params;
pub mod particle;
pub mod position;
pub mod simbox;
pub mod species;
pub mod stats;
pub mod tuning;

pub type Prng = rand_xoshiro::Xoshiro256StarStar;

/// Validates the inputs, builds the starting lattice and wraps it in a simulator.
/// Nothing here touches the rng, so lattice construction is identical for every seed.
pub fn hdmc_from_config(ip: &InputParams) -> Result<Hdmc> {
    let geometry = ip.derive()?;
    log::info!(
        "Number of particles: T={} A={} B={}",
        geometry.num_particles(),
        geometry.count(Species::A),
        geometry.count(Species::B)
    );
    log::info!(
        "Packing fraction: T={:.4} A={:.4} B={:.4}, composition {:.4}",
        geometry.packing_fraction(),
        geometry.partial_packing_fraction(Species::A),
        geometry.partial_packing_fraction(Species::B),
        geometry.composition()
    );

    let (simbox, particles) = build_lattice(&ip.system, &geometry)?;

    let max_trial_distance = ip.scaled_max_trial_distance();
    if max_trial_distance >= simbox.min_extent() {
        return Err(HdmcError::Config(format!(
            "max_trial_distance {max_trial_distance} must be smaller than the box ({:.4})",
            simbox.min_extent()
        )));
    }

    let params = McParams::new(max_trial_distance, ip.displacement)
        .with_swap_probability(ip.swap_probability);
    Ok(Hdmc::new(simbox, geometry, particles, params))
}

pub trait HdmcCallback {
    type CbResult;
    // runs after every `report_every` moves
    fn run(&mut self, hdmc: &Hdmc, moves_done: usize, run_stats: &RunStats);
    fn state(&self) -> Self::CbResult;
}

/// Runs `num_moves` trial moves in chunks of `report_every`, calling back after each chunk.
/// Returns the stats for the whole run and the callback's final state.
pub fn run_hdmc<Cbr>(
    hdmc: &mut Hdmc,
    num_moves: usize,
    report_every: usize,
    mut callback: Option<Box<dyn HdmcCallback<CbResult = Cbr>>>,
    rng: &mut Prng,
) -> (RunStats, Option<Cbr>) {
    let report_every = report_every.max(1);
    let mut run_stats = RunStats::new();
    let mut moves_done = 0;
    while moves_done < num_moves {
        let chunk = report_every.min(num_moves - moves_done);
        let stats = hdmc.step_n(chunk, rng);
        run_stats = stats + run_stats;
        moves_done += chunk;
        log::info!(
            "Moves and acceptance: {} {:.4}",
            moves_done,
            run_stats.acceptance_ratio()
        );
        if let Some(ref mut cb) = callback {
            cb.run(hdmc, moves_done, &run_stats);
        }
    }
    (run_stats, callback.map(|cb| cb.state()))
}
