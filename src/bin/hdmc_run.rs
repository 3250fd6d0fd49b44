use std::fs::create_dir_all;

use anyhow::anyhow;
use clap::Parser;
use hdmc::cli::HdmcConfig;
use hdmc::hdmc::Hdmc;
use hdmc::io::{
    clear_out_files, read_input_params, write_input_params, write_snapshot_json, XYZWriter,
};
use hdmc::params::InputParams;
use hdmc::stats::RunStats;
use hdmc::tuning::tune_max_trial_distance;
use hdmc::{hdmc_from_config, run_hdmc, HdmcCallback, Prng};
use rand::SeedableRng;

struct StdCallback {
    writer: XYZWriter,
    write_error: Option<String>,
}

impl HdmcCallback for StdCallback {
    type CbResult = Option<String>;

    fn run(&mut self, hdmc: &Hdmc, moves_done: usize, run_stats: &RunStats) {
        if self.write_error.is_none() {
            if let Err(e) = self.writer.write_xyz_frame(&hdmc.handoff()) {
                self.write_error = Some(e.to_string());
            }
        }
        log::debug!(
            "Step {moves_done}: acceptance ratio {:.4}",
            run_stats.acceptance_ratio()
        );
    }

    fn state(&self) -> Self::CbResult {
        self.write_error.clone()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Get commandline arguments
    let config = HdmcConfig::parse();

    let mut ip = if !config.input().is_empty() {
        log::info!("Using requested config: {}", config.input());
        read_input_params(config.input())?
    } else {
        log::info!("No config provided. Using default config");
        InputParams::default()
    };
    if let Some(seed) = config.seed() {
        ip.seed = seed;
    }

    // Seed the rng
    log::info!("Using seed = {:?}", ip.seed);
    let mut rng = Prng::seed_from_u64(ip.seed);

    // Generate the simulator; lattice errors stop the run here
    let mut hdmc = hdmc_from_config(&ip)?;

    // Init I/O
    log::info!("Writing output to {}", config.output_dir());
    create_dir_all(config.output_dir())?;
    clear_out_files(&config)?;
    write_input_params(&ip, &config.toml())?;
    let mut writer = XYZWriter::new(&config.trajectory())?;

    if !hdmc.well_formed() {
        return Err(anyhow!("initial configuration is not well formed"));
    }
    log::info!("Initial configuration ok");

    if let Some(tuning) = &ip.tuning {
        let report = tune_max_trial_distance(&mut hdmc, tuning, &mut rng);
        log::info!(
            "Tuning finished ({:?}): trial distance {:.6}, acceptance {:.4}",
            report.outcome,
            report.max_trial_distance,
            report.acceptance
        );
    }

    let equilibration_moves = ip.equilibration_moves();
    if equilibration_moves > 0 {
        log::info!("Equilibrating for {equilibration_moves} moves");
        let (eq_stats, _) = run_hdmc::<()>(
            &mut hdmc,
            equilibration_moves,
            ip.report_every,
            None,
            &mut rng,
        );
        log::info!(
            "Equilibration acceptance {:.4}, swaps {}/{}",
            eq_stats.acceptance_ratio(),
            eq_stats.num_swap_accepts(),
            eq_stats.num_swap_attempts()
        );
    }

    // Run the simulation; only production is written out
    writer.write_xyz_frame(&hdmc.handoff())?;
    let (run_stats, write_error) = run_hdmc(
        &mut hdmc,
        ip.production_moves(),
        ip.report_every,
        Some(Box::new(StdCallback {
            writer,
            write_error: None,
        })),
        &mut rng,
    );
    if let Some(Some(e)) = write_error {
        return Err(anyhow!("failed to write trajectory: {e}"));
    }

    log::info!(
        "Accepted {}/{} moves ({:.4}), swaps {}/{}",
        run_stats.num_accepts(),
        run_stats.num_attempts(),
        run_stats.acceptance_ratio(),
        run_stats.num_swap_accepts(),
        run_stats.num_swap_attempts()
    );
    debug_assert!(hdmc.well_formed());

    write_snapshot_json(&hdmc.handoff(), &config.snapshot())?;
    Ok(())
}
