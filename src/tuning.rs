use crate::consts::{TUNING_ACCEPTANCE_SLACK, TUNING_MIN_DELTA_FACTOR, TUNING_TRIAL_POINTS};
use crate::hdmc::Hdmc;
use crate::params::TuningParams;
use crate::Prng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneOutcome {
    Converged,
    /// Even the smallest trial distance is accepted less often than the target.
    TooDense,
    /// Even the largest trial distance is accepted more often than the target.
    TooDilute,
    IterationLimit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuneReport {
    pub outcome: TuneOutcome,
    pub max_trial_distance: f64,
    pub acceptance: f64,
}

fn measure_acceptance(hdmc: &mut Hdmc, sweeps: usize, rng: &mut Prng) -> f64 {
    let moves = sweeps * hdmc.particles().num_particles();
    hdmc.step_n(moves, rng).acceptance_ratio()
}

fn log_spaced(lower: f64, upper: f64, points: usize) -> Vec<f64> {
    let (lo, hi) = (lower.log10(), upper.log10());
    let mut r: Vec<f64> = (0..points)
        .map(|i| 10f64.powf(lo + i as f64 * (hi - lo) / (points - 1) as f64))
        .collect();
    // pin the ends so rounding never steps outside [lower, upper]
    r[0] = lower;
    r[points - 1] = upper;
    r
}

/// Searches for a trial distance whose acceptance ratio is close to the target.
///
/// Scans log-spaced distances between a hundredth of the smallest radius and
/// half the box, narrows the bracket around the target and repeats.
/// The engine keeps running real moves throughout, so the configuration is
/// equilibrated as a side effect and stays overlap free.
pub fn tune_max_trial_distance(
    hdmc: &mut Hdmc,
    tuning: &TuningParams,
    rng: &mut Prng,
) -> TuneReport {
    let target = tuning.target_acceptance;
    let sweeps = tuning.sweeps_per_trial;
    let mut delta_min = TUNING_MIN_DELTA_FACTOR * hdmc.geometry().species().min_radius();
    let mut delta_max = 0.5 * hdmc.simbox().min_extent();

    let mut iteration = 0;
    loop {
        let trial_deltas = log_spaced(delta_min, delta_max, TUNING_TRIAL_POINTS);
        let trial_probs: Vec<f64> = trial_deltas
            .iter()
            .map(|&delta| {
                hdmc.set_max_trial_distance(delta);
                measure_acceptance(hdmc, sweeps, rng)
            })
            .collect();

        let last = TUNING_TRIAL_POINTS - 1;
        let bracket_failure = if trial_probs[0] < target {
            hdmc.set_max_trial_distance(trial_deltas[0]);
            Some(TuneOutcome::TooDense)
        } else if trial_probs[last] > target {
            hdmc.set_max_trial_distance(trial_deltas[last]);
            Some(TuneOutcome::TooDilute)
        } else {
            // probabilities fall as delta grows: tighten the bracket on both sides
            for (&delta, &p) in trial_deltas.iter().zip(trial_probs.iter()) {
                if p > target {
                    delta_min = delta;
                } else if p < target {
                    delta_max = delta;
                    break;
                }
            }
            let midpoint = 0.5 * (delta_min.log10() + delta_max.log10());
            hdmc.set_max_trial_distance(10f64.powf(midpoint));
            None
        };

        let acceptance = measure_acceptance(hdmc, sweeps, rng);
        let report = |outcome| TuneReport {
            outcome,
            max_trial_distance: hdmc.params().max_trial_distance(),
            acceptance,
        };

        if let Some(outcome) = bracket_failure {
            if iteration == 0 {
                log::warn!("Could not bracket target acceptance {target}: {outcome:?}");
                return report(outcome);
            }
        }
        log::info!(
            "Delta: {:.6} acceptance: {:.4}",
            hdmc.params().max_trial_distance(),
            acceptance
        );

        if (acceptance - target).abs() < TUNING_ACCEPTANCE_SLACK {
            return report(TuneOutcome::Converged);
        }
        if iteration >= tuning.max_iterations {
            log::warn!("Iteration limit hit while tuning trial distance");
            return report(TuneOutcome::IterationLimit);
        }
        iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_spaced_hits_both_ends() {
        let xs = log_spaced(0.01, 100.0, 5);
        assert_eq!(xs.len(), 5);
        assert_relative_eq!(xs[0], 0.01, max_relative = 1e-12);
        assert_relative_eq!(xs[2], 1.0, max_relative = 1e-12);
        assert_relative_eq!(xs[4], 100.0, max_relative = 1e-12);
    }
}
