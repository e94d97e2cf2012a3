//! One end-to-end run: generate a population, play the epidemic over it and write the reports.

use crate::{
    error::HandshakeError,
    info,
    params::Params,
    report::write_reports,
    simulation::Summary,
    warn,
};
use std::path::Path;

/// Runs `params` (after clamping) and writes the reports into `output_dir`.
pub fn run(params: Params, output_dir: impl AsRef<Path>) -> Result<Summary, HandshakeError> {
    let output_dir = output_dir.as_ref();
    let params = params.normalized();

    let generation = params.generate();
    info!("seed {} (re-use it to replay this run)", generation.seed);
    if !generation.is_complete() {
        warn!(
            "{} people could not complete their handshakes: {:?}",
            generation.failed_ids.len(),
            generation.failed_ids
        );
    }

    let output = params.simulate(&generation);
    let summary = output.summary();
    info!(
        "epidemic ended at t = {}: peak of {} infectious at t = {}, {} infections in total",
        summary.end_time, summary.peak_infectious, summary.peak_time, summary.total_infections
    );
    info!(
        "{} susceptible and {} removed at the end (attack rate {:.3})",
        summary.final_susceptible, summary.final_removed, summary.attack_rate
    );

    write_reports(output_dir, &output)?;
    info!("reports written to {}", output_dir.display());
    Ok(summary)
}
