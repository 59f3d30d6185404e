use std::path::Path;
use std::process::ExitCode;

use sweepnet::{
    report, run_sweep, save_parameters, sweep_failure, Dataset, Error, SweepGrid, TrainingParams,
    BEST_MODEL_PATH,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> sweepnet::Result<()> {
    let data = Dataset::load(Path::new("data"))?;

    let grid = SweepGrid::default();
    let params = TrainingParams::default();
    let mut rng = rand::rng();

    let outcome = run_sweep(&grid, &params, &data, &mut rng)?;
    let Some(outcome) = outcome else {
        return Err(Error::InvalidConfiguration(
            "no configuration reached a positive validation accuracy".into(),
        ));
    };

    save_parameters(&outcome.network, Path::new(BEST_MODEL_PATH))?;

    let (_, test_accuracy) = outcome
        .network
        .evaluate(&data.test_images, &data.test_labels)
        .map_err(|e| sweep_failure(&outcome.config, "evaluation", e))?;
    report::announce_test_accuracy(test_accuracy);
    report::plot_trace(&outcome.trace);

    Ok(())
}
