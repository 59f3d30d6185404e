use rand::Rng;

use crate::error::{Error, Result};
use crate::hyperparameters::{Config, SweepGrid, TrainingParams};
use crate::mnist::Dataset;
use crate::network::Network;
use crate::report;
use crate::trainer::{train, MetricTrace};

/// A trained candidate from the sweep: the model, the configuration that
/// produced it, and its full per-epoch metric trace. The winner's trace is
/// retained here so reporting always plots the selected model's history.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub network: Network,
    pub config: Config,
    pub trace: MetricTrace,
}

/// Tracks the best candidate across the sweep.
///
/// A candidate replaces the incumbent only when its final-epoch test
/// accuracy is strictly greater, so exact ties keep the earlier
/// configuration. The threshold starts at zero: a candidate that never
/// beats 0.0 accuracy is not selected at all.
#[derive(Debug, Default)]
pub struct BestModel {
    best_accuracy: f32,
    outcome: Option<SweepOutcome>,
}

impl BestModel {
    pub fn new() -> Self {
        BestModel::default()
    }

    pub fn offer(&mut self, candidate: SweepOutcome) {
        let accuracy = candidate.trace.final_test_accuracy().unwrap_or(0.0);
        if accuracy > self.best_accuracy {
            self.best_accuracy = accuracy;
            self.outcome = Some(candidate);
        }
    }

    pub fn best_accuracy(&self) -> f32 {
        self.best_accuracy
    }

    pub fn take(self) -> Option<SweepOutcome> {
        self.outcome
    }
}

/// Trains one model per grid configuration and returns the winner.
///
/// Configurations run in the grid's nested enumeration order, each with a
/// fresh [`Network`] and the shared [`TrainingParams`]. Every
/// configuration's report lines print as it finishes. There is no
/// per-configuration isolation: the first failure aborts the whole sweep,
/// wrapped so the diagnostic names the configuration and the failing
/// stage.
///
/// Returns `None` when no configuration reached a positive validation
/// accuracy.
pub fn run_sweep(
    grid: &SweepGrid,
    params: &TrainingParams,
    data: &Dataset,
    rng: &mut impl Rng,
) -> Result<Option<SweepOutcome>> {
    let input_dim = data.feature_dim();
    let mut best = BestModel::new();

    for config in grid.configurations() {
        let mut network = Network::new(
            input_dim,
            config.hidden_size,
            data.num_classes,
            config.activation,
            config.regularization_strength,
            rng,
        )
        .map_err(|e| sweep_failure(&config, "construction", e))?;

        let trace = train(
            &mut network,
            &data.train_images,
            &data.train_labels,
            &data.test_images,
            &data.test_labels,
            params,
        )
        .map_err(|e| sweep_failure(&config, "training", e))?;

        let validation_accuracy = trace.final_test_accuracy().unwrap_or(0.0);
        report::announce_configuration(&config, validation_accuracy);

        best.offer(SweepOutcome {
            network,
            config,
            trace,
        });
    }

    Ok(best.take())
}

/// Wraps an error with the configuration and stage it came from.
pub fn sweep_failure(config: &Config, stage: &'static str, source: Error) -> Error {
    Error::Sweep {
        hidden_size: config.hidden_size,
        activation: config.activation.to_string(),
        regularization_strength: config.regularization_strength,
        stage,
        source: Box::new(source),
    }
}
