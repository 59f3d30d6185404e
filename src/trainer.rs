use std::ops::Range;

use ndarray::{s, Array2};

use crate::error::{Error, Result};
use crate::hyperparameters::TrainingParams;
use crate::network::Network;

/// Per-epoch metrics from one training run, index-aligned by epoch.
#[derive(Debug, Clone, Default)]
pub struct MetricTrace {
    pub train_losses: Vec<f32>,
    pub test_losses: Vec<f32>,
    pub test_accuracies: Vec<f32>,
}

impl MetricTrace {
    pub fn epochs(&self) -> usize {
        self.train_losses.len()
    }

    /// Test accuracy after the last epoch; the sweep's selection criterion.
    pub fn final_test_accuracy(&self) -> Option<f32> {
        self.test_accuracies.last().copied()
    }
}

/// Contiguous, non-overlapping batch ranges over `0..len` in original
/// order. The last range may be shorter. `batch_size` must be nonzero.
pub fn batch_ranges(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    (0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect()
}

/// Trains `network` with mini-batch gradient descent and compounding
/// learning-rate decay, evaluating against the held-out set once per epoch.
///
/// The batch partition is computed once, before the epoch loop, and reused
/// unshuffled for every epoch. Each epoch multiplies the learning rate by
/// 0.95 before any of its batches run, then after all updates records the
/// loss over the entire training set and `(loss, accuracy)` over the test
/// set. Runs for exactly `params.num_epochs` epochs: no early stopping, no
/// divergence or NaN detection.
pub fn train(
    network: &mut Network,
    x_train: &Array2<f32>,
    y_train: &Array2<f32>,
    x_test: &Array2<f32>,
    y_test: &Array2<f32>,
    params: &TrainingParams,
) -> Result<MetricTrace> {
    params.validate()?;
    if x_train.nrows() != y_train.nrows() {
        return Err(Error::ShapeMismatch {
            context: "train",
            expected: vec![x_train.nrows(), network.output_dim()],
            actual: y_train.shape().to_vec(),
        });
    }

    let batches: Vec<(Array2<f32>, Array2<f32>)> =
        batch_ranges(x_train.nrows(), params.batch_size)
            .into_iter()
            .map(|range| {
                (
                    x_train.slice(s![range.clone(), ..]).to_owned(),
                    y_train.slice(s![range, ..]).to_owned(),
                )
            })
            .collect();

    let mut trace = MetricTrace::default();
    let mut learning_rate = params.learning_rate;

    for _ in 0..params.num_epochs {
        learning_rate *= 0.95;

        for (batch_x, batch_y) in &batches {
            let grads = network.backward(batch_x, batch_y)?;
            network.apply_update(&grads, learning_rate);
        }

        trace.train_losses.push(network.loss(x_train, y_train)?);
        let (test_loss, test_accuracy) = network.evaluate(x_test, y_test)?;
        trace.test_losses.push(test_loss);
        trace.test_accuracies.push(test_accuracy);
    }

    Ok(trace)
}
