use std::fmt;

use itertools::iproduct;

use crate::activation::ActivationType;
use crate::error::{Error, Result};

/// Fixed training-loop parameters shared by every sweep configuration.
#[derive(Debug, Clone)]
pub struct TrainingParams {
    /// Rows per mini-batch
    pub batch_size: usize,

    /// Number of passes over the training set
    pub num_epochs: usize,

    /// Initial learning rate, decayed by 0.95 each epoch
    pub learning_rate: f32,
}

impl Default for TrainingParams {
    fn default() -> Self {
        TrainingParams {
            batch_size: 64,
            num_epochs: 10,
            learning_rate: 0.01,
        }
    }
}

impl TrainingParams {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration(
                "batch size must be nonzero".into(),
            ));
        }
        if self.num_epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "epoch count must be nonzero".into(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// One point of the hyperparameter grid. Immutable: created by the sweep's
/// enumeration, consumed to construct a [`crate::Network`], then kept only
/// for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub hidden_size: usize,
    pub activation: ActivationType,
    pub regularization_strength: f32,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hidden size: {}, Activation: {}, Regularization strength: {}",
            self.hidden_size, self.activation, self.regularization_strength
        )
    }
}

/// The hyperparameter grid swept by [`crate::run_sweep`].
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub hidden_sizes: Vec<usize>,
    pub activations: Vec<ActivationType>,
    pub regularization_strengths: Vec<f32>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        SweepGrid {
            hidden_sizes: vec![32, 64, 128],
            activations: vec![ActivationType::Sigmoid],
            regularization_strengths: vec![0.01, 0.001, 0.0001],
        }
    }
}

impl SweepGrid {
    /// Cartesian product of the grid, in nested order: hidden size
    /// outermost, activation middle, regularization strength innermost.
    /// The order fixes console print ordering and which configuration wins
    /// exact accuracy ties (first seen).
    pub fn configurations(&self) -> Vec<Config> {
        iproduct!(
            &self.hidden_sizes,
            &self.activations,
            &self.regularization_strengths
        )
        .map(|(&hidden_size, &activation, &regularization_strength)| Config {
            hidden_size,
            activation,
            regularization_strength,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_params() {
        let params = TrainingParams::default();

        assert_eq!(params.batch_size, 64);
        assert_eq!(params.num_epochs, 10);
        assert_eq!(params.learning_rate, 0.01);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_training_params() {
        let zero_batch = TrainingParams {
            batch_size: 0,
            ..TrainingParams::default()
        };
        assert!(zero_batch.validate().is_err());

        let negative_rate = TrainingParams {
            learning_rate: -1.0,
            ..TrainingParams::default()
        };
        assert!(negative_rate.validate().is_err());
    }

    #[test]
    fn test_grid_enumeration_order() {
        let grid = SweepGrid::default();
        let configs = grid.configurations();

        assert_eq!(configs.len(), 9);
        // Regularization strength varies fastest, hidden size slowest
        assert_eq!(configs[0].hidden_size, 32);
        assert_eq!(configs[0].regularization_strength, 0.01);
        assert_eq!(configs[1].hidden_size, 32);
        assert_eq!(configs[1].regularization_strength, 0.001);
        assert_eq!(configs[3].hidden_size, 64);
        assert_eq!(configs[8].hidden_size, 128);
        assert_eq!(configs[8].regularization_strength, 0.0001);
        assert!(configs
            .iter()
            .all(|c| c.activation == ActivationType::Sigmoid));
    }

    #[test]
    fn test_config_report_line() {
        let config = Config {
            hidden_size: 64,
            activation: ActivationType::Sigmoid,
            regularization_strength: 0.001,
        };
        assert_eq!(
            config.to_string(),
            "Hidden size: 64, Activation: sigmoid, Regularization strength: 0.001"
        );
    }
}
