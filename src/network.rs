use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::activation::ActivationType;
use crate::error::{Error, Result};

/// A two-layer fully-connected classifier.
///
/// Owns its parameter arrays exclusively; only [`Network::apply_update`]
/// mutates them. The same activation drives both the hidden and the output
/// layer, and its derivative is used in both layers' backward steps.
#[derive(Debug, Clone)]
pub struct Network {
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
    pub activation: ActivationType,
    pub regularization_strength: f32,
}

/// Loss gradients for every parameter array, field-for-field parallel to
/// [`Network`].
#[derive(Debug, Clone)]
pub struct Gradients {
    pub dw1: Array2<f32>,
    pub db1: Array1<f32>,
    pub dw2: Array2<f32>,
    pub db2: Array1<f32>,
}

impl Network {
    /// Constructs a network with variance-scaled weight initialization.
    ///
    /// # Arguments
    ///
    /// * `input_dim` - Width of the input feature vectors
    /// * `hidden_size` - Width of the hidden layer
    /// * `output_dim` - Number of classes
    /// * `activation` - Activation shared by both layers
    /// * `regularization_strength` - L2 penalty added to weight gradients
    /// * `rng` - Source for the initial weight draws
    ///
    /// Weights are drawn from `Normal(0, 1/sqrt(fan_in))`; biases start at
    /// zero.
    pub fn new(
        input_dim: usize,
        hidden_size: usize,
        output_dim: usize,
        activation: ActivationType,
        regularization_strength: f32,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if input_dim == 0 || hidden_size == 0 || output_dim == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "layer dimensions must be nonzero, got {input_dim}x{hidden_size}x{output_dim}"
            )));
        }
        if !regularization_strength.is_finite() || regularization_strength < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "regularization strength must be finite and non-negative, got \
                 {regularization_strength}"
            )));
        }

        let w1 = variance_scaled(input_dim, hidden_size, rng)?;
        let w2 = variance_scaled(hidden_size, output_dim, rng)?;

        Ok(Network {
            w1,
            b1: Array1::zeros(hidden_size),
            w2,
            b2: Array1::zeros(output_dim),
            activation,
            regularization_strength,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.w1.nrows()
    }

    pub fn hidden_size(&self) -> usize {
        self.w1.ncols()
    }

    pub fn output_dim(&self) -> usize {
        self.w2.ncols()
    }

    /// Total number of scalar parameters across both layers.
    pub fn parameter_count(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + self.b2.len()
    }

    /// Forward inference over a batch: `act(act(X·W1 + b1)·W2 + b2)`.
    ///
    /// Pure; returns one prediction row per input row.
    pub fn forward(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        self.check_features("forward", x)?;
        let z1 = x.dot(&self.w1) + &self.b1;
        let a1 = self.activation.apply(&z1);
        let z2 = a1.dot(&self.w2) + &self.b2;
        Ok(self.activation.apply(&z2))
    }

    /// Computes loss gradients for one batch via the reverse-mode chain
    /// rule, using the shared activation's derivative in both layers.
    ///
    /// The output-layer error is taken as `y_pred - y`, and the L2 term
    /// `λ·W` is added to both weight gradients (biases stay unregularized).
    /// Pure with respect to model state; the caller applies the result
    /// through [`Network::apply_update`].
    pub fn backward(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<Gradients> {
        self.check_features("backward", x)?;
        self.check_targets("backward", x, y)?;

        let z1 = x.dot(&self.w1) + &self.b1;
        let a1 = self.activation.apply(&z1);
        let z2 = a1.dot(&self.w2) + &self.b2;
        let y_pred = self.activation.apply(&z2);

        let d_y_pred = &y_pred - y;
        let dz2 = &d_y_pred * &self.activation.derivative(&z2)?;
        let dw2 = a1.t().dot(&dz2) + self.regularization_strength * &self.w2;
        let db2 = dz2.sum_axis(Axis(0));
        let da1 = dz2.dot(&self.w2.t());
        let dz1 = &da1 * &self.activation.derivative(&z1)?;
        let dw1 = x.t().dot(&dz1) + self.regularization_strength * &self.w1;
        let db1 = dz1.sum_axis(Axis(0));

        Ok(Gradients { dw1, db1, dw2, db2 })
    }

    /// Gradient-descent step: `p ← p − lr·grad` for all four parameter
    /// arrays, in place.
    pub fn apply_update(&mut self, grads: &Gradients, learning_rate: f32) {
        self.w1 -= &(learning_rate * &grads.dw1);
        self.b1 -= &(learning_rate * &grads.db1);
        self.w2 -= &(learning_rate * &grads.dw2);
        self.b2 -= &(learning_rate * &grads.db2);
    }

    /// Mean binary-cross-entropy over every (row, class) cell:
    /// `-mean(y·ln(p) + (1−y)·ln(1−p))`.
    ///
    /// Deliberately the binary form applied to one-hot multi-class targets,
    /// not categorical cross-entropy, and with no epsilon clamping.
    pub fn loss(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<f32> {
        self.check_targets("loss", x, y)?;
        let p = self.forward(x)?;
        let log_p = p.mapv(f32::ln);
        let log_not_p = p.mapv(|v| (1.0 - v).ln());
        let term = y * &log_p + (1.0 - y) * &log_not_p;
        Ok(-term.sum() / term.len() as f32)
    }

    /// Returns `(loss, accuracy)` over a labelled batch, where accuracy is
    /// the fraction of rows whose predicted argmax matches the target
    /// argmax.
    pub fn evaluate(&self, x: &Array2<f32>, y: &Array2<f32>) -> Result<(f32, f32)> {
        self.check_targets("evaluate", x, y)?;
        let y_pred = self.forward(x)?;
        let correct = y_pred
            .axis_iter(Axis(0))
            .zip(y.axis_iter(Axis(0)))
            .filter(|(pred, target)| argmax(pred) == argmax(target))
            .count();
        let accuracy = correct as f32 / y.nrows() as f32;
        Ok((self.loss(x, y)?, accuracy))
    }

    fn check_features(&self, context: &'static str, x: &Array2<f32>) -> Result<()> {
        if x.ncols() != self.input_dim() {
            return Err(Error::ShapeMismatch {
                context,
                expected: vec![x.nrows(), self.input_dim()],
                actual: x.shape().to_vec(),
            });
        }
        Ok(())
    }

    fn check_targets(&self, context: &'static str, x: &Array2<f32>, y: &Array2<f32>) -> Result<()> {
        if y.nrows() != x.nrows() || y.ncols() != self.output_dim() {
            return Err(Error::ShapeMismatch {
                context,
                expected: vec![x.nrows(), self.output_dim()],
                actual: y.shape().to_vec(),
            });
        }
        Ok(())
    }
}

fn variance_scaled(fan_in: usize, fan_out: usize, rng: &mut impl Rng) -> Result<Array2<f32>> {
    let std_dev = (fan_in as f32).sqrt().recip();
    let normal = Normal::new(0.0, std_dev)
        .map_err(|e| Error::InvalidConfiguration(format!("weight initialization: {e}")))?;
    Ok(Array2::from_shape_fn((fan_in, fan_out), |_| {
        normal.sample(rng)
    }))
}

/// Index of the largest value in a row; ties go to the earliest index.
fn argmax(row: &ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}
