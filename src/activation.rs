use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis};

use crate::error::{Error, Result};

/// Enum representing different activation function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    ReLU,
    Sigmoid,
    Softmax,
}

impl ActivationType {
    /// Applies the activation function to a batch of pre-activations,
    /// returning an array of the same shape. Softmax normalizes each row
    /// independently, with the usual max-subtraction for numeric stability.
    pub fn apply(&self, x: &Array2<f32>) -> Array2<f32> {
        match self {
            ActivationType::ReLU => x.mapv(|v| v.max(0.0)),
            ActivationType::Sigmoid => x.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            ActivationType::Softmax => {
                let mut out = x.clone();
                for mut row in out.axis_iter_mut(Axis(0)) {
                    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                    row.mapv_inplace(|v| (v - max).exp());
                    let sum = row.sum();
                    row.mapv_inplace(|v| v / sum);
                }
                out
            }
        }
    }

    /// Computes the derivative of the activation function with respect to
    /// its pre-activation input, elementwise.
    ///
    /// ReLU's derivative at exactly 0 is 0. Softmax has no elementwise
    /// derivative branch, so selecting it for a layer that must
    /// backpropagate is rejected rather than silently producing garbage.
    pub fn derivative(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        match self {
            ActivationType::ReLU => Ok(x.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })),
            ActivationType::Sigmoid => {
                let s = self.apply(x);
                Ok(s.mapv(|v| v * (1.0 - v)))
            }
            ActivationType::Softmax => Err(Error::InvalidConfiguration(
                "softmax has no elementwise derivative and cannot drive backpropagation".into(),
            )),
        }
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationType::ReLU => "relu",
            ActivationType::Sigmoid => "sigmoid",
            ActivationType::Softmax => "softmax",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ActivationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relu" => Ok(ActivationType::ReLU),
            "sigmoid" => Ok(ActivationType::Sigmoid),
            "softmax" => Ok(ActivationType::Softmax),
            other => Err(Error::InvalidConfiguration(format!(
                "unsupported activation `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_activation_functions() {
        let x = array![[-1.0, 0.0, 2.0]];

        // ReLU clamps negatives to zero and passes positives through
        let relu = ActivationType::ReLU.apply(&x);
        assert_eq!(relu, array![[0.0, 0.0, 2.0]]);

        // Sigmoid at 0 is exactly 0.5, and everything lands in (0, 1)
        let sigmoid = ActivationType::Sigmoid.apply(&x);
        assert!((sigmoid[[0, 1]] - 0.5).abs() < f32::EPSILON);
        for &v in sigmoid.iter() {
            assert!(v > 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let x = array![[1.0, 2.0, 3.0], [-5.0, 0.0, 5.0], [100.0, 100.0, 100.0]];
        let out = ActivationType::Softmax.apply(&x);
        for row in out.axis_iter(Axis(0)) {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
        // Max-subtraction keeps large inputs from overflowing to NaN
        let large = array![[1000.0, 1001.0]];
        let out = ActivationType::Softmax.apply(&large);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_activation_derivatives() {
        let x = array![[-2.0, 0.0, 3.0]];

        // ReLU derivative is 0 at exactly 0 (boundary convention)
        let relu = ActivationType::ReLU.derivative(&x).unwrap();
        assert_eq!(relu, array![[0.0, 0.0, 1.0]]);

        // Sigmoid derivative at 0 is 0.25
        let sigmoid = ActivationType::Sigmoid.derivative(&x).unwrap();
        assert!((sigmoid[[0, 1]] - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_softmax_has_no_derivative() {
        let x = array![[0.0, 1.0]];
        assert!(matches!(
            ActivationType::Softmax.derivative(&x),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_parse_activation_names() {
        assert_eq!("relu".parse::<ActivationType>().unwrap(), ActivationType::ReLU);
        assert_eq!(
            "sigmoid".parse::<ActivationType>().unwrap(),
            ActivationType::Sigmoid
        );
        assert_eq!(
            "softmax".parse::<ActivationType>().unwrap(),
            ActivationType::Softmax
        );
        assert!(matches!(
            "tanh".parse::<ActivationType>(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [
            ActivationType::ReLU,
            ActivationType::Sigmoid,
            ActivationType::Softmax,
        ] {
            assert_eq!(kind.to_string().parse::<ActivationType>().unwrap(), kind);
        }
    }
}
