use super::Vector;
use crate::math;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Activation function enum, supporting Linear, ReLU, Sigmoid, Tanh, and Softmax
///
/// `Softmax` is only meaningful as an output-layer activation: it is computed over
/// the full vector and its gradient is folded into the paired loss during backward
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Linear,
    ReLU,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    /// Applies the activation function to a pre-activation vector.
    ///
    /// # Parameters
    ///
    /// * `z` - Pre-activation sums of one layer
    ///
    /// # Returns
    ///
    /// * `Vector` - A new vector with the activation function applied
    pub fn apply(&self, z: &Vector) -> Vector {
        match self {
            Activation::Linear => z.clone(),
            Activation::ReLU => z.mapv(|x| if x > 0.0 { x } else { 0.0 }),
            Activation::Sigmoid => z.mapv(sigmoid),
            Activation::Tanh => z.mapv(f64::tanh),
            Activation::Softmax => math::softmax(z),
        }
    }

    /// Computes the derivative with respect to the pre-activation input.
    ///
    /// Both the pre-activation sums and the activated outputs are provided so that
    /// each function can use whichever form is cheaper (sigmoid and tanh reuse the
    /// activated value, ReLU inspects the raw sum).
    ///
    /// For `Softmax` this returns ones: the softmax Jacobian is handled by the
    /// paired cross-entropy loss, which reduces the output error to
    /// `prediction - target`.
    ///
    /// # Parameters
    ///
    /// - `z` - Pre-activation sums from the forward pass
    /// - `a` - Activated outputs from the forward pass
    ///
    /// # Returns
    ///
    /// * `Vector` - Element-wise derivative values
    pub fn derivative(&self, z: ArrayView1<f64>, a: ArrayView1<f64>) -> Vector {
        match self {
            Activation::Linear => Vector::ones(z.len()),
            // Sub-gradient at exactly 0 is taken as 0
            Activation::ReLU => z.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => a.mapv(|y| y * (1.0 - y)),
            Activation::Tanh => a.mapv(|y| 1.0 - y * y),
            Activation::Softmax => Vector::ones(z.len()),
        }
    }
}

/// Computes the logistic sigmoid for a scalar input.
///
/// Extreme inputs are clipped to 0 or 1 to preserve numerical stability.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    const MAX_SIGMOID_INPUT: f64 = 500.0;

    if z > MAX_SIGMOID_INPUT {
        return 1.0;
    } else if z < -MAX_SIGMOID_INPUT {
        return 0.0;
    }
    1.0 / (1.0 + (-z).exp())
}
