use super::Vector;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

// Predictions are clipped away from 0 and 1 before taking logarithms
const LOG_CLIP: f64 = 1e-12;

/// Loss function enum, paired with an output activation by [`Mode`](super::Mode)
///
/// # Variants
///
/// - `MeanSquared` - mean squared error, paired with a linear output
/// - `CrossEntropy` - categorical cross-entropy over one-hot responses, paired with softmax
/// - `BinaryCrossEntropy` - binary cross-entropy, paired with sigmoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loss {
    MeanSquared,
    CrossEntropy,
    BinaryCrossEntropy,
}

impl Loss {
    /// Computes the loss between a response vector and a prediction.
    ///
    /// # Parameters
    ///
    /// - `response` - Ground truth vector (one-hot encoded for classification)
    /// - `prediction` - Network output vector
    ///
    /// # Returns
    ///
    /// * `f64` - The scalar loss value
    pub fn loss(&self, response: ArrayView1<f64>, prediction: ArrayView1<f64>) -> f64 {
        match self {
            Loss::MeanSquared => {
                let n = prediction.len() as f64;
                response
                    .iter()
                    .zip(prediction.iter())
                    .map(|(y, p)| (p - y) * (p - y))
                    .sum::<f64>()
                    / n
            }
            Loss::CrossEntropy => -response
                .iter()
                .zip(prediction.iter())
                .map(|(y, p)| y * p.clamp(LOG_CLIP, 1.0 - LOG_CLIP).ln())
                .sum::<f64>(),
            Loss::BinaryCrossEntropy => -response
                .iter()
                .zip(prediction.iter())
                .map(|(y, p)| {
                    let p = p.clamp(LOG_CLIP, 1.0 - LOG_CLIP);
                    y * p.ln() + (1.0 - y) * (1.0 - p).ln()
                })
                .sum::<f64>(),
        }
    }

    /// Computes the error of the output layer with respect to its pre-activation.
    ///
    /// For each of the three mode pairings (linear + mean squared, softmax +
    /// cross-entropy, sigmoid + binary cross-entropy) the output activation's
    /// Jacobian cancels against the loss derivative, leaving
    /// `prediction - response`.
    ///
    /// # Parameters
    ///
    /// - `response` - Ground truth vector
    /// - `prediction` - Network output vector
    ///
    /// # Returns
    ///
    /// * `Vector` - Output-layer error, the starting point of backpropagation
    pub fn delta(&self, response: ArrayView1<f64>, prediction: ArrayView1<f64>) -> Vector {
        &prediction - &response
    }
}
