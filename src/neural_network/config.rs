use super::{Activation, Loss, Matrix};
use crate::error::NetworkError;
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

/// Problem mode, selecting the output-layer activation and loss pairing
///
/// # Variants
///
/// - `Regression` - linear output with mean squared error
/// - `MultiClass` - softmax output with categorical cross-entropy
/// - `BinaryClass` - sigmoid output with binary cross-entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Regression,
    MultiClass,
    BinaryClass,
}

impl Mode {
    /// Returns the activation applied to the output layer in this mode.
    pub fn output_activation(&self) -> Activation {
        match self {
            Mode::Regression => Activation::Linear,
            Mode::MultiClass => Activation::Softmax,
            Mode::BinaryClass => Activation::Sigmoid,
        }
    }

    /// Returns the loss function paired with this mode's output activation.
    pub fn loss(&self) -> Loss {
        match self {
            Mode::Regression => Loss::MeanSquared,
            Mode::MultiClass => Loss::CrossEntropy,
            Mode::BinaryClass => Loss::BinaryCrossEntropy,
        }
    }
}

/// Distribution sampled per weight when a network is constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInitializer {
    Normal { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
}

impl WeightInitializer {
    /// Validates the distribution parameters.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the parameters describe a valid distribution
    /// - `Err(NetworkError::Configuration)` - Otherwise
    pub fn validate(&self) -> Result<(), NetworkError> {
        match *self {
            WeightInitializer::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(NetworkError::Configuration(format!(
                        "Invalid normal initializer: mean = {}, std_dev = {}",
                        mean, std_dev
                    )));
                }
            }
            WeightInitializer::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(NetworkError::Configuration(format!(
                        "Invalid uniform initializer: low = {}, high = {}",
                        low, high
                    )));
                }
            }
        }
        Ok(())
    }

    /// Samples a freshly initialized weight matrix from the distribution.
    ///
    /// # Parameters
    ///
    /// - `rows` - Neuron count of the layer
    /// - `cols` - Input width of the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Matrix)` - Weight matrix with shape `(rows, cols)`
    /// - `Err(NetworkError::Configuration)` - If the distribution parameters are invalid
    pub fn sample_matrix(&self, rows: usize, cols: usize) -> Result<Matrix, NetworkError> {
        self.validate()?;
        let weights = match *self {
            WeightInitializer::Normal { mean, std_dev } => {
                let dist = Normal::new(mean, std_dev).map_err(|e| {
                    NetworkError::Configuration(format!("Invalid normal initializer: {}", e))
                })?;
                Array::random((rows, cols), dist)
            }
            WeightInitializer::Uniform { low, high } => {
                Array::random((rows, cols), Uniform::new(low, high))
            }
        };
        Ok(weights)
    }
}

/// Configuration of a feed-forward network
///
/// # Fields
///
/// - `inputs` - Width of the external input vector, must be positive
/// - `layout` - Neuron count of every hidden layer and, as the last entry, the
///   output layer; must be non-empty with positive entries. The last entry is the
///   output width and must match the response vectors used in training.
/// - `activation` - Activation applied to the hidden layers
/// - `mode` - Selects the output-layer activation and loss pairing
/// - `weight` - Distribution sampled per weight at construction
/// - `bias` - Whether every neuron carries a learnable bias term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub inputs: usize,
    pub layout: Vec<usize>,
    pub activation: Activation,
    pub mode: Mode,
    pub weight: WeightInitializer,
    pub bias: bool,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the configuration can be built into a network
    /// - `Err(NetworkError::Configuration)` - If any dimension is non-positive,
    ///   the layout is empty, or the initializer is invalid
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.inputs == 0 {
            return Err(NetworkError::Configuration(
                "Input width must be positive".to_string(),
            ));
        }
        if self.layout.is_empty() {
            return Err(NetworkError::Configuration(
                "Layout must contain at least one layer".to_string(),
            ));
        }
        if let Some(pos) = self.layout.iter().position(|&n| n == 0) {
            return Err(NetworkError::Configuration(format!(
                "Layout entry {} must be positive",
                pos
            )));
        }
        self.weight.validate()
    }

    /// Width of the output layer (the last layout entry).
    pub fn output_width(&self) -> usize {
        *self.layout.last().expect("Layout validated to be non-empty")
    }
}
