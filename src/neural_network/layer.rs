use super::{Activation, Matrix, Vector, WeightInitializer};
use crate::error::NetworkError;
use ndarray::ArrayView1;

/// One dense layer: a weight matrix, an optional bias vector and an activation.
///
/// The weight matrix has shape `(neurons, inputs)` - one row per neuron, one
/// column per input from the previous layer (or the external input for the first
/// layer). The layer holds no forward-pass state; pre-activation sums and outputs
/// live in the [`ForwardTrace`](super::ForwardTrace) returned by the network.
#[derive(Debug, Clone)]
pub struct Layer {
    weights: Matrix,
    bias: Option<Vector>,
    activation: Activation,
}

impl Layer {
    /// Creates a layer with freshly sampled weights and zero-initialized biases.
    ///
    /// # Parameters
    ///
    /// - `inputs` - Width of the incoming vector
    /// - `neurons` - Neuron count of this layer
    /// - `activation` - Activation applied to the pre-activation sums
    /// - `initializer` - Distribution sampled per weight
    /// - `bias` - Whether to allocate a learnable bias term per neuron
    pub fn new(
        inputs: usize,
        neurons: usize,
        activation: Activation,
        initializer: &WeightInitializer,
        bias: bool,
    ) -> Result<Self, NetworkError> {
        let weights = initializer.sample_matrix(neurons, inputs)?;
        let bias = bias.then(|| Vector::zeros(neurons));
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    /// Rebuilds a layer from explicit weights, used when restoring a dump.
    pub(crate) fn from_parts(weights: Matrix, bias: Option<Vector>, activation: Activation) -> Self {
        Self {
            weights,
            bias,
            activation,
        }
    }

    /// Runs the layer forward.
    ///
    /// # Parameters
    ///
    /// * `input` - Output of the previous layer (or the external input)
    ///
    /// # Returns
    ///
    /// * `(Vector, Vector)` - The pre-activation sums and the activated outputs
    pub fn forward(&self, input: ArrayView1<f64>) -> (Vector, Vector) {
        let mut sums = self.weights.dot(&input);
        if let Some(bias) = &self.bias {
            sums += bias;
        }
        let outputs = self.activation.apply(&sums);
        (sums, outputs)
    }

    /// Number of neurons in this layer.
    pub fn neurons(&self) -> usize {
        self.weights.nrows()
    }

    /// Width of the incoming vector.
    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns a reference to the weight matrix, shape `(neurons, inputs)`.
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Returns a reference to the bias vector, if biases are enabled.
    pub fn bias(&self) -> Option<&Vector> {
        self.bias.as_ref()
    }

    /// Returns the activation function of this layer.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Adds deltas to the weights and, when present, the biases in place.
    pub(crate) fn apply_deltas(&mut self, weight_deltas: &Matrix, bias_deltas: &Vector) {
        self.weights += weight_deltas;
        if let Some(bias) = &mut self.bias {
            *bias += bias_deltas;
        }
    }
}
