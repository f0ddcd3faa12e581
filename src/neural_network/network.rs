use super::{Config, Layer, Matrix, Vector};
use crate::error::NetworkError;
use ndarray::{ArrayView1, Axis};

/// A feed-forward neural network built from a [`Config`].
///
/// The network owns its layers and their weight data exclusively. Forward and
/// backward passes take `&self` and communicate through an explicit
/// [`ForwardTrace`]; only [`Network::apply_deltas`] mutates the weights.
///
/// # Example
/// ```rust
/// use deepnet::prelude::*;
///
/// let network = Network::new(Config {
///     inputs: 4,
///     layout: vec![8, 3],
///     activation: Activation::ReLU,
///     mode: Mode::MultiClass,
///     weight: WeightInitializer::Normal { mean: 0.0, std_dev: 0.1 },
///     bias: true,
/// })
/// .unwrap();
///
/// let input = ndarray::array![0.1, 0.2, 0.3, 0.4];
/// let prediction = network.predict(input.view()).unwrap();
/// assert_eq!(prediction.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    config: Config,
    layers: Vec<Layer>,
}

/// The record of one forward pass, consumed by [`Network::backward`].
///
/// Holds the external input together with every layer's pre-activation sums and
/// activated outputs. Keeping the trace as an explicit value means a forward pass
/// never mutates the network and concurrent passes over the same network are safe.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    input: Vector,
    sums: Vec<Vector>,
    outputs: Vec<Vector>,
}

impl ForwardTrace {
    /// The network output of this pass (the last layer's activated outputs).
    pub fn output(&self) -> ArrayView1<'_, f64> {
        self.outputs
            .last()
            .expect("Trace is only built for networks with at least one layer")
            .view()
    }

    /// Consumes the trace, returning the output vector.
    pub fn into_output(mut self) -> Vector {
        self.outputs
            .pop()
            .expect("Trace is only built for networks with at least one layer")
    }
}

/// Per-layer weight and bias gradients (or optimizer-produced deltas).
///
/// The bias buffer is allocated even for bias-free networks; it is simply ignored
/// when deltas are applied. Accumulation is plain addition, so summing a batch is
/// order-independent.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub bias: Vector,
}

/// Gradients for every layer of a network, in layer order.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub layers: Vec<LayerGradients>,
}

impl Gradients {
    /// Creates zeroed gradient buffers matching the network's layer shapes.
    pub fn zeros_like(network: &Network) -> Self {
        let layers = network
            .layers
            .iter()
            .map(|layer| LayerGradients {
                weights: Matrix::zeros((layer.neurons(), layer.inputs())),
                bias: Vector::zeros(layer.neurons()),
            })
            .collect();
        Self { layers }
    }

    /// Adds another gradient set into this one, layer by layer.
    pub fn accumulate(&mut self, other: &Gradients) {
        for (acc, grad) in self.layers.iter_mut().zip(other.layers.iter()) {
            acc.weights += &grad.weights;
            acc.bias += &grad.bias;
        }
    }

    /// Scales every gradient by a constant factor (e.g. `1 / batch_size`).
    pub fn scale(&mut self, factor: f64) {
        for layer in &mut self.layers {
            layer.weights.mapv_inplace(|g| g * factor);
            layer.bias.mapv_inplace(|g| g * factor);
        }
    }
}

impl Network {
    /// Builds a network from a configuration, sampling every weight from the
    /// configured initializer.
    ///
    /// Hidden layers use `config.activation`; the output layer's activation is
    /// determined by `config.mode`. Biases, when enabled, start at zero.
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - A freshly initialized network
    /// - `Err(NetworkError::Configuration)` - If the configuration is invalid
    pub fn new(config: Config) -> Result<Self, NetworkError> {
        config.validate()?;

        let depth = config.layout.len();
        let mut layers = Vec::with_capacity(depth);
        let mut inputs = config.inputs;
        for (i, &neurons) in config.layout.iter().enumerate() {
            let activation = if i == depth - 1 {
                config.mode.output_activation()
            } else {
                config.activation
            };
            layers.push(Layer::new(
                inputs,
                neurons,
                activation,
                &config.weight,
                config.bias,
            )?);
            inputs = neurons;
        }

        Ok(Self { config, layers })
    }

    pub(crate) fn from_layers(config: Config, layers: Vec<Layer>) -> Self {
        Self { config, layers }
    }

    /// Returns the configuration this network was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the layers in order, first hidden layer to output layer.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Runs forward propagation and returns the full trace.
    ///
    /// # Parameters
    ///
    /// * `input` - Feature vector of length `config.inputs`
    ///
    /// # Returns
    ///
    /// - `Ok(ForwardTrace)` - Input plus per-layer sums and outputs
    /// - `Err(NetworkError::ShapeMismatch)` - If the input length disagrees with
    ///   the configured width
    pub fn forward(&self, input: ArrayView1<f64>) -> Result<ForwardTrace, NetworkError> {
        if input.len() != self.config.inputs {
            return Err(NetworkError::ShapeMismatch(format!(
                "Input has length {}, network expects {}",
                input.len(),
                self.config.inputs
            )));
        }

        let mut sums = Vec::with_capacity(self.layers.len());
        let mut outputs: Vec<Vector> = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            // Borrow of the previous output must end before pushing into `outputs`
            let (z, a) = if i == 0 {
                layer.forward(input)
            } else {
                layer.forward(outputs[i - 1].view())
            };
            sums.push(z);
            outputs.push(a);
        }

        Ok(ForwardTrace {
            input: input.to_owned(),
            sums,
            outputs,
        })
    }

    /// Runs forward propagation and returns only the output vector.
    ///
    /// Deterministic: identical weights and input always yield identical output.
    /// Does not mutate the network.
    ///
    /// # Parameters
    ///
    /// * `input` - Feature vector of length `config.inputs`
    ///
    /// # Returns
    ///
    /// - `Ok(Vector)` - Output of length `config.output_width()`
    /// - `Err(NetworkError::ShapeMismatch)` - If the input length is wrong
    pub fn predict(&self, input: ArrayView1<f64>) -> Result<Vector, NetworkError> {
        Ok(self.forward(input)?.into_output())
    }

    /// Computes per-layer gradients for one example via backpropagation.
    ///
    /// The output-layer error is the derivative of the mode's loss with respect to
    /// the output pre-activation (`prediction - response` for all three pairings).
    /// Each earlier layer's error is the next layer's error projected through the
    /// transposed weight matrix, scaled by the local activation derivative. Per
    /// layer, the weight gradient is the outer product of its error and its input,
    /// and the bias gradient equals the error.
    ///
    /// Weights are not mutated; applying updates is the optimizer's job.
    ///
    /// # Parameters
    ///
    /// - `trace` - The forward trace of the example's input
    /// - `response` - Ground truth vector of length `config.output_width()`
    ///
    /// # Returns
    ///
    /// - `Ok(Gradients)` - Weight and bias gradients for every layer
    /// - `Err(NetworkError::ShapeMismatch)` - If the response length disagrees
    ///   with the output width
    pub fn backward(
        &self,
        trace: &ForwardTrace,
        response: ArrayView1<f64>,
    ) -> Result<Gradients, NetworkError> {
        let output_width = self.config.output_width();
        if response.len() != output_width {
            return Err(NetworkError::ShapeMismatch(format!(
                "Response has length {}, network outputs {}",
                response.len(),
                output_width
            )));
        }

        let loss = self.config.mode.loss();
        let mut delta = loss.delta(response, trace.output());

        let mut layers = Vec::with_capacity(self.layers.len());
        for l in (0..self.layers.len()).rev() {
            let layer_input = if l == 0 {
                trace.input.view()
            } else {
                trace.outputs[l - 1].view()
            };

            // Weight gradient: outer product of this layer's error and its input
            let grad_weights = delta
                .view()
                .insert_axis(Axis(1))
                .dot(&layer_input.insert_axis(Axis(0)));
            let grad_bias = delta.clone();

            if l > 0 {
                let projected = self.layers[l].weights().t().dot(&delta);
                let local = self.layers[l - 1]
                    .activation()
                    .derivative(trace.sums[l - 1].view(), trace.outputs[l - 1].view());
                delta = projected * local;
            }

            layers.push(LayerGradients {
                weights: grad_weights,
                bias: grad_bias,
            });
        }
        layers.reverse();

        Ok(Gradients { layers })
    }

    /// Adds optimizer-produced deltas to every layer's weights and biases in place.
    ///
    /// # Parameters
    ///
    /// * `deltas` - Per-layer deltas, shaped like [`Gradients::zeros_like`]
    ///
    /// # Returns
    ///
    /// - `Ok(())` - All layers updated
    /// - `Err(NetworkError::ShapeMismatch)` - If the delta shapes disagree with
    ///   the network's layers
    pub fn apply_deltas(&mut self, deltas: &Gradients) -> Result<(), NetworkError> {
        if deltas.layers.len() != self.layers.len() {
            return Err(NetworkError::ShapeMismatch(format!(
                "Deltas cover {} layers, network has {}",
                deltas.layers.len(),
                self.layers.len()
            )));
        }
        for (layer, delta) in self.layers.iter_mut().zip(deltas.layers.iter()) {
            if delta.weights.dim() != layer.weights().dim() || delta.bias.len() != layer.neurons()
            {
                return Err(NetworkError::ShapeMismatch(format!(
                    "Delta shape {:?} does not match layer shape {:?}",
                    delta.weights.dim(),
                    layer.weights().dim()
                )));
            }
            layer.apply_deltas(&delta.weights, &delta.bias);
        }
        Ok(())
    }
}
