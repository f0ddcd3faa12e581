/// Module `error` contains the error types reported by the crate.
///
/// - `NetworkError` - configuration, shape-mismatch and corrupt-dump errors
/// - `IoError` - file and JSON errors from model persistence
pub mod error;

/// Module `math` contains the numeric primitives the network core depends on.
///
/// # Core Functions
///
/// ## Statistical Functions
/// - `mean` - arithmetic mean
/// - `variance` - sample variance with Bessel's correction
/// - `standard_deviation` - square root of the sample variance
/// - `standardize` - z-score transformation
/// - `normalize` - min/max scaling to [0, 1]
///
/// ## Vector Operations
/// - `min` / `max` / `sum` / `dot` - reductions over 1D arrays
/// - `argmax` - index of the largest element, earliest index on ties
/// - `softmax` - numerically stable softmax over a full vector
/// - `sgn` / `round_half_up` - scalar helpers
///
/// # Example
/// ```rust
/// use deepnet::math::{argmax, softmax};
/// use ndarray::array;
///
/// let probabilities = softmax(&array![1.0, 3.0, 2.0]);
/// assert_eq!(argmax(&probabilities), 1);
/// ```
pub mod math;

/// Components for building and running feed-forward neural networks.
///
/// # Core Components
///
/// - **Config / Mode / WeightInitializer**: network shape, output pairing and
///   weight initialization distribution
/// - **Activation**: Linear, ReLU, Sigmoid, Tanh and Softmax with derivatives
/// - **Loss**: mean squared error, categorical and binary cross-entropy
/// - **Network**: layered model with forward propagation, backpropagation and
///   in-place weight updates
/// - **ForwardTrace**: explicit record of one forward pass, consumed by the
///   backward pass
/// - **Dump**: serializable snapshot of configuration plus all weights; restoring
///   it reproduces identical predictions
///
/// # Example
/// ```rust
/// use deepnet::prelude::*;
/// use ndarray::array;
///
/// let network = Network::new(Config {
///     inputs: 2,
///     layout: vec![4, 2],
///     activation: Activation::Tanh,
///     mode: Mode::MultiClass,
///     weight: WeightInitializer::Normal { mean: 0.0, std_dev: 0.5 },
///     bias: true,
/// })
/// .unwrap();
///
/// let prediction = network.predict(array![0.5, -0.5].view()).unwrap();
/// assert!((prediction.sum() - 1.0).abs() < 1e-9);
/// ```
pub mod neural_network;

/// Components for training networks over mini-batches.
///
/// # Core Components
///
/// - **Optimizer**: trait converting averaged batch gradients into weight deltas
/// - **SGD**: momentum, learning-rate decay and optional Nesterov lookahead
/// - **Adam**: bias-corrected first/second moment estimates
/// - **BatchTrainer**: epoch/shuffle/mini-batch control loop with held-out
///   evaluation after each epoch
/// - **Example / one_hot / shuffle / split**: training data plumbing
pub mod training;

/// A convenience module that re-exports the most commonly used types of the crate.
pub mod prelude;
