/// Module that contains activation function implementations
pub mod activation;
/// Module that contains network configuration types
pub mod config;
/// Module that contains the serializable model dump format
pub mod dump;
/// Module that contains the dense layer implementation
pub mod layer;
/// Module that contains loss function implementations
pub mod loss;
/// Module that contains the network, forward trace and gradient types
pub mod network;

pub use activation::*;
pub use config::*;
pub use dump::*;
pub use layer::*;
pub use loss::*;
pub use network::*;

/// Type alias for 1D arrays used as activation and gradient vectors
pub type Vector = ndarray::Array1<f64>;
/// Type alias for 2D arrays used as weight matrices
pub type Matrix = ndarray::Array2<f64>;
