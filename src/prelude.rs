pub use crate::error::{IoError, NetworkError};
pub use crate::neural_network::{
    Activation, Config, Dump, ForwardTrace, Gradients, LayerDump, LayerGradients, Loss, Matrix,
    Mode, Network, Vector, WeightInitializer,
};
pub use crate::training::{
    Adam, BatchTrainer, EpochReport, Example, Examples, Optimizer, SGD, one_hot, shuffle, split,
};
