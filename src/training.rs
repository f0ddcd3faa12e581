/// Module that contains optimization algorithms for network training
pub mod optimizer;
/// Module that contains the mini-batch trainer and training data types
pub mod trainer;

pub use optimizer::*;
pub use trainer::*;
