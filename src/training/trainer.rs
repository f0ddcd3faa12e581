use super::Optimizer;
use crate::error::NetworkError;
use crate::math;
use crate::neural_network::{Gradients, Mode, Network, Vector};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rayon::prelude::*;

/// One training example: a feature vector and its expected response.
///
/// The response is one-hot encoded for classification (see [`one_hot`]) or a raw
/// numeric vector for regression. Input lengths must match the network's
/// configured input width, response lengths its output width.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Vector,
    pub response: Vector,
}

/// A collection of training examples.
pub type Examples = Vec<Example>;

/// Produces a one-hot encoded vector of the given width.
///
/// # Parameters
///
/// - `classes` - Number of classes (the vector length)
/// - `index` - The target class, set to 1.0
///
/// # Examples
/// ```rust
/// use deepnet::training::one_hot;
/// use deepnet::math::argmax;
///
/// let encoded = one_hot(10, 3);
/// assert_eq!(encoded.len(), 10);
/// assert_eq!(encoded[3], 1.0);
/// assert_eq!(argmax(&encoded), 3);
/// ```
pub fn one_hot(classes: usize, index: usize) -> Vector {
    let mut encoded = Vector::zeros(classes);
    if index < classes {
        encoded[index] = 1.0;
    }
    encoded
}

/// Shuffles examples in place using the thread-local random source.
pub fn shuffle(examples: &mut [Example]) {
    examples.shuffle(&mut rand::rng());
}

/// Splits examples into two sets at `ratio` (0.0 to 1.0).
///
/// The split is positional; shuffle first for a random partition.
pub fn split(mut examples: Examples, ratio: f64) -> (Examples, Examples) {
    let boundary = (examples.len() as f64 * ratio.clamp(0.0, 1.0)).round() as usize;
    let second = examples.split_off(boundary.min(examples.len()));
    (examples, second)
}

/// Held-out evaluation results for one completed epoch.
///
/// Accuracy is the fraction of test examples whose predicted class (argmax of the
/// prediction) matches the response class; it is NaN for regression, where only
/// the loss is meaningful. Reports are observational only, evaluation never
/// mutates weights.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
}

/// Mini-batch trainer: shuffles, batches, backpropagates and applies one
/// optimizer step per batch.
///
/// # Example
/// ```rust,no_run
/// use deepnet::prelude::*;
/// use ndarray::array;
///
/// let mut network = Network::new(Config {
///     inputs: 2,
///     layout: vec![4, 2],
///     activation: Activation::ReLU,
///     mode: Mode::MultiClass,
///     weight: WeightInitializer::Normal { mean: 0.0, std_dev: 0.5 },
///     bias: true,
/// })
/// .unwrap();
///
/// let examples = vec![
///     Example { input: array![1.0, 1.0], response: one_hot(2, 1) },
///     Example { input: array![-1.0, -1.0], response: one_hot(2, 0) },
/// ];
///
/// let mut optimizer = Adam::new(0.02, 0.9, 0.999, 1e-8).unwrap();
/// let trainer = BatchTrainer::new(16, true).unwrap();
/// let reports = trainer
///     .train(&mut network, &mut optimizer, &examples, &examples, 10)
///     .unwrap();
/// println!("final accuracy: {}", reports.last().unwrap().accuracy);
/// ```
pub struct BatchTrainer {
    batch_size: usize,
    verbose: bool,
}

impl BatchTrainer {
    /// Creates a new trainer.
    ///
    /// # Parameters
    ///
    /// - `batch_size` - Examples per mini-batch, must be positive
    /// - `verbose` - Enables the progress bar
    ///
    /// # Returns
    ///
    /// - `Ok(BatchTrainer)` - A new trainer
    /// - `Err(NetworkError::Configuration)` - If `batch_size` is zero
    pub fn new(batch_size: usize, verbose: bool) -> Result<Self, NetworkError> {
        if batch_size == 0 {
            return Err(NetworkError::Configuration(
                "Batch size must be positive".to_string(),
            ));
        }
        Ok(Self {
            batch_size,
            verbose,
        })
    }

    /// Trains the network for `iterations` epochs.
    ///
    /// Each epoch shuffles the training set (order differs run to run), walks it
    /// in consecutive mini-batches (the final partial batch included), averages
    /// the per-example gradients over each batch, and applies one optimizer step
    /// per batch. Per-example forward/backward passes run in parallel; each
    /// example sees the weight snapshot taken before its batch, and batches are
    /// strictly sequential. After each epoch the held-out test set is evaluated
    /// and an [`EpochReport`] is recorded.
    ///
    /// Arithmetic divergence (NaN from an unstable learning rate) is not
    /// intercepted; it shows up in the reported loss and predictions.
    ///
    /// # Parameters
    ///
    /// - `network` - The network to train, mutated in place
    /// - `optimizer` - Converts averaged batch gradients into weight deltas
    /// - `training` - Training examples, must be non-empty
    /// - `test` - Held-out examples evaluated after each epoch
    /// - `iterations` - Number of epochs
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<EpochReport>)` - One report per epoch, in order
    /// - `Err(NetworkError::Configuration)` - If the training set is empty
    /// - `Err(NetworkError::ShapeMismatch)` - If any example disagrees with the
    ///   network's input or output width
    pub fn train<O: Optimizer>(
        &self,
        network: &mut Network,
        optimizer: &mut O,
        training: &[Example],
        test: &[Example],
        iterations: usize,
    ) -> Result<Vec<EpochReport>, NetworkError> {
        if training.is_empty() {
            return Err(NetworkError::Configuration(
                "Training set must not be empty".to_string(),
            ));
        }

        let total_batches = training.len().div_ceil(self.batch_size);
        let progress = if self.verbose {
            let bar = ProgressBar::new((iterations * total_batches) as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | {msg}")
                    .expect("Failed to set progress bar template")
                    .progress_chars("█▓░"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut indices: Vec<usize> = (0..training.len()).collect();
        let mut reports = Vec::with_capacity(iterations);

        for epoch in 0..iterations {
            indices.shuffle(&mut rand::rng());

            for batch in indices.chunks(self.batch_size) {
                // Immutable snapshot for the parallel passes of this batch
                let snapshot: &Network = network;
                let partials: Result<Vec<Gradients>, NetworkError> = batch
                    .par_iter()
                    .map(|&i| {
                        let example = &training[i];
                        let trace = snapshot.forward(example.input.view())?;
                        snapshot.backward(&trace, example.response.view())
                    })
                    .collect();

                let mut accumulated = Gradients::zeros_like(snapshot);
                for partial in partials? {
                    accumulated.accumulate(&partial);
                }
                accumulated.scale(1.0 / batch.len() as f64);

                let deltas = optimizer.step(&accumulated);
                network.apply_deltas(&deltas)?;
                progress.inc(1);
            }

            let report = evaluate(network, test, epoch)?;
            progress.set_message(format!(
                "Epoch {}/{} | Loss: {:.6} | Accuracy: {:.4}",
                epoch + 1,
                iterations,
                report.loss,
                report.accuracy
            ));
            reports.push(report);
        }

        progress.finish_with_message("Training completed");
        Ok(reports)
    }
}

/// Evaluates mean loss and accuracy of a network over a held-out set.
fn evaluate(
    network: &Network,
    test: &[Example],
    epoch: usize,
) -> Result<EpochReport, NetworkError> {
    if test.is_empty() {
        return Ok(EpochReport {
            epoch,
            loss: f64::NAN,
            accuracy: f64::NAN,
        });
    }

    let mode = network.config().mode;
    let loss_fn = mode.loss();
    let output_width = network.config().output_width();

    let pairs: Result<Vec<(f64, f64)>, NetworkError> = test
        .par_iter()
        .map(|example| {
            if example.response.len() != output_width {
                return Err(NetworkError::ShapeMismatch(format!(
                    "Test response has length {}, network outputs {}",
                    example.response.len(),
                    output_width
                )));
            }
            let prediction = network.predict(example.input.view())?;
            let loss = loss_fn.loss(example.response.view(), prediction.view());
            let correct = match mode {
                Mode::Regression => 0.0,
                Mode::BinaryClass if prediction.len() == 1 => {
                    let hit = math::round_half_up(prediction[0])
                        == math::round_half_up(example.response[0]);
                    if hit { 1.0 } else { 0.0 }
                }
                _ => {
                    let hit = math::argmax(&prediction) == math::argmax(&example.response);
                    if hit { 1.0 } else { 0.0 }
                }
            };
            Ok((loss, correct))
        })
        .collect();

    let pairs = pairs?;
    let n = pairs.len() as f64;
    let loss = pairs.iter().map(|(loss, _)| loss).sum::<f64>() / n;
    let accuracy = match mode {
        Mode::Regression => f64::NAN,
        _ => pairs.iter().map(|(_, correct)| correct).sum::<f64>() / n,
    };

    Ok(EpochReport {
        epoch,
        loss,
        accuracy,
    })
}
