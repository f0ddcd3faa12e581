use crate::error::NetworkError;
use crate::neural_network::Gradients;

/// Defines the interface for optimization algorithms.
///
/// An optimizer converts averaged mini-batch gradients into additive weight
/// deltas. It is invoked once per mini-batch, never per example; callers must
/// average the per-example gradients first. Internal accumulators (momentum,
/// moment estimates) are lazily sized to the gradient shapes on first use and
/// persist across all batches and epochs of a training run. They are not part of
/// the serialized model dump.
pub trait Optimizer {
    /// Converts one batch's averaged gradients into weight deltas.
    ///
    /// # Parameters
    ///
    /// * `gradients` - Averaged gradients for every layer
    ///
    /// # Returns
    ///
    /// * `Gradients` - Deltas to add to the network's weights and biases
    fn step(&mut self, gradients: &Gradients) -> Gradients;
}

fn zeros_matching(gradients: &Gradients) -> Gradients {
    let mut zeros = gradients.clone();
    zeros.scale(0.0);
    zeros
}

/// Stochastic Gradient Descent with momentum, learning-rate decay and optional
/// Nesterov lookahead.
///
/// Per step `t` (monotonic across the whole training run) the effective rate is
/// `learning_rate / (1 + decay * t)`. The velocity update is
/// `v <- momentum * v - rate * gradient`; the returned delta is the velocity, or
/// `momentum * v - rate * gradient` when Nesterov lookahead is enabled.
pub struct SGD {
    /// Base learning rate, shrunk over time by `decay`.
    learning_rate: f64,
    /// Momentum coefficient in `[0, 1)`.
    momentum: f64,
    /// Per-step learning-rate decay factor.
    decay: f64,
    /// Whether to apply the lookahead velocity instead of the plain velocity.
    nesterov: bool,
    /// Step counter, incremented once per invocation.
    step_count: u64,
    /// Per-weight velocities, allocated on first use.
    velocity: Option<Gradients>,
}

impl SGD {
    /// Creates a new SGD optimizer.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Base step size, must be positive and finite
    /// - `momentum` - Momentum coefficient, must lie in `[0, 1)`
    /// - `decay` - Learning-rate decay per step, must be non-negative and finite
    /// - `nesterov` - Enables the lookahead velocity
    ///
    /// # Returns
    ///
    /// - `Ok(SGD)` - A new optimizer instance
    /// - `Err(NetworkError::Configuration)` - If any parameter is out of range
    pub fn new(
        learning_rate: f64,
        momentum: f64,
        decay: f64,
        nesterov: bool,
    ) -> Result<Self, NetworkError> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(NetworkError::Configuration(format!(
                "Learning rate must be positive and finite, got {}",
                learning_rate
            )));
        }
        if !momentum.is_finite() || !(0.0..1.0).contains(&momentum) {
            return Err(NetworkError::Configuration(format!(
                "Momentum must lie in [0, 1), got {}",
                momentum
            )));
        }
        if !decay.is_finite() || decay < 0.0 {
            return Err(NetworkError::Configuration(format!(
                "Decay must be non-negative and finite, got {}",
                decay
            )));
        }
        Ok(Self {
            learning_rate,
            momentum,
            decay,
            nesterov,
            step_count: 0,
            velocity: None,
        })
    }
}

impl Optimizer for SGD {
    fn step(&mut self, gradients: &Gradients) -> Gradients {
        self.step_count += 1;
        let rate = self.learning_rate / (1.0 + self.decay * self.step_count as f64);
        let momentum = self.momentum;

        let velocity = self
            .velocity
            .get_or_insert_with(|| zeros_matching(gradients));

        let mut deltas = Vec::with_capacity(gradients.layers.len());
        for (vel, grad) in velocity.layers.iter_mut().zip(gradients.layers.iter()) {
            vel.weights
                .zip_mut_with(&grad.weights, |v, &g| *v = momentum * *v - rate * g);
            vel.bias
                .zip_mut_with(&grad.bias, |v, &g| *v = momentum * *v - rate * g);

            let mut delta = vel.clone();
            if self.nesterov {
                // Lookahead: step past the updated velocity by one more momentum turn
                delta
                    .weights
                    .zip_mut_with(&grad.weights, |v, &g| *v = momentum * *v - rate * g);
                delta
                    .bias
                    .zip_mut_with(&grad.bias, |v, &g| *v = momentum * *v - rate * g);
            }
            deltas.push(delta);
        }

        Gradients { layers: deltas }
    }
}

/// Adam optimizer: adaptive per-weight learning rates from bias-corrected first
/// and second moment estimates of the gradients.
pub struct Adam {
    /// Learning rate controlling the size of parameter updates.
    learning_rate: f64,
    /// Exponential decay rate for the first moment estimates.
    beta1: f64,
    /// Exponential decay rate for the second moment estimates.
    beta2: f64,
    /// Small constant added for numerical stability.
    epsilon: f64,
    /// Current timestep, incremented once per invocation (per mini-batch).
    t: u64,
    /// First and second moment accumulators, allocated on first use.
    moments: Option<(Gradients, Gradients)>,
}

impl Adam {
    /// Creates a new Adam optimizer.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size, must be positive and finite
    /// - `beta1` - First-moment decay rate, must lie in `[0, 1)` (typically 0.9)
    /// - `beta2` - Second-moment decay rate, must lie in `[0, 1)` (typically 0.999)
    /// - `epsilon` - Stability constant, must be positive and finite (typically 1e-8)
    ///
    /// # Returns
    ///
    /// - `Ok(Adam)` - A new optimizer instance
    /// - `Err(NetworkError::Configuration)` - If any parameter is out of range
    pub fn new(
        learning_rate: f64,
        beta1: f64,
        beta2: f64,
        epsilon: f64,
    ) -> Result<Self, NetworkError> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(NetworkError::Configuration(format!(
                "Learning rate must be positive and finite, got {}",
                learning_rate
            )));
        }
        if !(0.0..1.0).contains(&beta1) {
            return Err(NetworkError::Configuration(format!(
                "Beta1 must lie in [0, 1), got {}",
                beta1
            )));
        }
        if !(0.0..1.0).contains(&beta2) {
            return Err(NetworkError::Configuration(format!(
                "Beta2 must lie in [0, 1), got {}",
                beta2
            )));
        }
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(NetworkError::Configuration(format!(
                "Epsilon must be positive and finite, got {}",
                epsilon
            )));
        }
        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            t: 0,
            moments: None,
        })
    }
}

impl Optimizer for Adam {
    fn step(&mut self, gradients: &Gradients) -> Gradients {
        self.t += 1;
        let (beta1, beta2) = (self.beta1, self.beta2);
        let (lr, epsilon) = (self.learning_rate, self.epsilon);
        let correction1 = 1.0 - beta1.powi(self.t as i32);
        let correction2 = 1.0 - beta2.powi(self.t as i32);

        let (m, v) = self
            .moments
            .get_or_insert_with(|| (zeros_matching(gradients), zeros_matching(gradients)));

        let mut deltas = Vec::with_capacity(gradients.layers.len());
        for ((m, v), grad) in m
            .layers
            .iter_mut()
            .zip(v.layers.iter_mut())
            .zip(gradients.layers.iter())
        {
            m.weights
                .zip_mut_with(&grad.weights, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            m.bias
                .zip_mut_with(&grad.bias, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
            v.weights
                .zip_mut_with(&grad.weights, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
            v.bias
                .zip_mut_with(&grad.bias, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

            // delta = -lr * m_hat / (sqrt(v_hat) + epsilon)
            let mut delta = m.clone();
            delta
                .weights
                .zip_mut_with(&v.weights, |m, &v| {
                    *m = -lr * (*m / correction1) / ((v / correction2).sqrt() + epsilon)
                });
            delta.bias.zip_mut_with(&v.bias, |m, &v| {
                *m = -lr * (*m / correction1) / ((v / correction2).sqrt() + epsilon)
            });
            deltas.push(delta);
        }

        Gradients { layers: deltas }
    }
}
