use crate::error::NetworkError;
use crate::math;
use crate::neural_network::*;
use crate::training::*;
use approx::assert_relative_eq;
use ndarray::array;

fn single_layer_gradients(weights: Matrix, bias: Vector) -> Gradients {
    Gradients {
        layers: vec![LayerGradients { weights, bias }],
    }
}

fn toy_network() -> Network {
    Network::new(Config {
        inputs: 2,
        layout: vec![2],
        activation: Activation::Linear,
        mode: Mode::MultiClass,
        weight: WeightInitializer::Normal {
            mean: 0.0,
            std_dev: 0.5,
        },
        bias: true,
    })
    .unwrap()
}

#[test]
fn test_one_hot() {
    let encoded = one_hot(10, 3);
    assert_eq!(
        encoded,
        array![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(math::argmax(&encoded), 3);
}

#[test]
fn test_one_hot_out_of_range_index_stays_zero() {
    let encoded = one_hot(3, 7);
    assert_eq!(encoded, array![0.0, 0.0, 0.0]);
}

#[test]
fn test_shuffle_preserves_examples() {
    let mut examples: Examples = (0..20)
        .map(|i| Example {
            input: array![i as f64],
            response: array![1.0],
        })
        .collect();
    shuffle(&mut examples);
    assert_eq!(examples.len(), 20);
    for i in 0..20 {
        assert!(examples.iter().any(|e| e.input[0] == i as f64));
    }
}

#[test]
fn test_split() {
    let examples: Examples = (0..10)
        .map(|i| Example {
            input: array![i as f64],
            response: array![1.0],
        })
        .collect();
    let (first, second) = split(examples, 0.8);
    assert_eq!(first.len(), 8);
    assert_eq!(second.len(), 2);
}

#[test]
fn test_batch_gradient_accumulation_is_order_independent() {
    let network = toy_network();
    let examples = [
        Example {
            input: array![1.0, -0.5],
            response: one_hot(2, 0),
        },
        Example {
            input: array![-0.25, 0.75],
            response: one_hot(2, 1),
        },
        Example {
            input: array![0.5, 0.5],
            response: one_hot(2, 0),
        },
    ];

    let grad_of = |example: &Example| {
        let trace = network.forward(example.input.view()).unwrap();
        network.backward(&trace, example.response.view()).unwrap()
    };

    let mut forward_order = Gradients::zeros_like(&network);
    for example in &examples {
        forward_order.accumulate(&grad_of(example));
    }

    let mut reverse_order = Gradients::zeros_like(&network);
    for example in examples.iter().rev() {
        reverse_order.accumulate(&grad_of(example));
    }

    for (a, b) in forward_order.layers.iter().zip(reverse_order.layers.iter()) {
        for (x, y) in a.weights.iter().zip(b.weights.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
        for (x, y) in a.bias.iter().zip(b.bias.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_sgd_parameter_validation() {
    assert!(SGD::new(0.1, 0.0, 0.0, false).is_ok());
    assert!(SGD::new(0.0, 0.0, 0.0, false).is_err());
    assert!(SGD::new(-0.1, 0.0, 0.0, false).is_err());
    assert!(SGD::new(f64::INFINITY, 0.0, 0.0, false).is_err());
    assert!(SGD::new(0.1, -0.1, 0.0, false).is_err());
    assert!(SGD::new(0.1, 1.0, 0.0, false).is_err());
    assert!(SGD::new(0.1, 0.0, -1.0, false).is_err());
}

#[test]
fn test_adam_parameter_validation() {
    assert!(Adam::new(0.001, 0.9, 0.999, 1e-8).is_ok());
    assert!(Adam::new(0.0, 0.9, 0.999, 1e-8).is_err());
    assert!(Adam::new(-0.001, 0.9, 0.999, 1e-8).is_err());
    assert!(Adam::new(0.001, -0.1, 0.999, 1e-8).is_err());
    assert!(Adam::new(0.001, 1.1, 0.999, 1e-8).is_err());
    assert!(Adam::new(0.001, 0.9, -0.999, 1e-8).is_err());
    assert!(Adam::new(0.001, 0.9, 1.1, 1e-8).is_err());
    assert!(Adam::new(0.001, 0.9, 0.999, 0.0).is_err());
    assert!(Adam::new(0.001, 0.9, 0.999, -1e-8).is_err());
    assert!(Adam::new(f64::INFINITY, 0.9, 0.999, 1e-8).is_err());
}

#[test]
fn test_sgd_without_momentum_is_plain_gradient_descent() {
    let mut sgd = SGD::new(0.1, 0.0, 0.0, false).unwrap();
    let gradients = single_layer_gradients(array![[1.0, 2.0]], array![0.5]);

    let deltas = sgd.step(&gradients);
    assert_relative_eq!(deltas.layers[0].weights[[0, 0]], -0.1, epsilon = 1e-12);
    assert_relative_eq!(deltas.layers[0].weights[[0, 1]], -0.2, epsilon = 1e-12);
    assert_relative_eq!(deltas.layers[0].bias[0], -0.05, epsilon = 1e-12);
}

#[test]
fn test_sgd_momentum_accumulates_velocity() {
    let mut sgd = SGD::new(0.1, 0.5, 0.0, false).unwrap();
    let gradients = single_layer_gradients(array![[1.0]], array![0.0]);

    // v1 = -0.1, v2 = 0.5 * v1 - 0.1 = -0.15
    let first = sgd.step(&gradients);
    assert_relative_eq!(first.layers[0].weights[[0, 0]], -0.1, epsilon = 1e-12);
    let second = sgd.step(&gradients);
    assert_relative_eq!(second.layers[0].weights[[0, 0]], -0.15, epsilon = 1e-12);
}

#[test]
fn test_sgd_decay_shrinks_the_effective_rate() {
    let mut sgd = SGD::new(0.1, 0.0, 1.0, false).unwrap();
    let gradients = single_layer_gradients(array![[1.0]], array![0.0]);

    // Step 1: rate = 0.1 / (1 + 1) = 0.05; step 2: rate = 0.1 / 3
    let first = sgd.step(&gradients);
    assert_relative_eq!(first.layers[0].weights[[0, 0]], -0.05, epsilon = 1e-12);
    let second = sgd.step(&gradients);
    assert_relative_eq!(
        second.layers[0].weights[[0, 0]],
        -0.1 / 3.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_sgd_nesterov_applies_lookahead_velocity() {
    let mut sgd = SGD::new(0.1, 0.5, 0.0, true).unwrap();
    let gradients = single_layer_gradients(array![[1.0]], array![0.0]);

    // v1 = -0.1; applied delta = 0.5 * v1 - 0.1 = -0.15
    let deltas = sgd.step(&gradients);
    assert_relative_eq!(deltas.layers[0].weights[[0, 0]], -0.15, epsilon = 1e-12);
}

#[test]
fn test_adam_first_step_magnitude_is_the_learning_rate() {
    // With bias correction, the first step is -lr * g / (|g| + eps) for any scale
    let mut adam = Adam::new(0.001, 0.9, 0.999, 1e-8).unwrap();
    let gradients = single_layer_gradients(array![[3.0, -200.0]], array![0.5]);

    let deltas = adam.step(&gradients);
    assert_relative_eq!(deltas.layers[0].weights[[0, 0]], -0.001, epsilon = 1e-9);
    assert_relative_eq!(deltas.layers[0].weights[[0, 1]], 0.001, epsilon = 1e-9);
    assert_relative_eq!(deltas.layers[0].bias[0], -0.001, epsilon = 1e-9);
}

#[test]
fn test_adam_moment_estimates_follow_the_update_rule() {
    let mut adam = Adam::new(0.01, 0.9, 0.999, 1e-8).unwrap();
    let gradients = single_layer_gradients(array![[1.0]], array![0.0]);

    adam.step(&gradients);
    let second = adam.step(&gradients);

    // m2 = 0.9*0.1 + 0.1 = 0.19, m_hat = 0.19 / (1 - 0.81) = 1.0
    // v2 = 0.999*0.001 + 0.001, v_hat = v2 / (1 - 0.999^2) = 1.0
    // delta = -lr * 1 / (1 + eps)
    assert_relative_eq!(second.layers[0].weights[[0, 0]], -0.01, epsilon = 1e-8);
}

#[test]
fn test_batch_trainer_rejects_zero_batch_size() {
    assert!(matches!(
        BatchTrainer::new(0, false),
        Err(NetworkError::Configuration(_))
    ));
}

#[test]
fn test_batch_trainer_rejects_empty_training_set() {
    let mut network = toy_network();
    let mut sgd = SGD::new(0.1, 0.0, 0.0, false).unwrap();
    let trainer = BatchTrainer::new(4, false).unwrap();

    let result = trainer.train(&mut network, &mut sgd, &[], &[], 1);
    assert!(matches!(result, Err(NetworkError::Configuration(_))));
}

#[test]
fn test_batch_trainer_surfaces_shape_mismatches() {
    let mut network = toy_network();
    let mut sgd = SGD::new(0.1, 0.0, 0.0, false).unwrap();
    let trainer = BatchTrainer::new(4, false).unwrap();

    let bad_input = vec![Example {
        input: array![1.0, 2.0, 3.0],
        response: one_hot(2, 0),
    }];
    assert!(matches!(
        trainer.train(&mut network, &mut sgd, &bad_input, &[], 1),
        Err(NetworkError::ShapeMismatch(_))
    ));

    let bad_response = vec![Example {
        input: array![1.0, 2.0],
        response: one_hot(5, 0),
    }];
    assert!(matches!(
        trainer.train(&mut network, &mut sgd, &bad_response, &[], 1),
        Err(NetworkError::ShapeMismatch(_))
    ));
}

#[test]
fn test_evaluation_rejects_mis_sized_test_responses() {
    let mut network = toy_network();
    let mut sgd = SGD::new(0.1, 0.0, 0.0, false).unwrap();
    let trainer = BatchTrainer::new(4, false).unwrap();

    let training = vec![Example {
        input: array![1.0, 1.0],
        response: one_hot(2, 1),
    }];
    // Five-wide response against a two-wide network must not evaluate to a report
    let bad_test = vec![Example {
        input: array![1.0, 1.0],
        response: one_hot(5, 4),
    }];
    assert!(matches!(
        trainer.train(&mut network, &mut sgd, &training, &bad_test, 1),
        Err(NetworkError::ShapeMismatch(_))
    ));

    let empty_response = vec![Example {
        input: array![1.0, 1.0],
        response: Vector::zeros(0),
    }];
    assert!(matches!(
        trainer.train(&mut network, &mut sgd, &training, &empty_response, 1),
        Err(NetworkError::ShapeMismatch(_))
    ));
}

#[test]
fn test_training_reports_one_entry_per_epoch() {
    let mut network = toy_network();
    let mut sgd = SGD::new(0.1, 0.0, 0.0, false).unwrap();
    let trainer = BatchTrainer::new(2, false).unwrap();

    let examples = vec![
        Example {
            input: array![1.0, 1.0],
            response: one_hot(2, 1),
        },
        Example {
            input: array![-1.0, -1.0],
            response: one_hot(2, 0),
        },
        Example {
            input: array![0.5, 1.5],
            response: one_hot(2, 1),
        },
    ];

    let reports = trainer
        .train(&mut network, &mut sgd, &examples, &examples, 3)
        .unwrap();
    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.epoch, i);
        assert!(report.loss.is_finite());
        assert!((0.0..=1.0).contains(&report.accuracy));
    }
}
