use approx::assert_relative_eq;
use deepnet::prelude::*;
use ndarray::array;
use std::io::Write;

fn temp_path(name: &str) -> String {
    let mut path = std::env::temp_dir();
    path.push(format!("deepnet_{}_{}.json", name, std::process::id()));
    path.to_string_lossy().into_owned()
}

fn build_network() -> Network {
    Network::new(Config {
        inputs: 4,
        layout: vec![6, 3],
        activation: Activation::Sigmoid,
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
fn test_save_and_load_reproduces_predictions() {
    let network = build_network();
    let path = temp_path("round_trip");

    network.save_to_path(&path).unwrap();
    let restored = Network::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.config(), network.config());

    let inputs = [
        array![0.0, 0.0, 0.0, 0.0],
        array![1.0, -1.0, 0.5, -0.5],
        array![0.123, 0.456, 0.789, 0.321],
    ];
    for input in &inputs {
        let before = network.predict(input.view()).unwrap();
        let after = restored.predict(input.view()).unwrap();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_relative_eq!(*b, *a, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_load_missing_file_fails() {
    let result = Network::load_from_path("/nonexistent/deepnet_model.json");
    assert!(matches!(result, Err(IoError::StdIoError(_))));
}

#[test]
fn test_load_invalid_json_fails() {
    let path = temp_path("invalid_json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"not a model dump").unwrap();
    drop(file);

    let result = Network::load_from_path(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(IoError::JsonError(_))));
}

#[test]
fn test_load_rejects_tampered_shapes() {
    let network = build_network();
    let mut dump = network.dump();
    // Drop one weight from the first neuron's row
    dump.layers[0].weights[0].pop();

    let path = temp_path("tampered");
    let file = std::fs::File::create(&path).unwrap();
    serde_json::to_writer(file, &dump).unwrap();

    let result = Network::load_from_path(&path);
    std::fs::remove_file(&path).ok();
    // Shape corruption surfaces as invalid data at the I/O boundary
    assert!(matches!(result, Err(IoError::StdIoError(_))));
}
