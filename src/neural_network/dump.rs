use super::{Config, Layer, Matrix, Network, Vector};
use crate::error::{IoError, NetworkError};
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Serialized weights of one layer: nested rows of weights plus an optional bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDump {
    pub weights: Vec<Vec<f64>>,
    pub bias: Option<Vec<f64>>,
}

/// A portable snapshot of a network: its configuration plus every weight and bias
/// value, in layer order.
///
/// The dump is the sole persisted representation of a model. Restoring it yields a
/// network whose predictions match the saved state exactly; optimizer state is not
/// part of the dump, so retraining after a reload starts with fresh accumulators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dump {
    pub config: Config,
    pub layers: Vec<LayerDump>,
}

impl Network {
    /// Serializes the configuration and all layer weights/biases into a [`Dump`].
    pub fn dump(&self) -> Dump {
        let layers = self
            .layers()
            .iter()
            .map(|layer| LayerDump {
                weights: layer
                    .weights()
                    .rows()
                    .into_iter()
                    .map(|row| row.to_vec())
                    .collect(),
                bias: layer.bias().map(|b| b.to_vec()),
            })
            .collect();
        Dump {
            config: self.config().clone(),
            layers,
        }
    }

    /// Reconstructs a network from a [`Dump`].
    ///
    /// Every weight row and bias vector is validated against the declared layout;
    /// any disagreement fails with `CorruptDump` and nothing is constructed.
    ///
    /// # Parameters
    ///
    /// * `dump` - A snapshot previously produced by [`Network::dump`]
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - A network whose predictions match the dumped state
    /// - `Err(NetworkError::Configuration)` - If the dumped configuration is invalid
    /// - `Err(NetworkError::CorruptDump)` - If the weight payload shapes disagree
    ///   with the declared layout or the bias flag
    pub fn from_dump(dump: &Dump) -> Result<Self, NetworkError> {
        let config = &dump.config;
        config.validate()?;

        if dump.layers.len() != config.layout.len() {
            return Err(NetworkError::CorruptDump(format!(
                "Dump holds {} layers, layout declares {}",
                dump.layers.len(),
                config.layout.len()
            )));
        }

        let depth = config.layout.len();
        let mut layers = Vec::with_capacity(depth);
        let mut inputs = config.inputs;
        for (l, (layer_dump, &neurons)) in dump.layers.iter().zip(config.layout.iter()).enumerate()
        {
            if layer_dump.weights.len() != neurons {
                return Err(NetworkError::CorruptDump(format!(
                    "Layer {} holds {} weight rows, layout declares {} neurons",
                    l,
                    layer_dump.weights.len(),
                    neurons
                )));
            }
            let mut flat = Vec::with_capacity(neurons * inputs);
            for (row_idx, row) in layer_dump.weights.iter().enumerate() {
                if row.len() != inputs {
                    return Err(NetworkError::CorruptDump(format!(
                        "Layer {} row {} has {} weights, expected {}",
                        l,
                        row_idx,
                        row.len(),
                        inputs
                    )));
                }
                flat.extend_from_slice(row);
            }
            let weights = Matrix::from_shape_vec((neurons, inputs), flat)
                .map_err(|e| NetworkError::CorruptDump(format!("Layer {}: {}", l, e)))?;

            let bias = match (&layer_dump.bias, config.bias) {
                (Some(values), true) => {
                    if values.len() != neurons {
                        return Err(NetworkError::CorruptDump(format!(
                            "Layer {} has {} bias values, expected {}",
                            l,
                            values.len(),
                            neurons
                        )));
                    }
                    Some(Vector::from_vec(values.clone()))
                }
                (None, false) => None,
                (bias, _) => {
                    return Err(NetworkError::CorruptDump(format!(
                        "Layer {}: bias payload ({}) disagrees with bias flag ({})",
                        l,
                        bias.is_some(),
                        config.bias
                    )));
                }
            };

            let activation = if l == depth - 1 {
                config.mode.output_activation()
            } else {
                config.activation
            };
            layers.push(Layer::from_parts(weights, bias, activation));
            inputs = neurons;
        }

        Ok(Network::from_layers(config.clone(), layers))
    }

    /// Saves the model dump as pretty-printed JSON at the given path.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Model successfully saved to file
    /// - `Err(IoError::StdIoError)` - File creation or write operation failed
    /// - `Err(IoError::JsonError)` - Serialization to JSON failed
    pub fn save_to_path(&self, path: &str) -> Result<(), IoError> {
        let file = File::create(path).map_err(IoError::StdIoError)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &self.dump()).map_err(IoError::JsonError)?;
        writer.flush().map_err(IoError::StdIoError)?;
        Ok(())
    }

    /// Loads a model dump from a JSON file and reconstructs the network.
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - Network restored from the file
    /// - `Err(IoError::StdIoError)` - File not found, read failed, or the dump's
    ///   shapes disagree with its declared layout (surfaced as `InvalidData`)
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    pub fn load_from_path(path: &str) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let dump: Dump = from_reader(reader).map_err(IoError::JsonError)?;
        Network::from_dump(&dump).map_err(|e| {
            IoError::StdIoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })
    }
}
