use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::{activation::activation::ActivationFunction, layers::dense::Layer};
use crate::error::{ClassifyError, Result};
use crate::network::metadata::ModelMetadata;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    /// Width of the first layer's input, or 0 for an empty network.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    /// Width of the last layer's output, or 0 for an empty network.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Single forward pass.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if self.layers.is_empty() {
            return Err(ClassifyError::EmptyModel);
        }
        if input.len() != self.input_size() {
            return Err(ClassifyError::InputMismatch {
                expected: self.input_size(),
                got: input.len(),
            });
        }
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }

    /// Verifies every layer is internally consistent and feeds the next one.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(ClassifyError::EmptyModel);
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.check_shape()
                .map_err(|msg| ClassifyError::ModelFormat(format!("layer {}: {}", i, msg)))?;
            if i > 0 {
                let prev = self.layers[i - 1].size;
                if layer.input_size() != prev {
                    return Err(ClassifyError::ModelFormat(format!(
                        "layer {} expects {} inputs but layer {} has {} neurons",
                        i, layer.input_size(), i - 1, prev
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a network previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    #[test]
    fn forward_chains_layers() {
        let net = Network::new(vec![
            (5, 4, ActivationFunction::ReLU),
            (3, 5, ActivationFunction::Softmax),
        ]);
        let out = net.forward(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrong_input_width_is_an_error() {
        let net = Network::new(vec![(2, 3, ActivationFunction::Identity)]);
        match net.forward(&[1.0]) {
            Err(ClassifyError::InputMismatch { expected: 3, got: 1 }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn empty_network_is_rejected() {
        let net = Network { layers: vec![], metadata: None };
        assert!(matches!(net.validate(), Err(ClassifyError::EmptyModel)));
        assert!(matches!(net.forward(&[]), Err(ClassifyError::EmptyModel)));
    }

    #[test]
    fn validate_catches_broken_chain() {
        let mut net = Network::new(vec![
            (4, 2, ActivationFunction::ReLU),
            (3, 4, ActivationFunction::Softmax),
        ]);
        net.layers[1].weights = Matrix::zeros(5, 3);
        let err = net.validate().unwrap_err();
        assert!(err.to_string().contains("layer 1 expects 5 inputs"));
    }
}
