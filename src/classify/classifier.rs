use std::path::Path;

use image::DynamicImage;

use crate::classify::prediction::{top_label, Prediction};
use crate::config::AppConfig;
use crate::error::{ClassifyError, Result};
use crate::network::metadata::{InputType, Normalization};
use crate::network::network::Network;
use crate::preprocess::image::{decode_image, image_to_grayscale_tensor, image_to_tensor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorMode {
    Rgb,
    Grayscale,
}

impl ColorMode {
    fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Grayscale => 1,
        }
    }
}

/// A loaded model together with everything needed to feed it an image and
/// name its answer. Immutable once built.
#[derive(Debug, Clone)]
pub struct Classifier {
    network: Network,
    labels: Vec<String>,
    width: u32,
    height: u32,
    color: ColorMode,
    normalization: Normalization,
}

impl Classifier {
    /// Wraps an already-loaded network.
    ///
    /// Model metadata wins over `config` for input dimensions, normalization
    /// and labels. Fails if the labels do not cover the output layer exactly,
    /// or if the first layer is not sized for the resolved image dimensions.
    pub fn new(network: Network, config: &AppConfig) -> Result<Classifier> {
        network.validate()?;
        let meta = network.metadata.clone().unwrap_or_default();

        let (width, height, color) = match meta.input_type {
            None => (config.image_size, config.image_size, ColorMode::Rgb),
            Some(InputType::ImageRgb { width, height }) => (width, height, ColorMode::Rgb),
            Some(InputType::ImageGrayscale { width, height }) => (width, height, ColorMode::Grayscale),
            Some(InputType::Numeric) => {
                return Err(ClassifyError::UnsupportedInput("numeric".into()));
            }
        };

        let expected = width as usize * height as usize * color.channels();
        if network.input_size() != expected {
            return Err(ClassifyError::InputMismatch {
                expected: network.input_size(),
                got: expected,
            });
        }

        let labels = meta.output_labels
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| config.labels.clone());
        if labels.len() != network.output_size() {
            return Err(ClassifyError::LabelMismatch {
                labels: labels.len(),
                outputs: network.output_size(),
            });
        }

        let normalization = meta.normalization.unwrap_or(config.normalization);

        Ok(Classifier { network, labels, width, height, color, normalization })
    }

    /// Loads the model file once and builds the classifier around it.
    pub fn load(path: impl AsRef<Path>, config: &AppConfig) -> Result<Classifier> {
        let path = path.as_ref();
        let network = Network::load_json(path)?;
        let classifier = Classifier::new(network, config)?;
        log::info!(
            "loaded model {} ({} layers, {}x{} input, {} labels)",
            path.display(),
            classifier.network.layers.len(),
            classifier.width,
            classifier.height,
            classifier.labels.len()
        );
        Ok(classifier)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// (width, height) every image is resized to.
    pub fn input_dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn description(&self) -> Option<&str> {
        self.network.metadata.as_ref().and_then(|m| m.description.as_deref())
    }

    /// resize → normalize → one forward pass → arg-max.
    pub fn classify_image(&self, img: &DynamicImage) -> Result<Prediction> {
        let input = match self.color {
            ColorMode::Rgb => image_to_tensor(img, self.width, self.height, self.normalization),
            ColorMode::Grayscale => {
                image_to_grayscale_tensor(img, self.width, self.height, self.normalization)
            }
        };
        log::debug!("input tensor: {} values from {}x{} image", input.len(), img.width(), img.height());
        let scores = self.network.forward(&input)?;
        Ok(top_label(&scores, &self.labels))
    }

    /// Decodes encoded image bytes, then classifies.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Prediction> {
        let img = decode_image(bytes)?;
        self.classify_image(&img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;
    use crate::math::matrix::Matrix;
    use crate::network::metadata::ModelMetadata;
    use image::{Rgb, RgbImage};

    /// 2×2 RGB model whose three outputs are the mean red, green and blue.
    fn channel_mean_network() -> Network {
        let mut weights = Matrix::zeros(12, 3);
        for px in 0..4 {
            for c in 0..3 {
                weights.data[px * 3 + c][c] = 0.25;
            }
        }
        Network {
            layers: vec![Layer {
                size: 3,
                weights,
                biases: Matrix::zeros(1, 3),
                activator: ActivationFunction::Identity,
            }],
            metadata: Some(ModelMetadata {
                description: Some("channel means".into()),
                input_type: Some(InputType::ImageRgb { width: 2, height: 2 }),
                output_labels: Some(vec!["red".into(), "green".into(), "blue".into()]),
                normalization: Some(Normalization::UnitRange),
            }),
        }
    }

    fn solid(rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 6, Rgb(rgb)))
    }

    #[test]
    fn picks_the_dominant_channel() {
        let c = Classifier::new(channel_mean_network(), &AppConfig::default()).unwrap();
        assert_eq!(c.classify_image(&solid([10, 240, 30])).unwrap().label, "green");
        assert_eq!(c.classify_image(&solid([200, 0, 30])).unwrap().label, "red");
        assert_eq!(c.description(), Some("channel means"));
    }

    #[test]
    fn metadata_labels_win_over_config() {
        let c = Classifier::new(channel_mean_network(), &AppConfig::default()).unwrap();
        assert_eq!(c.labels()[2], "blue");
        assert_eq!(c.input_dims(), (2, 2));
        assert_eq!(c.normalization(), Normalization::UnitRange);
    }

    #[test]
    fn config_labels_are_used_when_model_has_none() {
        let mut net = channel_mean_network();
        net.metadata.as_mut().unwrap().output_labels = None;
        let c = Classifier::new(net, &AppConfig::default()).unwrap();
        assert_eq!(c.labels(), &["Plant 1", "Plant 2", "Plant 3"]);
    }

    #[test]
    fn label_count_must_match_outputs() {
        let mut net = channel_mean_network();
        net.metadata.as_mut().unwrap().output_labels = Some(vec!["only".into(), "two".into()]);
        match Classifier::new(net, &AppConfig::default()) {
            Err(ClassifyError::LabelMismatch { labels: 2, outputs: 3 }) => {}
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn first_layer_must_fit_image_dims() {
        let mut net = channel_mean_network();
        net.metadata.as_mut().unwrap().input_type = None;
        // Falls back to 224×224×3 from config, which the 12-input layer cannot take.
        assert!(matches!(
            Classifier::new(net, &AppConfig::default()),
            Err(ClassifyError::InputMismatch { expected: 12, .. })
        ));
    }

    #[test]
    fn numeric_models_are_refused() {
        let mut net = channel_mean_network();
        net.metadata.as_mut().unwrap().input_type = Some(InputType::Numeric);
        assert!(matches!(
            Classifier::new(net, &AppConfig::default()),
            Err(ClassifyError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn bad_bytes_are_a_decode_error() {
        let c = Classifier::new(channel_mean_network(), &AppConfig::default()).unwrap();
        assert!(matches!(c.classify_bytes(b"\x00\x01\x02"), Err(ClassifyError::Decode(_))));
    }
}
