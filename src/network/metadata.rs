use serde::{Deserialize, Serialize};

/// Describes how to interpret the input fed to a Network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// Raw f64 values; not usable for image classification.
    Numeric,
    /// Grayscale image resized to width×height, one value per pixel.
    ImageGrayscale { width: u32, height: u32 },
    /// RGB image resized to width×height, flattened as R,G,B per pixel, row-major.
    ImageRgb { width: u32, height: u32 },
}

/// How an 8-bit channel value becomes a network input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// (c - 127.5) / 127.5, giving [-1, 1].
    #[default]
    Symmetric,
    /// c / 255, giving [0, 1].
    UnitRange,
}

impl Normalization {
    pub fn apply(self, channel: u8) -> f64 {
        match self {
            Normalization::Symmetric => (channel as f64 - 127.5) / 127.5,
            Normalization::UnitRange => channel as f64 / 255.0,
        }
    }
}

/// Optional annotations attached to a saved Network.
/// All fields are Option<> so bare models deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input_type: Option<InputType>,
    /// Human-readable class labels, one per output neuron.
    pub output_labels: Option<Vec<String>>,
    #[serde(default)]
    pub normalization: Option<Normalization>,
}
