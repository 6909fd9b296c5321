pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod preprocess;
pub mod classify;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::metadata::{InputType, ModelMetadata, Normalization};
pub use preprocess::image::{decode_image, image_to_tensor};
pub use classify::{argmax, top_label, Classifier, Prediction, UNKNOWN_LABEL};
pub use config::AppConfig;
pub use error::ClassifyError;
