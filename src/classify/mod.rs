pub mod classifier;
pub mod prediction;

pub use classifier::Classifier;
pub use prediction::{argmax, top_label, Prediction, UNKNOWN_LABEL};
