use std::fmt;

/// Everything that can go wrong between reading a model file and printing a label.
#[derive(Debug)]
pub enum ClassifyError {
    /// Reading or writing a model / config file failed.
    Io(std::io::Error),
    /// The model JSON parsed but its layers do not chain together.
    ModelFormat(String),
    /// The supplied bytes are not a decodable image.
    Decode(String),
    /// The model contains no layers.
    EmptyModel,
    /// Number of labels differs from the width of the output layer.
    LabelMismatch { labels: usize, outputs: usize },
    /// Input vector length differs from what the first layer accepts.
    InputMismatch { expected: usize, got: usize },
    /// The model declares an input type this classifier cannot feed.
    UnsupportedInput(String),
    /// The configuration file exists but could not be used.
    Config(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::Io(e) => write!(f, "I/O error: {}", e),
            ClassifyError::ModelFormat(msg) => write!(f, "invalid model: {}", msg),
            ClassifyError::Decode(msg) => write!(f, "could not decode image: {}", msg),
            ClassifyError::EmptyModel => write!(f, "model has no layers"),
            ClassifyError::LabelMismatch { labels, outputs } => write!(
                f,
                "{} labels configured but the model produces {} outputs",
                labels, outputs
            ),
            ClassifyError::InputMismatch { expected, got } => write!(
                f,
                "model expects {} input values, got {}",
                expected, got
            ),
            ClassifyError::UnsupportedInput(what) => {
                write!(f, "unsupported model input type: {}", what)
            }
            ClassifyError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClassifyError {
    fn from(e: std::io::Error) -> Self {
        ClassifyError::Io(e)
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(e: serde_json::Error) -> Self {
        ClassifyError::ModelFormat(e.to_string())
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(e: image::ImageError) -> Self {
        ClassifyError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_mismatch_message_names_both_counts() {
        let e = ClassifyError::LabelMismatch { labels: 3, outputs: 5 };
        assert_eq!(e.to_string(), "3 labels configured but the model produces 5 outputs");
    }

    #[test]
    fn io_errors_expose_their_source() {
        use std::error::Error;
        let e: ClassifyError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("gone"));
    }
}
