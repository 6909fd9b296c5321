use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use leafscan::{
    image_to_tensor, ActivationFunction, AppConfig, ClassifyError, Classifier, InputType, Layer,
    Matrix, ModelMetadata, Network, Normalization, UNKNOWN_LABEL,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("leafscan-it-{}-{}", std::process::id(), name))
}

fn encode(img: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
}

/// 4×4 RGB softmax model: "green leaf" when green dominates, "dry leaf" when
/// red does, "pale leaf" when every channel is bright.
fn leaf_model() -> Network {
    let pixels = 16;
    let mut weights = Matrix::zeros(pixels * 3, 3);
    for px in 0..pixels {
        let (r, g, b) = (px * 3, px * 3 + 1, px * 3 + 2);
        weights.data[g][0] = 1.0;
        weights.data[r][0] = -0.5;
        weights.data[r][1] = 1.0;
        weights.data[g][1] = -0.5;
        weights.data[r][2] = 0.4;
        weights.data[g][2] = 0.4;
        weights.data[b][2] = 0.4;
    }
    Network {
        layers: vec![Layer {
            size: 3,
            weights,
            biases: Matrix::zeros(1, 3),
            activator: ActivationFunction::Softmax,
        }],
        metadata: Some(ModelMetadata {
            description: Some("colour heuristic".into()),
            input_type: Some(InputType::ImageRgb { width: 4, height: 4 }),
            output_labels: Some(vec!["green leaf".into(), "dry leaf".into(), "pale leaf".into()]),
            normalization: Some(Normalization::UnitRange),
        }),
    }
}

#[test]
fn saved_model_classifies_encoded_images() {
    let path = temp_path("leaf.json");
    leaf_model().save_json(&path).unwrap();

    let classifier = Classifier::load(&path, &AppConfig::default()).unwrap();

    let green = encode(&solid(64, 48, [20, 200, 30]), ImageOutputFormat::Png);
    let p = classifier.classify_bytes(&green).unwrap();
    assert_eq!(p.label, "green leaf");
    assert_eq!(p.display_text(), "Result: green leaf");
    assert_eq!(p.scores.len(), 3);
    assert!((p.scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    let dry = encode(&solid(10, 10, [190, 60, 10]), ImageOutputFormat::Bmp);
    assert_eq!(classifier.classify_bytes(&dry).unwrap().label, "dry leaf");

    let pale = encode(&solid(5, 5, [250, 250, 250]), ImageOutputFormat::Png);
    assert_eq!(classifier.classify_bytes(&pale).unwrap().label, "pale leaf");

    let _ = std::fs::remove_file(path);
}

#[test]
fn default_sized_model_takes_224_square_rgb() {
    let config = AppConfig::default();
    let inputs = 224 * 224 * 3;
    let network = Network::new(vec![(config.labels.len(), inputs, ActivationFunction::Softmax)]);

    let classifier = Classifier::new(network, &config).unwrap();
    assert_eq!(classifier.input_dims(), (224, 224));
    assert_eq!(classifier.normalization(), Normalization::Symmetric);

    let p = classifier.classify_image(&solid(300, 200, [90, 140, 60])).unwrap();
    assert!(p.index.is_some());
    assert!(config.labels.contains(&p.label));
    assert_ne!(p.label, UNKNOWN_LABEL);
}

#[test]
fn gray_image_is_centred_on_zero() {
    let lo = image_to_tensor(&solid(224, 224, [127, 127, 127]), 224, 224, Normalization::Symmetric);
    let hi = image_to_tensor(&solid(224, 224, [128, 128, 128]), 224, 224, Normalization::Symmetric);
    assert_eq!(lo.len(), 224 * 224 * 3);
    assert!(lo.iter().zip(&hi).all(|(a, b)| (a + b).abs() < 1e-12));
    assert!(lo.iter().all(|&v| (v + 0.5 / 127.5).abs() < 1e-12));
}

#[test]
fn loading_a_missing_model_is_an_io_error() {
    let err = Classifier::load(temp_path("does-not-exist.json"), &AppConfig::default()).unwrap_err();
    assert!(matches!(err, ClassifyError::Io(_)));
}

#[test]
fn loading_a_corrupt_model_is_a_format_error() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, r#"{"layers": [{"size": 3}]}"#).unwrap();
    let err = Network::load_json(&path).unwrap_err();
    assert!(matches!(err, ClassifyError::ModelFormat(_)));
    let _ = std::fs::remove_file(path);
}

#[test]
fn model_without_labels_needs_matching_config_labels() {
    let mut network = leaf_model();
    network.metadata.as_mut().unwrap().output_labels = None;

    let mut config = AppConfig::default();
    config.labels = vec!["one".into(), "two".into()];
    assert!(matches!(
        Classifier::new(network.clone(), &config),
        Err(ClassifyError::LabelMismatch { labels: 2, outputs: 3 })
    ));

    config.labels.push("three".into());
    let classifier = Classifier::new(network, &config).unwrap();
    assert_eq!(classifier.labels(), &config.labels[..]);
}
