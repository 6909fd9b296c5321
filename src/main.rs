/// leafscan command-line front end.
///
/// Runs the same pipeline as the screen (resize → normalize → one forward
/// pass → arg-max) without a browser.
///
///   leafscan classify <image>...    print the predicted label for each image
///   leafscan info [model]           describe a model file
///   leafscan init-model [path]      write an untrained model with the configured labels

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use leafscan::{ActivationFunction, AppConfig, Classifier, InputType, ModelMetadata, Network};

const USAGE: &str = "\
usage:
  leafscan classify <image>...
  leafscan info [model.json]
  leafscan init-model [model.json]

environment:
  LEAFSCAN_CONFIG  config file (default: leafscan.json)
  LEAFSCAN_MODEL   model file (default: assets/leaf_recognition_model.json)
  RUST_LOG         log level (e.g. info, debug)";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    match args.first().map(String::as_str) {
        Some("classify") => classify(&args[1..], &config),
        Some("info") => info(args.get(1).map(PathBuf::from).unwrap_or_else(|| config.model_path.clone()), &config),
        Some("init-model") => init_model(args.get(1).map(PathBuf::from).unwrap_or_else(|| config.model_path.clone()), &config),
        Some("help") | Some("--help") | Some("-h") | None => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn classify(images: &[String], config: &AppConfig) -> Result<()> {
    if images.is_empty() {
        bail!("classify needs at least one image path");
    }
    let classifier = Classifier::load(&config.model_path, config)
        .with_context(|| format!("failed to load model {}", config.model_path.display()))?;

    let mut failures = 0usize;
    for path in images {
        let outcome = std::fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(classifier.classify_bytes(&bytes)?));
        match outcome {
            Ok(prediction) => {
                log::info!("{} -> {:?}", path, prediction.index);
                match prediction.confidence_pct() {
                    Some(pct) => println!("{}: {} ({:.1}%)", path, prediction.display_text(), pct),
                    None => println!("{}: {}", path, prediction.display_text()),
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {:#}", path, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} images could not be classified", failures, images.len());
    }
    Ok(())
}

fn info(path: PathBuf, config: &AppConfig) -> Result<()> {
    let network = Network::load_json(&path)
        .with_context(|| format!("failed to load model {}", path.display()))?;

    println!("model:  {}", path.display());
    for (i, layer) in network.layers.iter().enumerate() {
        println!("layer {}: {} -> {} ({:?})", i, layer.input_size(), layer.size, layer.activator);
    }

    match Classifier::new(network, config) {
        Ok(classifier) => {
            let (w, h) = classifier.input_dims();
            if let Some(desc) = classifier.description() {
                println!("about:  {}", desc);
            }
            println!("input:  {}x{} ({:?})", w, h, classifier.normalization());
            println!("labels: {}", classifier.labels().join(", "));
        }
        Err(e) => println!("not usable for image classification: {}", e),
    }
    Ok(())
}

fn init_model(path: PathBuf, config: &AppConfig) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; refusing to overwrite it", path.display());
    }
    if config.labels.is_empty() {
        bail!("no labels configured");
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;
    }

    let side = config.image_size;
    let inputs = side as usize * side as usize * 3;
    let network = Network::new(vec![(config.labels.len(), inputs, ActivationFunction::Softmax)])
        .with_metadata(ModelMetadata {
            description: Some("untrained leaf classifier".into()),
            input_type: Some(InputType::ImageRgb { width: side, height: side }),
            output_labels: Some(config.labels.clone()),
            normalization: Some(config.normalization),
        });

    network.save_json(&path)
        .with_context(|| format!("could not write {}", path.display()))?;
    log::info!("wrote {} ({} inputs, {} outputs)", path.display(), inputs, config.labels.len());
    println!("wrote {}", path.display());
    Ok(())
}
