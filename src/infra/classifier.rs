//! Crop disease identification through an ONNX image classifier.
//!
//! The model is loaded from disk on every call; nothing is cached between runs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;
use ort::session::{Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use thiserror::Error;

use crate::domain::DiseasePrediction;
use crate::util::settings::{ClassifierSettings, Normalization, ScoreMode, TensorLayout};

/// Side length the model expects.
pub const INPUT_SIZE: u32 = 224;
pub const TOP_K: usize = 3;

/// ImageNet normalization mean values (RGB)
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read labels: {0}")]
    Io(#[from] io::Error),
    #[error("onnx runtime error: {0}")]
    Ort(String),
    #[error("model declares no inputs")]
    NoInputs,
    #[error("model returned no scores")]
    EmptyOutput,
    #[error("inference task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn ort_error(context: &str, error: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::Ort(format!("{context}: {error}"))
}

/// Labels `image_path` with the model's three most likely classes.
pub fn identify_disease(
    image_path: &Path,
    settings: &ClassifierSettings,
) -> Result<Vec<DiseasePrediction>, ClassifierError> {
    if !settings.model_path.exists() {
        return Err(ClassifierError::ModelNotFound(settings.model_path.clone()));
    }

    let image = load_image(image_path)?;
    let input = preprocess(&image, settings.layout, settings.normalization);
    let scores = run_model(&settings.model_path, input)?;
    let labels = load_labels(&settings.labels_path)?;

    let probabilities = to_probabilities(scores, settings.scores);
    Ok(top_predictions(&probabilities, &labels, TOP_K))
}

pub fn load_image(path: &Path) -> Result<DynamicImage, ClassifierError> {
    Ok(image::open(path)?)
}

/// Resizes to the model resolution and lays out a normalized batch of one.
pub fn preprocess(
    image: &DynamicImage,
    layout: TensorLayout,
    normalization: Normalization,
) -> Array4<f32> {
    let rgb = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Nearest)
        .to_rgb8();
    let size = INPUT_SIZE as usize;

    let mut tensor = match layout {
        TensorLayout::Nhwc => Array4::zeros((1, size, size, 3)),
        TensorLayout::Nchw => Array4::zeros((1, 3, size, size)),
    };

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for channel in 0..3 {
            let value = normalize(pixel[channel], channel, normalization);
            match layout {
                TensorLayout::Nhwc => tensor[[0, y, x, channel]] = value,
                TensorLayout::Nchw => tensor[[0, channel, y, x]] = value,
            }
        }
    }

    tensor
}

fn normalize(raw: u8, channel: usize, normalization: Normalization) -> f32 {
    let value = raw as f32;
    match normalization {
        Normalization::Inception => value / 127.5 - 1.0,
        Normalization::ImageNet => (value / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
    }
}

fn run_model(model_path: &Path, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
    let started = Instant::now();
    let mut session = Session::builder()
        .map_err(|e| ort_error("failed to create session", e))?
        .commit_from_file(model_path)
        .map_err(|e| ort_error("failed to load ONNX model", e))?;

    tracing::info!(
        "loaded model {} in {:.0} ms",
        model_path.display(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    let input_name = session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .ok_or(ClassifierError::NoInputs)?;

    let tensor: DynTensor = Tensor::from_array(input.into_dyn())
        .map_err(|e| ort_error("failed to build input tensor", e))?
        .upcast();
    let mut feed: HashMap<String, DynTensor> = HashMap::new();
    feed.insert(input_name, tensor);

    let outputs = session
        .run(SessionInputs::from(feed))
        .map_err(|e| ort_error("forward pass failed", e))?;
    if outputs.len() == 0 {
        return Err(ClassifierError::EmptyOutput);
    }

    let scores: Vec<f32> = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| ort_error("failed to decode model output", e))?
        .iter()
        .copied()
        .collect();

    tracing::debug!(
        "inference produced {} scores in {:.0} ms",
        scores.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );

    if scores.is_empty() {
        return Err(ClassifierError::EmptyOutput);
    }
    Ok(scores)
}

/// One label per line; the line number is the class index. A blank line leaves
/// its class unnamed. A missing file yields no labels.
pub fn load_labels(path: &Path) -> Result<Vec<String>, ClassifierError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                "labels file {} not found, reporting class indices",
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut labels: Vec<String> = content.lines().map(|line| line.trim().to_string()).collect();
    while labels.last().is_some_and(String::is_empty) {
        labels.pop();
    }
    Ok(labels)
}

/// Turns model outputs into per-class probabilities according to `mode`.
pub fn to_probabilities(scores: Vec<f32>, mode: ScoreMode) -> Vec<f32> {
    match mode {
        ScoreMode::Raw => scores,
        ScoreMode::Softmax => softmax(scores),
        ScoreMode::Auto if is_distribution(&scores) => scores,
        ScoreMode::Auto => softmax(scores),
    }
}

fn is_distribution(scores: &[f32]) -> bool {
    let in_range = scores.iter().all(|p| (0.0..=1.0).contains(p));
    let sum: f32 = scores.iter().sum();
    in_range && (sum - 1.0).abs() <= 1e-3
}

fn softmax(scores: Vec<f32>) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / total).collect()
}

pub fn top_predictions(
    probabilities: &[f32],
    labels: &[String],
    k: usize,
) -> Vec<DiseasePrediction> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    indexed
        .into_iter()
        .take(k)
        .map(|(index, probability)| DiseasePrediction {
            label: labels
                .get(index)
                .filter(|label| !label.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("class_{index}")),
            confidence: as_percent(probability),
        })
        .collect()
}

fn as_percent(probability: f32) -> f64 {
    let percent = (f64::from(probability) * 100.0).clamp(0.0, 100.0);
    if percent.is_nan() {
        return 0.0;
    }
    (percent * 100.0).round() / 100.0
}
