use serde::Serialize;

/// Label reported when there is no score to pick from.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The outcome of one classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Winning output index; `None` when nothing could be picked.
    pub index: Option<usize>,
    pub label: String,
    /// Raw score of the winning output.
    pub confidence: Option<f64>,
    /// All output scores, in label order.
    pub scores: Vec<f64>,
}

impl Prediction {
    /// Text shown under the image.
    pub fn display_text(&self) -> String {
        format!("Result: {}", self.label)
    }

    /// Confidence as a percentage when the score looks like a probability.
    pub fn confidence_pct(&self) -> Option<f64> {
        self.confidence
            .filter(|c| (0.0..=1.0).contains(c))
            .map(|c| c * 100.0)
    }
}

/// Index of the largest score. The first of equal maxima wins and NaN never
/// wins; `None` for an empty (or all-NaN) slice.
pub fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in scores.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Picks the highest-scoring label. Falls back to `UNKNOWN_LABEL` when the
/// scores are empty or the winning index has no label.
pub fn top_label(scores: &[f64], labels: &[String]) -> Prediction {
    let picked = argmax(scores).and_then(|i| labels.get(i).map(|l| (i, l)));
    match picked {
        Some((i, label)) => Prediction {
            index: Some(i),
            label: label.clone(),
            confidence: Some(scores[i]),
            scores: scores.to_vec(),
        },
        None => Prediction {
            index: None,
            label: UNKNOWN_LABEL.to_owned(),
            confidence: None,
            scores: scores.to_vec(),
        },
    }
}
