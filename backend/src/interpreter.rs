use crate::error::RelayError;
use crate::labels::ClassLabels;
use crate::models::Prediction;

/// Index and value of the largest score. Ties resolve to the first index.
pub fn argmax(scores: &[f64]) -> Option<(usize, f64)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((index, score)),
        })
}

/// Turns the first prediction vector of a model response into a labelled
/// prediction.
pub fn interpret(predictions: &[Vec<f64>], labels: &ClassLabels) -> Result<Prediction, RelayError> {
    let scores = predictions.first().ok_or_else(|| {
        RelayError::MalformedResponse("response holds no prediction vector".to_string())
    })?;

    if scores.len() != labels.len() {
        return Err(RelayError::PredictionWidth {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(RelayError::MalformedResponse(format!(
            "score at index {} is not finite",
            index
        )));
    }

    let (index, confidence) = argmax(scores)
        .ok_or_else(|| RelayError::MalformedResponse("empty prediction vector".to_string()))?;
    let class = labels
        .get(index)
        .ok_or(RelayError::PredictionWidth {
            expected: labels.len(),
            actual: scores.len(),
        })?
        .to_string();

    Ok(Prediction { class, confidence })
}
