use serde::{Deserialize, Serialize};

use super::pipeline::{FeatureFrame, Pipeline};
use crate::error::ModelError;
use crate::schema::ValidatedBatch;

/// Payload stored for a completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: Vec<i64>,
    pub version: String,
}

/// Project the validated rows onto `features`, keeping their order.
pub fn select_features(
    batch: &ValidatedBatch,
    features: &[String],
) -> Result<FeatureFrame, ModelError> {
    let mut rows = Vec::with_capacity(batch.len());
    for sample in &batch.rows {
        let row = features
            .iter()
            .map(|name| {
                sample
                    .feature(name)
                    .ok_or_else(|| ModelError::MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(FeatureFrame {
        columns: features.to_vec(),
        rows,
    })
}

pub fn predict(
    pipeline: &Pipeline,
    batch: &ValidatedBatch,
    features: &[String],
    version: &str,
) -> Result<PredictionResult, ModelError> {
    if batch.is_empty() {
        return Err(ModelError::EmptyBatch);
    }
    let frame = select_features(batch, features)?;
    let predictions = pipeline.predict(&frame)?;
    Ok(PredictionResult {
        predictions,
        version: version.to_string(),
    })
}
