use serde_json::Value;
use crate::errors::PredictError;
use crate::manager_model::ModelHandle;
use crate::models::feature_vector::FeatureVector;
use crate::validation::validate;

/// Outcome of a successful validate-scale-score pass
#[derive(Debug)]
pub struct Prediction {
    pub irradiance: f64,
    pub features: FeatureVector,
}

/// Runs the full prediction pipeline over an untyped request body:
/// validate, scale, score, clamp at zero and round to two decimals.
///
/// Each call is stateless, identical bodies always produce identical
/// predictions.
///
/// # Arguments
///
/// * 'model' - the artifact handle, None when the startup load failed
/// * 'body' - the parsed request body
pub fn predict_irradiance(model: Option<&ModelHandle>, body: &Value) -> Result<Prediction, PredictError> {
    let features = validate(body)?;
    let model = model.ok_or(PredictError::ModelUnavailable)?;

    let scaled = model.scale(&features);
    let raw = model.predict(&scaled);
    if !raw.is_finite() {
        return Err(PredictError::Failed("model produced a non-finite value".to_string()));
    }

    // Irradiance cannot physically be negative
    let irradiance = round2(raw.max(0.0));

    Ok(Prediction { irradiance, features })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
