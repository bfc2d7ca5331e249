use serde::Serialize;
use crate::models::feature_vector::FeatureVector;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub model: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub n_estimators: usize,
    pub features: [&'static str; 5],
    pub target: &'static str,
    pub unit: &'static str,
    pub status: &'static str,
}

/// Successful prediction payload, echoing the coerced inputs back
#[derive(Serialize)]
pub struct PredictionResponse {
    pub predicted_solar_irradiance: f64,
    pub unit: &'static str,
    pub status: &'static str,
    pub input_features: FeatureVector,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: &'static str,
}
