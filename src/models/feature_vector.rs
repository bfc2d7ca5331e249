use serde::Serialize;

/// Column order the scaler and model artifacts were fitted with.
///
/// The contract with the artifacts is positional, so the order here must
/// never change without refitting. The artifact loader asserts agreement
/// against the scaler's declared feature names at startup.
pub const FEATURE_ORDER: [&str; 5] = ["temperature", "cloud_cover", "humidity", "hour", "month"];

/// A validated five-dimensional model input.
///
/// Instances only exist after the request validator has coerced and
/// range-checked every field, so downstream code never sees dynamic typing.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    pub temperature: f64,
    pub cloud_cover: f64,
    pub humidity: f64,
    pub hour: i64,
    pub month: i64,
}

/// Feature values after the per-feature standardization transform,
/// still in FEATURE_ORDER.
pub type ScaledFeatureVector = [f64; 5];

impl FeatureVector {
    /// Returns the feature values as an array in the fitted column order
    pub fn as_array(&self) -> [f64; 5] {
        [self.temperature, self.cloud_cover, self.humidity, self.hour as f64, self.month as f64]
    }
}
