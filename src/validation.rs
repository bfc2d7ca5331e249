use serde_json::{Map, Value};
use crate::errors::ValidationError;
use crate::models::feature_vector::{FeatureVector, FEATURE_ORDER};

const TEMPERATURE_BOUNDS: (f64, f64) = (-10.0, 50.0);
const CLOUD_COVER_BOUNDS: (f64, f64) = (0.0, 100.0);
const HUMIDITY_BOUNDS: (f64, f64) = (0.0, 100.0);
const HOUR_BOUNDS: (i64, i64) = (0, 23);
const MONTH_BOUNDS: (i64, i64) = (1, 12);

/// Turns an untyped request body into a validated FeatureVector.
///
/// Missing fields are collected and reported as one batch. Range violations
/// on the other hand report only the first offending field, checked in the
/// fitted column order.
///
/// # Arguments
///
/// * 'body' - the parsed request body
pub fn validate(body: &Value) -> Result<FeatureVector, ValidationError> {
    let Some(map) = body.as_object() else {
        return Err(ValidationError::NotJson);
    };

    let missing = FEATURE_ORDER
        .iter()
        .filter(|name| !map.contains_key(**name))
        .map(|name| name.to_string())
        .collect::<Vec<String>>();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let features = FeatureVector {
        temperature: as_real(map, "temperature")?,
        cloud_cover: as_real(map, "cloud_cover")?,
        humidity: as_real(map, "humidity")?,
        hour: as_integer(map, "hour")?,
        month: as_integer(map, "month")?,
    };

    check_real("temperature", features.temperature, TEMPERATURE_BOUNDS)?;
    check_real("cloud_cover", features.cloud_cover, CLOUD_COVER_BOUNDS)?;
    check_real("humidity", features.humidity, HUMIDITY_BOUNDS)?;
    check_integer("hour", features.hour, HOUR_BOUNDS)?;
    check_integer("month", features.month, MONTH_BOUNDS)?;

    Ok(features)
}

/// Coerces a present field to a real. Numeric strings and booleans are
/// accepted the way the original service accepted them.
fn as_real(map: &Map<String, Value>, field: &str) -> Result<f64, ValidationError> {
    match map.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ValidationError::TypeConversion(format!("'{}' is out of float range", field))),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            ValidationError::TypeConversion(format!("could not convert string to float: '{}'", s))
        }),
        _ => Err(ValidationError::TypeConversion(format!("'{}' is not a number", field))),
    }
}

/// Coerces a present field to an integer. A real value is truncated toward
/// zero, an integer-literal string is parsed.
fn as_integer(map: &Map<String, Value>, field: &str) -> Result<i64, ValidationError> {
    match map.get(field) {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(r) = n.as_f64() {
                Ok(r.trunc() as i64)
            } else {
                Err(ValidationError::TypeConversion(format!("'{}' is out of integer range", field)))
            }
        }
        Some(Value::Bool(b)) => Ok(if *b { 1 } else { 0 }),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| {
            ValidationError::TypeConversion(format!("could not convert string to int: '{}'", s))
        }),
        _ => Err(ValidationError::TypeConversion(format!("'{}' is not a number", field))),
    }
}

fn check_real(field: &'static str, value: f64, bounds: (f64, f64)) -> Result<(), ValidationError> {
    // A NaN fails both comparisons and is rejected here as well
    if bounds.0 <= value && value <= bounds.1 {
        Ok(())
    } else {
        Err(ValidationError::Range { field, min: bounds.0, max: bounds.1 })
    }
}

fn check_integer(field: &'static str, value: i64, bounds: (i64, i64)) -> Result<(), ValidationError> {
    if bounds.0 <= value && value <= bounds.1 {
        Ok(())
    } else {
        Err(ValidationError::Range { field, min: bounds.0 as f64, max: bounds.1 as f64 })
    }
}
