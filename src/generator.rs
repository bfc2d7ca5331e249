use std::f64::consts::PI;
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use csv::Writer;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::config::GeneratorParameters;
use crate::errors::GeneratorError;
use crate::models::weather_record::WeatherRecord;

/// Clear-sky irradiance ceiling in W/m²
const MAX_IRRADIANCE: f64 = 1000.0;

/// Fraction of rows that get one weather field dropped to simulate sensor gaps
const MISSING_VALUE_RATE: f64 = 0.005;

/// Generates the full hourly weather table for the configured date range.
///
/// All randomness is drawn row by row from a single StdRng seeded with the
/// configured seed, so two runs over the same seed and range produce
/// identical tables.
///
/// # Arguments
///
/// * 'params' - seed, date range and output file settings
pub fn generate(params: &GeneratorParameters) -> Vec<WeatherRecord> {
    let mut rng = StdRng::seed_from_u64(params.seed);

    let start = params.start_date.and_hms_opt(0, 0, 0).unwrap();
    let end = params.end_date.and_hms_opt(23, 0, 0).unwrap();

    let mut records: Vec<WeatherRecord> = Vec::new();
    let mut current = start;
    while current <= end {
        records.push(generate_hour(current, &mut rng));
        current += TimeDelta::hours(1);
    }

    inject_missing_values(&mut records, &mut rng);

    records
}

/// Generates one hour of weather given the closed-form seasonal and diurnal
/// patterns plus gaussian noise
fn generate_hour(date_time: NaiveDateTime, rng: &mut StdRng) -> WeatherRecord {
    let hour = date_time.hour() as f64;
    let day_of_year = date_time.ordinal() as f64;

    // Seasonal swing peaks around midsummer (day 80 puts the zero crossing
    // at the spring equinox), diurnal swing peaks in the early afternoon
    let seasonal_temp = 20.0 + 12.0 * (2.0 * PI * (day_of_year - 80.0) / 365.0).sin();
    let diurnal_temp = 8.0 * (2.0 * PI * (hour - 6.0) / 24.0).sin();
    let temperature = (seasonal_temp + diurnal_temp + normal(rng, 2.0)).clamp(-5.0, 45.0);

    let seasonal_cloud = 40.0 + 25.0 * (2.0 * PI * (day_of_year - 80.0) / 365.0 + PI / 3.0).sin();
    let cloud_cover = (seasonal_cloud + normal(rng, 20.0)).clamp(0.0, 100.0);

    // Zero outside the ~12 hour daylight window, peaking near solar noon
    let solar_elevation = (2.0 * PI * (hour - 6.0) / 24.0).sin().max(0.0);
    let seasonal_factor = 0.7 + 0.3 * (2.0 * PI * (day_of_year - 172.0) / 365.0).sin();
    let cloud_factor = (100.0 - cloud_cover) / 100.0;
    let solar_irradiance = (MAX_IRRADIANCE * solar_elevation * seasonal_factor
        * cloud_factor * rng.gen_range(0.85..1.0)).max(0.0);

    // Humidity runs inverse to the seasonal temperature swing
    let base_humidity = 65.0 - 20.0 * (2.0 * PI * (day_of_year - 80.0) / 365.0).sin();
    let humidity = (base_humidity + normal(rng, 8.0)).clamp(10.0, 95.0);

    WeatherRecord {
        datetime: date_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        year: date_time.year(),
        month: date_time.month(),
        day: date_time.day(),
        hour: date_time.hour(),
        temperature: Some(round2(temperature)),
        cloud_cover: Some(round2(cloud_cover)),
        solar_irradiance: Some(round2(solar_irradiance)),
        humidity: Some(round2(humidity)),
    }
}

/// Blanks exactly one randomly chosen weather field on a fixed fraction of
/// distinct rows
fn inject_missing_values(records: &mut [WeatherRecord], rng: &mut StdRng) {
    let missing_count = (records.len() as f64 * MISSING_VALUE_RATE) as usize;
    let indices = rand::seq::index::sample(rng, records.len(), missing_count);

    for idx in indices.iter() {
        match rng.gen_range(0..4) {
            0 => records[idx].temperature = None,
            1 => records[idx].cloud_cover = None,
            2 => records[idx].solar_irradiance = None,
            _ => records[idx].humidity = None,
        }
    }
}

/// Writes the generated table as CSV with one header row
///
/// # Arguments
///
/// * 'records' - the generated table
/// * 'path' - output file path
pub fn write_dataset(records: &[WeatherRecord], path: &str) -> Result<(), GeneratorError> {
    let mut writer = Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Runs the full generator batch: generate, write, and log the same
/// validation summary the training side eyeballs the dataset with
pub fn run(params: &GeneratorParameters) -> Result<(), GeneratorError> {
    info!("generating synthetic weather data from {} to {} with seed {}",
        params.start_date, params.end_date, params.seed);

    let records = generate(params);
    write_dataset(&records, &params.output_file)?;

    log_validation_summary(&records);
    info!("dataset saved as {} ({} rows)", params.output_file, records.len());

    Ok(())
}

fn log_validation_summary(records: &[WeatherRecord]) {
    let night_max = records.iter()
        .filter(|r| r.hour < 6 || r.hour > 18)
        .filter_map(|r| r.solar_irradiance)
        .fold(0.0f64, f64::max);
    info!("max irradiance during night hours: {:.2} W/m²", night_max);

    let summer = mean(records.iter()
        .filter(|r| (6..=8).contains(&r.month))
        .filter_map(|r| r.temperature));
    let winter = mean(records.iter()
        .filter(|r| r.month == 12 || r.month <= 2)
        .filter_map(|r| r.temperature));
    info!("average temperature - summer: {:.2}°C, winter: {:.2}°C", summer, winter);

    let high_cloud = mean(records.iter()
        .filter(|r| r.cloud_cover.is_some_and(|c| c > 80.0))
        .filter_map(|r| r.solar_irradiance));
    let low_cloud = mean(records.iter()
        .filter(|r| r.cloud_cover.is_some_and(|c| c < 20.0))
        .filter_map(|r| r.solar_irradiance));
    info!("avg irradiance - high cloud (>80%): {:.2} W/m², low cloud (<20%): {:.2} W/m²",
        high_cloud, low_cloud);
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Draws from N(0, std_dev) via Box-Muller
fn normal(rng: &mut StdRng, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;

    r * theta.cos() * std_dev
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
