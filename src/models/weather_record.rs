use serde::Serialize;

/// One generated hour of synthetic weather data.
///
/// The four weather fields are None when the row was picked for simulated
/// sensor dropout. Records are created once by the generator and never
/// mutated after the dataset is written.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WeatherRecord {
    pub datetime: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub temperature: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub solar_irradiance: Option<f64>,
    pub humidity: Option<f64>,
}
