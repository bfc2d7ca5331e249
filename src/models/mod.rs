pub mod api;
pub mod feature_vector;
pub mod weather_record;
