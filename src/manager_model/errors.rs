use thiserror::Error;

#[derive(Error, Debug)]
#[error("error in model artifact: {0}")]
pub struct ModelError(pub String);
impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> ModelError {
        ModelError(format!("json document error: {}", e))
    }
}
impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> ModelError {
        ModelError(format!("artifact file error: {}", e))
    }
}
