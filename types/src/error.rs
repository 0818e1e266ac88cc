use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("{field} must be a fraction in [0, 1], got {value}")]
    ThresholdOutOfRange { field: String, value: f64 },
}
