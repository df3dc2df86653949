use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid calendar date: `{value}`")]
    InvalidDate { value: String },

    #[error("unknown metric id: `{metric_id}`")]
    UnknownMetric { metric_id: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
