use chrono::NaiveDateTime;
use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid timeline config: {0}")]
    InvalidConfig(String),

    #[error("date arithmetic overflowed stepping {steps} periods from {date}")]
    DateOutOfRange { date: NaiveDateTime, steps: i64 },

    #[error("invalid container width: {0}")]
    InvalidContainerWidth(f32),

    #[error("task import failed: {0}")]
    Import(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
