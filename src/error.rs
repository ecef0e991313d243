use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid detection: {0}")]
    InvalidDetection(#[from] InvalidDetection),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Reasons a detection is dropped at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidDetection {
    #[error("non-finite box coordinates")]
    NonFinite,

    #[error("inverted box ({xmin}, {ymin}, {xmax}, {ymax})")]
    Inverted {
        xmin: f32,
        ymin: f32,
        xmax: f32,
        ymax: f32,
    },

    #[error("box ({xmin}, {ymin}, {xmax}, {ymax}) outside {width}x{height} frame")]
    OutOfFrame {
        xmin: f32,
        ymin: f32,
        xmax: f32,
        ymax: f32,
        width: u32,
        height: u32,
    },
}
