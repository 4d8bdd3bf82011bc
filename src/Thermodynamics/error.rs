use thiserror::Error;

/// error taxonomy shared by the evaluation core, the calibration harness and the export layer
#[derive(Debug, Error)]
pub enum ZeleznikError {
    /// temperature <= 0, composition outside [0, 1], non-finite inputs
    #[error("Domain error: {0}")]
    Domain(String),
    /// malformed coefficient table, unknown model variant tag, bad step or grid
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ZeleznikError {
    pub fn domain(msg: impl Into<String>) -> Self {
        ZeleznikError::Domain(msg.into())
    }
    pub fn configuration(msg: impl Into<String>) -> Self {
        ZeleznikError::Configuration(msg.into())
    }
}

pub type ZeleznikResult<T> = Result<T, ZeleznikError>;
