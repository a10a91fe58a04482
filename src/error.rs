// Error types surfaced at startup and by the serial input path

/// Configuration could not be loaded or is out of range
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Serial input failures. A read timeout is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),
}
