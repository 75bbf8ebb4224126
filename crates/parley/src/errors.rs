use thiserror::Error;

/// Why a session's history could not be produced
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Session lookup failed: {0}")]
    Lookup(#[source] anyhow::Error),

    #[error("History fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),

    #[error("Could not convert stored message {index}: {reason}")]
    Conversion { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {env_var}: {reason}")]
    InvalidValue { env_var: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a configuration key path like `stream.update_channel` to the environment
/// variable that sets it
pub fn to_env_var(field_path: &str) -> String {
    let path = field_path
        .split('.')
        .map(|segment| segment.to_uppercase())
        .collect::<Vec<_>>()
        .join("__");
    format!("PARLEY_{}", path)
}
