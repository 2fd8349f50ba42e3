use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Subprocess `{command}` failed: {message}")]
    Subprocess { command: String, message: String },
    #[error("Snapshot error: {0}")]
    Snapshot(String),
    #[error("Other: {0}")]
    Other(String),
}

impl From<toml::de::Error> for ProfileError {
    fn from(err: toml::de::Error) -> Self {
        ProfileError::Config(err.to_string())
    }
}

impl ProfileError {
    pub fn subprocess(command: &str, message: impl Into<String>) -> Self {
        ProfileError::Subprocess {
            command: command.to_string(),
            message: message.into(),
        }
    }
}
