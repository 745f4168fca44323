use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(#[from] engine::ValidationError),
    #[error("{0}")]
    Store(#[from] engine::StoreError),
    #[error("{0}")]
    Api(#[from] engine::ApiError),
    #[error("invalid input: {0}")]
    Input(String),
}

impl From<engine::EngineError> for AppError {
    fn from(err: engine::EngineError) -> Self {
        Self::Input(err.to_string())
    }
}
