use std::io;

use thiserror::Error;

/// Result type used across the panelsync core crate.
pub type Result<T> = std::result::Result<T, PanelSyncError>;

/// Canonical error representation shared by all crates.
#[derive(Debug, Error)]
pub enum PanelSyncError {
    #[error("Erro de I/O: {0}")]
    IoError(#[from] io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(String),

    #[error("Erro de preferências: {0}")]
    PreferencesError(String),

    #[error("Erro geral: {0}")]
    GeneralError(String),

    #[error("Erro de configuração: {0}")]
    ConfigError(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Valor inválido para variável de ambiente {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("URL inválida em {key}: {source}")]
    InvalidUrl {
        key: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<ConfigError> for PanelSyncError {
    fn from(value: ConfigError) -> Self {
        PanelSyncError::ConfigError(value.to_string())
    }
}
