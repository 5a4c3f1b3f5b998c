use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tqfeed_core::ValidationError),

    #[error(transparent)]
    Settings(#[from] tqfeed_core::SettingsError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Settings(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
