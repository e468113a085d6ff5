use crate::dispatch::error::ConfigurationError;
use thiserror::Error;

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("The app is not properly configured.")]
    Configuration(#[from] ConfigurationError),
}
