use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Can't connect to SMTP server: {0}")]
    CantConnectToSmtpServer(String),
    #[error("Can't send message: {0}")]
    CantSendMessage(String),
    #[error("No answer from the transport after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing SMTP login, use `--smtp-login` or `EMAIL_USER`")]
    MissingSmtpLogin,
    #[error("Missing SMTP password, use `--smtp-password` or `EMAIL_PASS`")]
    MissingSmtpPassword,
}
