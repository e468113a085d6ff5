use std::time::Duration;

use derive_getters::Getters;

use crate::dispatch::error::ConfigurationError;
use crate::dispatch::error::ConfigurationError::{MissingSmtpLogin, MissingSmtpPassword};
use crate::tools::env_args::{
    Setting, retrieve_expected_setting, retrieve_parsed_setting, retrieve_setting,
};

const SMTP_SERVER: Setting = Setting::arg("--smtp-server");
const SMTP_PORT: Setting = Setting::arg("--smtp-port");
const SMTP_IMPLICIT_TLS: Setting = Setting::arg("--smtp-implicit-tls");
const SMTP_LOGIN: Setting = Setting::arg_or_env("--smtp-login", "EMAIL_USER");
const SMTP_PASSWORD: Setting = Setting::arg_or_env("--smtp-password", "EMAIL_PASS");
const EMAIL_SENDER_NAME: Setting = Setting::arg("--email-sender-name");
const EMAIL_SENDER_ADDRESS: Setting = Setting::arg("--email-sender-address");
const REPLY_TO: Setting = Setting::arg("--reply-to");
const SEND_TIMEOUT: Setting = Setting::arg("--send-timeout");
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// How to reach the SMTP provider and who emails are sent as.
#[derive(Getters, Clone, PartialEq)]
pub struct SmtpConfig {
    server: String,
    port: u16,
    /// Connect with TLS right away instead of upgrading with STARTTLS.
    implicit_tls: bool,
    login: String,
    password: String,
    sender_name: Option<String>,
    sender_address: String,
    reply_to: Option<String>,
}

impl SmtpConfig {
    /// Read the config from the args passed to the app.
    /// Login and password are mandatory, the sender address defaults to the login.
    pub fn from_args() -> Result<Self, ConfigurationError> {
        let login = retrieve_expected_setting(SMTP_LOGIN, MissingSmtpLogin)?;
        let password = retrieve_expected_setting(SMTP_PASSWORD, MissingSmtpPassword)?;
        let sender_address = retrieve_setting(EMAIL_SENDER_ADDRESS).unwrap_or_else(|| login.clone());

        Ok(Self {
            server: retrieve_setting(SMTP_SERVER).unwrap_or(DEFAULT_SMTP_SERVER.to_owned()),
            port: retrieve_parsed_setting(SMTP_PORT).unwrap_or(DEFAULT_SMTP_PORT),
            implicit_tls: retrieve_parsed_setting(SMTP_IMPLICIT_TLS).unwrap_or(false),
            login,
            password,
            sender_name: retrieve_setting(EMAIL_SENDER_NAME),
            sender_address,
            reply_to: retrieve_setting(REPLY_TO),
        })
    }
}

/// Upper bound on a single send, disabled unless `--send-timeout` is passed.
pub fn retrieve_send_timeout() -> Option<Duration> {
    retrieve_parsed_setting::<u64>(SEND_TIMEOUT)
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
}
