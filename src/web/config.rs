use derive_getters::Getters;
use rocket::data::{Limits, ToByteUnit};

use crate::tools::env_args::{Setting, retrieve_parsed_setting};

const PORT: Setting = Setting::arg_or_env("--port", "PORT");
const MAX_UPLOAD_SIZE: Setting = Setting::arg("--max-upload-size");
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_SIZE: u64 = 25;

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct WebConfig {
    port: u16,
    /// In MiB, for each uploaded file.
    max_upload_size: u64,
}

impl WebConfig {
    pub fn from_args() -> Self {
        Self {
            port: retrieve_parsed_setting(PORT).unwrap_or(DEFAULT_PORT),
            max_upload_size: retrieve_parsed_setting(MAX_UPLOAD_SIZE)
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
        }
    }

    /// A form carries the email file and the attachment, plus a bit of text.
    pub fn limits(&self) -> Limits {
        Limits::default()
            .limit("file", self.max_upload_size.mebibytes())
            .limit("data-form", (2 * self.max_upload_size + 1).mebibytes())
    }
}
