use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

use crate::recipients::error::ExtractionError;

/// Why an upload is rejected before any email is sent.
/// The message is what the user gets back.
#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("No email file uploaded.")]
    NoEmailFile,
    #[error("Unable to read the uploaded email file.")]
    UnreadableEmailFile(#[from] ExtractionError),
    #[error("No valid email addresses found in the uploaded file.")]
    NoValidEmailAddress,
    #[error("Unable to process the upload.")]
    CantReadUpload,
}

impl UploadError {
    pub fn status(&self) -> Status {
        match self {
            UploadError::NoEmailFile
            | UploadError::UnreadableEmailFile(_)
            | UploadError::NoValidEmailAddress => Status::BadRequest,
            UploadError::CantReadUpload => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for UploadError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        debug!("Rejecting upload: {self:?}");
        (self.status(), self.to_string()).respond_to(request)
    }
}
