use std::time::Duration;

use derive_getters::Getters;
use rocket::futures::future::join_all;
use rocket::tokio::time::timeout;

use crate::dispatch::error::TransportError;
use crate::dispatch::error::TransportError::TimedOut;
use crate::dispatch::transport::MailTransport;
use crate::recipients::AddressList;

pub mod config;
pub mod error;
pub mod smtp;
pub mod transport;

/// A file sent alongside every email of a dispatch.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Attachment {
    filename: String,
    content_type: Option<String>,
    content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: String, content_type: Option<String>, content: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            content,
        }
    }
}

/// What is sent to every recipient of a dispatch.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct DispatchRequest {
    subject: String,
    body: String,
    attachment: Option<Attachment>,
}

impl DispatchRequest {
    pub fn new(subject: String, body: String, attachment: Option<Attachment>) -> Self {
        Self {
            subject,
            body,
            attachment,
        }
    }
}

/// Proof that the transport accepted a message.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Receipt {
    message_id: String,
}

impl Receipt {
    pub fn new(message_id: String) -> Self {
        Self { message_id }
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
pub struct DispatchOutcome {
    address: String,
    result: Result<Receipt, TransportError>,
}

impl DispatchOutcome {
    pub fn new(address: String, result: Result<Receipt, TransportError>) -> Self {
        Self { address, result }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a dispatch, in the order of the addresses.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct DispatchReport {
    outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failed_addresses(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .map(|outcome| outcome.address().as_str())
            .collect()
    }
}

/// The transport, as shared by every request.
pub struct Mailer {
    transport: Box<dyn MailTransport>,
    send_timeout: Option<Duration>,
}

impl Mailer {
    pub fn new(transport: Box<dyn MailTransport>, send_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            send_timeout,
        }
    }

    pub async fn dispatch(&self, addresses: &AddressList, request: &DispatchRequest) -> DispatchReport {
        dispatch(self.transport.as_ref(), addresses, request, self.send_timeout).await
    }
}

/// Send `request` to every address.
/// All sends are started at once and awaited together:
/// a failing or slow send never prevents nor delays the others.
/// Each outcome is logged as soon as it is known.
pub async fn dispatch(
    transport: &dyn MailTransport,
    addresses: &AddressList,
    request: &DispatchRequest,
    send_timeout: Option<Duration>,
) -> DispatchReport {
    info!(
        "Sending `{}` to {} recipient(s)",
        request.subject(),
        addresses.len()
    );

    let sends = addresses
        .iter()
        .map(|address| send(transport, address, request, send_timeout));
    let report = DispatchReport {
        outcomes: join_all(sends).await,
    };

    info!(
        "Dispatch of `{}` done [sent: {}, failed: {}]",
        request.subject(),
        report.succeeded(),
        report.failed()
    );
    if report.failed() > 0 {
        warn!("Not sent to: {:?}", report.failed_addresses());
    }
    report
}

async fn send(
    transport: &dyn MailTransport,
    address: &str,
    request: &DispatchRequest,
    send_timeout: Option<Duration>,
) -> DispatchOutcome {
    let result = match send_timeout {
        Some(send_timeout) => timeout(send_timeout, transport.send(address, request))
            .await
            .unwrap_or(Err(TimedOut(send_timeout))),
        None => transport.send(address, request).await,
    };

    match &result {
        Ok(receipt) => info!(
            "Email sent to {address} [message id: {}]",
            receipt.message_id()
        ),
        Err(e) => error!("Error sending email to {address}: {e}"),
    }

    DispatchOutcome::new(address.to_owned(), result)
}
