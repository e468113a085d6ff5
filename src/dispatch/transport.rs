use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::error::TransportError;
use crate::dispatch::{DispatchRequest, Receipt};

/// Deliver a single message to a single recipient.
/// Implementations are shared by every concurrent send, hence `&self`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        request: &DispatchRequest,
    ) -> Result<Receipt, TransportError>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn send(
        &self,
        recipient: &str,
        request: &DispatchRequest,
    ) -> Result<Receipt, TransportError> {
        self.as_ref().send(recipient, request).await
    }
}
