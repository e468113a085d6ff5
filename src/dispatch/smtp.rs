use async_trait::async_trait;
use mail_send::SmtpClientBuilder;
use mail_send::mail_builder::MessageBuilder;
use uuid::Uuid;

use crate::dispatch::config::SmtpConfig;
use crate::dispatch::error::TransportError;
use crate::dispatch::error::TransportError::{CantConnectToSmtpServer, CantSendMessage};
use crate::dispatch::transport::MailTransport;
use crate::dispatch::{DispatchRequest, Receipt};

const DEFAULT_ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Send emails through an SMTP server.
/// A new connection is opened for each message, so that sends don't wait for one another.
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn create_message<'a>(
        &'a self,
        recipient: &'a str,
        request: &'a DispatchRequest,
        message_id: &'a str,
    ) -> MessageBuilder<'a> {
        let sender_address = self.config.sender_address().as_str();
        let message = match self.config.sender_name() {
            Some(sender_name) => MessageBuilder::new().from((sender_name.as_str(), sender_address)),
            None => MessageBuilder::new().from(sender_address),
        };
        let message = match self.config.reply_to() {
            Some(reply_to) => message.reply_to(reply_to.as_str()),
            None => message,
        };
        let message = message
            .to(recipient)
            .message_id(message_id)
            .subject(request.subject().as_str())
            .text_body(request.body().as_str());

        match request.attachment() {
            Some(attachment) => message.attachment(
                attachment
                    .content_type()
                    .as_deref()
                    .unwrap_or(DEFAULT_ATTACHMENT_CONTENT_TYPE),
                attachment.filename().as_str(),
                attachment.content().as_slice(),
            ),
            None => message,
        }
    }

    fn generate_message_id(&self) -> String {
        let domain = self
            .config
            .sender_address()
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("localhost");
        format!("{}@{domain}", Uuid::new_v4())
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(
        &self,
        recipient: &str,
        request: &DispatchRequest,
    ) -> Result<Receipt, TransportError> {
        let message_id = self.generate_message_id();
        let message = self.create_message(recipient, request, &message_id);

        let mut smtp_client = SmtpClientBuilder::new(self.config.server().as_str(), *self.config.port())
            .implicit_tls(*self.config.implicit_tls())
            .credentials((self.config.login().as_str(), self.config.password().as_str()))
            .connect()
            .await
            .map_err(|e| CantConnectToSmtpServer(e.to_string()))?;

        smtp_client
            .send(message)
            .await
            .map_err(|e| CantSendMessage(e.to_string()))?;

        Ok(Receipt::new(message_id))
    }
}

#[cfg(test)]
mod tests {
    use mail_send::mail_builder::mime::BodyPart;

    use super::*;
    use crate::dispatch::Attachment;
    use crate::tools::env_args::with_env_args;

    const TEST_RECIPIENT: &str = "recipient@address.com";
    const TEST_SUBJECT: &str = "This is a subject";
    const TEST_TEXT_BODY: &str = "This is a slightly less important email";

    fn get_transport(args: Vec<String>) -> SmtpTransport {
        let mut all_args = vec![
            "--smtp-login=login@address.com".to_owned(),
            "--smtp-password=password".to_owned(),
        ];
        all_args.extend(args);
        SmtpTransport::new(with_env_args(all_args, SmtpConfig::from_args).unwrap())
    }

    #[test]
    fn should_create_message() {
        let transport = get_transport(vec!["--email-sender-name=Sender".to_owned()]);
        let request = DispatchRequest::new(TEST_SUBJECT.to_owned(), TEST_TEXT_BODY.to_owned(), None);

        let message = transport.create_message(TEST_RECIPIENT, &request, "id@address.com");

        match message.text_body.unwrap().contents {
            BodyPart::Text(text) => assert_eq!(TEST_TEXT_BODY, text),
            BodyPart::Binary(_) => panic!("Unexpected binary part"),
            BodyPart::Multipart(_) => panic!("Unexpected multipart part"),
        };
        assert!(message.attachments.is_none());
    }

    #[test]
    fn should_create_message_with_attachment() {
        let transport = get_transport(vec![]);
        let attachment = Attachment::new(
            "report.pdf".to_owned(),
            Some("application/pdf".to_owned()),
            b"%PDF-1.4".to_vec(),
        );
        let request = DispatchRequest::new(
            TEST_SUBJECT.to_owned(),
            TEST_TEXT_BODY.to_owned(),
            Some(attachment),
        );

        let message = transport.create_message(TEST_RECIPIENT, &request, "id@address.com");

        let attachments = message.attachments.unwrap();
        assert_eq!(1, attachments.len());
        match &attachments[0].contents {
            BodyPart::Binary(content) => assert_eq!(&b"%PDF-1.4"[..], &content[..]),
            _ => panic!("Attachment should be binary"),
        };
    }

    #[test]
    fn should_generate_message_id_at_sender_domain() {
        let transport = get_transport(vec!["--email-sender-address=sender@club.org".to_owned()]);

        let message_id = transport.generate_message_id();

        assert!(message_id.ends_with("@club.org"));
        assert_ne!(message_id, transport.generate_message_id());
    }

    #[async_test]
    #[ignore]
    async fn should_send_email() {
        let transport = get_transport(vec![
            "--smtp-server=sandbox.smtp.mailtrap.io".to_owned(),
            "--smtp-port=25".to_owned(),
        ]);
        let request = DispatchRequest::new(TEST_SUBJECT.to_owned(), TEST_TEXT_BODY.to_owned(), None);

        transport.send(TEST_RECIPIENT, &request).await.unwrap();
    }
}
