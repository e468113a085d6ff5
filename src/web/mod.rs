use rocket::{Build, Rocket};

use crate::dispatch::Mailer;
use crate::dispatch::config::{SmtpConfig, retrieve_send_timeout};
use crate::dispatch::smtp::SmtpTransport;
use crate::error::Result;
use crate::web::config::WebConfig;
use crate::web::server::build_server;

mod api;
pub mod config;
pub mod error;
mod frontend;
mod server;

/// Read the whole config, then build the server with an SMTP transport.
pub fn start_servers() -> Result<Rocket<Build>> {
    let smtp_config = SmtpConfig::from_args()?;
    info!(
        "Emails will be sent as {} through {}:{}",
        smtp_config.sender_address(),
        smtp_config.server(),
        smtp_config.port()
    );
    let mailer = Mailer::new(
        Box::new(SmtpTransport::new(smtp_config)),
        retrieve_send_timeout(),
    );

    Ok(build_server(WebConfig::from_args(), mailer))
}
