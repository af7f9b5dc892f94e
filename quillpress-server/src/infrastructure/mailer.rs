use std::time::Duration;

use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use super::settings::Settings;

/// SMTP transport over implicit TLS, the scheme Gmail app passwords expect.
pub(crate) fn create_mailer(settings: &Settings) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
        .with_context(|| format!("invalid SMTP relay: {}", settings.smtp_host))?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.smtp_sender.clone(),
            settings.smtp_password.clone(),
        ))
        .timeout(Some(Duration::from_secs(settings.smtp_timeout_secs)))
        .build();

    Ok(mailer)
}

pub(crate) fn sender_mailbox(settings: &Settings) -> Result<Mailbox> {
    settings.smtp_sender.parse().with_context(|| {
        format!(
            "SMTP_SENDER is not a valid email address: {}",
            settings.smtp_sender
        )
    })
}
