use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::error;

use crate::domain::contact::ContactMessage;
use crate::domain::error::DomainError;

pub(crate) struct ContactService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl ContactService {
    pub(crate) fn new(mailer: AsyncSmtpTransport<Tokio1Executor>, sender: Mailbox) -> Self {
        Self { mailer, sender }
    }

    pub(crate) async fn send_contact_message(
        &self,
        msg: ContactMessage,
    ) -> Result<(), DomainError> {
        let msg = msg.validate()?;
        let email = self.compose(&msg)?;

        self.mailer.send(email).await.map_err(|err| {
            error!(error = %err, recipient = %msg.email, "contact email failed");
            DomainError::TransportFailure(err.to_string())
        })?;

        Ok(())
    }

    fn compose(&self, msg: &ContactMessage) -> Result<Message, DomainError> {
        let recipient: Mailbox = msg
            .email
            .parse()
            .map_err(|err: lettre::address::AddressError| {
                DomainError::Unexpected(err.to_string())
            })?;

        let subject = format!("{} Thanks for connecting with us.", msg.name);
        let body = format!(
            "name: {}\nemail: {}\nphone: {}\n\n{}\n",
            msg.name, msg.email, msg.phone, msg.message
        );

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
