use anyhow::Context as _;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::domain::email::ContactEmail;
use crate::domain::repository::NotificationPort;
use crate::domain::types::ContactForm;
use crate::error::ContactServiceError;

/// Sends contact notifications through an authenticated SMTP relay.
///
/// The message is addressed from the visitor with `Reply-To` set to them. Relays
/// such as Gmail rewrite the visible `From` to the authenticated account; replies
/// still reach the visitor through `Reply-To`.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    recipient: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("configure SMTP relay {}", config.smtp_host))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let recipient = config
            .recipient
            .parse::<Mailbox>()
            .context("parse notification recipient")?;
        Ok(Self {
            transport,
            recipient,
        })
    }

    fn build_message(&self, form: &ContactForm) -> anyhow::Result<Message> {
        let email = ContactEmail::compose(form);
        let address = form
            .email
            .parse::<Address>()
            .context("parse submitter address")?;
        let submitter = Mailbox::new(Some(form.name.clone()), address);
        Message::builder()
            .from(submitter.clone())
            .reply_to(submitter)
            .to(self.recipient.clone())
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .context("build notification email")
    }
}

impl NotificationPort for SmtpNotifier {
    async fn notify(&self, form: &ContactForm) -> Result<(), ContactServiceError> {
        let message = self.build_message(form)?;
        self.transport
            .send(message)
            .await
            .context("send notification email")?;
        Ok(())
    }
}
