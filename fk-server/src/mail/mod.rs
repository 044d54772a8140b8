//! Outbound mail.
//!
//! Mail is sent for two reasons: to deliver a freshly issued email token to the address it binds,
//! and to notify that address of a new submission.

mod relay;

pub use relay::RelayMailer;

use fk_core::keys::FormKey;
use fk_core::submission::Submission;
use fk_core::token::EmailToken;
use serde::Serialize;

/// A plain-text mail message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Prefix of the line carrying the token in a token mail.
pub(crate) const TOKEN_LINE: &str = "Token: ";

impl Mail {
    /// The mail delivering an email token to the address it binds.
    pub fn token(to: &str, form_key: &FormKey, token: &EmailToken) -> Self {
        Self {
            to: to.to_string(),
            subject: "Your FormKey email token".to_string(),
            body: format!(
                "This address was registered to receive submissions to form {form_key}.\n\
                 Add the token below to your form as the hidden field `_token` to be notified \
                 of new submissions.\n\n{TOKEN_LINE}{token}\n"
            ),
        }
    }

    /// The mail notifying of a new submission.
    pub fn notification(to: &str, submission: &Submission) -> Self {
        let short: String = submission.form_key.chars().take(8).collect();

        Self {
            to: to.to_string(),
            subject: format!("New submission for form {short}"),
            body: format!(
                "A new submission to form {} was received at {} (UNIX time).\n\n{}",
                submission.form_key,
                submission.timestamp,
                submission.render_fields()
            ),
        }
    }
}

/// Trait for mail transports.
#[async_trait::async_trait(?Send)]
pub trait Mailer: Send + Sync {
    /// Send one message. Delivery failures are reported, retries are the transport's concern.
    async fn send(&self, mail: &Mail) -> Result<(), crate::Error>;
}

/// Mail transport that only logs recipient and subject.
///
/// Used when no relay is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait::async_trait(?Send)]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), crate::Error> {
        log::info!("not sending mail to {}: {}", mail.to, mail.subject);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fk_core::submission::Fields;
    use fk_core::test::{TestSetup, NOW};
    use std::sync::{Arc, Mutex};

    /// Mailer that records every message it is asked to send.
    #[derive(Default, Clone)]
    pub(crate) struct RecordingMailer {
        sent: Arc<Mutex<Vec<Mail>>>,
    }

    impl RecordingMailer {
        pub(crate) fn sent(&self) -> Vec<Mail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: &Mail) -> Result<(), crate::Error> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    /// Mailer whose transport is always down.
    #[derive(Default)]
    pub(crate) struct FailingMailer;

    #[async_trait::async_trait(?Send)]
    impl Mailer for FailingMailer {
        async fn send(&self, _: &Mail) -> Result<(), crate::Error> {
            Err(crate::Error::Mail)
        }
    }

    /// Mailer whose transport accepts the message and never finishes.
    #[derive(Default)]
    pub(crate) struct StalledMailer;

    #[async_trait::async_trait(?Send)]
    impl Mailer for StalledMailer {
        async fn send(&self, _: &Mail) -> Result<(), crate::Error> {
            futures::future::pending::<()>().await;
            Ok(())
        }
    }

    /// Extracts the token from a token mail.
    pub(crate) fn token_from(mail: &Mail) -> Option<EmailToken> {
        mail.body
            .lines()
            .find_map(|l| l.strip_prefix(TOKEN_LINE))
            .map(EmailToken::from)
    }

    #[test]
    fn test_token_mail() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);
        let token = EmailToken::issue(
            "a@b.com",
            &setup.secret,
            &setup.server_key,
            &setup.token_key,
            NOW,
            &mut rng,
        )
        .unwrap();

        let mail = Mail::token("a@b.com", &setup.form_key, &token);

        assert_eq!(mail.to, "a@b.com");
        assert!(mail.body.contains(&setup.form_key.to_string()));
        assert!(!mail.body.contains(&setup.secret.encode()));
        assert_eq!(token_from(&mail), Some(token));
    }

    #[test]
    fn test_notification_mail() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), "Alice".to_string());
        let submission = Submission::new("AbCdEfGhIjKl", fields, NOW);

        let mail = Mail::notification("a@b.com", &submission);

        assert_eq!(mail.to, "a@b.com");
        assert_eq!(mail.subject, "New submission for form AbCdEfGh");
        assert!(mail.body.contains("name: Alice\n"));
        assert!(mail.body.contains(&NOW.to_string()));
    }

    #[actix_web::test]
    async fn test_log_mailer() {
        let mail = Mail {
            to: "a@b.com".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
        };

        assert!(LogMailer.send(&mail).await.is_ok());
    }
}
