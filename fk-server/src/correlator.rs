//! The submission correlator.
//!
//! Tags submissions with form keys on the way in, re-derives form keys from secrets on the way
//! out, and decides whether a submission carrying an email token warrants a notification.

use std::sync::Arc;

use fk_core::keys::{generate_pair, FormKey, SecretKey};
use fk_core::submission::{Fields, Submission};
use fk_core::token::{EmailToken, Verification};

use crate::config::Config;
use crate::mail::{Mail, Mailer};
use crate::server::FORMKEY_NOTIFICATIONS;
use crate::store::{RecordId, SubmissionStore};
use crate::util::current_time_u64;

pub struct Correlator {
    config: Arc<Config>,
    store: Arc<dyn SubmissionStore>,
    mailer: Arc<dyn Mailer>,
}

impl std::fmt::Debug for Correlator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Correlator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Correlator {
    pub fn new(config: Config, store: Arc<dyn SubmissionStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            mailer,
        }
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Generates a new secret and its form key.
    pub fn generate_credentials(&self) -> (SecretKey, FormKey) {
        generate_pair(&self.config.server_key, &mut rand::thread_rng())
    }

    /// Stores a submission tagged with `form_key`.
    ///
    /// Any tag is accepted. Store failures are returned: a lost submission must be visible.
    pub async fn record_submission(
        &self,
        form_key: &str,
        fields: Fields,
    ) -> Result<(RecordId, Submission), crate::Error> {
        let timestamp = current_time_u64()?;
        let id = self.store.put(form_key, &fields, timestamp).await?;

        log::debug!("stored submission {id} for form {form_key}");

        Ok((id, Submission::new(form_key, fields, timestamp)))
    }

    /// All submissions tagged with the form key of `secret`, in insertion order.
    pub async fn query_submissions(
        &self,
        secret: &SecretKey,
    ) -> Result<(FormKey, Vec<Submission>), crate::Error> {
        let form_key = FormKey::derive(secret, &self.config.server_key);
        let submissions = self.store.query_by_form_key(&form_key.to_string()).await?;

        Ok((form_key, submissions))
    }

    /// Notifies the address in `token` of `submission`, if the token is valid for the
    /// submission's form key.
    ///
    /// Best effort: every failure is logged and swallowed.
    pub async fn notify_if_authorized(&self, submission: &Submission, token: Option<&EmailToken>) {
        let Some(token) = token else {
            return;
        };

        let Ok(now) = current_time_u64() else {
            return;
        };

        let claims = match token.verify(&self.config.token_key, now, self.config.token_max_age) {
            Verification::Verified(claims) => claims,
            Verification::Rejected(reason) => {
                log::debug!(
                    "ignoring email token on submission to form {}: {reason}",
                    submission.form_key
                );
                FORMKEY_NOTIFICATIONS.with_label_values(&["rejected"]).inc();
                return;
            }
        };

        if !submission.is_for(&claims.form_key) {
            log::debug!(
                "ignoring email token for another form on submission to form {}",
                submission.form_key
            );
            FORMKEY_NOTIFICATIONS.with_label_values(&["mismatch"]).inc();
            return;
        }

        match self
            .deliver(&Mail::notification(&claims.email, submission))
            .await
        {
            Ok(()) => {
                FORMKEY_NOTIFICATIONS.with_label_values(&["sent"]).inc();
            }
            Err(e) => {
                log::warn!(
                    "failed to notify about submission to form {}: {e}",
                    submission.form_key
                );
                FORMKEY_NOTIFICATIONS.with_label_values(&["failed"]).inc();
            }
        }
    }

    /// Issues an email token binding `email` to the form key of `secret` and mails it to
    /// `email`.
    ///
    /// Unlike notifications, delivery failures are returned: delivering the token is the point.
    pub async fn issue_token(
        &self,
        email: &str,
        secret: &SecretKey,
    ) -> Result<FormKey, crate::Error> {
        let now = current_time_u64()?;
        let form_key = FormKey::derive(secret, &self.config.server_key);
        let token = EmailToken::bind(
            email,
            form_key,
            &self.config.token_key,
            now,
            &mut rand::thread_rng(),
        )?;

        self.deliver(&Mail::token(email, &form_key, &token)).await?;

        log::info!("mailed email token for form {form_key}");

        Ok(form_key)
    }

    /// Sends `mail`, giving up after the configured mail timeout.
    async fn deliver(&self, mail: &Mail) -> Result<(), crate::Error> {
        match actix_rt::time::timeout(self.config.mail_timeout, self.mailer.send(mail)).await {
            Ok(res) => res,
            Err(_) => {
                log::error!(
                    "mail transport did not finish within {:?}",
                    self.config.mail_timeout
                );
                Err(crate::Error::Mail)
            }
        }
    }
}
