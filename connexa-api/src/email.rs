//! Transactional email through the EmailJS REST API.
//!
//! Used for the invite link after an approval and the welcome message after a
//! registration. Sends are rate limited on the client: one per throttle
//! window, further sends in the window fail without a request.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use connexa_core::actions::Notifier;
use serde::Serialize;

use crate::config::EmailConfig;

const THROTTLED: &str = "limite de envio de emails atingido, tente novamente em instantes";

#[derive(Serialize)]
struct SendRequest<'a, P: Serialize> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: P,
}

#[derive(Serialize)]
struct InviteParams<'a> {
    to: &'a str,
    token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredParams<'a> {
    to: &'a str,
    name: &'a str,
    member_id: &'a str,
}

#[derive(Clone, Debug)]
pub struct EmailJsNotifier {
    client: reqwest::Client,
    config: EmailConfig,
    last_sent: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl EmailJsNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: EmailConfig) -> Self {
        Self {
            client,
            config,
            last_sent: Arc::new(Mutex::new(None)),
        }
    }

    fn take_slot(&self, now: DateTime<Utc>) -> Result<(), String> {
        let mut last = self
            .last_sent
            .lock()
            .map_err(|_| "email throttle lock poisoned".to_string())?;
        if let Some(prev) = *last {
            let elapsed = now.signed_duration_since(prev).num_milliseconds();
            if elapsed >= 0 && (elapsed as u64) < self.config.throttle_ms {
                return Err(THROTTLED.into());
            }
        }
        *last = Some(now);
        Ok(())
    }

    async fn send<P: Serialize>(&self, template_id: &str, params: P) -> Result<(), String> {
        self.take_slot(Utc::now())?;
        let url = format!("{}/api/v1.0/email/send", self.config.endpoint.trim_end_matches('/'));
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id,
            user_id: &self.config.public_key,
            template_params: params,
        };

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        if status.is_success() {
            tracing::debug!(template_id, "email sent");
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(format!("EmailJS respondeu {}: {}", status.as_u16(), text.trim()))
    }
}

impl Notifier for EmailJsNotifier {
    async fn send_invite(&self, to: &str, link: &str) -> Result<(), String> {
        self.send(&self.config.invite_template, InviteParams { to, token: link })
            .await
    }

    async fn send_registration(&self, to: &str, name: &str, member_id: &str) -> Result<(), String> {
        self.send(
            &self.config.registered_template,
            RegisteredParams { to, name, member_id },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notifier(throttle_ms: u64) -> EmailJsNotifier {
        EmailJsNotifier::new(EmailConfig {
            throttle_ms,
            ..EmailConfig::new("pk", "service", "invite", "registered")
        })
    }

    #[test]
    fn second_send_inside_window_is_refused() {
        let n = notifier(10_000);
        let t0 = Utc::now();
        assert!(n.take_slot(t0).is_ok());
        assert!(n.take_slot(t0 + Duration::seconds(3)).is_err());
        assert!(n.take_slot(t0 + Duration::seconds(10)).is_ok());
    }

    #[test]
    fn zero_throttle_never_refuses() {
        let n = notifier(0);
        let t0 = Utc::now();
        assert!(n.take_slot(t0).is_ok());
        assert!(n.take_slot(t0).is_ok());
    }
}
