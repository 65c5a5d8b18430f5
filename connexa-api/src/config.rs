use crate::client::HttpBackend;
use crate::email::EmailJsNotifier;

pub const DEFAULT_API_BASE: &str = "http://localhost:3001";
pub const DEFAULT_EMAIL_ENDPOINT: &str = "https://api.emailjs.com";
pub const DEFAULT_EMAIL_THROTTLE_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailConfig {
    pub endpoint: String,
    pub public_key: String,
    pub service_id: String,
    pub invite_template: String,
    pub registered_template: String,
    pub throttle_ms: u64,
}

impl EmailConfig {
    pub fn new(
        public_key: &str,
        service_id: &str,
        invite_template: &str,
        registered_template: &str,
    ) -> Self {
        Self {
            endpoint: DEFAULT_EMAIL_ENDPOINT.into(),
            public_key: public_key.into(),
            service_id: service_id.into(),
            invite_template: invite_template.into(),
            registered_template: registered_template.into(),
            throttle_ms: DEFAULT_EMAIL_THROTTLE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    /// Public origin used to build invite links. The browser build falls back
    /// to `window.location.origin`.
    pub app_url: Option<String>,
    /// `None` disables notification emails.
    pub email: Option<EmailConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            app_url: None,
            email: None,
        }
    }
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base = var("CONNEXA_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.into());

        let email = match (
            var("CONNEXA_EMAILJS_PUBLIC_KEY"),
            var("CONNEXA_EMAILJS_SERVICE_ID"),
            var("CONNEXA_EMAILJS_INVITE_TEMPLATE"),
            var("CONNEXA_EMAILJS_REGISTERED_TEMPLATE"),
        ) {
            (Some(key), Some(service), Some(invite), Some(registered)) => Some(EmailConfig {
                endpoint: var("CONNEXA_EMAILJS_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_EMAIL_ENDPOINT.into()),
                public_key: key,
                service_id: service,
                invite_template: invite,
                registered_template: registered,
                throttle_ms: var("CONNEXA_EMAILJS_THROTTLE_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_EMAIL_THROTTLE_MS),
            }),
            _ => None,
        };

        Self {
            api_base,
            app_url: var("CONNEXA_APP_URL"),
            email,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Values baked in when the crate was compiled, for targets without a
    /// process environment.
    pub fn from_build_env() -> Self {
        Self::from_lookup(build_env)
    }

    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(&self.api_base)
    }

    pub fn notifier(&self) -> Option<EmailJsNotifier> {
        self.email.clone().map(EmailJsNotifier::new)
    }
}

fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "CONNEXA_API_BASE" => option_env!("CONNEXA_API_BASE"),
        "CONNEXA_APP_URL" => option_env!("CONNEXA_APP_URL"),
        "CONNEXA_EMAILJS_ENDPOINT" => option_env!("CONNEXA_EMAILJS_ENDPOINT"),
        "CONNEXA_EMAILJS_PUBLIC_KEY" => option_env!("CONNEXA_EMAILJS_PUBLIC_KEY"),
        "CONNEXA_EMAILJS_SERVICE_ID" => option_env!("CONNEXA_EMAILJS_SERVICE_ID"),
        "CONNEXA_EMAILJS_INVITE_TEMPLATE" => option_env!("CONNEXA_EMAILJS_INVITE_TEMPLATE"),
        "CONNEXA_EMAILJS_REGISTERED_TEMPLATE" => option_env!("CONNEXA_EMAILJS_REGISTERED_TEMPLATE"),
        "CONNEXA_EMAILJS_THROTTLE_MS" => option_env!("CONNEXA_EMAILJS_THROTTLE_MS"),
        _ => None,
    };
    value.map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend().base_url(), "http://localhost:3001");
        assert!(config.notifier().is_none());
    }

    #[test]
    fn api_base_loses_trailing_slashes() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CONNEXA_API_BASE", "https://api.connexa.example///"),
            ("CONNEXA_APP_URL", "https://connexa.example"),
        ]));
        assert_eq!(config.api_base, "https://api.connexa.example");
        assert_eq!(config.app_url.as_deref(), Some("https://connexa.example"));
    }

    #[test]
    fn email_needs_every_key() {
        let partial = AppConfig::from_lookup(lookup(&[
            ("CONNEXA_EMAILJS_PUBLIC_KEY", "pk"),
            ("CONNEXA_EMAILJS_SERVICE_ID", "service"),
        ]));
        assert!(partial.email.is_none());

        let full = AppConfig::from_lookup(lookup(&[
            ("CONNEXA_EMAILJS_PUBLIC_KEY", "pk"),
            ("CONNEXA_EMAILJS_SERVICE_ID", "service"),
            ("CONNEXA_EMAILJS_INVITE_TEMPLATE", "tpl-invite"),
            ("CONNEXA_EMAILJS_REGISTERED_TEMPLATE", "tpl-registered"),
            ("CONNEXA_EMAILJS_THROTTLE_MS", "500"),
        ]));
        let email = full.email.expect("email config");
        assert_eq!(email.endpoint, DEFAULT_EMAIL_ENDPOINT);
        assert_eq!(email.throttle_ms, 500);
        assert_eq!(email.invite_template, "tpl-invite");
    }
}
