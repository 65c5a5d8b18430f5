//! What every page needs to reach the outside world, provided once through
//! context.

use connexa_api::{AppConfig, EmailJsNotifier, HttpBackend};
use leptos::*;

#[derive(Clone, Debug)]
pub struct Services {
    pub backend: HttpBackend,
    pub notifier: Option<EmailJsNotifier>,
    /// Public origin that invite links are resolved against.
    pub app_url: Option<String>,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            backend: config.backend(),
            notifier: config.notifier(),
            app_url: config.app_url.clone().or_else(window_origin),
        }
    }
}

fn window_origin() -> Option<String> {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .filter(|origin| !origin.is_empty() && origin != "null")
}

pub fn provide_services() {
    let config = AppConfig::from_build_env();
    tracing::info!(
        api_base = %config.api_base,
        email = config.email.is_some(),
        "connexa configured"
    );
    provide_context(Services::from_config(&config));
}

pub fn use_services() -> StoredValue<Services> {
    let services = use_context::<Services>()
        .unwrap_or_else(|| Services::from_config(&AppConfig::from_build_env()));
    store_value(services)
}
