//! HTTP side of Connexa: the backend gateway client, the EmailJS notifier and
//! the configuration that wires them.

pub mod client;
pub mod config;
pub mod email;
pub mod error;

pub use client::HttpBackend;
pub use config::{AppConfig, EmailConfig};
pub use email::EmailJsNotifier;
pub use error::ClientError;
