use connexa_core::ActionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("undecodable response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ClientError> for ActionError {
    fn from(e: ClientError) -> Self {
        ActionError::transport(e)
    }
}
