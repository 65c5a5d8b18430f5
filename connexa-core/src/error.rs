use thiserror::Error;

use crate::forms::FormError;

/// Every way a view action can fail. The display text is exactly what the
/// inline alert shows.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No key or member id is held; nothing was sent.
    #[error("{0}")]
    MissingIdentity(&'static str),
    #[error("Token não encontrado")]
    MissingToken,
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error("Apenas intenções pendentes podem ser avaliadas")]
    NotPending,
    #[error("Base URL da aplicação indisponível")]
    MissingAppUrl,
    /// The request never produced a readable envelope. The detail is kept for
    /// logs; users get a generic message.
    #[error("Não foi possível comunicar com o servidor")]
    Transport(String),
    /// The backend answered with a non-empty `error`; shown verbatim.
    #[error("{0}")]
    Application(String),
    #[error("Resposta do servidor sem dados")]
    MissingData,
}

impl ActionError {
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport(detail.to_string())
    }

    /// True when no request reached the backend.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingIdentity(_)
                | Self::MissingToken
                | Self::Invalid(_)
                | Self::NotPending
                | Self::MissingAppUrl
        )
    }
}
