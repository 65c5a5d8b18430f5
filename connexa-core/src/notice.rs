use crate::error::ActionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// An inline alert shown at the top of a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Sucesso",
            NoticeKind::Warning => "Atenção",
            NoticeKind::Error => "Erro",
        }
    }
}

impl From<&ActionError> for Notice {
    fn from(e: &ActionError) -> Self {
        Self::error(e.to_string())
    }
}

impl From<ActionError> for Notice {
    fn from(e: ActionError) -> Self {
        Self::from(&e)
    }
}
