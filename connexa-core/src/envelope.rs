use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Pagination block attached to list responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Meta {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// The uniform `{data, error[, meta]}` body every backend call answers with.
///
/// The backend reports failures through `error` on 2xx and 4xx alike, so the
/// status code is never consulted; an empty string means success.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T, M = ()> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: String,
    #[serde(default = "Option::default")]
    pub meta: Option<M>,
}

impl<T, M> Envelope<T, M> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: String::new(),
            meta: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: error.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn into_data(self) -> Result<T, ActionError> {
        self.into_parts().map(|(data, _)| data)
    }

    pub fn into_parts(self) -> Result<(T, Option<M>), ActionError> {
        if self.is_error() {
            return Err(ActionError::Application(self.error));
        }
        let data = self.data.ok_or(ActionError::MissingData)?;
        Ok((data, self.meta))
    }
}

impl<T> Envelope<Vec<T>, Meta> {
    pub fn into_page(self) -> Result<Page<T>, ActionError> {
        let (items, meta) = self.into_parts()?;
        Ok(Page::new(items, meta))
    }
}

/// One fetched page of a list.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<Meta>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: Option<Meta>) -> Self {
        Self { items, meta }
    }

    /// A page without meta is treated as the last one.
    pub fn has_more(&self) -> bool {
        self.meta.as_ref().is_some_and(Meta::has_more)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_wins_over_data() {
        let env: Envelope<Vec<u32>, Meta> = serde_json::from_value(serde_json::json!({
            "data": [1, 2],
            "error": "Email já cadastrado"
        }))
        .expect("envelope");
        assert_eq!(
            env.into_page().unwrap_err(),
            ActionError::Application("Email já cadastrado".into())
        );
    }

    #[test]
    fn null_data_on_success_is_missing_data() {
        let env: Envelope<String> =
            serde_json::from_value(serde_json::json!({ "data": null, "error": "" }))
                .expect("envelope");
        assert_eq!(env.into_data().unwrap_err(), ActionError::MissingData);
    }

    #[test]
    fn page_reads_has_more_from_meta() {
        let env: Envelope<Vec<u32>, Meta> = serde_json::from_value(serde_json::json!({
            "data": [1, 2],
            "error": "",
            "meta": { "page": 1, "limit": 2, "total": 3, "totalPages": 2 }
        }))
        .expect("envelope");
        let page = env.into_page().expect("page");
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more());

        let last = Page::new(vec![3], Some(Meta { page: 2, limit: 2, total: 3, total_pages: 2 }));
        assert!(!last.has_more());
        assert!(!Page::<u32>::new(vec![], None).has_more());
    }
}
