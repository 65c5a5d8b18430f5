//! Typed calls to the Connexa backend. One function per endpoint, one HTTP
//! request per call, no retries and no caching.

use connexa_core::actions::{ConnexaBackend, Created};
use connexa_core::models::{
    Application, ApproveResponse, CreateApplicationInput, CreateReferralPayload, Referral,
    ReferralBuckets, ReferralMeta, ReferralSide, ReferralStatus, RegisterPayload, RegisterResponse,
    RejectResponse, StatusUpdate,
};
use connexa_core::{ActionError, AdminSession, Envelope, MemberSession, Meta};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

/// What a single backend call needs besides its method and path.
struct Call<'a, B: Serialize + ?Sized> {
    query: Vec<(&'static str, String)>,
    auth: Option<(&'static str, &'a str)>,
    body: Option<&'a B>,
}

impl<B: Serialize + ?Sized> Default for Call<'_, B> {
    fn default() -> Self {
        Self {
            query: Vec::new(),
            auth: None,
            body: None,
        }
    }
}

impl HttpBackend {
    pub fn new(api_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        Self {
            client,
            base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn call<B, T>(
        &self,
        method: Method,
        path: &str,
        call: Call<'_, B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, path, "backend call");
        let mut req = self
            .client
            .request(method.clone(), format!("{}{}", self.base, path))
            .header(CONTENT_TYPE, "application/json");
        if !call.query.is_empty() {
            req = req.query(&call.query);
        }
        if let Some((name, value)) = call.auth {
            req = req.header(name, value);
        }
        if let Some(body) = call.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "backend unreachable");
            ClientError::Request(e)
        })?;
        // The envelope carries success or failure; the status only matters
        // when the body cannot be read.
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|source| {
            tracing::warn!(%method, path, status, error = %source, "undecodable backend response");
            ClientError::Decode { status, source }
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: (&'static str, &str),
        query: Vec<(&'static str, String)>,
    ) -> Result<T, ClientError> {
        let call: Call<'_, ()> = Call {
            query,
            auth: Some(auth),
            body: None,
        };
        self.call(Method::GET, path, call).await
    }
}

fn paging(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

impl ConnexaBackend for HttpBackend {
    async fn submit_application(
        &self,
        input: &CreateApplicationInput,
    ) -> Result<Envelope<Created>, ActionError> {
        let call = Call {
            body: Some(input),
            ..Call::default()
        };
        Ok(self.call(Method::POST, "/applications", call).await?)
    }

    async fn list_applications(
        &self,
        session: &AdminSession,
        page: u32,
        limit: u32,
    ) -> Result<Envelope<Vec<Application>, Meta>, ActionError> {
        Ok(self
            .get("/admin/applications", session.header(), paging(page, limit))
            .await?)
    }

    async fn approve_application(
        &self,
        session: &AdminSession,
        id: &str,
    ) -> Result<Envelope<ApproveResponse>, ActionError> {
        let call: Call<'_, ()> = Call {
            auth: Some(session.header()),
            ..Call::default()
        };
        Ok(self
            .call(Method::POST, &format!("/admin/applications/{id}/approve"), call)
            .await?)
    }

    async fn reject_application(
        &self,
        session: &AdminSession,
        id: &str,
    ) -> Result<Envelope<RejectResponse>, ActionError> {
        let call: Call<'_, ()> = Call {
            auth: Some(session.header()),
            ..Call::default()
        };
        Ok(self
            .call(Method::POST, &format!("/admin/applications/{id}/reject"), call)
            .await?)
    }

    async fn register(
        &self,
        input: &RegisterPayload,
        token: &str,
    ) -> Result<Envelope<RegisterResponse>, ActionError> {
        let call = Call {
            query: vec![("token", token.to_string())],
            body: Some(input),
            ..Call::default()
        };
        Ok(self.call(Method::POST, "/register", call).await?)
    }

    async fn list_referrals(
        &self,
        session: &MemberSession,
        page: u32,
        limit: u32,
        side: Option<ReferralSide>,
    ) -> Result<Envelope<ReferralBuckets, ReferralMeta>, ActionError> {
        let mut query = paging(page, limit);
        if let Some(side) = side {
            query.push(("type", side.as_query().to_string()));
        }
        Ok(self.get("/referrals", session.header(), query).await?)
    }

    async fn create_referral(
        &self,
        session: &MemberSession,
        input: &CreateReferralPayload,
    ) -> Result<Envelope<Referral>, ActionError> {
        let call = Call {
            auth: Some(session.header()),
            body: Some(input),
            ..Call::default()
        };
        Ok(self.call(Method::POST, "/referrals", call).await?)
    }

    async fn update_referral_status(
        &self,
        session: &MemberSession,
        id: &str,
        status: ReferralStatus,
    ) -> Result<Envelope<StatusUpdate>, ActionError> {
        let body = serde_json::json!({ "status": status });
        let call = Call {
            auth: Some(session.header()),
            body: Some(&body),
            ..Call::default()
        };
        Ok(self
            .call(Method::PATCH, &format!("/referrals/{id}"), call)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slashes() {
        assert_eq!(HttpBackend::new("http://localhost:3001//").base_url(), "http://localhost:3001");
    }
}
