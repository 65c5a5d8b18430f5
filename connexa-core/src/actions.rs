//! Seams to the outside world and the workflows the views run through them.
//!
//! Every workflow checks its local guards first (identity, form, status) and
//! only then issues exactly one backend call. Callers reload page 1 of the
//! affected list after a success.

use url::Url;

use crate::envelope::{Envelope, Meta, Page};
use crate::error::ActionError;
use crate::forms::{invite_token, ApplicationForm, ReferralForm, RegisterForm};
use crate::models::{
    Application, ApproveResponse, CreateApplicationInput, CreateReferralPayload, Invite, Referral,
    ReferralBuckets, ReferralMeta, ReferralSide, ReferralStatus, RegisterPayload, RegisterResponse,
    RejectResponse, StatusUpdate,
};
use crate::notice::Notice;
use crate::paging::PageQuery;
use crate::session::{Admin, AdminSession, Member, MemberSession, Role};

pub const APPLICATION_SENT: &str = "Intenção enviada com sucesso!";
pub const APPLICATION_REJECTED: &str = "Intenção recusada com sucesso";
pub const MEMBER_REGISTERED: &str = "Cadastro realizado com sucesso!";
pub const REFERRAL_CREATED: &str = "Indicação criada com sucesso!";
pub const REFERRAL_STATUS_UPDATED: &str = "Status atualizado com sucesso";

// ── Seams ────────────────────────────────────────────────────────────────────

/// Minimal acknowledgement returned when a record is created.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Created {
    pub id: String,
}

/// One method per backend endpoint. `Err` is reserved for requests that never
/// produced a readable envelope; backend-reported failures come back inside
/// the envelope.
pub trait ConnexaBackend {
    async fn submit_application(
        &self,
        input: &CreateApplicationInput,
    ) -> Result<Envelope<Created>, ActionError>;

    async fn list_applications(
        &self,
        session: &AdminSession,
        page: u32,
        limit: u32,
    ) -> Result<Envelope<Vec<Application>, Meta>, ActionError>;

    async fn approve_application(
        &self,
        session: &AdminSession,
        id: &str,
    ) -> Result<Envelope<ApproveResponse>, ActionError>;

    async fn reject_application(
        &self,
        session: &AdminSession,
        id: &str,
    ) -> Result<Envelope<RejectResponse>, ActionError>;

    async fn register(
        &self,
        input: &RegisterPayload,
        token: &str,
    ) -> Result<Envelope<RegisterResponse>, ActionError>;

    async fn list_referrals(
        &self,
        session: &MemberSession,
        page: u32,
        limit: u32,
        side: Option<ReferralSide>,
    ) -> Result<Envelope<ReferralBuckets, ReferralMeta>, ActionError>;

    async fn create_referral(
        &self,
        session: &MemberSession,
        input: &CreateReferralPayload,
    ) -> Result<Envelope<Referral>, ActionError>;

    async fn update_referral_status(
        &self,
        session: &MemberSession,
        id: &str,
        status: ReferralStatus,
    ) -> Result<Envelope<StatusUpdate>, ActionError>;
}

/// Transactional email side channel. Sends are best effort.
pub trait Notifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send_invite(&self, to: &str, link: &str) -> Result<(), String>;

    async fn send_registration(&self, to: &str, name: &str, member_id: &str) -> Result<(), String>;
}

impl<N: Notifier> Notifier for Option<N> {
    fn is_enabled(&self) -> bool {
        self.as_ref().is_some_and(Notifier::is_enabled)
    }

    async fn send_invite(&self, to: &str, link: &str) -> Result<(), String> {
        match self {
            Some(n) => n.send_invite(to, link).await,
            None => Ok(()),
        }
    }

    async fn send_registration(&self, to: &str, name: &str, member_id: &str) -> Result<(), String> {
        match self {
            Some(n) => n.send_registration(to, name, member_id).await,
            None => Ok(()),
        }
    }
}

/// A notifier that never sends.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNotifier;

impl Notifier for NoNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send_invite(&self, _to: &str, _link: &str) -> Result<(), String> {
        Ok(())
    }

    async fn send_registration(
        &self,
        _to: &str,
        _name: &str,
        _member_id: &str,
    ) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    Failed(String),
    Skipped,
}

impl NotificationOutcome {
    pub fn warning(&self) -> Option<Notice> {
        match self {
            Self::Failed(reason) => Some(Notice::warning(format!(
                "O email de notificação não pôde ser enviado: {reason}"
            ))),
            _ => None,
        }
    }
}

async fn notify<N: Notifier>(
    notifier: &N,
    send: impl std::future::Future<Output = Result<(), String>>,
) -> NotificationOutcome {
    if !notifier.is_enabled() {
        return NotificationOutcome::Skipped;
    }
    match send.await {
        Ok(()) => NotificationOutcome::Sent,
        Err(reason) => {
            tracing::warn!(%reason, "notification email failed");
            NotificationOutcome::Failed(reason)
        }
    }
}

fn require_session<R: Role>(session: &crate::session::Session<R>) -> Result<(), ActionError> {
    if session.is_active() {
        Ok(())
    } else {
        Err(ActionError::MissingIdentity(R::MISSING))
    }
}

// ── Page fetchers ────────────────────────────────────────────────────────────

pub async fn fetch_applications_page<B: ConnexaBackend>(
    backend: &B,
    query: PageQuery<Admin>,
) -> Result<Page<Application>, ActionError> {
    backend
        .list_applications(&query.session, query.page, query.limit)
        .await?
        .into_page()
}

pub async fn fetch_referrals_page<B: ConnexaBackend>(
    backend: &B,
    query: PageQuery<Member>,
    side: ReferralSide,
) -> Result<Page<Referral>, ActionError> {
    let (buckets, meta) = backend
        .list_referrals(&query.session, query.page, query.limit, Some(side))
        .await?
        .into_parts()?;
    Ok(side.take(buckets, meta))
}

/// Both halves of the referrals listing from one unfiltered call.
pub async fn fetch_referrals_both<B: ConnexaBackend>(
    backend: &B,
    query: PageQuery<Member>,
) -> Result<(Page<Referral>, Page<Referral>), ActionError> {
    let (buckets, meta) = backend
        .list_referrals(&query.session, query.page, query.limit, None)
        .await?
        .into_parts()?;
    let ReferralBuckets { mine, to_me } = buckets;
    let meta = meta.unwrap_or_default();
    Ok((Page::new(mine, meta.mine), Page::new(to_me, meta.to_me)))
}

// ── Applications ─────────────────────────────────────────────────────────────

pub async fn submit_application<B: ConnexaBackend>(
    backend: &B,
    form: &ApplicationForm,
) -> Result<Notice, ActionError> {
    let input = form.to_payload()?;
    let created = backend.submit_application(&input).await?.into_data()?;
    tracing::info!(application_id = %created.id, "application submitted");
    Ok(Notice::success(APPLICATION_SENT))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Approval {
    pub link: String,
    pub invite: Option<Invite>,
    pub notification: NotificationOutcome,
}

impl Approval {
    pub fn notices(&self) -> Vec<Notice> {
        let mut out = vec![Notice::success(format!("Aprovado! Link: {}", self.link))];
        out.extend(self.notification.warning());
        out
    }
}

fn app_base(app_url: Option<&str>) -> Result<Url, ActionError> {
    let raw = app_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ActionError::MissingAppUrl)?;
    Url::parse(raw).map_err(|_| ActionError::MissingAppUrl)
}

/// Resolve the backend's invite path against the public app URL.
pub fn invite_link(app_url: Option<&str>, invite_url: &str) -> Result<String, ActionError> {
    let base = app_base(app_url)?;
    let path = if invite_url.is_empty() { "/" } else { invite_url };
    base.join(path)
        .map(String::from)
        .map_err(|_| ActionError::MissingAppUrl)
}

/// Approve a pending application, then email the invite link.
///
/// The approval is committed once the backend says so; the email runs
/// afterwards and its result is reported on its own.
pub async fn approve_application<B: ConnexaBackend, N: Notifier>(
    backend: &B,
    notifier: &N,
    session: &AdminSession,
    application: &Application,
    app_url: Option<&str>,
) -> Result<Approval, ActionError> {
    require_session(session)?;
    if !application.is_actionable() {
        return Err(ActionError::NotPending);
    }
    app_base(app_url)?;

    let approved = backend
        .approve_application(session, &application.id)
        .await?
        .into_data()?;
    let link = invite_link(app_url, approved.invite_path())?;
    tracing::info!(application_id = %application.id, "application approved");

    let notification = notify(notifier, notifier.send_invite(&application.email, &link)).await;
    Ok(Approval {
        link,
        invite: approved.invite,
        notification,
    })
}

pub async fn reject_application<B: ConnexaBackend>(
    backend: &B,
    session: &AdminSession,
    application: &Application,
) -> Result<Notice, ActionError> {
    require_session(session)?;
    if !application.is_actionable() {
        return Err(ActionError::NotPending);
    }
    backend
        .reject_application(session, &application.id)
        .await?
        .into_data()?;
    tracing::info!(application_id = %application.id, "application rejected");
    Ok(Notice::success(APPLICATION_REJECTED))
}

// ── Registration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub member_id: String,
    pub notification: NotificationOutcome,
}

impl Registration {
    pub fn notices(&self) -> Vec<Notice> {
        let mut out = vec![Notice::success(MEMBER_REGISTERED)];
        out.extend(self.notification.warning());
        out
    }
}

pub async fn register_member<B: ConnexaBackend, N: Notifier>(
    backend: &B,
    notifier: &N,
    token: Option<&str>,
    form: &RegisterForm,
) -> Result<Registration, ActionError> {
    let token = invite_token(token).ok_or(ActionError::MissingToken)?;
    let payload = form.to_payload()?;
    let created = backend.register(&payload, &token).await?.into_data()?;
    tracing::info!(member_id = %created.id, "member registered");

    let notification = notify(
        notifier,
        notifier.send_registration(&payload.email, &payload.name, &created.id),
    )
    .await;
    Ok(Registration {
        member_id: created.id,
        notification,
    })
}

// ── Referrals ────────────────────────────────────────────────────────────────

pub async fn create_referral<B: ConnexaBackend>(
    backend: &B,
    session: &MemberSession,
    form: &ReferralForm,
) -> Result<Notice, ActionError> {
    require_session(session)?;
    let payload = form.to_payload()?;
    let referral = backend.create_referral(session, &payload).await?.into_data()?;
    tracing::info!(referral_id = %referral.id, "referral created");
    Ok(Notice::success(REFERRAL_CREATED))
}

pub async fn update_referral_status<B: ConnexaBackend>(
    backend: &B,
    session: &MemberSession,
    id: &str,
    status: ReferralStatus,
) -> Result<Notice, ActionError> {
    require_session(session)?;
    let updated = backend
        .update_referral_status(session, id, status)
        .await?
        .into_data()?;
    tracing::info!(
        referral_id = %updated.id,
        status = updated.status.as_str(),
        "referral status updated"
    );
    Ok(Notice::success(REFERRAL_STATUS_UPDATED))
}
