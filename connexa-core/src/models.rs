use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::envelope::{Meta, Page};

// ── Applications ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Approved => "Aprovado",
            Self::Rejected => "Recusado",
        }
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub motivation: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Approve and reject only apply while the application awaits review.
    pub fn is_actionable(&self) -> bool {
        self.status.is_pending()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApplicationInput {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub motivation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub invite_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub token: String,
}

/// An approval is committed even when the reply carries no invite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub invite: Option<Invite>,
}

impl ApproveResponse {
    /// Invite path to resolve, empty when the backend sent none.
    pub fn invite_path(&self) -> &str {
        self.invite.as_ref().map_or("", |i| i.invite_url.as_str())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectResponse {
    pub message: String,
}

// ── Registration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub company: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
}

// ── Referrals ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    New,
    InContact,
    Closed,
    Declined,
}

impl ReferralStatus {
    pub const ALL: [ReferralStatus; 4] = [Self::New, Self::InContact, Self::Closed, Self::Declined];

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "Nova",
            Self::InContact => "Em Contato",
            Self::Closed => "Fechada",
            Self::Declined => "Recusada",
        }
    }

    /// Wire name, also used as the `<option>` value in the status selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InContact => "IN_CONTACT",
            Self::Closed => "CLOSED",
            Self::Declined => "DECLINED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub id: String,
    pub from_member_id: String,
    pub to_member_id: String,
    pub company_or_contact: String,
    pub description: String,
    pub status: ReferralStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Referral {
    /// Only the member who created a referral may move its status.
    pub fn is_owned_by(&self, member_id: &str) -> bool {
        self.from_member_id == member_id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralPayload {
    pub to_member_id: String,
    pub company_or_contact: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    pub status: ReferralStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralBuckets {
    #[serde(default)]
    pub mine: Vec<Referral>,
    #[serde(default)]
    pub to_me: Vec<Referral>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralMeta {
    #[serde(default)]
    pub mine: Option<Meta>,
    #[serde(default)]
    pub to_me: Option<Meta>,
}

/// Which half of the referrals listing a request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferralSide {
    Mine,
    ToMe,
}

impl ReferralSide {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Mine => "mine",
            Self::ToMe => "toMe",
        }
    }

    /// Pick this side's items and meta out of a combined listing.
    pub fn take(self, buckets: ReferralBuckets, meta: Option<ReferralMeta>) -> Page<Referral> {
        let meta = meta.unwrap_or_default();
        match self {
            Self::Mine => Page::new(buckets.mine, meta.mine),
            Self::ToMe => Page::new(buckets.to_me, meta.to_me),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_application_from_wire_shape() {
        let app: Application = serde_json::from_value(serde_json::json!({
            "id": "app-123",
            "name": "João Silva",
            "email": "joao@example.com",
            "company": null,
            "motivation": "Quero participar do networking",
            "status": "PENDING",
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .expect("application");
        assert_eq!(app.company, None);
        assert!(app.is_actionable());
        assert_eq!(app.status.label(), "Pendente");
    }

    #[test]
    fn referral_status_round_trips_through_wire_names() {
        for status in ReferralStatus::ALL {
            let json = serde_json::to_value(status).expect("serialize");
            assert_eq!(json, serde_json::json!(status.as_str()));
            assert_eq!(ReferralStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReferralStatus::parse("ARCHIVED"), None);
    }

    #[test]
    fn create_application_sends_null_company() {
        let input = CreateApplicationInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            company: None,
            motivation: "networking".into(),
        };
        let json = serde_json::to_value(&input).expect("serialize");
        assert_eq!(json["company"], serde_json::Value::Null);
    }

    #[test]
    fn approval_reply_without_invite_still_decodes() {
        let bare: ApproveResponse =
            serde_json::from_value(serde_json::json!({ "message": "ok" })).expect("bare");
        assert_eq!(bare.invite, None);
        assert_eq!(bare.invite_path(), "");

        let null_url: ApproveResponse = serde_json::from_value(serde_json::json!({
            "message": "ok",
            "invite": { "inviteUrl": null, "token": "tok-1" }
        }))
        .expect("null url");
        assert_eq!(null_url.invite_path(), "");
        assert_eq!(null_url.invite.map(|i| i.token).as_deref(), Some("tok-1"));

        let full: ApproveResponse = serde_json::from_value(serde_json::json!({
            "message": "ok",
            "invite": { "inviteUrl": "/register?token=tok-1", "token": "tok-1" }
        }))
        .expect("full");
        assert_eq!(full.invite_path(), "/register?token=tok-1");
    }

    #[test]
    fn referral_side_takes_its_own_bucket() {
        let buckets: ReferralBuckets = serde_json::from_value(serde_json::json!({
            "mine": [],
            "toMe": [{
                "id": "ref-1",
                "fromMemberId": "member-2",
                "toMemberId": "member-1",
                "companyOrContact": "Empresa ABC",
                "description": "Indicação de cliente",
                "status": "IN_CONTACT",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-02T00:00:00Z"
            }]
        }))
        .expect("buckets");
        let meta = ReferralMeta {
            mine: None,
            to_me: Some(Meta { page: 1, limit: 10, total: 11, total_pages: 2 }),
        };

        let page = ReferralSide::ToMe.take(buckets.clone(), Some(meta.clone()));
        assert_eq!(page.items.len(), 1);
        assert!(page.has_more());
        assert!(!page.items[0].is_owned_by("member-1"));

        let page = ReferralSide::Mine.take(buckets, Some(meta));
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }
}
