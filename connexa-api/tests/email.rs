mod common;

use axum::http::{Method, StatusCode};
use common::FakeServer;
use connexa_api::{EmailConfig, EmailJsNotifier};
use connexa_core::actions::Notifier;
use serde_json::json;

fn config(endpoint: &str, throttle_ms: u64) -> EmailConfig {
    EmailConfig {
        endpoint: endpoint.to_string(),
        throttle_ms,
        ..EmailConfig::new("public-key", "service-1", "tpl-invite", "tpl-registered")
    }
}

#[tokio::test]
async fn invite_email_uses_invite_template() {
    let server = FakeServer::start(|_| (StatusCode::OK, "OK".into())).await;
    let notifier = EmailJsNotifier::new(config(&server.base, 0));

    notifier
        .send_invite("joao@example.com", "https://connexa.example/register?token=tok-1")
        .await
        .expect("sent");

    let req = server.only_request();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/api/v1.0/email/send");
    assert_eq!(
        req.body,
        Some(json!({
            "service_id": "service-1",
            "template_id": "tpl-invite",
            "user_id": "public-key",
            "template_params": {
                "to": "joao@example.com",
                "token": "https://connexa.example/register?token=tok-1"
            }
        }))
    );
}

#[tokio::test]
async fn registration_email_carries_member_id() {
    let server = FakeServer::start(|_| (StatusCode::OK, "OK".into())).await;
    let notifier = EmailJsNotifier::new(config(&server.base, 0));

    notifier
        .send_registration("ana@example.com", "Ana", "member-123")
        .await
        .expect("sent");

    let req = server.only_request();
    let body = req.body.expect("json body");
    assert_eq!(body["template_id"], "tpl-registered");
    assert_eq!(
        body["template_params"],
        json!({ "to": "ana@example.com", "name": "Ana", "memberId": "member-123" })
    );
}

#[tokio::test]
async fn rejected_send_reports_status_and_body() {
    let server =
        FakeServer::start(|_| (StatusCode::BAD_REQUEST, "The public key is invalid".into())).await;
    let notifier = EmailJsNotifier::new(config(&server.base, 0));

    let err = notifier.send_invite("joao@example.com", "http://x/").await.unwrap_err();
    assert!(err.contains("400"), "{err}");
    assert!(err.contains("The public key is invalid"), "{err}");
}

#[tokio::test]
async fn throttled_send_makes_no_request() {
    let server = FakeServer::start(|_| (StatusCode::OK, "OK".into())).await;
    let notifier = EmailJsNotifier::new(config(&server.base, 60_000));

    notifier.send_invite("a@example.com", "http://x/").await.expect("first send");
    assert!(notifier.send_invite("b@example.com", "http://x/").await.is_err());
    assert_eq!(server.requests().len(), 1);
}
