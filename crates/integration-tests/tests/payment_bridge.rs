//! Storefront payment client through the real proxy to a mocked PayDunya.

#![allow(clippy::unwrap_used)]

use marchenet_core::{InvoiceRequest, UserId};
use marchenet_integration_tests::{PUBLIC_ORIGIN, TestContext};
use marchenet_storefront::PaymentError;
use reqwest::StatusCode;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

fn request(amount: u64) -> InvoiceRequest {
    InvoiceRequest {
        total_amount: amount,
        description: "Paiement pour le Pack Basique - Chez Awa".to_string(),
        pack_name: "Pack Basique".to_string(),
        vendor_data: serde_json::json!({ "shop_name": "Chez Awa" }),
        user_id: Some(UserId::new("7")),
    }
}

#[tokio::test]
async fn token_only_response_builds_checkout_url() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .and(header("content-type", "application/json"))
        .and(header_exists("PAYDUNYA-MASTER-KEY"))
        .and(header_exists("PAYDUNYA-TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_code": "00",
            "response_text": "",
            "token": "test_Y2hlY2tvdXQ"
        })))
        .expect(1)
        .mount(&ctx.paydunya)
        .await;

    let url = ctx.payments.create_invoice(&request(3500)).await.unwrap();
    assert_eq!(
        url.as_str(),
        "https://paydunya.com/checkout/invoice/test_Y2hlY2tvdXQ"
    );
}

#[tokio::test]
async fn callback_urls_follow_public_origin() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_code": "00",
            "response_text": "https://paydunya.com/checkout/invoice/t1",
            "token": "t1"
        })))
        .mount(&ctx.paydunya)
        .await;

    ctx.payments.create_invoice(&request(3500)).await.unwrap();

    let requests = ctx.paydunya.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["actions"]["return_url"],
        format!("{PUBLIC_ORIGIN}/mon-profil")
    );
    assert_eq!(body["actions"]["callback_url"], body["actions"]["return_url"]);
    assert_eq!(
        body["actions"]["cancel_url"],
        format!("{PUBLIC_ORIGIN}/devenir-vendeur")
    );
    assert_eq!(body["store"]["website_url"], format!("{PUBLIC_ORIGIN}/"));
    assert_eq!(body["custom_data"]["mode"], "test");
    assert_eq!(body["invoice"]["items"][0]["description"], "Pack Basique pour Chez Awa");
}

#[tokio::test]
async fn provider_rejection_reaches_storefront_as_message() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .respond_with(ResponseTemplate::new(422).set_body_string("<html>oops</html>"))
        .mount(&ctx.paydunya)
        .await;

    let err = ctx.payments.create_invoice(&request(3500)).await.unwrap_err();
    let (status, message) = match err {
        PaymentError::Rejected { status, message } => (status, message),
        other => panic!("expected a rejection, got {other:?}"),
    };
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "Échec de la création de la facture");
}

#[tokio::test]
async fn proxy_refuses_zero_amount_without_calling_provider() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.paydunya)
        .await;

    let response = reqwest::Client::new()
        .post(ctx.proxy_url.join("payments/invoice").unwrap())
        .json(&serde_json::json!({
            "total_amount": 0,
            "description": "Rien",
            "pack_name": "Pack Gratuit"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn proxy_answers_health_checks() {
    let ctx = TestContext::new().await;
    let response = reqwest::get(ctx.proxy_url.join("health").unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
