//! Vendor onboarding from profile form to activation or payment redirect.

#![allow(clippy::unwrap_used)]

use marchenet_core::{AuthUser, Country, Session};
use marchenet_integration_tests::{PUBLIC_ORIGIN, TestContext, user_json};
use marchenet_storefront::onboarding::StepKind;
use marchenet_storefront::{
    GuardState, OnboardingError, OnboardingStart, OnboardingStep, RouteGuard, RouteTable,
    SessionState, VendorForm, VendorOnboarding,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn shopper() -> Session {
    let user: AuthUser = serde_json::from_value(user_json(7, "awa@example.sn")).unwrap();
    Session::new(user, None)
}

fn form() -> VendorForm {
    VendorForm {
        vendor_name: "Awa Diop".to_string(),
        shop_name: "Chez Awa".to_string(),
        address: "Rue 10, Médina, Dakar".to_string(),
        country: Country::Senegal,
        phone_number: "771234567".to_string(),
        email: "awa@example.sn".to_string(),
    }
}

async fn mount_no_vendor(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/api/vendors/me"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.backend)
        .await;
}

async fn start(ctx: &TestContext) -> Box<VendorOnboarding> {
    match VendorOnboarding::start(ctx.api.clone(), ctx.payments.clone(), shopper())
        .await
        .unwrap()
    {
        OnboardingStart::Flow(flow) => flow,
        OnboardingStart::AlreadyVendor(_) => panic!("expected a flow"),
    }
}

#[tokio::test]
async fn free_pack_creates_store_and_opens_vendor_pages() {
    let ctx = TestContext::signed_in("jwt-awa").await;
    mount_no_vendor(&ctx).await;
    Mock::given(method("POST"))
        .and(path("/api/vendors"))
        .and(body_partial_json(serde_json::json!({
            "shop_name": "Chez Awa",
            "country": "Sénégal",
            "phone_number": "+221771234567",
            "current_plan": "Pack Gratuit",
            "quota_limit": 2,
            "is_store_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 3,
            "shop_name": "Chez Awa",
            "current_plan": "Pack Gratuit",
            "quota_limit": 2,
            "is_store_active": true
        })))
        .expect(1)
        .mount(&ctx.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.paydunya)
        .await;

    let mut flow = start(&ctx).await;
    flow.submit_profile(form(), &mut StdRng::seed_from_u64(7)).unwrap();
    assert!(flow.vendor_code().unwrap().as_str().starts_with("VEND-"));

    let step = flow.select_pack("Pack Gratuit").await.unwrap().clone();
    let vendor = match step {
        OnboardingStep::Completed(vendor) => vendor,
        other => panic!("expected Completed, got {other:?}"),
    };

    let state = SessionState::new();
    let mut session = shopper();
    session.vendor = Some(vendor);
    state.set(Some(session));
    let guard = RouteGuard::new(RouteTable::default(), state);
    assert_eq!(guard.check("/ajouter-produit"), GuardState::Authorized);
}

#[tokio::test]
async fn paid_pack_goes_through_proxy_without_creating_store() {
    let ctx = TestContext::signed_in("jwt-awa").await;
    mount_no_vendor(&ctx).await;
    Mock::given(method("POST"))
        .and(path("/api/vendors"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&ctx.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .and(body_partial_json(serde_json::json!({
            "invoice": {
                "total_amount": 7500,
                "currency": "XOF",
                "items": [{ "name": "Pack Pro", "description": "Pack Pro pour Chez Awa" }]
            },
            "actions": { "cancel_url": format!("{PUBLIC_ORIGIN}/devenir-vendeur") },
            "custom_data": { "user_id": "7", "pack_name": "Pack Pro" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_code": "00",
            "response_text": "https://paydunya.com/checkout/invoice/test_pro",
            "token": "test_pro"
        })))
        .expect(1)
        .mount(&ctx.paydunya)
        .await;

    let mut flow = start(&ctx).await;
    flow.submit_profile(form(), &mut StdRng::seed_from_u64(1)).unwrap();
    flow.select_pack("Pack Pro").await.unwrap();
    assert_eq!(flow.step().kind(), StepKind::Payment);

    let redirect = flow.pay().await.unwrap();
    assert_eq!(
        redirect.url.as_str(),
        "https://paydunya.com/checkout/invoice/test_pro"
    );

    let requests = ctx.paydunya.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let code = flow.vendor_code().unwrap().as_str();
    assert_eq!(body["custom_data"]["vendor_data"]["vendor_code"], code);
}

#[tokio::test]
async fn provider_failure_keeps_flow_on_payment() {
    let ctx = TestContext::signed_in("jwt-awa").await;
    mount_no_vendor(&ctx).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-invoice/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_code": "1001",
            "response_text": "Invalid Masterkey Specified"
        })))
        .expect(2)
        .mount(&ctx.paydunya)
        .await;

    let mut flow = start(&ctx).await;
    flow.submit_profile(form(), &mut StdRng::seed_from_u64(2)).unwrap();
    flow.select_pack("Pack VIP").await.unwrap();

    let err = flow.pay().await.unwrap_err();
    assert!(matches!(err, OnboardingError::Payment(_)));
    assert_eq!(err.to_string(), "Invalid Masterkey Specified");
    assert_eq!(flow.step().kind(), StepKind::Payment);
    assert_eq!(flow.last_error(), Some("Invalid Masterkey Specified"));

    // Retry is allowed and creates a second invoice attempt
    assert!(flow.pay().await.is_err());

    flow.back_to_packs().unwrap();
    assert_eq!(flow.step().kind(), StepKind::PackSelection);
}

#[tokio::test]
async fn inactive_store_resumes_at_pack_selection() {
    let ctx = TestContext::signed_in("jwt-awa").await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "vendor_name": "Awa Diop",
            "shop_name": "Chez Awa",
            "country": "Sénégal",
            "phone_number": "+221771234567",
            "email": "awa@example.sn",
            "vendor_code": "VEND-AB12CD34",
            "current_plan": "Pack Basique",
            "is_store_active": false
        })))
        .mount(&ctx.backend)
        .await;

    let mut flow = start(&ctx).await;
    assert!(flow.is_existing_vendor());
    assert_eq!(flow.step().kind(), StepKind::PackSelection);
    assert_eq!(flow.form().phone_number, "771234567");

    let err = flow.select_pack("Pack Gratuit").await.unwrap_err();
    assert!(matches!(err, OnboardingError::FreePackUnavailable));
    assert_eq!(flow.step().kind(), StepKind::PackSelection);
}
