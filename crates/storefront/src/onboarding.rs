//! Vendor onboarding: profile form, pack selection, payment.
//!
//! ```text
//! start ──> AlreadyVendor                       (active record)
//!   │
//!   ├──> ProfileForm ──submit──> PackSelection  (no record)
//!   └──────────────────────────> PackSelection  (inactive record, pre-filled)
//!
//! PackSelection ──free pack──> Completed        (one POST /vendors)
//! PackSelection ──paid pack──> Payment ──pay──> checkout URL
//! Payment ──back──> PackSelection
//! ```
//!
//! Local validation never touches the network. The free-pack rule for
//! existing stores is checked here but enforced by the backend.

use marchenet_core::{
    Country, Email, EmailError, NewVendor, Pack, PhoneError, PhoneNumber, Session, VendorCode,
    VendorProfile,
};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::{ApiClient, ApiError};
use crate::payments::{PaymentClient, PaymentError, pack_invoice, vendor_data};

/// Field-level validation failures of the profile form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Le champ {0} est obligatoire")]
    Missing(&'static str),
    #[error("Adresse email invalide: {0}")]
    Email(#[from] EmailError),
    #[error("Numéro de téléphone invalide: {0}")]
    Phone(#[from] PhoneError),
}

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("Pack inconnu: {0}")]
    UnknownPack(String),

    #[error("Le pack gratuit n'est pas disponible pour une boutique existante")]
    FreePackUnavailable,

    #[error("Action impossible à l'étape {0:?}")]
    WrongStep(StepKind),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// The raw profile form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorForm {
    pub vendor_name: String,
    pub shop_name: String,
    pub address: String,
    pub country: Country,
    /// Local digits, without the dial code.
    pub phone_number: String,
    pub email: String,
}

impl VendorForm {
    /// Pre-fill from an existing (inactive) record.
    #[must_use]
    pub fn from_record(vendor: &VendorProfile) -> Self {
        let country = vendor.country().unwrap_or_default();
        Self {
            vendor_name: vendor.vendor_name.clone(),
            shop_name: vendor.shop_name.clone(),
            address: vendor.address.clone(),
            country,
            phone_number: country.strip_dial_code(&vendor.phone_number),
            email: vendor.email.clone(),
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<ValidatedProfile, ProfileError> {
        let vendor_name = required("vendor_name", &self.vendor_name)?;
        let shop_name = required("shop_name", &self.shop_name)?;
        let address = required("address", &self.address)?;
        required("phone_number", &self.phone_number)?;
        required("email", &self.email)?;

        Ok(ValidatedProfile {
            vendor_name,
            shop_name,
            address,
            country: self.country,
            phone_number: PhoneNumber::from_local(self.country, &self.phone_number)?,
            email: Email::parse(&self.email)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProfileError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProfileError::Missing(field));
    }
    Ok(value.to_owned())
}

/// A profile that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfile {
    pub vendor_name: String,
    pub shop_name: String,
    pub address: String,
    pub country: Country,
    pub phone_number: PhoneNumber,
    pub email: Email,
}

/// Vendor details sent along with an invoice and echoed back by the
/// provider's callback.
#[derive(Debug, Clone, Serialize)]
struct VendorDetails<'a> {
    vendor_name: &'a str,
    shop_name: &'a str,
    address: &'a str,
    country: &'a str,
    phone_number: &'a str,
    email: &'a str,
    vendor_code: &'a str,
    current_plan: &'a str,
    quota_limit: u32,
}

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingStep {
    ProfileForm,
    PackSelection,
    Payment { pack: &'static Pack },
    /// The free pack activated the store.
    Completed(VendorProfile),
}

/// Step names for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    ProfileForm,
    PackSelection,
    Payment,
    Completed,
}

impl OnboardingStep {
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        match self {
            Self::ProfileForm => StepKind::ProfileForm,
            Self::PackSelection => StepKind::PackSelection,
            Self::Payment { .. } => StepKind::Payment,
            Self::Completed(_) => StepKind::Completed,
        }
    }
}

/// What entering onboarding leads to.
#[derive(Debug)]
pub enum OnboardingStart {
    /// The store is already active; go to the dashboard.
    AlreadyVendor(VendorProfile),
    Flow(Box<VendorOnboarding>),
}

/// Full-page redirect to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub url: Url,
}

/// The onboarding state machine for one session.
#[derive(Debug)]
pub struct VendorOnboarding {
    api: ApiClient,
    payments: PaymentClient,
    session: Session,
    step: OnboardingStep,
    form: VendorForm,
    profile: Option<ValidatedProfile>,
    vendor_code: Option<VendorCode>,
    /// Inactive record found on entry, if any.
    existing: Option<VendorProfile>,
    last_error: Option<String>,
}

impl VendorOnboarding {
    /// Enter onboarding for `session`, looking up any existing record.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Api` if the vendor lookup fails for a reason
    /// other than "no record".
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn start(
        api: ApiClient,
        payments: PaymentClient,
        session: Session,
    ) -> Result<OnboardingStart, OnboardingError> {
        let existing = api.my_vendor().await?;

        let flow = match existing {
            Some(vendor) if vendor.is_store_active => {
                info!("Store already active");
                return Ok(OnboardingStart::AlreadyVendor(vendor));
            }
            Some(vendor) => {
                info!(shop = %vendor.shop_name, "Resuming onboarding for inactive store");
                let form = VendorForm::from_record(&vendor);
                // The record may predate current validation rules; keep the
                // stored values as they are.
                let profile = form.validate().ok();
                let vendor_code = VendorCode::parse(&vendor.vendor_code);
                Self {
                    api,
                    payments,
                    session,
                    step: OnboardingStep::PackSelection,
                    form,
                    profile,
                    vendor_code,
                    existing: Some(vendor),
                    last_error: None,
                }
            }
            None => {
                let form = VendorForm {
                    email: session.email().to_string(),
                    ..VendorForm::default()
                };
                Self {
                    api,
                    payments,
                    session,
                    step: OnboardingStep::ProfileForm,
                    form,
                    profile: None,
                    vendor_code: None,
                    existing: None,
                    last_error: None,
                }
            }
        };

        Ok(OnboardingStart::Flow(Box::new(flow)))
    }

    #[must_use]
    pub const fn step(&self) -> &OnboardingStep {
        &self.step
    }

    #[must_use]
    pub const fn form(&self) -> &VendorForm {
        &self.form
    }

    #[must_use]
    pub const fn vendor_code(&self) -> Option<&VendorCode> {
        self.vendor_code.as_ref()
    }

    #[must_use]
    pub const fn is_existing_vendor(&self) -> bool {
        self.existing.is_some()
    }

    /// The last user-visible error, cleared on the next successful action.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate the profile form and move to pack selection, generating a
    /// vendor code.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Profile` and stays on the form if a field
    /// is invalid.
    pub fn submit_profile<R: Rng + ?Sized>(
        &mut self,
        form: VendorForm,
        rng: &mut R,
    ) -> Result<(), OnboardingError> {
        self.expect_step(StepKind::ProfileForm)?;

        let validated = form.validate();
        self.form = form;
        let profile = self.record(validated)?;

        let code = VendorCode::generate(rng);
        info!(vendor_code = %code, "Profile accepted");
        self.profile = Some(profile);
        self.vendor_code = Some(code);
        self.step = OnboardingStep::PackSelection;
        Ok(())
    }

    /// Go back to the profile form. Not available when resuming an existing
    /// store.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::WrongStep` outside pack selection or for an
    /// existing store.
    pub fn edit_profile(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(StepKind::PackSelection)?;
        if self.existing.is_some() {
            return Err(OnboardingError::WrongStep(StepKind::PackSelection));
        }
        self.step = OnboardingStep::ProfileForm;
        Ok(())
    }

    /// Choose a pack.
    ///
    /// The free pack creates the vendor record right away; a paid pack moves
    /// to the payment step without touching the backend.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPack`, `FreePackUnavailable` for an existing store, or
    /// the backend error if the record could not be created. The step does
    /// not change on error.
    #[instrument(skip(self))]
    pub async fn select_pack(&mut self, name: &str) -> Result<&OnboardingStep, OnboardingError> {
        self.expect_step(StepKind::PackSelection)?;

        let Some(pack) = Pack::find(name) else {
            return Err(self.fail(OnboardingError::UnknownPack(name.to_owned())));
        };

        if !pack.is_free() {
            self.last_error = None;
            self.step = OnboardingStep::Payment { pack };
            return Ok(&self.step);
        }

        if self.existing.is_some() {
            return Err(self.fail(OnboardingError::FreePackUnavailable));
        }

        let new_vendor = self.new_vendor(pack)?;
        let created = self.api.create_vendor(&new_vendor).await;
        let created = self.record(created)?;

        info!(shop = %new_vendor.shop_name, plan = pack.name, "Store activated on free pack");
        self.step = OnboardingStep::Completed(created);
        Ok(&self.step)
    }

    /// Create the invoice for the selected paid pack.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::Payment` on provider failure; the flow stays
    /// on the payment step so the user can retry or go back.
    #[instrument(skip(self))]
    pub async fn pay(&mut self) -> Result<PaymentRedirect, OnboardingError> {
        let OnboardingStep::Payment { pack } = self.step else {
            return Err(OnboardingError::WrongStep(self.step.kind()));
        };

        let vendor_data = vendor_data(&self.details(pack));
        let vendor_data = self.record(vendor_data)?;
        let invoice = pack_invoice(
            pack,
            self.shop_name(),
            vendor_data,
            Some(self.session.user_id().clone()),
        );
        let invoice = self.record(invoice)?;

        let url = self.payments.create_invoice(&invoice).await;
        let url = self.record(url)?;
        Ok(PaymentRedirect { url })
    }

    /// Leave the payment step.
    ///
    /// # Errors
    ///
    /// Returns `OnboardingError::WrongStep` outside the payment step.
    pub fn back_to_packs(&mut self) -> Result<(), OnboardingError> {
        self.expect_step(StepKind::Payment)?;
        self.last_error = None;
        self.step = OnboardingStep::PackSelection;
        Ok(())
    }

    fn expect_step(&self, expected: StepKind) -> Result<(), OnboardingError> {
        let current = self.step.kind();
        if current == expected {
            Ok(())
        } else {
            Err(OnboardingError::WrongStep(current))
        }
    }

    /// Remember the error message of a failed step.
    fn record<T, E: Into<OnboardingError>>(&mut self, result: Result<T, E>) -> Result<T, OnboardingError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn fail(&mut self, error: OnboardingError) -> OnboardingError {
        warn!(error = %error, step = ?self.step.kind(), "Onboarding step failed");
        self.last_error = Some(match &error {
            OnboardingError::Api(e) => e.user_message(),
            other => other.to_string(),
        });
        error
    }

    fn shop_name(&self) -> &str {
        self.profile
            .as_ref()
            .map_or(self.form.shop_name.as_str(), |p| p.shop_name.as_str())
    }

    fn new_vendor(&self, pack: &Pack) -> Result<NewVendor, OnboardingError> {
        let (Some(profile), Some(code)) = (&self.profile, &self.vendor_code) else {
            return Err(OnboardingError::WrongStep(StepKind::ProfileForm));
        };
        Ok(NewVendor {
            vendor_name: profile.vendor_name.clone(),
            shop_name: profile.shop_name.clone(),
            address: profile.address.clone(),
            country: profile.country.name().to_owned(),
            phone_number: profile.phone_number.to_string(),
            email: profile.email.to_string(),
            vendor_code: code.clone(),
            current_plan: pack.name.to_owned(),
            subscription_end_date: None,
            quota_limit: pack.quota,
            is_store_active: true,
        })
    }

    fn details(&self, pack: &'static Pack) -> VendorDetails<'_> {
        let existing = self.existing.as_ref();
        let phone = self.profile.as_ref().map_or_else(
            || existing.map_or("", |v| v.phone_number.as_str()),
            |p| p.phone_number.as_str(),
        );
        VendorDetails {
            vendor_name: self
                .profile
                .as_ref()
                .map_or(self.form.vendor_name.as_str(), |p| p.vendor_name.as_str()),
            shop_name: self.shop_name(),
            address: self
                .profile
                .as_ref()
                .map_or(self.form.address.as_str(), |p| p.address.as_str()),
            country: self.form.country.name(),
            phone_number: phone,
            email: self
                .profile
                .as_ref()
                .map_or(self.form.email.as_str(), |p| p.email.as_str()),
            vendor_code: self
                .vendor_code
                .as_ref()
                .map_or_else(|| existing.map_or("", |v| v.vendor_code.as_str()), VendorCode::as_str),
            current_plan: pack.name,
            quota_limit: pack.quota,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::tests::client_for;
    use crate::config::StorefrontConfig;
    use crate::token::MemoryTokenStore;
    use marchenet_core::AuthUser;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        let user: AuthUser = serde_json::from_value(serde_json::json!({
            "id": "u-1", "email": "awa@exemple.sn", "role": "user"
        }))
        .unwrap();
        Session::new(user, None)
    }

    fn form() -> VendorForm {
        VendorForm {
            vendor_name: "Awa Diop".to_owned(),
            shop_name: "Chez Awa".to_owned(),
            address: "Médina, Dakar".to_owned(),
            country: Country::Senegal,
            phone_number: "77 123 45 67".to_owned(),
            email: "awa@exemple.sn".to_owned(),
        }
    }

    fn clients(server: &MockServer) -> (ApiClient, PaymentClient) {
        let api = client_for(server, Arc::new(MemoryTokenStore::with_token("jwt")));
        let mut config = StorefrontConfig::new(&url::Url::parse(&server.uri()).unwrap()).unwrap();
        config.payment_proxy_url =
            url::Url::parse(&format!("{}/payments/invoice", server.uri())).unwrap();
        (api, PaymentClient::new(&config).unwrap())
    }

    async fn start(server: &MockServer) -> VendorOnboarding {
        let (api, payments) = clients(server);
        match VendorOnboarding::start(api, payments, session()).await.unwrap() {
            OnboardingStart::Flow(flow) => *flow,
            OnboardingStart::AlreadyVendor(_) => panic!("expected a flow"),
        }
    }

    async fn mount_no_vendor(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/vendors/me"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[test]
    fn test_validate_reports_missing_field() {
        let mut f = form();
        f.address = "   ".to_owned();
        assert_eq!(f.validate(), Err(ProfileError::Missing("address")));
    }

    #[test]
    fn test_validate_checks_email_and_phone() {
        let mut f = form();
        f.email = "awa.exemple.sn".to_owned();
        assert!(matches!(f.validate(), Err(ProfileError::Email(_))));

        let mut f = form();
        f.phone_number = "77-ABC".to_owned();
        assert!(matches!(f.validate(), Err(ProfileError::Phone(_))));

        let profile = form().validate().unwrap();
        assert_eq!(profile.phone_number.as_str(), "+221771234567");
    }

    #[test]
    fn test_prefill_strips_dial_code() {
        let vendor = VendorProfile {
            country: "Mali".to_owned(),
            phone_number: "+22376123456".to_owned(),
            ..VendorProfile::default()
        };
        let f = VendorForm::from_record(&vendor);
        assert_eq!(f.country, Country::Mali);
        assert_eq!(f.phone_number, "76123456");
    }

    #[tokio::test]
    async fn test_active_vendor_skips_flow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vendors/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "shop_name": "Chez Awa", "current_plan": "Pack Pro", "is_store_active": true
            })))
            .mount(&server)
            .await;

        let (api, payments) = clients(&server);
        let start = VendorOnboarding::start(api, payments, session()).await.unwrap();
        assert!(matches!(start, OnboardingStart::AlreadyVendor(v) if v.shop_name == "Chez Awa"));
    }

    #[tokio::test]
    async fn test_invalid_form_stays_and_sends_nothing() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        assert_eq!(flow.step(), &OnboardingStep::ProfileForm);
        assert_eq!(flow.form().email, "awa@exemple.sn");

        let mut f = form();
        f.shop_name.clear();
        let err = flow.submit_profile(f, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, OnboardingError::Profile(ProfileError::Missing("shop_name"))));
        assert_eq!(flow.step(), &OnboardingStep::ProfileForm);
        assert!(flow.last_error().is_some());
        assert!(flow.vendor_code().is_none());
    }

    #[tokio::test]
    async fn test_free_pack_creates_one_active_vendor() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/vendors"))
            .and(body_partial_json(serde_json::json!({
                "shop_name": "Chez Awa",
                "country": "Sénégal",
                "phone_number": "+221771234567",
                "current_plan": "Pack Gratuit",
                "quota_limit": 2,
                "is_store_active": true,
                "subscription_end_date": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 5, "shop_name": "Chez Awa", "current_plan": "Pack Gratuit",
                "quota_limit": 2, "is_store_active": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        flow.submit_profile(form(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(flow.step(), &OnboardingStep::PackSelection);
        assert!(flow.vendor_code().unwrap().as_str().starts_with("VEND-"));

        let step = flow.select_pack("Pack Gratuit").await.unwrap();
        assert!(matches!(step, OnboardingStep::Completed(v) if v.is_store_active));
    }

    #[tokio::test]
    async fn test_paid_pack_moves_to_payment_without_vendor_call() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/vendors"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        flow.submit_profile(form(), &mut StdRng::seed_from_u64(2)).unwrap();
        let step = flow.select_pack("Pack Pro").await.unwrap();
        assert!(matches!(step, OnboardingStep::Payment { pack } if pack.name == "Pack Pro"));
    }

    #[tokio::test]
    async fn test_unknown_pack_keeps_step() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;

        let mut flow = start(&server).await;
        flow.submit_profile(form(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(matches!(
            flow.select_pack("Pack Platine").await,
            Err(OnboardingError::UnknownPack(_))
        ));
        assert_eq!(flow.step(), &OnboardingStep::PackSelection);
    }

    #[tokio::test]
    async fn test_inactive_vendor_resumes_at_packs_and_cannot_take_free_pack() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vendors/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "vendor_name": "Awa Diop",
                "shop_name": "Chez Awa",
                "address": "Dakar",
                "country": "Sénégal",
                "phone_number": "+221771234567",
                "email": "awa@exemple.sn",
                "vendor_code": "VEND-AB12CD34",
                "current_plan": "Pack Basique",
                "is_store_active": false
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/vendors"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        assert!(flow.is_existing_vendor());
        assert_eq!(flow.step(), &OnboardingStep::PackSelection);
        assert_eq!(flow.form().phone_number, "771234567");
        assert_eq!(flow.vendor_code().unwrap().as_str(), "VEND-AB12CD34");

        assert!(matches!(
            flow.select_pack("Pack Gratuit").await,
            Err(OnboardingError::FreePackUnavailable)
        ));
        assert_eq!(flow.step(), &OnboardingStep::PackSelection);
        assert!(flow.edit_profile().is_err());
    }

    #[tokio::test]
    async fn test_payment_failure_stays_in_payment() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;
        Mock::given(method("POST"))
            .and(path("/payments/invoice"))
            .and(body_partial_json(serde_json::json!({
                "total_amount": 20000,
                "pack_name": "Pack VIP",
                "user_id": "u-1",
                "vendor_data": { "shop_name": "Chez Awa", "current_plan": "Pack VIP" }
            })))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "error": "Service indisponible" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        flow.submit_profile(form(), &mut StdRng::seed_from_u64(4)).unwrap();
        flow.select_pack("Pack VIP").await.unwrap();

        assert!(matches!(flow.pay().await, Err(OnboardingError::Payment(_))));
        assert_eq!(flow.last_error(), Some("Service indisponible"));
        assert!(matches!(flow.step(), OnboardingStep::Payment { .. }));

        flow.back_to_packs().unwrap();
        assert_eq!(flow.step(), &OnboardingStep::PackSelection);
        assert!(flow.last_error().is_none());
    }

    #[tokio::test]
    async fn test_payment_success_returns_redirect() {
        let server = MockServer::start().await;
        mount_no_vendor(&server).await;
        Mock::given(method("POST"))
            .and(path("/payments/invoice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paymentUrl": "https://paydunya.com/checkout/invoice/tok-1"
            })))
            .mount(&server)
            .await;

        let mut flow = start(&server).await;
        flow.submit_profile(form(), &mut StdRng::seed_from_u64(5)).unwrap();
        flow.select_pack("Pack Basique").await.unwrap();
        let redirect = flow.pay().await.unwrap();
        assert_eq!(redirect.url.path(), "/checkout/invoice/tok-1");
    }
}
