//! Store commands.
//!
//! # Usage
//!
//! ```bash
//! # Open a store; a paid pack prints the checkout URL
//! mn-cli vendor onboard --vendor-name "Awa Diop" --shop-name "Chez Awa" \
//!     --address "Dakar" --country SN --phone 771234567 \
//!     --email awa@example.sn --pack "Pack Pro"
//!
//! mn-cli vendor status
//! mn-cli vendor change-pack "Pack VIP"
//! ```

use chrono::Utc;
use marchenet_core::PlanConsistency;
use marchenet_storefront::subscription::{PackChange, SubscriptionManager};
use marchenet_storefront::{OnboardingStart, OnboardingStep, VendorForm, VendorOnboarding};

use super::{CommandError, Context, parse_country};

/// Profile values given on the command line. Missing values fall back to
/// the form's pre-filled content.
#[derive(Debug, Default)]
pub struct ProfileAnswers {
    pub vendor_name: Option<String>,
    pub shop_name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ProfileAnswers {
    fn into_form(self, prefill: &VendorForm) -> Result<VendorForm, CommandError> {
        let country = match self.country.as_deref() {
            Some(value) => parse_country(value)?,
            None => prefill.country,
        };
        Ok(VendorForm {
            vendor_name: self.vendor_name.unwrap_or_else(|| prefill.vendor_name.clone()),
            shop_name: self.shop_name.unwrap_or_else(|| prefill.shop_name.clone()),
            address: self.address.unwrap_or_else(|| prefill.address.clone()),
            country,
            phone_number: self.phone.unwrap_or_else(|| prefill.phone_number.clone()),
            email: self.email.unwrap_or_else(|| prefill.email.clone()),
        })
    }
}

/// Run the onboarding flow up to activation or the payment redirect.
pub async fn onboard(
    ctx: &Context,
    answers: ProfileAnswers,
    pack: &str,
) -> Result<(), CommandError> {
    let session = ctx.require_session().await?;
    let mut flow = match VendorOnboarding::start(ctx.api.clone(), ctx.payments()?, session).await? {
        OnboardingStart::AlreadyVendor(vendor) => {
            tracing::info!("{} is already active, nothing to do", vendor.shop_name);
            return Ok(());
        }
        OnboardingStart::Flow(flow) => flow,
    };

    if flow.is_existing_vendor() {
        tracing::info!("Reactivating {}", flow.form().shop_name);
    } else {
        let form = answers.into_form(flow.form())?;
        flow.submit_profile(form, &mut rand::rng())?;
        if let Some(code) = flow.vendor_code() {
            tracing::info!("Vendor code: {code}");
        }
    }

    let step = flow.select_pack(pack).await?.clone();
    match step {
        OnboardingStep::Completed(vendor) => {
            tracing::info!(
                "{} is open on {}",
                vendor.shop_name,
                vendor.current_plan.as_deref().unwrap_or(pack)
            );
        }
        OnboardingStep::Payment { pack } => {
            let redirect = flow.pay().await?;
            tracing::info!("Pay {} for {} here:", pack.price(), pack.name);
            tracing::info!("{}", redirect.url);
        }
        other @ (OnboardingStep::ProfileForm | OnboardingStep::PackSelection) => {
            tracing::warn!("Onboarding stopped at {:?}", other.kind());
        }
    }
    Ok(())
}

/// Show the store, its pack and quota.
pub async fn status(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.require_session().await?;
    let manager = SubscriptionManager::load(
        ctx.api.clone(),
        ctx.payments()?,
        Some(session.user_id().clone()),
    )
    .await?;
    let vendor = manager.vendor();
    let quota = manager.quota();

    tracing::info!("Store:   {} ({})", vendor.shop_name, vendor.vendor_code);
    tracing::info!(
        "Plan:    {}",
        vendor.current_plan.as_deref().unwrap_or("aucun")
    );
    if let Some(end) = vendor.subscription_end_date {
        let expired = if manager.is_expired(Utc::now()) { " (expired)" } else { "" };
        tracing::info!("Ends:    {}{expired}", end.format("%d/%m/%Y"));
    }
    tracing::info!(
        "Status:  {}",
        if vendor.is_store_active { "active" } else { "inactive" }
    );
    match quota.limit {
        Some(limit) => tracing::info!("Quota:   {}/{limit}", quota.used),
        None => tracing::info!("Quota:   {} used, no limit", quota.used),
    }

    match vendor.plan_consistency() {
        PlanConsistency::Consistent | PlanConsistency::Inactive => {}
        PlanConsistency::UnknownPlan => tracing::warn!("Active store without a known pack"),
        PlanConsistency::QuotaOverride {
            pack_quota,
            quota_limit,
        } => tracing::info!("Quota overridden: {quota_limit} instead of {pack_quota}"),
    }
    Ok(())
}

/// Switch pack; a paid pack prints the checkout URL.
pub async fn change_pack(ctx: &Context, pack: &str) -> Result<(), CommandError> {
    let session = ctx.require_session().await?;
    let mut manager = SubscriptionManager::load(
        ctx.api.clone(),
        ctx.payments()?,
        Some(session.user_id().clone()),
    )
    .await?;

    match manager.change_pack(pack, Utc::now()).await? {
        PackChange::Applied(vendor) => tracing::info!(
            "{} is now on {}",
            vendor.shop_name,
            vendor.current_plan.as_deref().unwrap_or(pack)
        ),
        PackChange::PaymentRequired(redirect) => {
            tracing::info!("Complete the payment here:");
            tracing::info!("{}", redirect.url);
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use marchenet_core::Country;

    #[test]
    fn test_answers_override_prefill() {
        let prefill = VendorForm {
            vendor_name: "Awa Diop".to_string(),
            shop_name: "Chez Awa".to_string(),
            country: Country::Mali,
            ..VendorForm::default()
        };
        let answers = ProfileAnswers {
            shop_name: Some("Awa Couture".to_string()),
            country: Some("BF".to_string()),
            ..ProfileAnswers::default()
        };

        let form = answers.into_form(&prefill).unwrap();
        assert_eq!(form.vendor_name, "Awa Diop");
        assert_eq!(form.shop_name, "Awa Couture");
        assert_eq!(form.country, Country::BurkinaFaso);
    }

    #[test]
    fn test_unknown_country() {
        let answers = ProfileAnswers {
            country: Some("FR".to_string()),
            ..ProfileAnswers::default()
        };
        assert!(matches!(
            answers.into_form(&VendorForm::default()),
            Err(CommandError::UnknownCountry(_))
        ));
    }
}
