//! Pack changes and quota tracking for an existing store.

use chrono::{DateTime, TimeDelta, Utc};
use marchenet_core::{Pack, UserId, VendorProfile, VendorUpdate};
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};
use crate::onboarding::PaymentRedirect;
use crate::payments::{PaymentClient, PaymentError, pack_invoice, vendor_data};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// No vendor record; the caller should send the user to onboarding.
    #[error("Aucune boutique associée à ce compte")]
    NotAVendor,

    #[error("Pack inconnu: {0}")]
    UnknownPack(String),

    #[error("Le pack gratuit n'est pas disponible pour une boutique inactive")]
    FreePackUnavailable,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Listing usage under the current pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub used: u32,
    /// `None` when neither the record nor its plan defines a limit.
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

impl QuotaStatus {
    #[must_use]
    pub fn of(vendor: &VendorProfile) -> Self {
        Self {
            used: vendor.quota_used,
            limit: vendor.effective_quota_limit(),
            remaining: vendor.remaining_quota(),
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Outcome of a pack change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackChange {
    /// Free pack applied immediately.
    Applied(VendorProfile),
    /// Paid pack: the record changes once the provider confirms payment.
    PaymentRequired(PaymentRedirect),
}

/// Subscription management over the current user's store.
#[derive(Debug)]
pub struct SubscriptionManager {
    api: ApiClient,
    payments: PaymentClient,
    vendor: VendorProfile,
    user_id: Option<UserId>,
}

impl SubscriptionManager {
    /// Load the current user's store.
    ///
    /// # Errors
    ///
    /// Returns `SubscriptionError::NotAVendor` if there is no record.
    #[instrument(skip(api, payments))]
    pub async fn load(
        api: ApiClient,
        payments: PaymentClient,
        user_id: Option<UserId>,
    ) -> Result<Self, SubscriptionError> {
        let vendor = api.my_vendor().await?.ok_or(SubscriptionError::NotAVendor)?;
        Ok(Self {
            api,
            payments,
            vendor,
            user_id,
        })
    }

    #[must_use]
    pub const fn vendor(&self) -> &VendorProfile {
        &self.vendor
    }

    #[must_use]
    pub fn quota(&self) -> QuotaStatus {
        QuotaStatus::of(&self.vendor)
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.vendor.is_expired(now)
    }

    /// Switch to the named pack.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPack`, `FreePackUnavailable` for an inactive store, or
    /// the backend/payment error.
    #[instrument(skip(self, now))]
    pub async fn change_pack(
        &mut self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<PackChange, SubscriptionError> {
        let pack = Pack::find(name).ok_or_else(|| SubscriptionError::UnknownPack(name.to_owned()))?;

        if pack.is_free() {
            if !self.vendor.is_store_active {
                return Err(SubscriptionError::FreePackUnavailable);
            }
            let update = renewal(pack, now);
            let updated = self.api.update_vendor(&update).await?;
            info!(plan = pack.name, "Pack changed");
            self.vendor = updated.clone();
            return Ok(PackChange::Applied(updated));
        }

        let vendor_data = vendor_data(&self.vendor)?;
        let invoice = pack_invoice(pack, &self.vendor.shop_name, vendor_data, self.user_id.clone())?;
        let url = self.payments.create_invoice(&invoice).await?;
        Ok(PackChange::PaymentRequired(PaymentRedirect { url }))
    }
}

/// The update applying one period of `pack` from `now`.
#[must_use]
pub fn renewal(pack: &Pack, now: DateTime<Utc>) -> VendorUpdate {
    VendorUpdate {
        current_plan: Some(pack.name.to_owned()),
        subscription_end_date: Some(now + TimeDelta::days(i64::from(pack.duration_days))),
        quota_limit: Some(pack.quota),
        is_store_active: Some(true),
    }
}
