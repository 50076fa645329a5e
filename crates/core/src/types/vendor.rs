//! Vendor records and the payloads that create or modify them.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{UserId, VendorId};
use super::pack::Pack;
use super::phone::Country;

/// A vendor's store profile as returned by `GET /vendors/me`.
///
/// The backend is loose about nulls, so text fields treat `null` as empty
/// and counters treat `null` as zero. `current_plan` also accepts the older
/// `pack` field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VendorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VendorId>,
    /// Account that owns the store. Shop pages are addressed by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shop_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor_code: String,
    #[serde(default, alias = "pack")]
    pub current_plan: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quota_limit: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quota_used: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_store_active: bool,
}

/// How a vendor record relates to the pack it claims to be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanConsistency {
    /// Active store on a known pack with the pack's quota.
    Consistent,
    /// Store is inactive; no plan requirements apply.
    Inactive,
    /// Active store whose plan is missing or not in the catalog.
    UnknownPlan,
    /// Active store on a known pack whose quota was changed by an admin.
    QuotaOverride { pack_quota: u32, quota_limit: u32 },
}

impl VendorProfile {
    /// The catalog entry for `current_plan`, if it names a known pack.
    #[must_use]
    pub fn plan(&self) -> Option<&'static Pack> {
        self.current_plan.as_deref().and_then(Pack::find)
    }

    /// Check the active-store invariant: an active store must be on a known
    /// pack with a quota matching that pack, unless an admin overrode it.
    #[must_use]
    pub fn plan_consistency(&self) -> PlanConsistency {
        if !self.is_store_active {
            return PlanConsistency::Inactive;
        }
        let Some(pack) = self.plan() else {
            return PlanConsistency::UnknownPlan;
        };
        match self.quota_limit {
            Some(limit) if limit != pack.quota => PlanConsistency::QuotaOverride {
                pack_quota: pack.quota,
                quota_limit: limit,
            },
            _ => PlanConsistency::Consistent,
        }
    }

    /// Quota in force: the record's own limit, else the plan's quota.
    #[must_use]
    pub fn effective_quota_limit(&self) -> Option<u32> {
        self.quota_limit.or_else(|| self.plan().map(|p| p.quota))
    }

    #[must_use]
    pub fn remaining_quota(&self) -> Option<u32> {
        self.effective_quota_limit()
            .map(|limit| limit.saturating_sub(self.quota_used))
    }

    /// Whether the subscription period ended before `now`. Records without an
    /// end date (free packs) never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.subscription_end_date.is_some_and(|end| end < now)
    }

    #[must_use]
    pub fn country(&self) -> Option<Country> {
        Country::find(&self.country)
    }
}

/// A vendor reference code, `VEND-` followed by 8 base-36 characters.
///
/// Codes are generated client-side and are only unique in practice; the
/// backend is expected to reject collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorCode(String);

impl VendorCode {
    pub const PREFIX: &'static str = "VEND-";
    pub const SUFFIX_LEN: usize = 8;
    const ALPHABET: &'static [u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Generate a fresh code from the given random source.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: String = (0..Self::SUFFIX_LEN)
            .filter_map(|_| Self::ALPHABET.choose(rng).copied().map(char::from))
            .collect();
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Accept an existing code if it has the expected shape.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let suffix = value.strip_prefix(Self::PREFIX)?;
        let well_formed = suffix.len() == Self::SUFFIX_LEN
            && suffix.bytes().all(|b| Self::ALPHABET.contains(&b));
        well_formed.then(|| Self(value.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /vendors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVendor {
    pub vendor_name: String,
    pub shop_name: String,
    pub address: String,
    pub country: String,
    pub phone_number: String,
    pub email: String,
    pub vendor_code: VendorCode,
    pub current_plan: String,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub quota_limit: u32,
    pub is_store_active: bool,
}

/// Body of `PUT /vendors/me`. Only the fields that are set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct VendorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_store_active: Option<bool>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn active_on(plan: &str, quota_limit: Option<u32>) -> VendorProfile {
        VendorProfile {
            current_plan: Some(plan.to_owned()),
            quota_limit,
            is_store_active: true,
            ..VendorProfile::default()
        }
    }

    #[test]
    fn test_deserialize_tolerates_nulls_and_legacy_pack_field() {
        let json = r#"{
            "id": 12,
            "vendor_name": "Awa Diop",
            "shop_name": null,
            "pack": "Pack Pro",
            "quota_used": null,
            "is_store_active": null,
            "subscription_end_date": "2025-09-30"
        }"#;
        let vendor: VendorProfile = serde_json::from_str(json).unwrap();

        assert_eq!(vendor.id, Some(VendorId::new("12")));
        assert_eq!(vendor.shop_name, "");
        assert_eq!(vendor.current_plan.as_deref(), Some("Pack Pro"));
        assert_eq!(vendor.quota_used, 0);
        assert!(!vendor.is_store_active);
        assert_eq!(
            vendor.subscription_end_date,
            Some(Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_plan_consistency() {
        assert_eq!(
            active_on("Pack Basique", Some(10)).plan_consistency(),
            PlanConsistency::Consistent
        );
        assert_eq!(
            active_on("Pack Basique", Some(40)).plan_consistency(),
            PlanConsistency::QuotaOverride {
                pack_quota: 10,
                quota_limit: 40
            }
        );
        assert_eq!(
            active_on("Pack Platine", Some(10)).plan_consistency(),
            PlanConsistency::UnknownPlan
        );
        assert_eq!(
            VendorProfile::default().plan_consistency(),
            PlanConsistency::Inactive
        );
    }

    #[test]
    fn test_remaining_quota_falls_back_to_plan() {
        let mut vendor = active_on("Pack Pro", None);
        vendor.quota_used = 30;
        assert_eq!(vendor.effective_quota_limit(), Some(25));
        assert_eq!(vendor.remaining_quota(), Some(0));
    }

    #[test]
    fn test_is_expired() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut vendor = VendorProfile::default();
        assert!(!vendor.is_expired(now));
        vendor.subscription_end_date = Some(Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap());
        assert!(vendor.is_expired(now));
    }

    #[test]
    fn test_vendor_code_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = VendorCode::generate(&mut rng);
        assert!(code.as_str().starts_with("VEND-"));
        assert_eq!(code.as_str().len(), 13);
        assert_eq!(VendorCode::parse(code.as_str()), Some(code));
        assert!(VendorCode::parse("VEND-abc").is_none());
        assert!(VendorCode::parse("SHOP-ABCDEFGH").is_none());
    }

    #[test]
    fn test_new_vendor_sends_explicit_null_end_date() {
        let body = NewVendor {
            vendor_name: "Awa".to_owned(),
            shop_name: "Chez Awa".to_owned(),
            address: "Dakar".to_owned(),
            country: "Sénégal".to_owned(),
            phone_number: "+221771234567".to_owned(),
            email: "awa@exemple.sn".to_owned(),
            vendor_code: VendorCode::parse("VEND-ABCD1234").unwrap(),
            current_plan: "Pack Gratuit".to_owned(),
            subscription_end_date: None,
            quota_limit: 2,
            is_store_active: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["subscription_end_date"].is_null());
        assert_eq!(json["vendor_code"], "VEND-ABCD1234");
    }

    #[test]
    fn test_vendor_update_skips_unset_fields() {
        let update = VendorUpdate {
            quota_limit: Some(10),
            ..VendorUpdate::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"quota_limit":10}"#
        );
    }
}
