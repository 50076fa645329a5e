//! `/vendors/*` endpoints.

use marchenet_core::{NewVendor, UserId, VendorProfile, VendorUpdate};
use tracing::instrument;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// The vendor record of the current identity.
    ///
    /// A `404` or `null` body means the user has no store yet and is
    /// returned as `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn my_vendor(&self) -> Result<Option<VendorProfile>, ApiError> {
        self.get_optional("/vendors/me").await
    }

    /// Every store, as listed on the shops page.
    #[instrument(skip(self))]
    pub async fn vendors(&self) -> Result<Vec<VendorProfile>, ApiError> {
        let vendors: Option<Vec<VendorProfile>> = self.get("/vendors").await?;
        Ok(vendors.unwrap_or_default())
    }

    /// A store by its owner's account id. Unknown owners are `Ok(None)`.
    #[instrument(skip(self), fields(auth_id = %auth_id))]
    pub async fn vendor(&self, auth_id: &UserId) -> Result<Option<VendorProfile>, ApiError> {
        self.get_optional(&format!("/vendors/{auth_id}")).await
    }

    #[instrument(skip(self, vendor), fields(shop = %vendor.shop_name, plan = %vendor.current_plan))]
    pub async fn create_vendor(&self, vendor: &NewVendor) -> Result<VendorProfile, ApiError> {
        self.post("/vendors", vendor).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_vendor(&self, update: &VendorUpdate) -> Result<VendorProfile, ApiError> {
        self.put("/vendors/me", update).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::tests::client_for;
    use crate::token::MemoryTokenStore;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_my_vendor_returns_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vendors/me"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 4,
                "shop_name": "Boutique Teranga",
                "current_plan": "Pack Basique",
                "quota_limit": 10,
                "quota_used": 3,
                "is_store_active": true
            })))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        let vendor = api.my_vendor().await.unwrap().unwrap();
        assert_eq!(vendor.shop_name, "Boutique Teranga");
        assert_eq!(vendor.remaining_quota(), Some(7));
    }

    #[tokio::test]
    async fn test_update_vendor_sends_only_set_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/vendors/me"))
            .and(body_json(serde_json::json!({ "is_store_active": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "is_store_active": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        let update = VendorUpdate {
            is_store_active: Some(false),
            ..VendorUpdate::default()
        };
        let vendor = api.update_vendor(&update).await.unwrap();
        assert!(!vendor.is_store_active);
    }

    #[tokio::test]
    async fn test_vendors_list_carries_owner_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vendors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "auth_id": "0b6f-77",
                    "shop_name": "Chez Awa",
                    "vendor_name": "Awa Diop",
                    "country": "Sénégal",
                    "phone_number": "+221771234567"
                }
            ])))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        let shops = api.vendors().await.unwrap();
        assert_eq!(shops[0].auth_id, Some(UserId::new("0b6f-77")));
        assert_eq!(shops[0].country, "Sénégal");
    }

    #[tokio::test]
    async fn test_unknown_shop_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/vendors/404-owner"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        assert!(api.vendor(&UserId::new("404-owner")).await.unwrap().is_none());
    }
}
