//! `/products/*` endpoints.

use marchenet_core::{ProductId, VendorId};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError};

/// A product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in CFA francs.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub price: u64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub stock: u64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub countries: Vec<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, alias = "photo_urls")]
    pub images: Vec<String>,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    /// Stock status as shown on the vendor dashboard. Missing means available.
    #[must_use]
    pub fn stock_state(&self) -> StockStatus {
        match self.stock_status.as_deref() {
            Some("epuise") => StockStatus::SoldOut,
            _ => StockStatus::Available,
        }
    }
}

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Approved,
    Rejected,
    /// Not yet reviewed. Also catches unknown states, so it must stay last.
    #[default]
    #[serde(other)]
    Pending,
}

/// Value of `stock_status` toggled from the vendor dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "epuise")]
    SoldOut,
}

impl StockStatus {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Available => Self::SoldOut,
            Self::SoldOut => Self::Available,
        }
    }
}

#[derive(Serialize)]
struct StockBody {
    stock_status: StockStatus,
}

/// One page of `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub data: Vec<Product>,
    #[serde(default)]
    pub total: u64,
}

/// Query filters for `GET /products`. Unset filters are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// An image file attached to a new product.
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart body of `POST /products`. Build it through
/// [`ProductDraft::validate`](crate::products::ProductDraft::validate).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category: String,
    pub stock: u64,
    pub countries: Vec<String>,
    pub stock_status: String,
    pub condition: String,
    pub vendor_id: Option<VendorId>,
    pub images: Vec<ProductImage>,
}

/// Body of `PUT /products/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
}

/// An entry of `GET /products/suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub name: String,
}

#[derive(Serialize)]
struct SuggestionQuery<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
}

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, ApiError> {
        let builder = self.request(Method::GET, "/products")?.query(filter);
        self.send_json(builder).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get(&format!("/products/{id}")).await
    }

    /// Publish a product as a multipart form with its images under `images`.
    #[instrument(skip(self, product), fields(name = %product.name, images = product.images.len()))]
    pub async fn create_product(&self, product: NewProduct) -> Result<Product, ApiError> {
        let countries = serde_json::to_string(&product.countries)?;
        let mut form = Form::new()
            .text("name", product.name)
            .text("description", product.description)
            .text("price", product.price.to_string())
            .text("category", product.category)
            .text("stock", product.stock.to_string())
            .text("countries", countries)
            .text("stock_status", product.stock_status)
            .text("condition", product.condition);

        if let Some(vendor_id) = product.vendor_id {
            form = form.text("vendor_id", vendor_id.into_inner());
        }

        for image in product.images {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("images", part);
        }

        let builder = self.request(Method::POST, "/products")?.multipart(form);
        self.send_json(builder).await
    }

    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/products/{id}"), update).await
    }

    /// Mark a listing available or sold out.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_stock_status(
        &self,
        id: &ProductId,
        stock_status: StockStatus,
    ) -> Result<(), ApiError> {
        self.patch(&format!("/products/{id}"), &StockBody { stock_status })
            .await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.delete(&format!("/products/{id}")).await
    }

    /// Raw suggestion lookup, one attempt. See
    /// [`SuggestionService`](crate::search::SuggestionService) for the cached,
    /// retrying version.
    #[instrument(skip(self))]
    pub async fn product_suggestions(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<Suggestion>, ApiError> {
        let builder = self
            .request(Method::GET, "/products/suggestions")?
            .query(&SuggestionQuery { query, country });
        let suggestions: Option<Vec<Suggestion>> = self.send_json(builder).await?;
        Ok(suggestions.unwrap_or_default())
    }
}

// =============================================================================
// Lenient deserializers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Accept `12`, `"12"` or `null` (as zero).
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s}"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

/// Accept a JSON array or a JSON-encoded array inside a string, which is how
/// multipart uploads store it.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ListOrText>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(ListOrText::List(list)) => Ok(list),
        Some(ListOrText::Text(text)) if text.trim().is_empty() => Ok(Vec::new()),
        Some(ListOrText::Text(text)) => match serde_json::from_str(&text) {
            Ok(list) => Ok(list),
            Err(_) => Ok(vec![text]),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::tests::client_for;
    use crate::token::MemoryTokenStore;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_product_tolerates_string_numbers() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Boubou brodé",
            "price": "15000",
            "stock": null,
            "countries": "[\"Sénégal\",\"Mali\"]"
        }))
        .unwrap();
        assert_eq!(product.id.as_str(), "7");
        assert_eq!(product.price, 15000);
        assert_eq!(product.stock, 0);
        assert_eq!(product.countries, vec!["Sénégal", "Mali"]);
        assert_eq!(product.status, ProductStatus::Pending);
        assert_eq!(product.stock_state(), StockStatus::Available);
    }

    #[test]
    fn test_unknown_moderation_state_is_pending() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 3, "status": "archived"
        }))
        .unwrap();
        assert_eq!(product.status, ProductStatus::Pending);

        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 3, "status": "approved", "stock_status": "epuise"
        }))
        .unwrap();
        assert_eq!(product.status, ProductStatus::Approved);
        assert_eq!(product.stock_state(), StockStatus::SoldOut);
    }

    #[tokio::test]
    async fn test_stock_toggle_patches_product() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/products/12"))
            .and(body_json(serde_json::json!({ "stock_status": "epuise" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        let current: Product =
            serde_json::from_value(serde_json::json!({ "id": 12, "stock_status": null })).unwrap();
        api.set_stock_status(&current.id, current.stock_state().toggled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_products_sends_only_set_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "pagne"))
            .and(query_param("limit", "12"))
            .and(query_param_is_missing("country"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": 1, "name": "Pagne wax", "price": 5000 }],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        let filter = ProductFilter {
            search: Some("pagne".to_owned()),
            limit: Some(12),
            ..ProductFilter::default()
        };
        let page = api.list_products(&filter).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].name, "Pagne wax");
    }

    #[tokio::test]
    async fn test_create_product_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 99, "name": "Panier tressé", "price": 8000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::with_token("jwt")));
        let product = NewProduct {
            name: "Panier tressé".to_owned(),
            description: "Fait main".to_owned(),
            price: 8000,
            category: "Artisanat".to_owned(),
            stock: 4,
            countries: vec!["Sénégal".to_owned()],
            stock_status: "in_stock".to_owned(),
            condition: "new".to_owned(),
            vendor_id: Some(VendorId::new("4")),
            images: vec![ProductImage {
                file_name: "panier.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }],
        };

        let created = api.create_product(product).await.unwrap();
        assert_eq!(created.id.as_str(), "99");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"images\"; filename=\"panier.png\""));
        assert!(body.contains("[\"Sénégal\"]"));
    }

    #[tokio::test]
    async fn test_suggestions_null_body_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/suggestions"))
            .and(query_param("query", "riz"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let api = client_for(&server, Arc::new(MemoryTokenStore::new()));
        assert!(api.product_suggestions("riz", None).await.unwrap().is_empty());
    }
}
