//! Product drafts and publishing.
//!
//! A [`ProductDraft`] holds the form as typed; [`ProductDraft::validate`]
//! turns it into the multipart body. Store and quota checks in
//! [`ProductPublisher`] are advisory, the backend has the final word.

use marchenet_core::{Session, VendorProfile};
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError, NewProduct, Product, ProductImage};
use crate::subscription::QuotaStatus;

/// Maximum number of images per product.
pub const MAX_IMAGES: usize = 3;
/// Maximum size of one image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Accepted image types.
pub const IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("Le champ {0} est obligatoire")]
    Missing(&'static str),

    #[error("Le prix doit être un nombre entier positif, sans espaces, points ou virgules")]
    InvalidPrice,

    #[error("Le stock doit être un nombre entier, sans espaces, points ou virgules")]
    InvalidStock,

    #[error("Veuillez sélectionner au moins un pays")]
    NoCountry,

    #[error("Veuillez sélectionner entre 1 et 3 images")]
    ImageCount,

    #[error("L'image {0} doit être inférieure à 5 Mo")]
    ImageTooLarge(String),

    #[error("L'image {0} doit être au format JPEG, PNG ou WebP")]
    ImageType(String),

    #[error("Votre boutique est désactivée, renouvelez votre abonnement")]
    StoreInactive,

    #[error("Quota de produits atteint pour votre pack")]
    QuotaReached,

    #[error("Aucune boutique associée à ce compte")]
    NotAVendor,

    #[error("{0}")]
    Api(String),
}

impl From<ApiError> for ProductError {
    fn from(error: ApiError) -> Self {
        Self::Api(error.user_message())
    }
}

/// A product form as typed by the vendor.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub countries: Vec<String>,
    pub stock_status: String,
    pub condition: String,
    pub images: Vec<ProductImage>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            stock: String::new(),
            countries: Vec::new(),
            stock_status: "disponible".to_owned(),
            condition: "neuf".to_owned(),
            images: Vec::new(),
        }
    }
}

impl ProductDraft {
    /// Validate the form into a publishable product.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft breaks.
    pub fn validate(&self) -> Result<NewProduct, ProductError> {
        let name = non_empty("name", &self.name)?;
        let description = non_empty("description", &self.description)?;
        let price = digits(&self.price)
            .filter(|p| *p > 0)
            .ok_or(ProductError::InvalidPrice)?;
        let category = non_empty("category", &self.category)?;
        let stock = digits(&self.stock).ok_or(ProductError::InvalidStock)?;
        if self.countries.is_empty() {
            return Err(ProductError::NoCountry);
        }
        let condition = non_empty("condition", &self.condition)?;
        validate_images(&self.images)?;

        Ok(NewProduct {
            name,
            description,
            price,
            category,
            stock,
            countries: self.countries.clone(),
            stock_status: self.stock_status.clone(),
            condition,
            vendor_id: None,
            images: self.images.clone(),
        })
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ProductError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ProductError::Missing(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Parse a string made only of ASCII digits.
fn digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Check image count, size and type.
///
/// # Errors
///
/// Returns the first offending image.
pub fn validate_images(images: &[ProductImage]) -> Result<(), ProductError> {
    if images.is_empty() || images.len() > MAX_IMAGES {
        return Err(ProductError::ImageCount);
    }
    for image in images {
        if image.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ProductError::ImageTooLarge(image.file_name.clone()));
        }
        if !IMAGE_TYPES.contains(&image.content_type.as_str()) {
            return Err(ProductError::ImageType(image.file_name.clone()));
        }
    }
    Ok(())
}

/// Publishes products for the current vendor.
#[derive(Debug, Clone)]
pub struct ProductPublisher {
    api: ApiClient,
}

impl ProductPublisher {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate and publish a draft for the session's store.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `NotAVendor`, `StoreInactive`,
    /// `QuotaReached`, or the backend's message.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn publish(
        &self,
        session: &Session,
        draft: &ProductDraft,
    ) -> Result<Product, ProductError> {
        let vendor = session.vendor.as_ref().ok_or(ProductError::NotAVendor)?;
        check_store(vendor)?;

        let mut product = draft.validate()?;
        product.vendor_id = vendor.id.clone();

        let created = self.api.create_product(product).await?;
        info!(product_id = %created.id, "Product published");
        Ok(created)
    }
}

/// Advisory store checks before publishing.
///
/// # Errors
///
/// Returns `StoreInactive` or `QuotaReached`.
pub fn check_store(vendor: &VendorProfile) -> Result<(), ProductError> {
    if !vendor.is_store_active {
        return Err(ProductError::StoreInactive);
    }
    if QuotaStatus::of(vendor).is_exhausted() {
        return Err(ProductError::QuotaReached);
    }
    Ok(())
}
