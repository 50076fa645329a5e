//! Core types for MarchéNet.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod invoice;
pub mod pack;
pub mod phone;
pub mod price;
pub mod role;
pub mod user;
pub mod vendor;

pub use email::{Email, EmailError};
pub use id::{CartItemId, MessageId, NotificationId, ProductId, UserId, VendorId};
pub use invoice::{InvoiceFailure, InvoiceRequest, InvoiceResponse};
pub use pack::{PACKS, Pack};
pub use phone::{Country, PhoneError, PhoneNumber};
pub use price::{CurrencyCode, Price, PriceError};
pub use role::Role;
pub use user::{AuthUser, Session};
pub use vendor::{NewVendor, PlanConsistency, VendorCode, VendorProfile, VendorUpdate};
