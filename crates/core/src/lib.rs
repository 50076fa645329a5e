//! MarchéNet Core - Shared domain types.
//!
//! This crate provides the types used across all MarchéNet components:
//! - `storefront` - Client library (session, guard, onboarding, catalog)
//! - `payments` - Server-side payment invoice proxy
//! - `cli` - Command-line shell over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Wire types shared by the storefront and the payment proxy live
//! here so both sides agree on the JSON shape.
//!
//! # Modules
//!
//! - [`types`] - IDs, contact details, prices, roles, packs, vendors, sessions
//!   and invoice wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
