//! Static Shop Core - Catalog and cart types.
//!
//! This crate provides the domain types shared by the storefront and its tests:
//! - `storefront` - Server-rendered catalog and cart pages
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! sessions, no HTTP. Persistence and rendering live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`catalog`] - The fixed product catalog and category filtering
//! - [`cart`] - The cart state machine and its storage snapshot format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogError, CategoryFilter, Product};
pub use types::*;
