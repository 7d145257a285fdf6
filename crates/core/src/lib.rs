//! PawShop Core - Shared types library.
//!
//! This crate provides common types used across all PawShop components:
//! - `storefront` - The web application (shop, admin panel, JSON API)
//! - `cli` - Command-line tools for migrations and category seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
