//! Beyond Flavours Core - Shared types library.
//!
//! This crate provides common types used across all Beyond Flavours
//! components:
//! - `storefront` - Public-facing food-ordering site
//! - `integration-tests` - End-to-end tests against a running stack
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, phone
//!   numbers, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
