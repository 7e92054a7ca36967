//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - the checkout precondition gate and order submission
//! - `geocode` - free-text geocoding for the address book

pub mod checkout;
pub mod geocode;
