//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Menu (home) page
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page (accepts addressId/addressText)
//! POST /cart/add               - Add item (returns cart_count fragment)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/checkout          - Run the precondition gate, place the order
//! GET  /cart/confirmation      - Order confirmation page
//!
//! # Auth (phone + OTP)
//! GET  /auth/login             - Phone entry page
//! POST /auth/otp/send          - Send OTP, advance to the OTP step
//! POST /auth/otp/verify        - Verify OTP, log in
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile page
//! POST /account/profile        - Update name/email
//! GET  /account/orders         - Order history
//!
//! # Addresses (requires auth)
//! GET  /addresses              - Address book (?mode=select to pick one)
//! POST /addresses              - Create address
//! POST /addresses/locate       - Geocode + serviceability check (fragment)
//! POST /addresses/{id}/delete  - Delete address
//! ```

pub mod account;
pub mod addresses;
pub mod auth;
pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/otp/send", post(auth::send_otp))
        .route("/otp/verify", post(auth::verify_otp))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/checkout", post(cart::checkout))
        .route("/confirmation", get(cart::confirmation))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile))
        .route("/profile", post(account::update_profile))
        .route("/orders", get(account::orders))
}

/// Create the address book routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route("/locate", post(addresses::locate))
        .route("/{id}/delete", post(addresses::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Menu (home) page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Account routes
        .nest("/account", account_routes())
        // Address book routes
        .nest("/addresses", address_routes())
}
