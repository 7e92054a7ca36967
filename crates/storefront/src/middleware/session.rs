//! Session middleware configuration.
//!
//! Sets up in-memory sessions with signed cookies using tower-sessions.
//! The cookie is the only client-side state; the cart, login, and queued
//! toasts all live server-side under the session id, so a page reload
//! keeps every one of them.

use secrecy::ExposeSecret;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bf_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store and signed cookies.
///
/// # Arguments
///
/// * `config` - Storefront configuration (for the session secret)
///
/// # Panics
///
/// Key derivation panics on secrets shorter than 32 bytes; config
/// validation rejects those before this function runs.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();

    let key = tower_sessions::cookie::Key::derive_from(
        config.session_secret.expose_secret().as_bytes(),
    );

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_signed(key)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
