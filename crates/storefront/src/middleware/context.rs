//! Per-request page context.
//!
//! Every full page render needs the same three things from the session:
//! who is logged in, the number on the cart badge, and any queued toasts.
//! `PageContext` gathers them once so handlers and the base template
//! share one shape. Fragment handlers skip it — draining toasts from a
//! fragment would eat notices meant for the next full page.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::models::{CurrentUser, Toast, cart, flash, session_keys};

/// Shared context for full page templates.
pub struct PageContext {
    /// Logged-in user, if any (drives the nav links and greeting).
    pub current_user: Option<CurrentUser>,
    /// Sum of cart quantities for the nav badge.
    pub cart_count: u32,
    /// Toasts queued since the last full page render.
    pub toasts: Vec<Toast>,
}

impl PageContext {
    fn empty() -> Self {
        Self {
            current_user: None,
            cart_count: 0,
            toasts: Vec::new(),
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self::empty());
        };

        let current_user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let cart_count = cart::load(&session).await.count();
        let toasts = flash::drain(&session).await;

        Ok(Self {
            current_user,
            cart_count,
            toasts,
        })
    }
}
