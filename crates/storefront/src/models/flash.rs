//! Transient toast notices.
//!
//! Fire-and-forget messages: any handler with something to say queues a
//! toast in the session, and the next full page render drains the queue.
//! Each rendered toast removes itself after a fixed lifetime following a
//! short entry-animation window. The queue itself is uncapped; event rates
//! are human-paced.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// How long a toast stays on screen once the entry animation settles.
pub const TOAST_DURATION_MS: u64 = 3000;

/// Entry/exit animation window.
pub const TOAST_ANIMATION_MS: u64 = 300;

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    /// CSS class for the toast container.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
            Self::Info => "toast-info",
        }
    }
}

/// One queued notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    /// On-screen lifetime, exposed to templates as a data attribute.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        TOAST_DURATION_MS
    }

    /// Animation window, ditto.
    #[must_use]
    pub const fn animation_ms(&self) -> u64 {
        TOAST_ANIMATION_MS
    }
}

/// Queue a toast for the next rendered page.
///
/// A session write failure only loses the notice, so it is logged and
/// swallowed rather than propagated.
pub async fn push(session: &Session, kind: ToastKind, message: impl Into<String>) {
    let mut queued: Vec<Toast> = session
        .get(session_keys::TOASTS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    queued.push(Toast {
        message: message.into(),
        kind,
    });

    if let Err(e) = session.insert(session_keys::TOASTS, &queued).await {
        tracing::warn!("Failed to queue toast: {e}");
    }
}

/// Take every queued toast, leaving the queue empty.
pub async fn drain(session: &Session) -> Vec<Toast> {
    session
        .remove::<Vec<Toast>>(session_keys::TOASTS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_css_classes() {
        assert_eq!(ToastKind::Success.css_class(), "toast-success");
        assert_eq!(ToastKind::Error.css_class(), "toast-error");
        assert_eq!(ToastKind::Info.css_class(), "toast-info");
    }

    #[test]
    fn test_toast_serde_roundtrip() {
        let toast = Toast {
            message: "Address added successfully!".to_string(),
            kind: ToastKind::Success,
        };
        let json = serde_json::to_string(&toast).unwrap();
        assert!(json.contains("\"success\""));

        let back: Toast = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, ToastKind::Success);
        assert_eq!(back.message, toast.message);
    }
}
