//! Status enums for various entities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a placed order, as reported by the backend.
///
/// The backend omits the field for freshly placed orders, and older rows
/// may carry statuses this client does not know; both fall back to
/// [`OrderStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order delivered.
    Completed,
    /// Order cancelled by the restaurant or the customer.
    Cancelled,
    /// Order accepted, food being prepared or out for delivery.
    #[default]
    #[serde(other)]
    Pending,
}

impl OrderStatus {
    /// Human-readable label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS class suffix used by the order-history badge.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge-pending",
            Self::Completed => "badge-completed",
            Self::Cancelled => "badge-cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_known_statuses() {
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"completed\"").unwrap(),
            OrderStatus::Completed
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_unknown_status_falls_back_to_pending() {
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"preparing\"").unwrap(),
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::Pending.label(), "Pending");
        assert_eq!(OrderStatus::Completed.badge_class(), "badge-completed");
    }
}
