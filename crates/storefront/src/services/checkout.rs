//! Checkout precondition gate and order submission.
//!
//! Checkout runs an ordered chain of gates on every attempt: login, then
//! restaurant-open, then address-selected. The chain is re-evaluated from
//! the top each time and never cached, so a logout or a status flip
//! between attempts is always observed. Only when every gate passes does
//! the order request go out, and it goes out exactly once per user click.

use tower_sessions::Session;

use beyond_flavours_core::AddressId;

use crate::backend::types::{OrderReceipt, OrderRequest, RestaurantStatus};
use crate::backend::{BackendClient, BackendError};
use crate::models::{Cart, CurrentUser, session_keys};

/// Delivery address chosen for the order in progress.
///
/// Carried between the address-selection page and the cart through URL
/// query parameters (`addressId`, `addressText`) so the choice survives a
/// full page navigation. Cleared simply by redirecting without the
/// parameters after a successful order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddress {
    pub id: AddressId,
    pub display_text: String,
}

impl SelectedAddress {
    /// Build from the `addressId`/`addressText` query-parameter pair.
    ///
    /// Both must be present; a half-filled pair counts as no selection.
    #[must_use]
    pub fn from_query(id: Option<AddressId>, text: Option<String>) -> Option<Self> {
        match (id, text) {
            (Some(id), Some(display_text)) if !display_text.is_empty() => {
                Some(Self { id, display_text })
            }
            _ => None,
        }
    }

    /// The cart URL that restores this selection after a navigation.
    #[must_use]
    pub fn cart_href(&self) -> String {
        format!(
            "/cart?addressId={}&addressText={}",
            self.id,
            urlencoding::encode(&self.display_text)
        )
    }
}

/// Outcome of the precondition chain, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No active session: checkout blocks and offers the login page.
    NeedsLogin,
    /// The restaurant is closed right now.
    RestaurantClosed,
    /// No delivery address selected yet.
    NeedsAddress,
    /// Every gate passed; the order may be submitted.
    Ready,
}

/// Run the precondition chain.
///
/// Strictly ordered: a missing login is always reported before closure,
/// closure before a missing address. Inputs are snapshots so the caller
/// controls freshness — the restaurant status in particular is fetched
/// anew for each attempt.
#[must_use]
pub fn evaluate(
    user: Option<&CurrentUser>,
    status: &RestaurantStatus,
    address: Option<&SelectedAddress>,
) -> Precondition {
    if user.is_none() {
        return Precondition::NeedsLogin;
    }
    if !status.is_open {
        return Precondition::RestaurantClosed;
    }
    if address.is_none() {
        return Precondition::NeedsAddress;
    }
    Precondition::Ready
}

/// Submit the order for a cart that passed every gate.
///
/// # Errors
///
/// Propagates the backend rejection untouched; the caller surfaces
/// [`BackendError::user_message`] and leaves cart and selection as they
/// were so the user can retry.
pub async fn submit(
    backend: &BackendClient,
    cart: &Cart,
    user: &CurrentUser,
    address: &SelectedAddress,
) -> Result<OrderReceipt, BackendError> {
    let request = OrderRequest {
        items: cart.order_lines(),
        total: cart.total(),
        user_id: user.id,
        address_id: address.id,
    };
    backend.place_order(&request).await
}

// =============================================================================
// Re-entrancy guard
// =============================================================================

/// Mark a submit as in flight for this session.
///
/// Returns `false` when another submit is already outstanding; the caller
/// must then drop the attempt instead of issuing a second order request.
pub async fn try_begin_submit(session: &Session) -> bool {
    let in_flight: bool = session
        .get(session_keys::CHECKOUT_IN_FLIGHT)
        .await
        .ok()
        .flatten()
        .unwrap_or(false);

    if in_flight {
        return false;
    }

    session
        .insert(session_keys::CHECKOUT_IN_FLIGHT, true)
        .await
        .is_ok()
}

/// Clear the in-flight marker. Runs on success and failure alike.
pub async fn end_submit(session: &Session) {
    if let Err(e) = session
        .remove::<bool>(session_keys::CHECKOUT_IN_FLIGHT)
        .await
    {
        tracing::warn!("Failed to clear submit guard: {e}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use beyond_flavours_core::UserId;

    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            name: Some("Asha Rao".to_string()),
            email: None,
            phone_number: "9876543210".to_string(),
        }
    }

    fn address() -> SelectedAddress {
        SelectedAddress {
            id: AddressId::new(4),
            display_text: "Flat 402, Sunshine Apts, Hyderabad 500081".to_string(),
        }
    }

    const fn open() -> RestaurantStatus {
        RestaurantStatus {
            is_open: true,
            message: String::new(),
        }
    }

    fn closed() -> RestaurantStatus {
        RestaurantStatus {
            is_open: false,
            message: "Closed for Diwali".to_string(),
        }
    }

    #[test]
    fn test_login_gate_outranks_everything() {
        // Everything wrong at once: the missing login must win
        let result = evaluate(None, &closed(), None);
        assert_eq!(result, Precondition::NeedsLogin);
    }

    #[test]
    fn test_closed_gate_outranks_missing_address() {
        let result = evaluate(Some(&user()), &closed(), None);
        assert_eq!(result, Precondition::RestaurantClosed);
    }

    #[test]
    fn test_missing_address_reported_last() {
        let result = evaluate(Some(&user()), &open(), None);
        assert_eq!(result, Precondition::NeedsAddress);
    }

    #[test]
    fn test_ready_when_every_gate_passes() {
        let result = evaluate(Some(&user()), &open(), Some(&address()));
        assert_eq!(result, Precondition::Ready);
    }

    #[test]
    fn test_closed_blocks_even_with_address_selected() {
        // Status is re-polled per attempt; a flip to closed must block a
        // cart that previously passed
        let result = evaluate(Some(&user()), &closed(), Some(&address()));
        assert_eq!(result, Precondition::RestaurantClosed);
    }

    #[test]
    fn test_selected_address_requires_both_parts() {
        assert!(SelectedAddress::from_query(Some(AddressId::new(1)), None).is_none());
        assert!(SelectedAddress::from_query(None, Some("text".to_string())).is_none());
        assert!(
            SelectedAddress::from_query(Some(AddressId::new(1)), Some(String::new())).is_none()
        );

        let selected =
            SelectedAddress::from_query(Some(AddressId::new(1)), Some("text".to_string()));
        assert_eq!(selected.unwrap().id, AddressId::new(1));
    }

    #[test]
    fn test_cart_href_encodes_display_text() {
        let href = address().cart_href();
        assert!(href.starts_with("/cart?addressId=4&addressText="));
        assert!(href.contains("Flat%20402"));
        assert!(!href.contains(' '));
    }
}
