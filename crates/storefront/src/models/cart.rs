//! Cart state.
//!
//! The cart is plain data owned by the browser session: an ordered list of
//! lines keyed by menu item id. Every mutation preserves two invariants:
//! at most one line per item id, and no line with quantity zero (such
//! lines are removed instead). Totals are derived on read, never stored.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use beyond_flavours_core::{MenuItemId, Price};

use crate::backend::types::{MenuItem, OrderLineInput};
use crate::models::session_keys;

/// One item in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

impl From<&MenuItem> for CartLine {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
            image: item.image.clone(),
        }
    }
}

impl From<&CartLine> for OrderLineInput {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// The session cart.
///
/// All operations are total: an id the cart doesn't know is a no-op,
/// never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add one unit of `item`.
    ///
    /// An id already in the cart increments that line's quantity; a new id
    /// appends a line with quantity 1, keeping insertion order.
    pub fn add(&mut self, item: &MenuItem) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == item.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine::from(item));
        }
    }

    /// Set the quantity for `id`.
    ///
    /// Zero removes the line entirely; an id not in the cart is a no-op.
    pub fn set_quantity(&mut self, id: MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|line| line.id != id);
        } else if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, id: MenuItemId) {
        self.set_quantity(id, 0);
    }

    /// Empty the cart. Called once, after the backend accepts an order.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines
            .iter()
            .map(|line| line.price.line_total(line.quantity))
            .sum()
    }

    /// Sum of quantities across lines (the nav badge number), not the
    /// number of distinct lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity currently in the cart for `id` (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// The order-request lines for the current contents.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLineInput> {
        self.lines.iter().map(OrderLineInput::from).collect()
    }
}

// =============================================================================
// Session Persistence
// =============================================================================

/// Load the cart from the session; a missing or unreadable entry is an
/// empty cart.
pub async fn load(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i32, name: &str, price: &str) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: name.to_string(),
            price: Price::new(price.parse::<Decimal>().unwrap()),
            description: String::new(),
            image: format!("/img/{id}.jpg"),
            available: None,
        }
    }

    #[test]
    fn test_add_same_id_twice_merges_into_one_line() {
        let mut cart = Cart::default();
        let samosa = item(1, "Samosa", "4.00");

        cart.add(&samosa);
        cart.add(&samosa);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::default();
        cart.add(&item(2, "Dal Makhani", "9.00"));
        cart.add(&item(1, "Samosa", "4.00"));
        cart.add(&item(2, "Dal Makhani", "9.00"));

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));
        cart.add(&item(2, "Dal Makhani", "9.00"));

        cart.set_quantity(MenuItemId::new(1), 0);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total().to_string(), "$9.00");
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));

        let before = cart.clone();
        cart.set_quantity(MenuItemId::new(99), 5);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_count_sums_quantities_not_lines() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));
        cart.set_quantity(MenuItemId::new(1), 3);
        cart.add(&item(2, "Dal Makhani", "9.00"));

        assert_eq!(cart.count(), 4);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_total_example_from_menu() {
        // A at 10.00 once, B at 5.50 twice
        let mut cart = Cart::default();
        cart.add(&item(1, "Thali", "10.00"));
        cart.add(&item(2, "Lassi", "5.50"));
        cart.add(&item(2, "Lassi", "5.50"));

        assert_eq!(cart.total().to_string(), "$21.00");
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_quantity_of() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));
        cart.add(&item(1, "Samosa", "4.00"));

        assert_eq!(cart.quantity_of(MenuItemId::new(1)), 2);
        assert_eq!(cart.quantity_of(MenuItemId::new(2)), 0);
    }

    #[test]
    fn test_order_lines_mirror_cart() {
        let mut cart = Cart::default();
        cart.add(&item(1, "Samosa", "4.00"));
        cart.set_quantity(MenuItemId::new(1), 2);

        let lines = cart.order_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].name, "Samosa");
    }
}
