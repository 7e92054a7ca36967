//! Wire types for the restaurant backend REST API.
//!
//! List endpoints wrap their payload in a `{"data": [...]}` envelope;
//! error responses carry `{"error": "..."}`. Field names follow the
//! backend's JSON exactly, including its camelCase outliers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use beyond_flavours_core::{
    AddressId, CategoryId, MenuItemId, OrderId, OrderStatus, Price, UserId,
};

/// Envelope for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
}

/// Envelope for endpoints returning a single user record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

// =============================================================================
// Menu
// =============================================================================

/// A menu category with its nested items.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A single dish on the menu.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Absent means available.
    #[serde(default)]
    pub available: Option<bool>,
}

impl MenuItem {
    /// Whether the item can currently be ordered.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available != Some(false)
    }
}

/// Open/closed snapshot for the restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantStatus {
    #[serde(rename = "isOpen")]
    pub is_open: bool,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Auth & users
// =============================================================================

/// A backend user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub phone_number: String,
}

/// Request body for `POST /api/auth/send-otp`.
#[derive(Debug, Serialize)]
pub struct SendOtpRequest<'a> {
    pub phone_number: &'a str,
}

/// Request body for `POST /api/auth/verify-otp`.
#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub phone_number: &'a str,
    pub otp: &'a str,
}

/// Response body for a successful OTP verification.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    pub user: User,
}

/// Request body for `PUT /api/users/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved delivery address.
#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub address_line1: String,
    pub city: String,
    pub zip: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Address {
    /// One-line rendering used wherever the address is shown or passed
    /// along in a navigation link.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("{}, {} {}", self.address_line1, self.city, self.zip)
    }
}

/// Request body for `POST /api/users/{id}/addresses`.
#[derive(Debug, Serialize)]
pub struct NewAddress {
    pub address_line1: String,
    pub city: String,
    pub zip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// =============================================================================
// Orders
// =============================================================================

/// A past order as returned by the order-history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
}

/// One line of a past order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Request body for `POST /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLineInput>,
    pub total: Price,
    pub user_id: UserId,
    pub address_id: AddressId,
}

/// One cart line in an order-creation request.
#[derive(Debug, Serialize)]
pub struct OrderLineInput {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

/// Response body for a successfully created order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    pub id: OrderId,
}

// =============================================================================
// Serviceability
// =============================================================================

/// Request body for `POST /api/check-serviceability`.
#[derive(Debug, Serialize)]
pub struct ServiceabilityRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Delivery-radius verdict for a coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct Serviceability {
    pub serviceable: bool,
    #[serde(rename = "distanceKm", default)]
    pub distance_km: f64,
    #[serde(rename = "radiusKm", default)]
    pub radius_km: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_availability_defaults_to_true() {
        let item: MenuItem = serde_json::from_str(
            r#"{"id": 1, "name": "Paneer Tikka", "price": 8.5, "image": "/img/paneer.jpg"}"#,
        )
        .unwrap();
        assert!(item.is_available());

        let sold_out: MenuItem = serde_json::from_str(
            r#"{"id": 2, "name": "Biryani", "price": 12.0, "available": false}"#,
        )
        .unwrap();
        assert!(!sold_out.is_available());
    }

    #[test]
    fn test_restaurant_status_camel_case() {
        let status: RestaurantStatus =
            serde_json::from_str(r#"{"isOpen": false, "message": "Closed for Diwali"}"#).unwrap();
        assert!(!status.is_open);
        assert_eq!(status.message, "Closed for Diwali");
    }

    #[test]
    fn test_serviceability_camel_case() {
        let verdict: Serviceability =
            serde_json::from_str(r#"{"serviceable": false, "distanceKm": 9.4, "radiusKm": 6.0}"#)
                .unwrap();
        assert!(!verdict.serviceable);
        assert!((verdict.distance_km - 9.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_address_display_text() {
        let address = Address {
            id: AddressId::new(4),
            address_line1: "Flat 402, Sunshine Apts".to_string(),
            city: "Hyderabad".to_string(),
            zip: "500081".to_string(),
            phone_number: None,
            latitude: None,
            longitude: None,
        };
        assert_eq!(
            address.display_text(),
            "Flat 402, Sunshine Apts, Hyderabad 500081"
        );
    }
}
