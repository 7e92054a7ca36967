//! Restaurant backend REST API client.
//!
//! All storefront data lives in the backend; this client is the only way
//! the storefront talks to it. Plain JSON over `reqwest`, with the menu
//! cached in-process via `moka` (5-minute TTL). The open/closed status is
//! deliberately never cached: the checkout gate re-reads it on every
//! attempt.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use beyond_flavours_core::{AddressId, MenuItemId, PhoneNumber, UserId};

use crate::config::BackendApiConfig;
use types::{
    Address, ListEnvelope, MenuCategory, MenuItem, NewAddress, Order, OrderReceipt, OrderRequest,
    RestaurantStatus, SendOtpRequest, Serviceability, ServiceabilityRequest, UpdateProfileRequest,
    User, UserEnvelope, VerifyOtpRequest, VerifyOtpResponse,
};

/// Errors that can occur when talking to the restaurant backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("backend rejected the request ({status}): {}", message.as_deref().unwrap_or("no detail"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },
}

impl BackendError {
    /// Message safe to show the user: the backend's own error text when
    /// present, else a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Rejected { .. } => "Request failed. Please try again.".to_string(),
            Self::Http(_) | Self::Parse(_) => "Network error. Please try again.".to_string(),
        }
    }
}

/// Error body shape used by the backend.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

const MENU_CACHE_KEY: &str = "menu";
const MENU_CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the restaurant backend REST API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    menu_cache: Cache<&'static str, Vec<MenuCategory>>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendApiConfig) -> Self {
        let menu_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(MENU_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                menu_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Read the response body, mapping non-success statuses to
    /// [`BackendError::Rejected`] with the backend's own error text.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.error);
            tracing::warn!(status = %status, "backend returned non-success status");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Like [`Self::decode`] but for endpoints whose success body we
    /// don't care about (may even be empty).
    async fn expect_ok(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.error);
        tracing::warn!(status = %status, "backend returned non-success status");
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_ok<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_ok(&self, path: &str) -> Result<(), BackendError> {
        let response = self.inner.client.delete(self.url(path)).send().await?;
        Self::expect_ok(response).await
    }

    // =========================================================================
    // Menu & status
    // =========================================================================

    /// The full menu, categories with nested items. Cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Result<Vec<MenuCategory>, BackendError> {
        if let Some(menu) = self.inner.menu_cache.get(MENU_CACHE_KEY).await {
            return Ok(menu);
        }

        let envelope: ListEnvelope<MenuCategory> = self.get_json("/api/menu").await?;
        self.inner
            .menu_cache
            .insert(MENU_CACHE_KEY, envelope.data.clone())
            .await;
        Ok(envelope.data)
    }

    /// Look up a single menu item by id, served from the menu cache.
    ///
    /// # Errors
    ///
    /// Returns an error only if the menu itself cannot be fetched; an
    /// unknown id yields `Ok(None)`.
    pub async fn menu_item(&self, id: MenuItemId) -> Result<Option<MenuItem>, BackendError> {
        let menu = self.menu().await?;
        Ok(menu
            .into_iter()
            .flat_map(|category| category.items)
            .find(|item| item.id == id))
    }

    /// Current open/closed snapshot. Never cached.
    #[instrument(skip(self))]
    pub async fn restaurant_status(&self) -> Result<RestaurantStatus, BackendError> {
        self.get_json("/api/restaurant/status").await
    }

    // =========================================================================
    // Auth & users
    // =========================================================================

    /// Ask the backend to text an OTP to `phone`.
    #[instrument(skip(self, phone))]
    pub async fn send_otp(&self, phone: &PhoneNumber) -> Result<(), BackendError> {
        self.post_ok(
            "/api/auth/send-otp",
            &SendOtpRequest {
                phone_number: phone.as_str(),
            },
        )
        .await
    }

    /// Exchange a phone/OTP pair for the user record.
    ///
    /// # Errors
    ///
    /// A wrong or expired OTP surfaces as [`BackendError::Rejected`] with
    /// the backend's message.
    #[instrument(skip(self, phone, otp))]
    pub async fn verify_otp(&self, phone: &PhoneNumber, otp: &str) -> Result<User, BackendError> {
        let response: VerifyOtpResponse = self
            .post_json(
                "/api/auth/verify-otp",
                &VerifyOtpRequest {
                    phone_number: phone.as_str(),
                    otp,
                },
            )
            .await?;
        Ok(response.user)
    }

    /// Fetch a user's profile.
    #[instrument(skip(self))]
    pub async fn user(&self, id: UserId) -> Result<User, BackendError> {
        let envelope: UserEnvelope = self.get_json(&format!("/api/users/{id}")).await?;
        Ok(envelope.user)
    }

    /// Update a user's profile; returns the record as stored.
    #[instrument(skip(self, update))]
    pub async fn update_user(
        &self,
        id: UserId,
        update: &UpdateProfileRequest<'_>,
    ) -> Result<User, BackendError> {
        let envelope: UserEnvelope = self.put_json(&format!("/api/users/{id}"), update).await?;
        Ok(envelope.user)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// A user's saved addresses.
    #[instrument(skip(self))]
    pub async fn addresses(&self, user: UserId) -> Result<Vec<Address>, BackendError> {
        let envelope: ListEnvelope<Address> = self
            .get_json(&format!("/api/users/{user}/addresses"))
            .await?;
        Ok(envelope.data)
    }

    /// Save a new address for a user.
    #[instrument(skip(self, address))]
    pub async fn create_address(
        &self,
        user: UserId,
        address: &NewAddress,
    ) -> Result<(), BackendError> {
        self.post_ok(&format!("/api/users/{user}/addresses"), address)
            .await
    }

    /// Delete one of a user's addresses.
    #[instrument(skip(self))]
    pub async fn delete_address(
        &self,
        user: UserId,
        address: AddressId,
    ) -> Result<(), BackendError> {
        self.delete_ok(&format!("/api/users/{user}/addresses/{address}"))
            .await
    }

    // =========================================================================
    // Orders & serviceability
    // =========================================================================

    /// A user's order history, newest first as the backend returns it.
    #[instrument(skip(self))]
    pub async fn orders(&self, user: UserId) -> Result<Vec<Order>, BackendError> {
        let envelope: ListEnvelope<Order> =
            self.get_json(&format!("/api/users/{user}/orders")).await?;
        Ok(envelope.data)
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// A rejected order surfaces as [`BackendError::Rejected`]; callers
    /// show [`BackendError::user_message`] verbatim and keep the cart
    /// untouched so the user can retry.
    #[instrument(skip(self, order))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderReceipt, BackendError> {
        self.post_json("/api/orders", order).await
    }

    /// Ask the backend whether a coordinate is inside the delivery radius.
    #[instrument(skip(self))]
    pub async fn check_serviceability(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Serviceability, BackendError> {
        self.post_json("/api/check-serviceability", &ServiceabilityRequest { lat, lng })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = BackendError::Rejected {
            status: 400,
            message: Some("Restaurant is currently closed.".to_string()),
        };
        assert_eq!(err.user_message(), "Restaurant is currently closed.");
    }

    #[test]
    fn test_user_message_falls_back_when_body_has_no_detail() {
        let err = BackendError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed. Please try again.");
    }
}
