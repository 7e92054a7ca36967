//! Address book route handlers.
//!
//! Listing, creation, and deletion of saved addresses, plus the
//! geocode-and-check step that fills in coordinates before an address can
//! be saved. In select mode each address links back to the cart with
//! `addressId`/`addressText` query parameters, so the selection survives
//! the page navigation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use beyond_flavours_core::{AddressId, PhoneNumber};

use crate::backend::types::NewAddress;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{ToastKind, flash};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub phone_number: Option<String>,
    pub select_href: String,
}

/// A confirmed coordinate for the locate fragment.
#[derive(Clone, Copy)]
pub struct LocatedView {
    pub lat: f64,
    pub lng: f64,
}

// =============================================================================
// Form & Query Types
// =============================================================================

/// Query parameters for the address page.
#[derive(Debug, Deserialize)]
pub struct AddressPageQuery {
    /// `select` when the cart sent the user here to pick a delivery
    /// address.
    pub mode: Option<String>,
}

/// New address form data.
#[derive(Debug, Deserialize)]
pub struct NewAddressForm {
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub phone_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mode: Option<String>,
}

/// Locate form data (city/zip subset of the address form).
#[derive(Debug, Deserialize)]
pub struct LocateForm {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Address book page template.
#[derive(Template, WebTemplate)]
#[template(path = "addresses.html")]
pub struct AddressesTemplate {
    pub ctx: PageContext,
    pub addresses: Vec<AddressView>,
    pub select_mode: bool,
}

/// Locate result fragment template (for HTMX).
///
/// Carries the hidden latitude/longitude inputs into the address form
/// together with the serviceability verdict.
#[derive(Template, WebTemplate)]
#[template(path = "partials/serviceability.html")]
pub struct LocateResultTemplate {
    pub found: Option<LocatedView>,
    pub message: String,
    pub state_class: &'static str,
}

fn back_url(mode: Option<&str>) -> &'static str {
    if mode == Some("select") {
        "/addresses?mode=select"
    } else {
        "/addresses"
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the address book, optionally in select mode.
#[instrument(skip(state, ctx, user))]
pub async fn index(
    State(state): State<AppState>,
    ctx: PageContext,
    RequireAuth(user): RequireAuth,
    Query(query): Query<AddressPageQuery>,
) -> Result<impl IntoResponse> {
    let select_mode = query.mode.as_deref() == Some("select");
    let addresses = state.backend().addresses(user.id).await?;

    let addresses: Vec<AddressView> = addresses
        .iter()
        .map(|address| AddressView {
            id: address.id.as_i32(),
            street: address.address_line1.clone(),
            city: address.city.clone(),
            zip: address.zip.clone(),
            phone_number: address.phone_number.clone(),
            select_href: format!(
                "/cart?addressId={}&addressText={}",
                address.id,
                urlencoding::encode(&address.display_text())
            ),
        })
        .collect();

    Ok(AddressesTemplate {
        ctx,
        addresses,
        select_mode,
    })
}

/// Save a new address.
///
/// Every text field is required and the coordinate must have been
/// confirmed through the locate step; both checks block the request
/// before anything is sent to the backend.
#[instrument(skip(state, session, user, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<NewAddressForm>,
) -> Result<Response> {
    let back = back_url(form.mode.as_deref());

    let street = form.street.trim();
    let city = form.city.trim();
    let zip = form.zip_code.trim();
    if street.is_empty() || city.is_empty() || zip.is_empty() {
        flash::push(&session, ToastKind::Error, "All address fields are required.").await;
        return Ok(Redirect::to(back).into_response());
    }

    let (Some(latitude), Some(longitude)) = (form.latitude, form.longitude) else {
        flash::push(
            &session,
            ToastKind::Error,
            "Please confirm your location on the map first.",
        )
        .await;
        return Ok(Redirect::to(back).into_response());
    };

    let phone_input = form.phone_number.as_deref().unwrap_or("").trim();
    let phone_number = if phone_input.is_empty() {
        None
    } else {
        match PhoneNumber::parse(phone_input) {
            Ok(phone) => Some(phone.into_inner()),
            Err(e) => {
                flash::push(&session, ToastKind::Error, e.to_string()).await;
                return Ok(Redirect::to(back).into_response());
            }
        }
    };

    let address = NewAddress {
        address_line1: street.to_string(),
        city: city.to_string(),
        zip: zip.to_string(),
        phone_number,
        latitude,
        longitude,
    };

    match state.backend().create_address(user.id, &address).await {
        Ok(()) => {
            flash::push(&session, ToastKind::Success, "Address added successfully!").await;
        }
        Err(e) => {
            tracing::warn!("Failed to create address: {e}");
            flash::push(&session, ToastKind::Error, e.user_message()).await;
        }
    }

    Ok(Redirect::to(back).into_response())
}

/// Geocode the city/zip pair and check serviceability (HTMX).
///
/// Returns a fragment that drops the confirmed coordinates into the
/// address form as hidden inputs, along with the delivery-radius verdict.
#[instrument(skip(state, form))]
pub async fn locate(State(state): State<AppState>, Form(form): Form<LocateForm>) -> Response {
    let query = format!("{} {}", form.city.trim(), form.zip_code.trim());
    if query.trim().is_empty() {
        return LocateResultTemplate {
            found: None,
            message: "Enter a city and zip code first.".to_string(),
            state_class: "geo-error",
        }
        .into_response();
    }

    let point = match state.geocoder().search(query.trim()).await {
        Ok(point) => point,
        Err(e) => {
            tracing::warn!("Geocode lookup failed: {e}");
            return LocateResultTemplate {
                found: None,
                message: "Could not look up that location.".to_string(),
                state_class: "geo-error",
            }
            .into_response();
        }
    };

    let Some(point) = point else {
        return LocateResultTemplate {
            found: None,
            message: "No match for that city and zip code.".to_string(),
            state_class: "geo-error",
        }
        .into_response();
    };

    let found = Some(LocatedView {
        lat: point.lat,
        lng: point.lng,
    });

    match state.backend().check_serviceability(point.lat, point.lng).await {
        Ok(verdict) if verdict.serviceable => LocateResultTemplate {
            found,
            message: format!(
                "Great! We deliver to your location ({:.1}km away).",
                verdict.distance_km
            ),
            state_class: "geo-ok",
        }
        .into_response(),
        Ok(verdict) => LocateResultTemplate {
            found,
            message: format!(
                "Sorry, we currently only deliver within {:.0}km. You are {:.1}km away.",
                verdict.radius_km, verdict.distance_km
            ),
            state_class: "geo-blocked",
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Serviceability check failed: {e}");
            LocateResultTemplate {
                found,
                message: "Could not check serviceability.".to_string(),
                state_class: "geo-error",
            }
            .into_response()
        }
    }
}

/// Delete a saved address.
#[instrument(skip(state, session, user))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Response> {
    match state.backend().delete_address(user.id, id).await {
        Ok(()) => {
            flash::push(&session, ToastKind::Success, "Address deleted").await;
        }
        Err(e) => {
            tracing::warn!("Failed to delete address: {e}");
            flash::push(&session, ToastKind::Error, e.user_message()).await;
        }
    }

    Ok(Redirect::to("/addresses").into_response())
}
