//! Account route handlers.
//!
//! These routes require authentication. The profile page refreshes the
//! session user from the backend; a profile update merges the response
//! into the session record so fields the backend omits are never lost.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use beyond_flavours_core::{Email, PhoneNumber};

use crate::backend::types::UpdateProfileRequest;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, set_current_user};
use crate::models::{ToastKind, flash};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub phone_display: String,
    pub name: String,
    pub email: String,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: i32,
    pub date: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub total: String,
    pub items: Vec<OrderLineView>,
    pub delivered_to: String,
}

/// One line of a past order.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

// =============================================================================
// Form Types
// =============================================================================

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub profile: ProfileView,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the profile page.
///
/// The session record is refreshed from the backend on entry; if the
/// fetch fails the session copy is shown and the page stays usable.
#[instrument(skip(state, session, ctx, user))]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let profile = match state.backend().user(user.id).await {
        Ok(fresh) => {
            let merged = user.merged_with(fresh);
            set_current_user(&session, &merged).await?;
            merged
        }
        Err(e) => {
            tracing::warn!("Failed to refresh profile from backend: {e}");
            user
        }
    };

    let phone_display = PhoneNumber::parse(&profile.phone_number)
        .map_or_else(|_| profile.phone_number.clone(), |phone| phone.to_string());

    Ok(ProfileTemplate {
        ctx,
        profile: ProfileView {
            phone_display,
            name: profile.name.unwrap_or_default(),
            email: profile.email.unwrap_or_default(),
        },
    })
}

/// Update name and optional email.
///
/// A malformed email is blocked before any backend call. The phone number
/// is immutable and not part of the form.
#[instrument(skip(state, session, user, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let name = form.name.trim();
    let email_input = form.email.trim();

    let email = if email_input.is_empty() {
        None
    } else {
        match Email::parse(email_input) {
            Ok(email) => Some(email),
            Err(e) => {
                flash::push(&session, ToastKind::Error, e.to_string()).await;
                return Ok(Redirect::to("/account").into_response());
            }
        }
    };

    let update = UpdateProfileRequest {
        name,
        email: email.as_ref().map(Email::as_str),
    };

    match state.backend().update_user(user.id, &update).await {
        Ok(updated) => {
            let merged = user.merged_with(updated);
            set_current_user(&session, &merged).await?;
            flash::push(&session, ToastKind::Success, "Profile updated successfully").await;
        }
        Err(e) => {
            tracing::warn!("Profile update failed: {e}");
            flash::push(&session, ToastKind::Error, e.user_message()).await;
        }
    }

    Ok(Redirect::to("/account").into_response())
}

/// Display order history.
#[instrument(skip(state, ctx, user))]
pub async fn orders(
    State(state): State<AppState>,
    ctx: PageContext,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = state.backend().orders(user.id).await?;

    let orders: Vec<OrderView> = orders
        .iter()
        .map(|order| OrderView {
            id: order.id.as_i32(),
            date: order.created_at.format("%d %b %Y").to_string(),
            status_label: order.status.label(),
            status_class: order.status.badge_class(),
            total: order.total.to_string(),
            items: order
                .items
                .iter()
                .map(|line| OrderLineView {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    line_total: line.price.line_total(line.quantity).to_string(),
                })
                .collect(),
            delivered_to: format!("{}, {} {}", order.address_line1, order.city, order.zip),
        })
        .collect();

    Ok(OrdersTemplate { ctx, orders })
}
