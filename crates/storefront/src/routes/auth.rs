//! Authentication route handlers.
//!
//! Phone + OTP login against the backend auth endpoints. The phone form
//! normalizes input through [`PhoneNumber`], the OTP form round-trips the
//! normalized number in a hidden field, and a successful verify stores
//! the backend user record in the session.

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

use beyond_flavours_core::PhoneNumber;

use crate::error;
use crate::filters;
use crate::middleware::{PageContext, clear_current_user, set_current_user};
use crate::models::{CurrentUser, ToastKind, flash};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Phone form data.
#[derive(Debug, Deserialize)]
pub struct SendOtpForm {
    pub phone_number: String,
}

/// OTP form data.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    pub phone_number: String,
    pub otp: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login (phone entry) page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub error: Option<String>,
    pub phone: String,
}

/// OTP entry page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub ctx: PageContext,
    pub phone: String,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page (phone entry step).
#[instrument(skip(ctx))]
pub async fn login_page(ctx: PageContext) -> impl IntoResponse {
    LoginTemplate {
        ctx,
        error: None,
        phone: String::new(),
    }
}

/// Validate the phone number and ask the backend to send an OTP.
///
/// Malformed input never reaches the backend; it re-renders the phone
/// form with the validation message inline.
#[instrument(skip(state, ctx, form))]
pub async fn send_otp(
    State(state): State<AppState>,
    ctx: PageContext,
    Form(form): Form<SendOtpForm>,
) -> Response {
    let phone = match PhoneNumber::parse(&form.phone_number) {
        Ok(phone) => phone,
        Err(e) => {
            return LoginTemplate {
                ctx,
                error: Some(e.to_string()),
                phone: form.phone_number,
            }
            .into_response();
        }
    };

    match state.backend().send_otp(&phone).await {
        Ok(()) => VerifyTemplate {
            ctx,
            phone: phone.into_inner(),
            error: None,
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("Failed to send OTP: {e}");
            LoginTemplate {
                ctx,
                error: Some(e.user_message()),
                phone: phone.into_inner(),
            }
            .into_response()
        }
    }
}

/// Verify the OTP and log the user in.
///
/// On success the backend user replaces whatever was in the session and
/// the Sentry user context is set.
#[instrument(skip(state, session, ctx, form))]
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(form): Form<VerifyOtpForm>,
) -> Response {
    let phone = match PhoneNumber::parse(&form.phone_number) {
        Ok(phone) => phone,
        Err(e) => {
            return LoginTemplate {
                ctx,
                error: Some(e.to_string()),
                phone: form.phone_number,
            }
            .into_response();
        }
    };

    match state.backend().verify_otp(&phone, form.otp.trim()).await {
        Ok(user) => {
            error::set_sentry_user(&user.id, user.email.as_deref());

            if let Err(e) = set_current_user(&session, &CurrentUser::from(user)).await {
                tracing::error!("Failed to store login in session: {e}");
                return VerifyTemplate {
                    ctx,
                    phone: phone.into_inner(),
                    error: Some("Session expired, please try again".to_string()),
                }
                .into_response();
            }

            flash::push(&session, ToastKind::Success, "Logged in successfully").await;
            Redirect::to("/").into_response()
        }
        Err(e) => VerifyTemplate {
            ctx,
            phone: phone.into_inner(),
            error: Some(e.user_message()),
        }
        .into_response(),
    }
}

/// Log out: clear the session user and return to the menu.
///
/// The cart survives a logout; only the identity goes.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {e}");
    }
    error::clear_sentry_user();

    flash::push(&session, ToastKind::Info, "Logged out").await;
    Redirect::to("/").into_response()
}
