//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session. Checkout runs the precondition
//! gate from the top on every attempt and, once everything passes, submits
//! the order to the backend exactly once per click.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use beyond_flavours_core::{AddressId, MenuItemId, OrderId};

use crate::backend::types::RestaurantStatus;
use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext};
use crate::models::{Cart, ToastKind, cart as cart_store, flash};
use crate::services::checkout::{self, Precondition, SelectedAddress};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    id: line.id.as_i32(),
                    name: line.name.clone(),
                    image: line.image.clone(),
                    quantity: line.quantity,
                    price: line.price.to_string(),
                    line_total: line.price.line_total(line.quantity).to_string(),
                })
                .collect(),
            total: cart.total().to_string(),
            count: cart.count(),
        }
    }
}

/// Selected-address display data for templates.
#[derive(Clone)]
pub struct SelectedView {
    pub id: i32,
    pub text: String,
}

impl From<&SelectedAddress> for SelectedView {
    fn from(selected: &SelectedAddress) -> Self {
        Self {
            id: selected.id.as_i32(),
            text: selected.display_text.clone(),
        }
    }
}

// =============================================================================
// Form & Query Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: MenuItemId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: MenuItemId,
}

/// Query parameters carrying the address selection between views.
#[derive(Debug, Deserialize)]
pub struct AddressSelectionQuery {
    #[serde(rename = "addressId")]
    pub address_id: Option<AddressId>,
    #[serde(rename = "addressText")]
    pub address_text: Option<String>,
}

impl AddressSelectionQuery {
    fn selected(&self) -> Option<SelectedAddress> {
        SelectedAddress::from_query(self.address_id, self.address_text.clone())
    }
}

/// Hidden fields posted with the checkout form.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub address_id: Option<AddressId>,
    pub address_text: Option<String>,
}

/// Query parameters for the confirmation page.
#[derive(Debug, Deserialize)]
pub struct ConfirmationQuery {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(rename = "addressText")]
    pub address_text: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
    pub is_open: bool,
    pub closed_message: String,
    pub selected: Option<SelectedView>,
    pub submit_label: &'static str,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/confirmation.html")]
pub struct ConfirmationTemplate {
    pub ctx: PageContext,
    pub order_id: i32,
    pub address_text: Option<String>,
}

/// Submit button label for a gate outcome.
const fn submit_label(gate: Precondition) -> &'static str {
    match gate {
        Precondition::NeedsLogin => "Login to Checkout",
        Precondition::RestaurantClosed => "Restaurant Closed",
        Precondition::NeedsAddress => "Select Address",
        Precondition::Ready => "Place Order",
    }
}

/// Redirect back to the cart, keeping the address selection alive.
fn redirect_to_cart(selected: Option<&SelectedAddress>) -> Response {
    match selected {
        Some(address) => Redirect::to(&address.cart_href()).into_response(),
        None => Redirect::to("/cart").into_response(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// The gate runs on every render so the submit button always reflects the
/// current blocking reason. A status fetch failure renders as open; the
/// checkout attempt re-checks with its own fetch.
#[instrument(skip(state, session, ctx))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Query(query): Query<AddressSelectionQuery>,
) -> Result<impl IntoResponse> {
    let status = match state.backend().restaurant_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("Failed to fetch restaurant status: {e}");
            RestaurantStatus {
                is_open: true,
                message: String::new(),
            }
        }
    };

    let cart = cart_store::load(&session).await;
    let selected = query.selected();
    let gate = checkout::evaluate(ctx.current_user.as_ref(), &status, selected.as_ref());

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        is_open: status.is_open,
        closed_message: status.message,
        selected: selected.as_ref().map(SelectedView::from),
        submit_label: submit_label(gate),
        ctx,
    })
}

/// Add one unit of an item to the cart (HTMX).
///
/// Item details come from the cached menu. Returns the cart count badge
/// with an HTMX trigger so other fragments can refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let item = match state.backend().menu_item(form.item_id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Html("<span class=\"form-error\">That item is no longer on the menu</span>"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load menu for add-to-cart: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"form-error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    if !item.is_available() {
        return (
            StatusCode::CONFLICT,
            Html("<span class=\"form-error\">This item is sold out</span>"),
        )
            .into_response();
    }

    let mut cart = cart_store::load(&session).await;
    cart.add(&item);
    let count = cart.count();

    if let Err(e) = cart_store::save(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Update a cart line's quantity (HTMX).
///
/// Quantity zero removes the line; an unknown id is a no-op. Returns the
/// cart items fragment.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = cart_store::load(&session).await;
    cart.set_quantity(form.item_id, form.quantity);

    if let Err(e) = cart_store::save(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove an item from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = cart_store::load(&session).await;
    cart.remove(form.item_id);

    if let Err(e) = cart_store::save(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = cart_store::load(&session).await;
    CartCountTemplate { count: cart.count() }
}

/// Run the checkout gate and, when every check passes, place the order.
///
/// The chain restarts at the login check on every attempt; nothing is
/// carried over from previous renders. On success the cart and the
/// address selection are cleared; on failure both stay untouched and the
/// backend's error text is surfaced verbatim.
#[instrument(skip(state, session, current_user))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let selected = SelectedAddress::from_query(form.address_id, form.address_text.clone());

    // Status is fetched fresh for this attempt, even if the page showed
    // the restaurant open a moment ago
    let status = match state.backend().restaurant_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("Failed to fetch restaurant status: {e}");
            flash::push(&session, ToastKind::Error, e.user_message()).await;
            return Ok(redirect_to_cart(selected.as_ref()));
        }
    };

    match checkout::evaluate(current_user.as_ref(), &status, selected.as_ref()) {
        Precondition::NeedsLogin => {
            flash::push(&session, ToastKind::Info, "Please login to checkout.").await;
            Ok(Redirect::to("/auth/login").into_response())
        }
        Precondition::RestaurantClosed => {
            let message = if status.message.is_empty() {
                "Restaurant is currently closed.".to_string()
            } else {
                status.message
            };
            flash::push(&session, ToastKind::Error, message).await;
            Ok(redirect_to_cart(selected.as_ref()))
        }
        Precondition::NeedsAddress => {
            flash::push(
                &session,
                ToastKind::Info,
                "Please select a delivery address to proceed.",
            )
            .await;
            Ok(Redirect::to("/addresses?mode=select").into_response())
        }
        Precondition::Ready => {
            let (Some(user), Some(address)) = (current_user.as_ref(), selected.as_ref())
            else {
                // Ready guarantees both; bail to the cart if the session
                // changed under us anyway
                return Ok(Redirect::to("/cart").into_response());
            };

            let cart = cart_store::load(&session).await;
            if cart.is_empty() {
                flash::push(&session, ToastKind::Info, "Your cart is empty.").await;
                return Ok(Redirect::to("/").into_response());
            }

            if !checkout::try_begin_submit(&session).await {
                // A submit is already in flight; swallow the duplicate click
                return Ok(redirect_to_cart(selected.as_ref()));
            }

            let result = checkout::submit(state.backend(), &cart, user, address).await;
            checkout::end_submit(&session).await;

            match result {
                Ok(receipt) => {
                    let mut cart = cart;
                    cart.clear();
                    cart_store::save(&session, &cart).await?;
                    tracing::info!(order_id = %receipt.id, "Order placed");

                    // Redirecting without addressId/addressText clears the
                    // selection
                    Ok(Redirect::to(&format!(
                        "/cart/confirmation?orderId={}&addressText={}",
                        receipt.id,
                        urlencoding::encode(&address.display_text)
                    ))
                    .into_response())
                }
                Err(e) => {
                    tracing::warn!("Order submission failed: {e}");
                    flash::push(&session, ToastKind::Error, e.user_message()).await;
                    Ok(redirect_to_cart(selected.as_ref()))
                }
            }
        }
    }
}

/// Display the order confirmation page.
#[instrument(skip(ctx))]
pub async fn confirmation(
    ctx: PageContext,
    Query(query): Query<ConfirmationQuery>,
) -> impl IntoResponse {
    ConfirmationTemplate {
        ctx,
        order_id: query.order_id.as_i32(),
        address_text: query.address_text,
    }
}
