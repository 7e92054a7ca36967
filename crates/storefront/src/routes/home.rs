//! Menu (home) route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::cart;
use crate::state::AppState;

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub available: bool,
    pub in_cart: u32,
}

/// Menu category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub items: Vec<MenuItemView>,
}

/// Open/closed banner display data.
#[derive(Clone)]
pub struct StatusView {
    pub is_open: bool,
    pub message: String,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub categories: Vec<CategoryView>,
    pub status: StatusView,
}

/// Display the menu with the current open/closed banner.
///
/// Menu and status are independent backend calls, fetched concurrently.
/// Categories with no items are skipped rather than rendered empty.
#[instrument(skip(state, session, ctx))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    let (menu, status) = tokio::try_join!(
        state.backend().menu(),
        state.backend().restaurant_status()
    )?;
    let cart = cart::load(&session).await;

    let categories: Vec<CategoryView> = menu
        .iter()
        .map(|category| CategoryView {
            name: category.name.clone(),
            items: category
                .items
                .iter()
                .map(|item| MenuItemView {
                    id: item.id.as_i32(),
                    name: item.name.clone(),
                    description: item.description.clone(),
                    image: item.image.clone(),
                    price: item.price.to_string(),
                    available: item.is_available(),
                    in_cart: cart.quantity_of(item.id),
                })
                .collect(),
        })
        .filter(|category| !category.items.is_empty())
        .collect();

    Ok(HomeTemplate {
        ctx,
        categories,
        status: StatusView {
            is_open: status.is_open,
            message: status.message,
        },
    })
}
