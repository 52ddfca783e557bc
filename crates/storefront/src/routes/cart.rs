//! Cart route handlers.
//!
//! Each handler loads the visitor's cart from the session, applies one cart
//! operation (which persists the new snapshot), and re-renders from the result.
//!
//! HTMX requests get fragments back: the badge for add-to-cart, the whole
//! `#cart-items` region for cart-page actions, each with the notice and badge
//! swapped out-of-band. Plain form posts get a flash notice and a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use static_shop_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart_store::CartStore;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::notice::{self, Notice};
use crate::routes::{is_htmx, safe_return_to};
use crate::state::AppState;
use crate::views::{BadgeView, CartView};

/// HTMX event fired whenever the cart changes.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Page to return to after a plain (non-HTMX) post.
    pub return_to: Option<String>,
}

/// Change quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartItemsTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
}

impl<S> From<(&CartStore<'_, S>, Option<Notice>)> for CartItemsTemplate {
    fn from((store, notice): (&CartStore<'_, S>, Option<Notice>)) -> Self {
        Self {
            badge: BadgeView::from(store.cart()),
            notice,
            cart: CartView::from(store.cart()),
        }
    }
}

/// Respond to a cart-page action: the refreshed cart region for HTMX,
/// otherwise a redirect back to the cart page.
async fn cart_page_response<S>(
    headers: &HeaderMap,
    session: &Session,
    store: &CartStore<'_, S>,
    notice: Option<Notice>,
) -> Response {
    if is_htmx(headers) {
        return (
            AppendHeaders([CART_UPDATED_TRIGGER]),
            CartItemsTemplate::from((store, notice)),
        )
            .into_response();
    }
    if let Some(notice) = notice {
        notice::set_flash(session, &notice).await;
    }
    Redirect::to("/cart").into_response()
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let notice = notice::take_flash(&session).await;
    let store = CartStore::load(session, state.catalog()).await;

    CartShowTemplate {
        badge: BadgeView::from(store.cart()),
        notice,
        cart: CartView::from(store.cart()),
    }
}

/// Add one unit of a product to the cart.
///
/// Unknown products are ignored: the response reflects the unchanged cart.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let mut store = CartStore::load(session.clone(), state.catalog()).await;
    let notice = store.add_item(form.product_id).await;
    if notice.is_some() {
        let product_id = form.product_id.to_string();
        let data = [("product_id", product_id.as_str())];
        add_breadcrumb("cart", "Added to cart", Some(data.as_slice()));
    }

    if is_htmx(&headers) {
        let fragment = CartCountTemplate {
            badge: BadgeView::from(store.cart()),
            notice,
        };
        return (AppendHeaders([CART_UPDATED_TRIGGER]), fragment).into_response();
    }

    if let Some(notice) = notice {
        notice::set_flash(&session, &notice).await;
    }
    Redirect::to(&safe_return_to(form.return_to.as_deref(), "/products")).into_response()
}

/// Change a line's quantity (the +/- buttons).
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let mut store = CartStore::load(session.clone(), state.catalog()).await;
    store.change_quantity(form.product_id, form.delta).await;
    cart_page_response(&headers, &session, &store, None).await
}

/// Remove a line from the cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut store = CartStore::load(session.clone(), state.catalog()).await;
    if store.remove_item(form.product_id).await {
        let product_id = form.product_id.to_string();
        let data = [("product_id", product_id.as_str())];
        add_breadcrumb("cart", "Removed from cart", Some(data.as_slice()));
    }
    cart_page_response(&headers, &session, &store, None).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let store = CartStore::load(session, state.catalog()).await;
    CartCountTemplate {
        badge: BadgeView::from(store.cart()),
        notice: None,
    }
}

/// Simulated checkout: empties the cart and thanks the visitor.
#[instrument(skip(state, session, headers))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Response {
    let mut store = CartStore::load(session.clone(), state.catalog()).await;
    let notice = store.checkout().await;
    if notice.is_some() {
        add_breadcrumb("cart", "Checked out", None);
    }
    cart_page_response(&headers, &session, &store, notice).await
}
