//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured products)
//!
//! # Products
//! GET  /products?category=     - Product grid, filtered by category ("all" by default)
//! GET  /products/{id}?image=   - Product detail with image gallery
//!
//! # Cart (HTMX fragments, redirect for plain form posts)
//! GET  /cart                   - Cart page
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add one unit (returns badge fragment)
//! POST /cart/update            - Change quantity by delta (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//!
//! # Checkout
//! POST /checkout               - Simulated checkout: clears the cart
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};
use static_shop_core::Catalog;
use tower_sessions::Session;

use crate::cart_store::CartStore;
use crate::notice::{self, Notice};
use crate::state::AppState;
use crate::views::BadgeView;

/// Header HTMX sets on every request it issues.
const HX_REQUEST: &str = "hx-request";

/// Data every full page needs for the shared layout.
pub struct PageContext {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
}

impl PageContext {
    /// Load the badge count and take any pending flash notice.
    pub async fn load(catalog: &Catalog, session: &Session) -> Self {
        let store = CartStore::load(session.clone(), catalog).await;
        Self {
            badge: BadgeView::from(store.cart()),
            notice: notice::take_flash(session).await,
        }
    }
}

/// Whether the request was issued by HTMX (and wants a fragment back).
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// Resolve a post-action redirect target, allowing only same-site paths.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>, fallback: &str) -> String {
    return_to
        .filter(|path| is_local_path(path))
        .unwrap_or(fallback)
        .to_string()
}

/// A path on this site, printable ASCII only so it is a valid `Location`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && path.bytes().all(|b| b.is_ascii_graphic())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }

    #[test]
    fn test_safe_return_to() {
        assert_eq!(
            safe_return_to(Some("/products?category=clothing"), "/"),
            "/products?category=clothing"
        );
        assert_eq!(safe_return_to(Some("https://evil.example"), "/cart"), "/cart");
        assert_eq!(safe_return_to(Some("//evil.example"), "/cart"), "/cart");
        assert_eq!(safe_return_to(Some("/\\evil.example"), "/cart"), "/cart");
        assert_eq!(safe_return_to(Some("/products?category=café"), "/"), "/");
        assert_eq!(safe_return_to(None, "/products"), "/products");
    }
}
