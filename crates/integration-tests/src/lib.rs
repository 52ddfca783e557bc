//! Integration test harness for Static Shop.
//!
//! [`TestApp::spawn`] starts the full storefront router on an ephemeral port
//! with an in-memory session store, and returns a cookie-carrying client so
//! tests behave like one browser visiting the site.
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let resp = app.get("/health").await;
//! assert_eq!(resp.status(), 200);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;

use reqwest::{Client, Response, header::COOKIE, redirect};
use static_shop_storefront::{
    app,
    catalog::embedded_catalog,
    config::StorefrontConfig,
    middleware::{create_session_layer, session::SESSION_COOKIE_NAME},
    models::session_keys,
    state::AppState,
};
use tower_sessions::{
    MemoryStore, SessionStore,
    cookie::time::{Duration, OffsetDateTime},
    session::{Id, Record},
};

/// Header HTMX sends with every request it makes.
pub const HX_REQUEST: &str = "HX-Request";

/// A running storefront and a client with its own cookie jar.
pub struct TestApp {
    pub client: Client,
    pub addr: SocketAddr,
    store: MemoryStore,
}

impl TestApp {
    /// Start a storefront with the built-in catalog.
    pub async fn spawn() -> Self {
        Self::spawn_with(StorefrontConfig::default()).await
    }

    /// Start a storefront with `config`.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let catalog = embedded_catalog().expect("built-in catalog is valid");
        let store = MemoryStore::default();
        let session_layer = create_session_layer(store.clone(), &config);
        let router = app(AppState::new(config, catalog, None), session_layer);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            addr,
            store,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Plain (non-HTMX) form post, as a browser without JavaScript would send.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Form post issued by HTMX.
    pub async fn post_htmx(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header(HX_REQUEST, "true")
            .form(form)
            .send()
            .await
            .expect("HTMX request failed")
    }

    /// Add one unit of `product_id` via HTMX.
    pub async fn add_to_cart(&self, product_id: i32) -> Response {
        let product_id = product_id.to_string();
        self.post_htmx("/cart/add", &[("product_id", product_id.as_str())])
            .await
    }

    /// Write `stored` directly as a session's cart value and return the
    /// session cookie that selects it.
    pub async fn seed_session(&self, stored: serde_json::Value) -> String {
        let mut record = Record {
            id: Id::default(),
            data: HashMap::from([(session_keys::CART.to_string(), stored)]),
            expiry_date: OffsetDateTime::now_utc() + Duration::days(1),
        };
        self.store
            .create(&mut record)
            .await
            .expect("Failed to seed session");
        format!("{SESSION_COOKIE_NAME}={}", record.id)
    }

    /// GET `path` as the visitor holding `cookie`, bypassing the cookie jar.
    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response {
        Client::new()
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await
            .expect("GET request failed")
    }
}

/// Read the header badge count out of a rendered page or fragment.
#[must_use]
pub fn badge_count(html: &str) -> Option<u64> {
    element_text(html, r#"id="cart-count""#)?.trim().parse().ok()
}

/// Read the cart grand total out of the cart region.
#[must_use]
pub fn cart_total(html: &str) -> Option<&str> {
    element_text(html, r#"id="cart-total""#).map(str::trim)
}

/// Text between the end of the opening tag carrying `marker` and the next `<`.
fn element_text<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
    let start = html.find(marker)?;
    let rest = html.get(start..)?;
    let open_end = rest.find('>')?;
    let text = rest.get(open_end + 1..)?;
    text.get(..text.find('<')?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_count_reads_span() {
        let html = r#"<a href="/cart">Cart <span id="cart-count" class="cart-count">3</span></a>"#;
        assert_eq!(badge_count(html), Some(3));
    }

    #[test]
    fn test_cart_total_reads_span() {
        let html = r#"<p>Total: $<span id="cart-total">399.97</span></p>"#;
        assert_eq!(cart_total(html), Some("399.97"));
        assert_eq!(cart_total("<p>no cart</p>"), None);
    }
}
