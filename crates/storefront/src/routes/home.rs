//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::notice::Notice;
use crate::routes::PageContext;
use crate::state::AppState;
use crate::views::{BadgeView, ProductCardView, product_cards};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
    /// The first few catalog products.
    pub products: Vec<ProductCardView>,
    /// Where add-to-cart returns for plain form posts.
    pub return_to: String,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let catalog = state.catalog();
    let PageContext { badge, notice } = PageContext::load(catalog, &session).await;

    HomeTemplate {
        badge,
        notice,
        products: product_cards(catalog.featured(state.config().featured_count)),
        return_to: "/".to_string(),
    }
}
