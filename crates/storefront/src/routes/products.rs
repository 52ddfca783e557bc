//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use static_shop_core::{CategoryFilter, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::notice::Notice;
use crate::routes::PageContext;
use crate::state::AppState;
use crate::views::{BadgeView, ProductCardView, ProductGridView};

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Product detail query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductShowQuery {
    /// Index into the product's images.
    pub image: Option<usize>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
    pub grid: ProductGridView,
    pub return_to: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub badge: BadgeView,
    pub notice: Option<Notice>,
    pub product: ProductCardView,
    pub selected_image: String,
    pub return_to: String,
}

/// Display the product grid, narrowed by `?category=`.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let filter = CategoryFilter::parse(query.category.as_deref().unwrap_or_default());
    let grid = ProductGridView::new(catalog, &filter);
    let PageContext { badge, notice } = PageContext::load(catalog, &session).await;

    ProductsIndexTemplate {
        badge,
        notice,
        grid,
        return_to: listing_path(&filter),
    }
}

/// Path back to the listing narrowed by `filter`, with the category encoded.
fn listing_path(filter: &CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => "/products".to_string(),
        CategoryFilter::Category(category) => {
            format!("/products?category={}", urlencoding::encode(category))
        }
    }
}

/// Display a product with its image gallery.
///
/// `?image=N` selects the gallery image to show large; out-of-range indexes
/// fall back to the default image.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Query(query): Query<ProductShowQuery>,
) -> Result<ProductShowTemplate> {
    let catalog = state.catalog();
    let product = catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let selected_image = query
        .image
        .and_then(|index| product.images.get(index))
        .map_or_else(|| product.default_image().to_string(), Clone::clone);
    let PageContext { badge, notice } = PageContext::load(catalog, &session).await;

    Ok(ProductShowTemplate {
        badge,
        notice,
        product: ProductCardView::from(product),
        selected_image,
        return_to: format!("/products/{id}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::safe_return_to;

    #[test]
    fn test_listing_path_unfiltered() {
        assert_eq!(listing_path(&CategoryFilter::All), "/products");
    }

    #[test]
    fn test_listing_path_encodes_category() {
        let path = listing_path(&CategoryFilter::parse("home & garden"));
        assert_eq!(path, "/products?category=home%20%26%20garden");
        assert_eq!(safe_return_to(Some(&path), "/products"), path);
    }
}
