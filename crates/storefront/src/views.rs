//! Display models for templates.
//!
//! Everything here is a pure projection of catalog and cart state: no I/O, no
//! mutation. Templates render these models and every cart change re-renders
//! the whole fragment from a fresh projection.

use static_shop_core::{Cart, CartLine, Catalog, CategoryFilter, Product};

/// Product card data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: String,
    /// All images, only populated when there is more than one.
    pub thumbnails: Vec<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image: product.default_image().to_string(),
            thumbnails: if product.has_gallery() {
                product.images.clone()
            } else {
                Vec::new()
            },
        }
    }
}

/// Project a slice of products into cards.
#[must_use]
pub fn product_cards<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductCardView> {
    products.into_iter().map(ProductCardView::from).collect()
}

/// One option of the category `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The product grid with its category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGridView {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryOptionView>,
}

impl ProductGridView {
    /// Project the catalog narrowed by `filter`.
    #[must_use]
    pub fn new(catalog: &Catalog, filter: &CategoryFilter) -> Self {
        let mut categories = vec![CategoryOptionView {
            value: CategoryFilter::ALL.to_string(),
            label: "All Products".to_string(),
            selected: *filter == CategoryFilter::All,
        }];
        categories.extend(catalog.categories().into_iter().map(|category| {
            CategoryOptionView {
                value: category.to_string(),
                label: title_case(category),
                selected: filter.as_str() == category,
            }
        }));

        Self {
            products: product_cards(catalog.filter(filter)),
            categories,
        }
    }
}

/// Cart row data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.as_i32(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    /// Grand total with exactly two decimals and no currency symbol.
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Whether to show the empty-state message and disable checkout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total_price().to_fixed(),
            item_count: cart.total_item_count(),
        }
    }
}

/// Header item-count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    pub count: u64,
}

impl From<&Cart> for BadgeView {
    fn from(cart: &Cart) -> Self {
        Self {
            count: cart.total_item_count(),
        }
    }
}

/// `"electronics"` -> `"Electronics"`.
fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use static_shop_core::ProductId;

    use super::*;
    use crate::catalog::embedded_catalog;

    #[test]
    fn test_product_card_thumbnails_only_for_galleries() {
        let catalog = embedded_catalog().unwrap();
        let headphones = ProductCardView::from(catalog.get(ProductId::new(1)).unwrap());
        let watch = ProductCardView::from(catalog.get(ProductId::new(2)).unwrap());

        assert_eq!(headphones.thumbnails.len(), 3);
        assert_eq!(headphones.image, headphones.thumbnails[0]);
        assert!(watch.thumbnails.is_empty());
        assert_eq!(watch.price, "$199.99");
    }

    #[test]
    fn test_grid_filters_and_marks_selection() {
        let catalog = embedded_catalog().unwrap();
        let grid = ProductGridView::new(&catalog, &CategoryFilter::parse("clothing"));

        assert_eq!(grid.products.len(), 1);
        assert_eq!(grid.products[0].name, "Cotton T-Shirt");

        let selected: Vec<&str> = grid
            .categories
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(selected, vec!["clothing"]);
        assert_eq!(grid.categories[0].value, "all");
        assert_eq!(grid.categories[1].label, "Electronics");
    }

    #[test]
    fn test_grid_all_selects_all_option() {
        let catalog = embedded_catalog().unwrap();
        let grid = ProductGridView::new(&catalog, &CategoryFilter::All);
        assert_eq!(grid.products.len(), 3);
        assert!(grid.categories[0].selected);
        assert!(grid.categories[1..].iter().all(|option| !option.selected));
    }

    #[test]
    fn test_cart_view_rows_and_totals() {
        let catalog = embedded_catalog().unwrap();
        let mut cart = Cart::new();
        cart.add_item(&catalog, ProductId::new(1));
        cart.add_item(&catalog, ProductId::new(1));
        cart.add_item(&catalog, ProductId::new(3));

        let view = CartView::from(&cart);
        assert!(!view.is_empty());
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "224.97");
        assert_eq!(view.items[0].price, "$99.99");
        assert_eq!(view.items[0].line_total, "$199.98");
        assert_eq!(view.items[1].quantity, 1);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.is_empty());
        assert_eq!(view.total, "0.00");
        assert_eq!(BadgeView::from(&Cart::new()).count, 0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("electronics"), "Electronics");
        assert_eq!(title_case(""), "");
    }
}
