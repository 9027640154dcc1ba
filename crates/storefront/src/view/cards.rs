//! Display data and Askama templates for each attachment point.

use askama::Template;
use lustre_core::ProductId;

use crate::cart::{Cart, CartLine};
use crate::catalog::{ALL_CATEGORIES, CategoryFilter, Product};
use crate::filters;
use crate::intake::ContactFields;
use crate::surface::Notice;

/// Placeholder shown instead of an empty product grid.
pub const NO_RESULTS_MESSAGE: &str = "No products found matching your criteria.";

/// Stagger between card entrance animations.
const CARD_ANIMATION_STEP_MS: usize = 100;

/// Product card display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
    pub glyph: String,
    pub animation_delay: String,
    pub just_added: bool,
}

impl ProductCardView {
    /// Build the card for the product at `index` in the grid.
    #[must_use]
    pub fn new(index: usize, product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.display_name().to_owned(),
            description: product.display_description().to_owned(),
            category: product.category.clone().unwrap_or_default(),
            price: product.unit_price().display_grouped(),
            image: product.image.clone(),
            glyph: product.glyph().to_owned(),
            animation_delay: format!("{}ms", index * CARD_ANIMATION_STEP_MS),
            just_added: false,
        }
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub glyph: String,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id(),
            name: line.product.display_name().to_owned(),
            glyph: line.product.glyph().to_owned(),
            quantity: line.quantity,
            line_price: lustre_core::Price::usd(line.line_total()).display_fixed(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total_price().display_fixed(),
            item_count: cart.total_items(),
        }
    }
}

/// A category selector control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryControlView {
    pub value: String,
    pub label: String,
    pub active: bool,
}

impl CategoryControlView {
    /// The "All" control followed by one control per category.
    #[must_use]
    pub fn build(categories: &[&str], active: &CategoryFilter) -> Vec<Self> {
        std::iter::once((ALL_CATEGORIES, "All"))
            .chain(categories.iter().map(|c| (*c, *c)))
            .map(|(value, label)| Self {
                value: value.to_owned(),
                label: label.to_owned(),
                active: active.as_str() == value,
            })
            .collect()
    }
}

/// Product grid fragment.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate<'a> {
    pub cards: &'a [ProductCardView],
    pub empty_message: &'a str,
}

/// Category selector fragment.
#[derive(Template)]
#[template(path = "partials/category_selector.html")]
pub struct CategorySelectorTemplate<'a> {
    pub controls: &'a [CategoryControlView],
}

/// Cart line items fragment.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Cart toggle control fragment.
#[derive(Template)]
#[template(path = "partials/cart_toggle.html")]
pub struct CartToggleTemplate {
    pub open: bool,
    pub count: u32,
}

/// Search input fragment.
#[derive(Template)]
#[template(path = "partials/search_input.html")]
pub struct SearchInputTemplate<'a> {
    pub value: &'a str,
    pub focused: bool,
}

/// Contact form fragment.
#[derive(Template)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate<'a> {
    pub fields: &'a ContactFields,
    pub sending: bool,
}

/// The assembled page.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    pub store_name: &'a str,
    pub stylesheet: &'a str,
    pub cart_open: bool,
    pub has_cart_panel: bool,
    pub search_input: Option<&'a str>,
    pub cart_toggle: Option<&'a str>,
    pub cart_count: Option<&'a str>,
    pub category_selector: Option<&'a str>,
    pub products: Option<&'a str>,
    pub contact_form: Option<&'a str>,
    pub cart_items: Option<&'a str>,
    pub cart_total: Option<&'a str>,
    pub notices: &'a [Notice],
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_product_card_formats_price_with_grouping() {
        let catalog = Catalog::seeded().unwrap();
        let card = ProductCardView::new(2, catalog.get_by_id(ProductId::new(1)).unwrap());
        assert_eq!(card.price, "$4,500");
        assert_eq!(card.animation_delay, "200ms");
        assert_eq!(card.glyph, "💎");
        assert!(card.image.is_none());
    }

    #[test]
    fn test_grid_renders_image_or_glyph() {
        let catalog = Catalog::seeded().unwrap();
        let cards: Vec<ProductCardView> = catalog
            .list_all()
            .iter()
            .enumerate()
            .map(|(i, p)| ProductCardView::new(i, p))
            .collect();

        let html = ProductGridTemplate {
            cards: &cards,
            empty_message: NO_RESULTS_MESSAGE,
        }
        .render()
        .unwrap();

        assert!(html.contains("images/charm-bracelet.jpg"));
        assert!(html.contains("<span class=\"product-glyph\">💍</span>"));
        assert!(html.contains("data-product-id=\"8\""));
        assert!(html.contains("$149.99"));
        assert!(!html.contains(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_empty_grid_shows_placeholder() {
        let html = ProductGridTemplate {
            cards: &[],
            empty_message: NO_RESULTS_MESSAGE,
        }
        .render()
        .unwrap();
        assert!(html.contains(NO_RESULTS_MESSAGE));
        assert!(!html.contains("product-card"));
    }

    #[test]
    fn test_category_controls_mark_only_active() {
        let controls = CategoryControlView::build(
            &["Rings", "Necklaces"],
            &CategoryFilter::Named("Rings".to_string()),
        );
        let active: Vec<&str> = controls
            .iter()
            .filter(|c| c.active)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(active, vec!["Rings"]);
        assert_eq!(controls.first().map(|c| c.label.as_str()), Some("All"));
    }

    #[test]
    fn test_cart_count_hidden_when_zero() {
        let html = CartCountTemplate { count: 0 }.render().unwrap();
        assert!(html.contains("hidden"));
        let html = CartCountTemplate { count: 3 }.render().unwrap();
        assert!(!html.contains("hidden"));
        assert!(html.contains(">3<"));
    }

    #[test]
    fn test_cart_toggle_label_pluralizes() {
        let html = CartToggleTemplate { open: false, count: 1 }.render().unwrap();
        assert!(html.contains("Cart, 1 item\""));
        let html = CartToggleTemplate { open: true, count: 2 }.render().unwrap();
        assert!(html.contains("Cart, 2 items"));
        assert!(html.contains("aria-expanded=\"true\""));
    }

    #[test]
    fn test_contact_form_sending_state() {
        let fields = ContactFields::default();
        let html = ContactFormTemplate {
            fields: &fields,
            sending: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("disabled"));
        assert!(html.contains("Sending..."));
    }

    #[test]
    fn test_templates_escape_user_text() {
        let html = SearchInputTemplate {
            value: "<script>",
            focused: false,
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;"));
    }
}
