//! Projection of catalog and cart state onto the display surface.
//!
//! The view owns presentation-only state ([`UiState`]): the active category
//! control, the search box text, whether the cart panel is open, the
//! add-to-cart feedback marker and the contact form. It reads the catalog
//! and cart but never changes their data.

mod cards;

use askama::Template;
use lustre_core::ProductId;

pub use cards::{
    CartItemView, CartView, CategoryControlView, NO_RESULTS_MESSAGE, ProductCardView,
};
use cards::{
    CartCountTemplate, CartItemsTemplate, CartToggleTemplate, CategorySelectorTemplate,
    ContactFormTemplate, PageTemplate, ProductGridTemplate, SearchInputTemplate,
};

use crate::cart::Cart;
use crate::catalog::{Catalog, CategoryFilter, Product};
use crate::intake::ContactFields;
use crate::surface::{DisplaySurface, Notice, NoticeLevel, Slot};

/// Stylesheet inlined into the assembled page.
const STYLESHEET: &str = include_str!("../../static/css/main.css");

/// Cart panel visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartPanel {
    #[default]
    Closed,
    Open,
}

impl CartPanel {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

/// Contact form submit control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Ready,
    Sending,
}

/// A key press delivered to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

/// A key with its platform modifier (Ctrl, or Cmd on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifier: bool,
}

impl KeyPress {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifier: false,
        }
    }

    #[must_use]
    pub const fn with_modifier(key: Key) -> Self {
        Self {
            key,
            modifier: true,
        }
    }

    const fn is_search_shortcut(self) -> bool {
        self.modifier && matches!(self.key, Key::Char('k' | 'K'))
    }
}

/// Where a click landed, relative to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    CartPanel,
    CartToggle,
    Elsewhere,
}

/// Presentation-only state. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub active_category: CategoryFilter,
    pub search_text: String,
    pub cart_panel: CartPanel,
    pub focus: Option<Slot>,
    pub added_feedback: Option<ProductId>,
    pub contact_fields: ContactFields,
    pub submit_state: SubmitState,
}

/// Renders state into a [`DisplaySurface`].
#[derive(Debug)]
pub struct View {
    surface: DisplaySurface,
    ui: UiState,
    store_name: String,
    cards: Vec<ProductCardView>,
    cart_count: u32,
}

impl View {
    /// Create a view over a surface.
    #[must_use]
    pub fn new(surface: DisplaySurface, store_name: impl Into<String>) -> Self {
        Self {
            surface,
            ui: UiState::default(),
            store_name: store_name.into(),
            cards: Vec::new(),
            cart_count: 0,
        }
    }

    /// Presentation state.
    #[must_use]
    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The display surface.
    #[must_use]
    pub const fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    /// Cards currently shown in the product grid.
    #[must_use]
    pub fn cards(&self) -> &[ProductCardView] {
        &self.cards
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Render the products admitted by the catalog's current filter.
    pub fn display_products(&mut self, catalog: &Catalog) {
        let products = catalog.filtered();
        self.display_product_list(&products);
    }

    /// Render an explicit product list.
    pub fn display_product_list(&mut self, products: &[&Product]) {
        self.cards = products
            .iter()
            .enumerate()
            .map(|(i, p)| ProductCardView::new(i, p))
            .collect();
        self.render_grid();
    }

    /// Apply a category filter and mark its control active.
    pub fn filter_products(&mut self, catalog: &mut Catalog, category: &str) {
        {
            let products = catalog.filter_by_category(category);
            self.display_product_list(&products);
        }
        self.ui.active_category = catalog.current_filter().clone();
        self.render_categories(catalog);
    }

    /// Run the search box text against the catalog.
    ///
    /// Blank text falls back to the current category filter; anything else
    /// shows search results regardless of the category filter.
    pub fn handle_search(&mut self, catalog: &Catalog) {
        if self.ui.search_text.trim().is_empty() {
            self.display_products(catalog);
        } else {
            let results = catalog.search(&self.ui.search_text);
            tracing::debug!(term = %self.ui.search_text, results = results.len(), "Search");
            self.display_product_list(&results);
        }
    }

    /// Replace the search box text without searching.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.ui.search_text = text.into();
        self.render_search_input();
    }

    /// Render the category controls from the catalog's categories.
    pub fn render_categories(&mut self, catalog: &Catalog) {
        let controls = CategoryControlView::build(&catalog.categories(), &self.ui.active_category);
        self.paint(Slot::CategorySelector, &CategorySelectorTemplate {
            controls: &controls,
        });
    }

    /// Mark a product's add-to-cart control as just used.
    pub fn show_add_to_cart_feedback(&mut self, id: ProductId) {
        self.ui.added_feedback = Some(id);
        self.render_grid();
    }

    /// Revert the add-to-cart control, if it still belongs to `id`.
    pub fn clear_add_to_cart_feedback(&mut self, id: ProductId) {
        if self.ui.added_feedback == Some(id) {
            self.ui.added_feedback = None;
            self.render_grid();
        }
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Render the count badge, line items and total.
    pub fn render_cart(&mut self, cart: &Cart) {
        let cart = CartView::from(cart);
        self.cart_count = cart.item_count;

        self.paint(Slot::CartCount, &CartCountTemplate {
            count: cart.item_count,
        });
        self.paint(Slot::CartItems, &CartItemsTemplate { cart: &cart });
        self.surface.set(Slot::CartTotal, cart.total);
        self.render_cart_toggle();
    }

    /// Flip the cart panel.
    pub fn toggle_cart(&mut self) {
        self.ui.cart_panel = self.ui.cart_panel.toggled();
        self.render_cart_toggle();
    }

    /// Close the cart panel. Returns whether it was open.
    pub fn close_cart(&mut self) -> bool {
        if self.ui.cart_panel.is_open() {
            self.toggle_cart();
            true
        } else {
            false
        }
    }

    // -------------------------------------------------------------------------
    // Ambient interaction
    // -------------------------------------------------------------------------

    /// Escape closes the cart; the platform modifier plus K focuses search.
    /// Returns whether the key was handled.
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        if press.key == Key::Escape {
            return self.close_cart();
        }
        if press.is_search_shortcut() && self.surface.has(Slot::SearchInput) {
            self.ui.focus = Some(Slot::SearchInput);
            self.render_search_input();
            return true;
        }
        false
    }

    /// A click outside the open cart panel and its toggle closes the panel.
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Elsewhere => self.close_cart(),
            ClickTarget::CartPanel | ClickTarget::CartToggle => false,
        }
    }

    // -------------------------------------------------------------------------
    // Contact form
    // -------------------------------------------------------------------------

    /// Replace the contact form field values.
    pub fn set_contact_fields(&mut self, fields: ContactFields) {
        self.ui.contact_fields = fields;
        self.render_contact_form();
    }

    /// Clear every contact form field.
    pub fn reset_contact_form(&mut self) {
        self.set_contact_fields(ContactFields::default());
    }

    /// Enable or disable the submit control.
    pub fn set_submit_state(&mut self, state: SubmitState) {
        self.ui.submit_state = state;
        self.render_contact_form();
    }

    // -------------------------------------------------------------------------
    // Notices and page
    // -------------------------------------------------------------------------

    /// Show a message to the user.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.surface.notify(level, message);
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.surface.take_notices()
    }

    /// Render every attachment point from scratch.
    pub fn render_all(&mut self, catalog: &Catalog, cart: &Cart) {
        self.display_products(catalog);
        self.render_categories(catalog);
        self.render_search_input();
        self.render_cart(cart);
        self.render_contact_form();
    }

    /// Assemble the full page from the current fragments.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template fails to render.
    pub fn render_page(&self) -> askama::Result<String> {
        let s = &self.surface;
        PageTemplate {
            store_name: &self.store_name,
            stylesheet: STYLESHEET,
            cart_open: self.ui.cart_panel.is_open(),
            has_cart_panel: s.has(Slot::CartPanel),
            search_input: s.get(Slot::SearchInput),
            cart_toggle: s.get(Slot::CartToggle),
            cart_count: s.get(Slot::CartCount),
            category_selector: s.get(Slot::CategorySelector),
            products: s.get(Slot::ProductsGrid),
            contact_form: s.get(Slot::ContactForm),
            cart_items: s.get(Slot::CartItems),
            cart_total: s.get(Slot::CartTotal),
            notices: s.notices(),
        }
        .render()
    }

    fn render_grid(&mut self) {
        let feedback = self.ui.added_feedback;
        for card in &mut self.cards {
            card.just_added = feedback == Some(card.id);
        }
        let html = ProductGridTemplate {
            cards: &self.cards,
            empty_message: NO_RESULTS_MESSAGE,
        }
        .render();
        self.store(Slot::ProductsGrid, html);
    }

    fn render_search_input(&mut self) {
        let html = SearchInputTemplate {
            value: &self.ui.search_text,
            focused: self.ui.focus == Some(Slot::SearchInput),
        }
        .render();
        self.store(Slot::SearchInput, html);
    }

    fn render_cart_toggle(&mut self) {
        self.paint(Slot::CartToggle, &CartToggleTemplate {
            open: self.ui.cart_panel.is_open(),
            count: self.cart_count,
        });
    }

    fn render_contact_form(&mut self) {
        let html = ContactFormTemplate {
            fields: &self.ui.contact_fields,
            sending: self.ui.submit_state == SubmitState::Sending,
        }
        .render();
        self.store(Slot::ContactForm, html);
    }

    fn paint(&mut self, slot: Slot, template: &impl Template) {
        if self.surface.has(slot) {
            self.store(slot, template.render());
        }
    }

    fn store(&mut self, slot: Slot, html: askama::Result<String>) {
        match html {
            Ok(html) => {
                self.surface.set(slot, html);
            }
            Err(e) => tracing::error!(slot = ?slot, error = %e, "Failed to render fragment"),
        }
    }
}
