//! The storefront composition root.
//!
//! [`Storefront`] builds the catalog, cart, view and intake once, owns the
//! debounce and feedback timers, and exposes one method per user action.
//! Actions delegate to the components and re-render whatever changed; the
//! controller holds no business rules of its own.

use std::sync::Arc;

use lustre_core::ProductId;
use tokio::sync::mpsc::UnboundedSender;
use tracing::instrument;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::{StorefrontConfig, Timings};
use crate::error::{Result, add_breadcrumb};
use crate::intake::{ContactFields, ContactSubmission, Intake, IntakeError, OrderSummary};
use crate::services::{Delivery, MailError, Mailer, MockMailer};
use crate::store::{FileStore, KeyValueStore};
use crate::surface::{DisplaySurface, Notice, Slot};
use crate::timer::{Ticket, Timer};
use crate::view::{ClickTarget, Key, KeyPress, View};

/// Deferred work delivered back to the session loop.
#[derive(Debug)]
pub enum AppEvent {
    /// The search box has been quiet for the debounce period.
    SearchDebounced(Ticket),
    /// The add-to-cart feedback period for a product ended.
    FeedbackExpired(Ticket, ProductId),
    /// A contact send finished.
    ContactSent {
        submission: ContactSubmission,
        outcome: std::result::Result<Delivery, MailError>,
    },
}

/// Everything a [`Storefront`] is wired from.
pub struct Components {
    pub catalog: Catalog,
    pub store: Arc<dyn KeyValueStore>,
    pub mailer: Arc<dyn Mailer>,
    pub surface: DisplaySurface,
    pub store_name: String,
    pub timings: Timings,
}

/// The running storefront.
pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    view: View,
    intake: Intake,
    search_timer: Timer<AppEvent>,
    feedback_timer: Timer<AppEvent>,
}

impl Storefront {
    /// Wire the storefront. The cart is restored from the store.
    ///
    /// Timer and send events are posted to `events`; feed them back through
    /// [`Storefront::handle_event`].
    #[must_use]
    pub fn new(components: Components, events: UnboundedSender<AppEvent>) -> Self {
        let Components {
            catalog,
            store,
            mailer,
            surface,
            store_name,
            timings,
        } = components;

        Self {
            catalog,
            cart: Cart::load(store),
            view: View::new(surface, store_name),
            intake: Intake::new(mailer, events.clone()),
            search_timer: Timer::new(timings.search_debounce, events.clone()),
            feedback_timer: Timer::new(timings.feedback, events),
        }
    }

    /// Wire the storefront from configuration: the configured or built-in
    /// catalog, a file store under the data directory and the mock mailer.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog seed cannot be loaded or the data
    /// directory cannot be created.
    pub fn from_config(
        config: &StorefrontConfig,
        events: UnboundedSender<AppEvent>,
    ) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        let store = FileStore::open(&config.data_dir)?;
        let mailer = MockMailer::new(config.timings.send_delay, config.mailer_mode());

        tracing::info!(
            products = catalog.list_all().len(),
            store = %store.path().display(),
            "Storefront wired"
        );

        Ok(Self::new(
            Components {
                catalog,
                store: Arc::new(store),
                mailer: Arc::new(mailer),
                surface: DisplaySurface::full(),
                store_name: config.store_name.clone(),
                timings: config.timings,
            },
            events,
        ))
    }

    /// Initial render of every attachment point.
    pub fn start(&mut self) {
        self.view.render_all(&self.catalog, &self.cart);
        tracing::info!(
            restored_lines = self.cart.lines().len(),
            "Storefront started"
        );
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Drain notices queued for the user.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.view.take_notices()
    }

    /// Assemble the full page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page template fails to render.
    pub fn render_page(&self) -> Result<String> {
        Ok(self.view.render_page()?)
    }

    // -------------------------------------------------------------------------
    // Cart actions
    // -------------------------------------------------------------------------

    /// Add one of a product. Unknown ids are ignored and return `false`.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, id: ProductId) -> bool {
        let id_str = id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id_str.as_str())]));

        let Some(product) = self.catalog.get_by_id(id) else {
            tracing::debug!("Unknown product, ignoring");
            return false;
        };
        self.cart.add_item(product);
        self.view.render_cart(&self.cart);

        self.view.show_add_to_cart_feedback(id);
        self.feedback_timer
            .start(|ticket| AppEvent::FeedbackExpired(ticket, id));
        true
    }

    /// Change a line's quantity by `delta`. Returns whether a line existed.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, delta: i32) -> bool {
        let id_str = id.to_string();
        let delta_str = delta.to_string();
        add_breadcrumb(
            "cart",
            "Updated quantity",
            Some(&[("product_id", id_str.as_str()), ("delta", delta_str.as_str())]),
        );

        let changed = self.cart.update_quantity(id, delta);
        if changed {
            self.view.render_cart(&self.cart);
        }
        changed
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        add_breadcrumb("cart", "Cleared cart", None);
        self.cart.clear();
        self.view.render_cart(&self.cart);
    }

    /// Place the mocked order. The cart panel closes only on success.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::EmptyCart` when there is nothing to order.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> std::result::Result<OrderSummary, IntakeError> {
        add_breadcrumb("checkout", "Checkout", None);
        let summary = self.intake.checkout(&mut self.cart, &mut self.view)?;
        self.view.render_cart(&self.cart);
        self.view.close_cart();
        Ok(summary)
    }

    // -------------------------------------------------------------------------
    // Browsing actions
    // -------------------------------------------------------------------------

    /// Select a category control.
    #[instrument(skip(self))]
    pub fn filter(&mut self, category: &str) {
        add_breadcrumb("catalog", "Filtered", Some(&[("category", category)]));
        self.view.filter_products(&mut self.catalog, category);
    }

    /// The search box changed. The search runs once the box has been quiet
    /// for the debounce period.
    #[instrument(skip(self))]
    pub fn search_input(&mut self, text: &str) {
        self.view.set_search_text(text);
        self.search_timer.start(AppEvent::SearchDebounced);
    }

    /// Enter in the search box: search now and drop any pending debounce.
    #[instrument(skip(self))]
    pub fn search_submit(&mut self) {
        add_breadcrumb(
            "catalog",
            "Searched",
            Some(&[("term", self.view.ui().search_text.as_str())]),
        );
        self.search_timer.cancel();
        self.view.handle_search(&self.catalog);
    }

    /// Open or close the cart panel.
    #[instrument(skip(self))]
    pub fn toggle_cart(&mut self) {
        add_breadcrumb("view", "Toggled cart", None);
        self.view.toggle_cart();
    }

    /// A key press anywhere on the page. Returns whether it was handled.
    ///
    /// Enter in the focused search box submits the search.
    #[instrument(skip(self))]
    pub fn key_press(&mut self, press: KeyPress) -> bool {
        if press == KeyPress::plain(Key::Enter)
            && self.view.ui().focus == Some(Slot::SearchInput)
        {
            self.search_submit();
            return true;
        }
        self.view.handle_key(press)
    }

    /// A click anywhere on the page. Returns whether it closed the cart.
    #[instrument(skip(self))]
    pub fn click(&mut self, target: ClickTarget) -> bool {
        self.view.handle_click(target)
    }

    // -------------------------------------------------------------------------
    // Contact
    // -------------------------------------------------------------------------

    /// Submit the contact form with the given field values.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError` if a required field is blank or the email is
    /// malformed.
    #[instrument(skip(self, fields))]
    pub fn submit_contact(&mut self, fields: ContactFields) -> std::result::Result<(), IntakeError> {
        add_breadcrumb("contact", "Submitted contact form", None);
        self.view.set_contact_fields(fields);
        let fields = self.view.ui().contact_fields.clone();
        self.intake.submit_contact_form(&fields, &mut self.view)
    }

    // -------------------------------------------------------------------------
    // Deferred events
    // -------------------------------------------------------------------------

    /// Apply a timer or send event. Returns `false` for stale timer events.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::SearchDebounced(ticket) => {
                let fresh = self.search_timer.accept(ticket);
                if fresh {
                    self.view.handle_search(&self.catalog);
                }
                fresh
            }
            AppEvent::FeedbackExpired(ticket, id) => {
                let fresh = self.feedback_timer.accept(ticket);
                if fresh {
                    self.view.clear_add_to_cart_feedback(id);
                }
                fresh
            }
            AppEvent::ContactSent {
                submission,
                outcome,
            } => {
                self.intake
                    .complete_contact(&submission, outcome, &mut self.view);
                true
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::services::MailerMode;
    use crate::store::MemoryStore;
    use crate::surface::{NoticeLevel, Slot};
    use crate::view::{CartPanel, SubmitState};

    /// Mailer whose service refuses every message.
    struct RejectingMailer;

    #[async_trait::async_trait]
    impl Mailer for RejectingMailer {
        async fn send(
            &self,
            _submission: &ContactSubmission,
        ) -> std::result::Result<Delivery, MailError> {
            Err(MailError::Rejected("mailbox full".to_string()))
        }
    }

    fn storefront_with(store: MemoryStore) -> (Storefront, UnboundedReceiver<AppEvent>) {
        storefront_using(
            store,
            Arc::new(MockMailer::new(
                Duration::from_millis(800),
                MailerMode::Unconfigured,
            )),
        )
    }

    fn storefront_using(
        store: MemoryStore,
        mailer: Arc<dyn Mailer>,
    ) -> (Storefront, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let components = Components {
            catalog: Catalog::seeded().unwrap(),
            store: Arc::new(store),
            mailer,
            surface: DisplaySurface::full(),
            store_name: "Lustre".to_string(),
            timings: Timings::default(),
        };
        let mut shop = Storefront::new(components, tx);
        shop.start();
        (shop, rx)
    }

    fn storefront() -> (Storefront, UnboundedReceiver<AppEvent>) {
        storefront_with(MemoryStore::new())
    }

    fn shown_ids(shop: &Storefront) -> Vec<i32> {
        shop.view().cards().iter().map(|c| c.id.as_i32()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_burst_runs_once_with_latest_text() {
        let (mut shop, mut rx) = storefront();

        shop.search_input("d");
        tokio::time::advance(Duration::from_millis(100)).await;
        shop.search_input("di");
        tokio::time::advance(Duration::from_millis(100)).await;
        shop.search_input("pearl");

        // Nothing has run yet: the grid still shows the whole catalog.
        assert_eq!(shown_ids(&shop).len(), 7);

        let event = rx.recv().await.unwrap();
        assert!(shop.handle_event(event));
        assert_eq!(shown_ids(&shop), vec![3]);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_cancels_pending_debounce() {
        let (mut shop, mut rx) = storefront();

        shop.search_input("emerald");
        shop.search_submit();
        assert_eq!(shown_ids(&shop), vec![5]);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_debounce_event_is_ignored() {
        let (mut shop, mut rx) = storefront();

        shop.search_input("gold");
        let event = rx.recv().await.unwrap();
        shop.filter("Rings");
        shop.search_input("  ");
        shop.search_submit();

        assert!(!shop.handle_event(event));
        assert_eq!(shown_ids(&shop), vec![1, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_to_cart_feedback_expires() {
        let (mut shop, mut rx) = storefront();

        assert!(shop.add_to_cart(ProductId::new(2)));
        assert_eq!(shop.view().ui().added_feedback, Some(ProductId::new(2)));
        assert_eq!(shop.cart().total_items(), 1);

        let started = tokio::time::Instant::now();
        let event = rx.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(shop.handle_event(event));
        assert_eq!(shop.view().ui().added_feedback, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_product_is_ignored() {
        let (mut shop, mut rx) = storefront();

        assert!(!shop.add_to_cart(ProductId::new(7)));
        assert!(shop.cart().is_empty());
        assert!(!shop.update_quantity(ProductId::new(7), 1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_restored_on_restart() {
        let store = MemoryStore::new();
        {
            let (mut shop, _rx) = storefront_with(store.clone());
            shop.add_to_cart(ProductId::new(8));
        }

        let (shop, _rx) = storefront_with(store);
        assert_eq!(shop.cart().lines().len(), 1);
        assert_eq!(shop.cart().total_items(), 1);
        assert!(shop
            .view()
            .surface()
            .get(Slot::CartItems)
            .unwrap()
            .contains("Charm Bracelet"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quantity_controls_rerender() {
        let (mut shop, _rx) = storefront();
        shop.add_to_cart(ProductId::new(4));
        shop.add_to_cart(ProductId::new(4));

        assert!(shop.update_quantity(ProductId::new(4), -1));
        assert_eq!(shop.view().surface().get(Slot::CartTotal), Some("$3200.00"));

        assert!(shop.update_quantity(ProductId::new(4), -1));
        assert!(shop.cart().is_empty());
        assert_eq!(shop.view().surface().get(Slot::CartTotal), Some("$0.00"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_closes_panel_only_on_success() {
        let (mut shop, _rx) = storefront();

        shop.toggle_cart();
        assert!(shop.checkout().is_err());
        assert_eq!(shop.view().ui().cart_panel, CartPanel::Open);

        shop.add_to_cart(ProductId::new(1));
        let summary = shop.checkout().unwrap();
        assert_eq!(summary.item_count, 1);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.view().ui().cart_panel, CartPanel::Closed);

        let notices = shop.take_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices.first().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_submission_completes_through_event() {
        let (mut shop, mut rx) = storefront();
        let fields = ContactFields {
            name: "Kasun".to_string(),
            email: "kasun@example.com".to_string(),
            phone: "+94 77 123 4567".to_string(),
            message: "Do you do custom engravings?".to_string(),
        };

        shop.submit_contact(fields).unwrap();
        assert_eq!(shop.view().ui().submit_state, SubmitState::Sending);

        let event = rx.recv().await.unwrap();
        assert!(shop.handle_event(event));
        assert_eq!(shop.view().ui().submit_state, SubmitState::Ready);
        assert_eq!(shop.view().ui().contact_fields, ContactFields::default());

        let notices = shop.take_notices();
        let message = &notices.first().unwrap().message;
        assert!(message.starts_with("Thank you for your inquiry, Kasun!"));
        assert!(message.contains("not yet configured"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_contact_keeps_fields() {
        let (mut shop, mut rx) = storefront_using(MemoryStore::new(), Arc::new(RejectingMailer));
        let fields = ContactFields {
            name: "Dilani".to_string(),
            email: "dilani@example.com".to_string(),
            phone: String::new(),
            message: "Is the tennis bracelet in stock?".to_string(),
        };

        shop.submit_contact(fields.clone()).unwrap();
        let event = rx.recv().await.unwrap();
        assert!(shop.handle_event(event));

        assert_eq!(shop.view().ui().submit_state, SubmitState::Ready);
        assert_eq!(shop.view().ui().contact_fields, fields);
        let notices = shop.take_notices();
        assert_eq!(notices.first().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_in_focused_search_submits() {
        let (mut shop, mut rx) = storefront();

        assert!(!shop.key_press(KeyPress::plain(Key::Enter)));

        assert!(shop.key_press(KeyPress::with_modifier(Key::Char('k'))));
        shop.search_input("emerald");
        assert!(shop.key_press(KeyPress::plain(Key::Enter)));
        assert_eq!(shown_ids(&shop), vec![5]);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_and_outside_click_close_cart() {
        let (mut shop, _rx) = storefront();

        shop.toggle_cart();
        assert!(shop.key_press(KeyPress::plain(Key::Escape)));
        shop.toggle_cart();
        assert!(!shop.click(ClickTarget::CartToggle));
        assert!(shop.click(ClickTarget::Elsewhere));
        assert_eq!(shop.view().ui().cart_panel, CartPanel::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_renders_after_start() {
        let (shop, _rx) = storefront();
        let page = shop.render_page().unwrap();
        assert!(page.contains("Imperial Emerald Ring"));
        assert!(page.contains("Your cart is empty"));
    }
}
