//! The display surface: named attachment points holding rendered HTML.
//!
//! A surface is built with the attachment points the page actually has.
//! Writes to a point the surface lacks are dropped, so a page without, say,
//! a contact form simply loses that feature.

use std::collections::BTreeMap;

/// A named region of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    ProductsGrid,
    SearchInput,
    CartCount,
    CartItems,
    CartTotal,
    CategorySelector,
    ContactForm,
    CartToggle,
    CartPanel,
}

impl Slot {
    /// Every attachment point.
    pub const ALL: [Self; 9] = [
        Self::ProductsGrid,
        Self::SearchInput,
        Self::CartCount,
        Self::CartItems,
        Self::CartTotal,
        Self::CategorySelector,
        Self::ContactForm,
        Self::CartToggle,
        Self::CartPanel,
    ];

    /// DOM id of the attachment point in the assembled page.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::ProductsGrid => "productsGrid",
            Self::SearchInput => "searchInput",
            Self::CartCount => "cartCount",
            Self::CartItems => "cartItems",
            Self::CartTotal => "totalAmount",
            Self::CategorySelector => "categorySelector",
            Self::ContactForm => "contactForm",
            Self::CartToggle => "cartToggle",
            Self::CartPanel => "cartSidebar",
        }
    }

    /// Look up an attachment point by its DOM id.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.element_id() == id)
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user (the page's alert box).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// CSS modifier for the notice box.
    #[must_use]
    pub const fn level_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        }
    }
}

/// Rendered fragments keyed by attachment point, plus pending notices.
#[derive(Debug, Clone)]
pub struct DisplaySurface {
    fragments: BTreeMap<Slot, String>,
    notices: Vec<Notice>,
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self::full()
    }
}

impl DisplaySurface {
    /// A surface with every attachment point present.
    #[must_use]
    pub fn full() -> Self {
        Self::with_slots(Slot::ALL)
    }

    /// A surface with only the given attachment points.
    #[must_use]
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            fragments: slots.into_iter().map(|slot| (slot, String::new())).collect(),
            notices: Vec::new(),
        }
    }

    /// Whether the page has this attachment point.
    #[must_use]
    pub fn has(&self, slot: Slot) -> bool {
        self.fragments.contains_key(&slot)
    }

    /// Replace a fragment. Returns `false` when the point is absent.
    pub fn set(&mut self, slot: Slot, html: String) -> bool {
        match self.fragments.get_mut(&slot) {
            Some(fragment) => {
                *fragment = html;
                true
            }
            None => {
                tracing::trace!(slot = ?slot, "Attachment point absent, skipping render");
                false
            }
        }
    }

    /// Current fragment for a point, `None` when the point is absent.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.fragments.get(&slot).map(String::as_str)
    }

    /// Queue a notice for the user.
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Pending notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
