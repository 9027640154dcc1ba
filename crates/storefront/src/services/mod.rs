//! Integrations behind the intake forms.
//!
//! # Services
//!
//! - `mailer` - Contact form delivery (mocked; no network I/O)

pub mod mailer;

pub use mailer::{Delivery, MailError, Mailer, MailerMode, MockMailer};
