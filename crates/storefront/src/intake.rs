//! Contact form and checkout intake.
//!
//! Neither path talks to a real backend: contact inquiries go through the
//! [`Mailer`] seam (mocked by default) and checkout only acknowledges the
//! order before clearing the cart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lustre_core::{Email, EmailError, Price};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::cart::Cart;
use crate::controller::AppEvent;
use crate::services::{Delivery, MailError, Mailer};
use crate::surface::NoticeLevel;
use crate::view::{SubmitState, View};

/// Generic message for a failed contact send.
pub const SEND_FAILURE_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again later.";

/// Errors surfaced by intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Checkout attempted with no lines in the cart.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// A required contact field was blank.
    #[error("Please fill in your {0}.")]
    MissingField(&'static str),

    /// The contact email did not parse.
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[from] EmailError),
}

/// Raw contact form field values, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// A contact inquiry ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
}

impl TryFrom<&ContactFields> for ContactSubmission {
    type Error = IntakeError;

    fn try_from(fields: &ContactFields) -> Result<Self, Self::Error> {
        let name = required(&fields.name, "name")?;
        if fields.email.trim().is_empty() {
            return Err(IntakeError::MissingField("email"));
        }
        let email = Email::parse(&fields.email)?;
        let message = required(&fields.message, "message")?;
        let phone = Some(fields.phone.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name,
            email,
            phone,
            message,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, IntakeError> {
    let value = value.trim();
    if value.is_empty() {
        Err(IntakeError::MissingField(field))
    } else {
        Ok(value.to_owned())
    }
}

/// Acknowledgement of a mocked order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub reference: Uuid,
    pub item_count: u32,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl OrderSummary {
    /// The confirmation shown to the customer.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Thank you for your purchase!\n\nOrder Summary:\n{} items\nTotal: {}\nReference: {}\n\nYou will be redirected to payment processing.",
            self.item_count,
            self.total.display_fixed(),
            self.reference,
        )
    }
}

/// Contact and checkout handling.
pub struct Intake {
    mailer: Arc<dyn Mailer>,
    events: UnboundedSender<AppEvent>,
}

impl Intake {
    /// Create the intake over a mailer; completed sends are posted to `events`.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, events: UnboundedSender<AppEvent>) -> Self {
        Self { mailer, events }
    }

    /// Start sending a contact inquiry.
    ///
    /// Disables the submit control and spawns the send; the outcome arrives
    /// later as [`AppEvent::ContactSent`] and is finished by
    /// [`Intake::complete_contact`]. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError` (after notifying the user) if a required field
    /// is blank or the email is malformed; nothing is sent in that case.
    pub fn submit_contact_form(
        &self,
        fields: &ContactFields,
        view: &mut View,
    ) -> Result<(), IntakeError> {
        let submission = match ContactSubmission::try_from(fields) {
            Ok(submission) => submission,
            Err(e) => {
                view.notify(NoticeLevel::Error, e.to_string());
                return Err(e);
            }
        };

        view.set_submit_state(SubmitState::Sending);

        let mailer = Arc::clone(&self.mailer);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = mailer.send(&submission).await;
            let _ = events.send(AppEvent::ContactSent {
                submission,
                outcome,
            });
        });
        Ok(())
    }

    /// Finish a contact send. Returns whether it succeeded.
    ///
    /// Success acknowledges the customer by name and email and resets the
    /// form; failure shows the generic retry message and keeps the fields.
    /// The submit control is re-enabled either way.
    pub fn complete_contact(
        &self,
        submission: &ContactSubmission,
        outcome: Result<Delivery, MailError>,
        view: &mut View,
    ) -> bool {
        let succeeded = match outcome {
            Ok(delivery) => {
                view.notify(NoticeLevel::Info, acknowledgement(submission, delivery));
                view.reset_contact_form();
                true
            }
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    error = %e,
                    email = %submission.email,
                    sentry_event_id = %event_id,
                    "Contact form submission failed"
                );
                view.notify(NoticeLevel::Error, SEND_FAILURE_MESSAGE);
                false
            }
        };

        view.set_submit_state(SubmitState::Ready);
        succeeded
    }

    /// Place a mocked order for the cart's contents.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::EmptyCart` (after notifying the user) when the
    /// cart has no lines; the cart is left untouched.
    pub fn checkout(&self, cart: &mut Cart, view: &mut View) -> Result<OrderSummary, IntakeError> {
        if cart.is_empty() {
            view.notify(NoticeLevel::Error, IntakeError::EmptyCart.to_string());
            return Err(IntakeError::EmptyCart);
        }

        let summary = OrderSummary {
            reference: Uuid::new_v4(),
            item_count: cart.total_items(),
            total: cart.total_price(),
            placed_at: Utc::now(),
        };

        tracing::info!(
            reference = %summary.reference,
            items = summary.item_count,
            total = %summary.total,
            "Order placed"
        );

        view.notify(NoticeLevel::Info, summary.confirmation_message());
        cart.clear();
        Ok(summary)
    }
}

fn acknowledgement(submission: &ContactSubmission, delivery: Delivery) -> String {
    let detail = match delivery {
        Delivery::Sent => "Your message has been sent successfully.",
        Delivery::Simulated => "(Note: email delivery is not yet configured.)",
    };
    format!(
        "Thank you for your inquiry, {}!\n\n{detail} We'll get back to you within 24 hours at {}.",
        submission.name, submission.email,
    )
}
