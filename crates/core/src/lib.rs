//! Lustre Core - Shared types library.
//!
//! This crate provides common types used across all Lustre components:
//! - `storefront` - The catalog, cart and intake widget plus its session binary
//! - `cli` - One-shot commands against the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no rendering, no timers.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
