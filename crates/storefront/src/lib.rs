//! Lustre storefront library.
//!
//! A jewelry storefront widget: the catalog with category filtering and
//! search, a cart persisted to a local key-value store, a contact form and a
//! mocked checkout. State is projected onto a [`surface::DisplaySurface`] of
//! askama-rendered fragments that assemble into a single page.
//!
//! [`controller::Storefront`] wires everything together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod intake;
pub mod services;
pub mod session;
pub mod store;
pub mod surface;
pub mod timer;
pub mod view;
