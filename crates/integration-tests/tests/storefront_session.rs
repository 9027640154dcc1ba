//! Session commands driven end to end through a file-backed store.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use lustre_core::ProductId;
use lustre_integration_tests::TestContext;
use lustre_storefront::session::Flow;
use lustre_storefront::surface::{NoticeLevel, Slot};
use lustre_storefront::view::{CartPanel, SubmitState};

#[tokio::test(start_paused = true)]
async fn test_cart_survives_restart() {
    let mut ctx = TestContext::new();
    ctx.run(&["add 1", "add 1", "add 8", "dec 1"]);
    assert_eq!(ctx.shop.cart().total_items(), 2);

    let ctx = ctx.restart();
    let lines = ctx.shop.cart().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.first().map(|l| l.id()), Some(ProductId::new(1)));
    assert_eq!(lines.first().map(|l| l.quantity), Some(1));
    assert_eq!(
        ctx.shop.view().surface().get(Slot::CartTotal),
        Some("$4649.99")
    );
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_searches_once() {
    let mut ctx = TestContext::new();
    ctx.run(&["filter Rings"]);
    assert_eq!(ctx.shown_ids(), vec![1, 5]);

    ctx.run(&["type s", "type sa", "type sapphire"]);
    assert_eq!(ctx.shown_ids(), vec![1, 5]);

    assert!(ctx.next_event().await);
    assert_eq!(ctx.shown_ids(), vec![2]);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_clearing_search_restores_category() {
    let mut ctx = TestContext::new();
    ctx.run(&["filter Earrings", "search gold", "search \"\""]);
    assert_eq!(ctx.shown_ids(), vec![3]);
}

#[tokio::test(start_paused = true)]
async fn test_checkout_flow() {
    let mut ctx = TestContext::new();

    ctx.run(&["cart", "checkout"]);
    assert_eq!(ctx.shop.view().ui().cart_panel, CartPanel::Open);
    let notices = ctx.shop.take_notices();
    assert_eq!(notices.first().map(|n| n.level), Some(NoticeLevel::Error));

    ctx.run(&["add 5", "add 3", "checkout"]);
    assert!(ctx.shop.cart().is_empty());
    assert_eq!(ctx.shop.view().ui().cart_panel, CartPanel::Closed);
    let notices = ctx.shop.take_notices();
    let confirmation = &notices.first().unwrap().message;
    assert!(confirmation.contains("2 items"));
    assert!(confirmation.contains("Total: $6700.00"));

    let ctx = ctx.restart();
    assert!(ctx.shop.cart().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_contact_form_round_trip() {
    let mut ctx = TestContext::new();
    ctx.run(&[
        r#"contact --name "Amaya Silva" --email amaya@example.com --message "Custom pendant?""#,
    ]);
    assert_eq!(ctx.shop.view().ui().submit_state, SubmitState::Sending);

    assert!(ctx.next_event().await);
    assert_eq!(ctx.shop.view().ui().submit_state, SubmitState::Ready);
    let notices = ctx.shop.take_notices();
    assert!(notices
        .first()
        .unwrap()
        .message
        .contains("Amaya Silva"));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_contact_is_rejected_before_sending() {
    let mut ctx = TestContext::new();
    ctx.run(&["contact --name Amaya --email not-an-email --message hi"]);

    assert_eq!(ctx.shop.view().ui().submit_state, SubmitState::Ready);
    assert_eq!(
        ctx.shop.take_notices().first().map(|n| n.message.as_str()),
        Some("Please enter a valid email address.")
    );
    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_and_click_close_panel() {
    let mut ctx = TestContext::new();
    ctx.run(&["cart", "key escape"]);
    assert_eq!(ctx.shop.view().ui().cart_panel, CartPanel::Closed);

    ctx.run(&["cart", "click-outside"]);
    assert_eq!(ctx.shop.view().ui().cart_panel, CartPanel::Closed);

    ctx.run(&["key ctrl+k"]);
    assert_eq!(ctx.shop.view().ui().focus, Some(Slot::SearchInput));
}

#[tokio::test(start_paused = true)]
async fn test_session_flow_commands() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.run(&["page"]), Flow::ShowPage);
    assert_eq!(ctx.run(&["wait 250"]), Flow::Wait(Duration::from_millis(250)));
    assert_eq!(ctx.run(&["add 2", "quit"]), Flow::Quit);
}
