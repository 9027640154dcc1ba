//! Saved cart management.

use std::io::Write;

use lustre_core::{Price, ProductId};
use lustre_storefront::cart::Cart;
use thiserror::Error;

use super::{CommandResult, Context};

/// Errors specific to cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The catalog has no product with this id.
    #[error("No product with id {0}")]
    UnknownProduct(ProductId),

    /// The cart has no line for this id.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// Print the saved cart.
pub fn show(ctx: &Context, out: &mut impl Write) -> CommandResult {
    let cart = Cart::load(ctx.store());
    write_cart(&cart, out)
}

/// Add one of a product to the saved cart.
pub fn add(ctx: &Context, id: ProductId, out: &mut impl Write) -> CommandResult {
    let product = ctx
        .catalog
        .get_by_id(id)
        .ok_or(CartCommandError::UnknownProduct(id))?;

    let mut cart = Cart::load(ctx.store());
    cart.add_item(product);
    tracing::info!(product_id = %id, "Added to cart");

    writeln!(out, "Added {}.", product.display_name())?;
    write_cart(&cart, out)
}

/// Change a saved line's quantity by `delta`.
pub fn update(ctx: &Context, id: ProductId, delta: i32, out: &mut impl Write) -> CommandResult {
    let mut cart = Cart::load(ctx.store());
    if !cart.update_quantity(id, delta) {
        return Err(CartCommandError::NotInCart(id).into());
    }
    write_cart(&cart, out)
}

/// Empty the saved cart.
pub fn clear(ctx: &Context, out: &mut impl Write) -> CommandResult {
    let mut cart = Cart::load(ctx.store());
    cart.clear();
    writeln!(out, "Cart cleared.")?;
    Ok(())
}

fn write_cart(cart: &Cart, out: &mut impl Write) -> CommandResult {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }
    for line in cart.lines() {
        writeln!(
            out,
            "{:>3} x {:<34} {:>12}  (#{})",
            line.quantity,
            line.product.display_name(),
            Price::usd(line.line_total()).display_fixed(),
            line.id(),
        )?;
    }
    let items = cart.total_items();
    writeln!(
        out,
        "Total: {} ({} {})",
        cart.total_price().display_fixed(),
        items,
        if items == 1 { "item" } else { "items" },
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, output};

    #[test]
    fn test_cart_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();

        let mut buf = Vec::new();
        add(&context(&dir), ProductId::new(8), &mut buf).unwrap();
        add(&context(&dir), ProductId::new(8), &mut buf).unwrap();
        add(&context(&dir), ProductId::new(3), &mut buf).unwrap();

        let mut buf = Vec::new();
        show(&context(&dir), &mut buf).unwrap();
        let shown = output(buf);
        assert!(shown.contains("  2 x Charm Bracelet"));
        assert!(shown.contains("$299.98"));
        assert!(shown.contains("Total: $1499.98 (3 items)"));
    }

    #[test]
    fn test_update_removes_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Vec::new();
        add(&context(&dir), ProductId::new(1), &mut buf).unwrap();

        let mut buf = Vec::new();
        update(&context(&dir), ProductId::new(1), -1, &mut buf).unwrap();
        assert_eq!(output(buf).trim(), "Your cart is empty");
    }

    #[test]
    fn test_unknown_ids_fail() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let mut buf = Vec::new();

        let err = add(&ctx, ProductId::new(7), &mut buf).unwrap_err();
        assert_eq!(err.to_string(), "No product with id 7");

        let err = update(&ctx, ProductId::new(2), 1, &mut buf).unwrap_err();
        assert_eq!(err.to_string(), "Product 2 is not in the cart");
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut buf = Vec::new();
        add(&context(&dir), ProductId::new(5), &mut buf).unwrap();
        clear(&context(&dir), &mut buf).unwrap();

        let mut buf = Vec::new();
        show(&context(&dir), &mut buf).unwrap();
        assert_eq!(output(buf).trim(), "Your cart is empty");
    }
}
