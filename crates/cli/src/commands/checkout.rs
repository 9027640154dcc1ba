//! Mocked checkout of the saved cart.

use std::io::Write;

use super::{CommandResult, Context};

/// Place the order and print the confirmation. The saved cart is emptied.
pub fn run(ctx: &Context, out: &mut impl Write) -> CommandResult {
    let mut shop = ctx.storefront();
    let summary = shop.checkout()?;
    writeln!(out, "{}", summary.confirmation_message())?;
    Ok(())
}
