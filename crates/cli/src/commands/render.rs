//! Page rendering.

use std::io::Write;
use std::path::Path;

use super::{CommandResult, Context};

/// Render the page for the saved cart and write it to `target`, or to the
/// configured page path.
pub async fn run(ctx: &Context, target: Option<&Path>, out: &mut impl Write) -> CommandResult {
    let mut shop = ctx.storefront();
    shop.start();
    let page = shop.render_page()?;

    let path = target.unwrap_or(&ctx.config.page_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, page).await?;

    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}
