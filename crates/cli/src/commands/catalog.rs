//! Catalog browsing.

use std::io::Write;

use lustre_storefront::catalog::{ALL_CATEGORIES, Product};
use lustre_storefront::view::NO_RESULTS_MESSAGE;

use super::{CommandResult, Context};

/// List products, optionally narrowed to a category and a search term.
///
/// A blank search term is ignored.
pub fn list(
    ctx: &Context,
    category: Option<&str>,
    search: Option<&str>,
    out: &mut impl Write,
) -> CommandResult {
    let mut catalog = ctx.catalog.clone();
    let in_category: Vec<_> = catalog
        .filter_by_category(category.unwrap_or(ALL_CATEGORIES))
        .iter()
        .map(|p| p.id)
        .collect();

    let products: Vec<&Product> = match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => catalog
            .search(term)
            .into_iter()
            .filter(|p| in_category.contains(&p.id))
            .collect(),
        None => catalog.filtered(),
    };

    if products.is_empty() {
        writeln!(out, "{NO_RESULTS_MESSAGE}")?;
        return Ok(());
    }
    for product in products {
        writeln!(out, "{}", format_row(product))?;
    }
    Ok(())
}

fn format_row(product: &Product) -> String {
    let name = match product.display_name() {
        "" => "(unnamed)",
        name => name,
    };
    format!(
        "{:>4}  {:<34} {:>10}  {}",
        product.id.as_i32(),
        name,
        product.unit_price().display_grouped(),
        product.category.as_deref().unwrap_or("-"),
    )
}
