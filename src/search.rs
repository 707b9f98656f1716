//! The live text search over product names.

use crate::model::Product;

/// Retain the products whose name contains the query, compared
/// case-insensitively with the query trimmed. Stable: survivors keep
/// their input order. An empty or all-whitespace query matches
/// everything.
pub fn search_products<'a>(query: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}
