//! The view-model builder: joins the three flat collections into a
//! denormalized, display-ready shape.

use crate::model::{Catalog, Category, Product, User};

/// A category joined with its resolved owner and member products.
///
/// Borrows from the catalogue; built once at startup and reused for the
/// whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCategory<'a> {
    pub category: &'a Category,
    /// The first user whose id matches `owner_id`; `None` when the
    /// reference does not resolve.
    pub user: Option<&'a User>,
    /// All products with a matching `category_id`, in source order.
    pub products: Vec<&'a Product>,
}

/// Build one `PreparedCategory` per catalogue category, preserving input
/// order. Pure and idempotent; unresolved references yield absent or
/// empty values, never an error.
pub fn prepare_categories(catalog: &Catalog) -> Vec<PreparedCategory<'_>> {
    catalog
        .categories
        .iter()
        .map(|category| {
            let user = catalog.users.iter().find(|u| u.id == category.owner_id);
            let products = catalog
                .products
                .iter()
                .filter(|p| p.category_id == category.id)
                .collect();

            PreparedCategory {
                category,
                user,
                products,
            }
        })
        .collect()
}
