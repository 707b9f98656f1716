//! Assembles the visible table rows: search, selections, then sort.

use crate::model::{Catalog, Category, Product, User};
use crate::prepare::PreparedCategory;
use crate::search::search_products;
use crate::state::{SortDir, SortKey, ViewState};
use std::cmp::Ordering;

/// One display row: a product joined with its resolved category and the
/// category's owner. Either join may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub product: &'a Product,
    pub category: Option<&'a Category>,
    pub user: Option<&'a User>,
}

impl Row<'_> {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.product.id,
            "name": self.product.name,
            "category": self.category,
            "user": self.user,
        })
    }
}

/// Compute the rows the table should show for the current state.
///
/// Pipeline: text search over product names, then the category
/// selection (raw `category_id` match), then the user selection (the
/// owner of the product's category; rows without a resolved owner drop
/// out when a user filter is active), then the sort. Without a sort the
/// source order is kept; sorting is stable.
pub fn visible_rows<'a>(
    catalog: &'a Catalog,
    prepared: &[PreparedCategory<'a>],
    state: &ViewState,
) -> Vec<Row<'a>> {
    let mut rows: Vec<Row<'a>> = search_products(&state.query, &catalog.products)
        .into_iter()
        .map(|product| {
            let prepared_category = prepared
                .iter()
                .find(|pc| pc.category.id == product.category_id);
            Row {
                product,
                category: prepared_category.map(|pc| pc.category),
                user: prepared_category.and_then(|pc| pc.user),
            }
        })
        .filter(|row| match state.selected_category {
            Some(id) => row.product.category_id == id,
            None => true,
        })
        .filter(|row| match state.selected_user {
            Some(id) => row.user.map(|u| u.id) == Some(id),
            None => true,
        })
        .collect();

    if let Some((key, dir)) = state.sort {
        rows.sort_by(|a, b| {
            let ord = compare(a, b, key);
            match dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
    }

    rows
}

fn compare(a: &Row, b: &Row, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.product.id.cmp(&b.product.id),
        SortKey::Name => fold(&a.product.name).cmp(&fold(&b.product.name)),
        SortKey::Category => {
            let title = |row: &Row| row.category.map(|c| fold(&c.title)).unwrap_or_default();
            title(a).cmp(&title(b))
        }
        SortKey::User => {
            let name = |row: &Row| row.user.map(|u| fold(&u.name)).unwrap_or_default();
            name(a).cmp(&name(b))
        }
    }
}

// Columns compare case-insensitively, like the search does.
fn fold(s: &str) -> String {
    s.to_lowercase()
}
