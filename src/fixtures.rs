//! Fixture data embedded at compile time, plus the file-override path.
//!
//! The embedded catalogue is the default data source; `--data <file>` (or
//! `SHELF_DATA`) replaces it with a single JSON file carrying the same
//! three arrays.

use crate::model::Catalog;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::path::Path;

static USERS_JSON: &str = include_str!("../fixtures/users.json");
static CATEGORIES_JSON: &str = include_str!("../fixtures/categories.json");
static PRODUCTS_JSON: &str = include_str!("../fixtures/products.json");

static EMBEDDED: Lazy<Catalog> = Lazy::new(|| Catalog {
    users: serde_json::from_str(USERS_JSON).expect("embedded users.json parses"),
    categories: serde_json::from_str(CATEGORIES_JSON).expect("embedded categories.json parses"),
    products: serde_json::from_str(PRODUCTS_JSON).expect("embedded products.json parses"),
});

/// The compile-time-embedded catalogue, parsed once on first access.
pub fn embedded() -> &'static Catalog {
    &EMBEDDED
}

/// Load a replacement catalogue from a JSON file. Unlike the core
/// transforms, this boundary is fallible: a missing or malformed file is
/// a real error.
pub fn load_from(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalogue file {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&content)
        .with_context(|| format!("invalid catalogue JSON in {}", path.display()))?;
    Ok(catalog)
}
