//! Catalogue entities and the owned startup container.
//!
//! All data is loaded once at startup and never mutated afterwards. The
//! view-model builder and the filters borrow from `Catalog` instead of
//! copying it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user who can own categories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    /// Free-form; the fixture data uses "m" and "f".
    pub sex: String,
}

/// A product category, optionally owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    pub title: String,
    pub icon: String,
    /// References a `User.id`. May not resolve; that is a valid state,
    /// not an error.
    pub owner_id: u32,
}

/// A product, optionally belonging to a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// References a `Category.id`. May not resolve.
    pub category_id: u32,
}

/// The full catalogue: three flat collections, immutable after load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    /// Find a user by id.
    pub fn user(&self, id: u32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Find a category by id.
    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Check the fixture-data assumptions: unique ids per collection and
    /// resolvable references. Violations are reported as warnings, never
    /// as errors; unresolved references degrade to absent values downstream.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.id) {
                warnings.push(format!("duplicate user id: {}", user.id));
            }
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id) {
                warnings.push(format!("duplicate category id: {}", category.id));
            }
            if self.user(category.owner_id).is_none() {
                warnings.push(format!(
                    "category {} ({}) has no owner with id {}",
                    category.id, category.title, category.owner_id
                ));
            }
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id) {
                warnings.push(format!("duplicate product id: {}", product.id));
            }
            if self.category(product.category_id).is_none() {
                warnings.push(format!(
                    "product {} ({}) has no category with id {}",
                    product.id, product.name, product.category_id
                ));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog {
            users: vec![User {
                id: 1,
                name: "Anna".to_string(),
                sex: "f".to_string(),
            }],
            categories: vec![Category {
                id: 1,
                title: "Fruits".to_string(),
                icon: "🍏".to_string(),
                owner_id: 1,
            }],
            products: vec![Product {
                id: 1,
                name: "Apple".to_string(),
                category_id: 1,
            }],
        }
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let category: Category =
            serde_json::from_str(r#"{ "id": 3, "title": "Fruits", "icon": "🍏", "ownerId": 2 }"#)
                .unwrap();
        assert_eq!(category.owner_id, 2);

        let product: Product =
            serde_json::from_str(r#"{ "id": 7, "name": "Apple", "categoryId": 3 }"#).unwrap();
        assert_eq!(product.category_id, 3);
    }

    #[test]
    fn test_lint_clean_catalog() {
        assert!(catalog().lint().is_empty());
    }

    #[test]
    fn test_lint_duplicate_ids() {
        let mut cat = catalog();
        cat.users.push(cat.users[0].clone());
        let warnings = cat.lint();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duplicate user id: 1"));
    }

    #[test]
    fn test_lint_dangling_references() {
        let mut cat = catalog();
        cat.categories[0].owner_id = 99;
        cat.products[0].category_id = 42;
        let warnings = cat.lint();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no owner with id 99"));
        assert!(warnings[1].contains("no category with id 42"));
    }

    #[test]
    fn test_lookup_helpers() {
        let cat = catalog();
        assert_eq!(cat.user(1).map(|u| u.name.as_str()), Some("Anna"));
        assert!(cat.user(2).is_none());
        assert_eq!(cat.category(1).map(|c| c.title.as_str()), Some("Fruits"));
        assert!(cat.category(9).is_none());
    }
}
