//! Product category schema

use serde::{Deserialize, Serialize};

use super::WooItem;
use super::product::Image;

/// Link to a category resource, e.g. `https://example.com/wp-json/wc/v3/products/categories/15`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryLink {
    #[serde(default)]
    pub href: String,
}

/// Read-only HAL links generated by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryLinks {
    #[serde(default, rename = "self", skip_serializing_if = "Vec::is_empty")]
    pub self_links: Vec<CategoryLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collection: Vec<CategoryLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub up: Vec<CategoryLink>,
}

impl CategoryLinks {
    fn is_empty(&self) -> bool {
        self.self_links.is_empty() && self.collection.is_empty() && self.up.is_empty()
    }
}

/// Node of the store's category tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    /// Parent category id, 0 for top level
    #[serde(default, skip_serializing_if = "is_zero")]
    pub parent: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub menu_order: i64,
    /// Number of published products in the category (read-only)
    #[serde(default, skip_serializing)]
    pub count: u64,
    #[serde(default, rename = "_links", skip_serializing_if = "CategoryLinks::is_empty")]
    pub links: CategoryLinks,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent == 0
    }
}

impl WooItem for Category {
    fn id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}
