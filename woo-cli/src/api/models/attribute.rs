//! Product attribute schema

use serde::{Deserialize, Serialize};

use super::WooItem;

/// Additional general field for products (e.g. "Color" with its terms)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Single term, used on variations
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub option: String,
    /// All terms available on the product
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default)]
    pub visible: bool,
    /// "select" unless the store says otherwise
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl WooItem for Attribute {
    fn id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}
